//! Deterministic filter + sort that produces the ranked view of a roster.

use std::cmp::Ordering;

use serde::Serialize;

use crate::technician::{SortMetric, Technician};

/// One row of the ranked view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    /// 1-based position in the ranked view.
    pub position: usize,
    pub technician: Technician,
}

/// Filter `records` by `search_query` and order them by `sort_by`.
///
/// An empty query keeps every record; otherwise a record is kept when its
/// name contains the query, ignoring case. The sort is stable, so records
/// that tie on the metric keep their input order. `records` is not modified.
pub fn rank(records: &[Technician], sort_by: SortMetric, search_query: &str) -> Vec<Technician> {
    let needle = search_query.to_lowercase();
    let mut ranked: Vec<Technician> = records
        .iter()
        .filter(|technician| matches_query(technician, &needle))
        .cloned()
        .collect();
    ranked.sort_by(|a, b| compare_by(sort_by, a, b));
    ranked
}

/// [`rank`] with 1-based positions attached.
pub fn ranked_positions(
    records: &[Technician],
    sort_by: SortMetric,
    search_query: &str,
) -> Vec<RankedEntry> {
    rank(records, sort_by, search_query)
        .into_iter()
        .enumerate()
        .map(|(index, technician)| RankedEntry {
            position: index + 1,
            technician,
        })
        .collect()
}

/// Ordering where `Less` means `a` ranks ahead of `b`.
///
/// Float metrics compare numerically, so `-0.0` and `0.0` tie.
pub fn compare_by(sort_by: SortMetric, a: &Technician, b: &Technician) -> Ordering {
    match sort_by {
        SortMetric::TotalCalls => b.total_calls.cmp(&a.total_calls),
        SortMetric::AvgServiceTime => compare_metric(a.avg_service_time, b.avg_service_time),
        SortMetric::FirstResponseTime => {
            compare_metric(a.first_response_time, b.first_response_time)
        }
        SortMetric::Rating => compare_metric(b.rating, a.rating),
    }
}

/// Stored metrics are finite; anything incomparable ties.
fn compare_metric(left: f64, right: f64) -> Ordering {
    left.partial_cmp(&right).unwrap_or(Ordering::Equal)
}

/// `needle` must already be lowercased.
fn matches_query(technician: &Technician, needle: &str) -> bool {
    needle.is_empty() || technician.name.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{scored, tech};

    fn ids(records: &[Technician]) -> Vec<&str> {
        records.iter().map(|t| t.id.as_str()).collect()
    }

    fn sample_roster() -> Vec<Technician> {
        let mut a = scored("a", "Ana Souza", 10, 4.0);
        a.avg_service_time = 30.0;
        a.first_response_time = 5.0;
        let mut b = scored("b", "Bruno Lima", 20, 2.0);
        b.avg_service_time = 45.0;
        b.first_response_time = 2.0;
        let mut c = scored("c", "Carla Ana", 15, 4.5);
        c.avg_service_time = 20.0;
        c.first_response_time = 9.0;
        vec![a, b, c]
    }

    #[test]
    fn two_technicians_rank_by_calls_and_rating() {
        let roster = vec![scored("A", "A", 10, 4.0), scored("B", "B", 20, 2.0)];
        assert_eq!(ids(&rank(&roster, SortMetric::TotalCalls, "")), vec!["B", "A"]);
        assert_eq!(ids(&rank(&roster, SortMetric::Rating, "")), vec!["A", "B"]);
    }

    #[test]
    fn each_metric_sorts_in_its_direction() {
        let roster = sample_roster();
        assert_eq!(ids(&rank(&roster, SortMetric::TotalCalls, "")), vec!["b", "c", "a"]);
        assert_eq!(ids(&rank(&roster, SortMetric::AvgServiceTime, "")), vec!["c", "a", "b"]);
        assert_eq!(ids(&rank(&roster, SortMetric::FirstResponseTime, "")), vec!["b", "a", "c"]);
        assert_eq!(ids(&rank(&roster, SortMetric::Rating, "")), vec!["c", "a", "b"]);
    }

    #[test]
    fn adjacent_pairs_are_monotonic_for_every_metric() {
        let roster = sample_roster();
        for metric in SortMetric::ALL {
            let ranked = rank(&roster, metric, "");
            for pair in ranked.windows(2) {
                let (left, right) = (metric.value_of(&pair[0]), metric.value_of(&pair[1]));
                if metric.higher_is_better() {
                    assert!(left >= right, "{metric}: {left} before {right}");
                } else {
                    assert!(left <= right, "{metric}: {left} before {right}");
                }
            }
        }
    }

    #[test]
    fn ties_keep_input_order() {
        let roster = vec![tech("x", "X"), tech("y", "Y"), tech("z", "Z")];
        for metric in SortMetric::ALL {
            assert_eq!(ids(&rank(&roster, metric, "")), vec!["x", "y", "z"]);
        }
    }

    #[test]
    fn signed_zero_ties_keep_input_order() {
        let mut x = tech("x", "X");
        x.avg_service_time = -0.0;
        x.first_response_time = 0.0;
        x.rating = -0.0;
        let mut y = tech("y", "Y");
        y.avg_service_time = 0.0;
        y.first_response_time = -0.0;
        y.rating = 0.0;

        let roster = vec![x.clone(), y.clone()];
        let swapped = vec![y, x];
        for metric in [
            SortMetric::AvgServiceTime,
            SortMetric::FirstResponseTime,
            SortMetric::Rating,
        ] {
            assert_eq!(ids(&rank(&roster, metric, "")), vec!["x", "y"], "{metric}");
            assert_eq!(ids(&rank(&swapped, metric, "")), vec!["y", "x"], "{metric}");
        }
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let roster = sample_roster();
        let ranked = rank(&roster, SortMetric::TotalCalls, "ANA");
        assert_eq!(ids(&ranked), vec!["c", "a"]);
        assert!(ranked.iter().all(|t| t.name.to_lowercase().contains("ana")));
        assert!(rank(&roster, SortMetric::TotalCalls, "nobody").is_empty());
    }

    #[test]
    fn search_folds_non_ascii_case() {
        let roster = vec![tech("t1", "Técnico 1"), tech("t2", "Outro")];
        assert_eq!(ids(&rank(&roster, SortMetric::Rating, "TÉCNICO")), vec!["t1"]);
    }

    #[test]
    fn rank_is_deterministic_and_leaves_input_untouched() {
        let roster = sample_roster();
        let before = roster.clone();
        let first = rank(&roster, SortMetric::Rating, "a");
        let second = rank(&roster, SortMetric::Rating, "a");
        assert_eq!(first, second);
        assert_eq!(roster, before);
    }

    #[test]
    fn positions_are_one_based() {
        let entries = ranked_positions(&sample_roster(), SortMetric::TotalCalls, "");
        let positions: Vec<usize> = entries.iter().map(|e| e.position).collect();
        assert_eq!(positions, vec![1, 2, 3]);
        assert_eq!(entries[0].technician.id, "b");
    }
}
