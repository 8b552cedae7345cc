//! Seeded sample trend series for dashboard-style charts.
//!
//! The roster keeps only the latest snapshot per technician, so there is no
//! real history to plot. These series jitter the current roster averages
//! around a baseline. Output depends only on the inputs and the seed.

use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::core::summary::RosterSummary;

pub const DEFAULT_TREND_DAYS: u32 = 7;
pub const MAX_TREND_DAYS: u32 = 366;
pub const SERVICE_TIME_VARIANCE: f64 = 20.0;
pub const FIRST_RESPONSE_VARIANCE: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleTrends {
    pub seed: u64,
    pub service_time: Vec<TrendPoint>,
    pub first_response_time: Vec<TrendPoint>,
}

/// One point per day ending at `end` (inclusive), oldest first.
///
/// Each value is `baseline + (u - 0.5) * variance` for `u` uniform in `[0, 1)`,
/// floored at zero since the series are durations.
pub fn sample_trend<R: Rng>(
    rng: &mut R,
    baseline: f64,
    variance: f64,
    end: NaiveDate,
    days: u32,
) -> Vec<TrendPoint> {
    (0..days)
        .rev()
        .filter_map(|offset| end.checked_sub_days(Days::new(u64::from(offset))))
        .map(|date| {
            let jitter: f64 = rng.r#gen::<f64>() - 0.5;
            TrendPoint {
                date,
                value: (baseline + jitter * variance).max(0.0),
            }
        })
        .collect()
}

/// Service-time and first-response series seeded from `seed`.
pub fn sample_trends(summary: &RosterSummary, end: NaiveDate, days: u32, seed: u64) -> SampleTrends {
    let mut rng = StdRng::seed_from_u64(seed);
    let service_time = sample_trend(
        &mut rng,
        summary.avg_service_time.unwrap_or(0.0),
        SERVICE_TIME_VARIANCE,
        end,
        days,
    );
    let first_response_time = sample_trend(
        &mut rng,
        summary.avg_first_response_time.unwrap_or(0.0),
        FIRST_RESPONSE_VARIANCE,
        end,
        days,
    );
    SampleTrends {
        seed,
        service_time,
        first_response_time,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::summary::summarize;
    use crate::test_support::scored;

    fn end_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).expect("date")
    }

    #[test]
    fn same_seed_gives_same_series() {
        let mut a = scored("a", "Ana", 10, 4.0);
        a.avg_service_time = 40.0;
        a.first_response_time = 8.0;
        let summary = summarize(&[a]);

        let first = sample_trends(&summary, end_date(), DEFAULT_TREND_DAYS, 42);
        let second = sample_trends(&summary, end_date(), DEFAULT_TREND_DAYS, 42);
        assert_eq!(first, second);

        let other = sample_trends(&summary, end_date(), DEFAULT_TREND_DAYS, 43);
        assert_ne!(first.service_time, other.service_time);
    }

    #[test]
    fn series_covers_trailing_days_within_variance() {
        let mut rng = StdRng::seed_from_u64(7);
        let points = sample_trend(&mut rng, 40.0, 20.0, end_date(), 7);
        assert_eq!(points.len(), 7);
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2024, 3, 4).expect("date"));
        assert_eq!(points[6].date, end_date());
        assert!(points.iter().all(|p| (30.0..50.0).contains(&p.value)));
    }

    #[test]
    fn values_never_go_negative() {
        let mut rng = StdRng::seed_from_u64(1);
        let points = sample_trend(&mut rng, 0.0, 10.0, end_date(), 30);
        assert!(points.iter().all(|p| p.value >= 0.0));
    }
}
