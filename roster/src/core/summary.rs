//! Aggregate figures over a roster: per-metric averages and leaders.

use serde::Serialize;

use crate::core::ranking::rank;
use crate::technician::{SortMetric, Technician};

/// Averages are `None` for an empty roster.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterSummary {
    pub count: usize,
    pub avg_total_calls: Option<f64>,
    pub avg_service_time: Option<f64>,
    pub avg_first_response_time: Option<f64>,
    pub avg_rating: Option<f64>,
    pub leaders: Vec<MetricLeader>,
}

/// Technician ranked first for one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricLeader {
    pub metric: SortMetric,
    pub id: String,
    pub name: String,
    pub value: f64,
}

pub fn summarize(records: &[Technician]) -> RosterSummary {
    let leaders = SortMetric::ALL
        .into_iter()
        .filter_map(|metric| {
            rank(records, metric, "")
                .into_iter()
                .next()
                .map(|first| MetricLeader {
                    metric,
                    value: metric.value_of(&first),
                    id: first.id,
                    name: first.name,
                })
        })
        .collect();

    RosterSummary {
        count: records.len(),
        avg_total_calls: average(records, SortMetric::TotalCalls),
        avg_service_time: average(records, SortMetric::AvgServiceTime),
        avg_first_response_time: average(records, SortMetric::FirstResponseTime),
        avg_rating: average(records, SortMetric::Rating),
        leaders,
    }
}

fn average(records: &[Technician], metric: SortMetric) -> Option<f64> {
    if records.is_empty() {
        return None;
    }
    let total: f64 = records.iter().map(|t| metric.value_of(t)).sum();
    Some(total / records.len() as f64)
}
