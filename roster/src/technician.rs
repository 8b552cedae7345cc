//! Technician record and the filter state that accompanies a roster.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Latest performance snapshot for one technician.
///
/// Serialized with camelCase keys and RFC 3339 timestamps; this is the shape
/// both the durable store and export documents use.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Technician {
    pub id: String,
    pub name: String,
    pub total_calls: u64,
    /// Minutes.
    pub avg_service_time: f64,
    /// Minutes.
    pub first_response_time: f64,
    /// Out of 5.
    pub rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new technician.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewTechnician {
    pub name: String,
    pub total_calls: u64,
    pub avg_service_time: f64,
    pub first_response_time: f64,
    pub rating: f64,
}

impl Technician {
    /// Mutable fields of this record, in creation-input form.
    pub fn to_input(&self) -> NewTechnician {
        NewTechnician {
            name: self.name.clone(),
            total_calls: self.total_calls,
            avg_service_time: self.avg_service_time,
            first_response_time: self.first_response_time,
            rating: self.rating,
        }
    }

    /// Replace `-0.0` metrics with `0.0`.
    pub fn normalize_zeros(mut self) -> Self {
        self.avg_service_time = positive_zero(self.avg_service_time);
        self.first_response_time = positive_zero(self.first_response_time);
        self.rating = positive_zero(self.rating);
        self
    }
}

fn positive_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

/// Metric used to order the ranked view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortMetric {
    #[default]
    TotalCalls,
    AvgServiceTime,
    FirstResponseTime,
    Rating,
}

impl SortMetric {
    pub const ALL: [SortMetric; 4] = [
        SortMetric::TotalCalls,
        SortMetric::AvgServiceTime,
        SortMetric::FirstResponseTime,
        SortMetric::Rating,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortMetric::TotalCalls => "totalCalls",
            SortMetric::AvgServiceTime => "avgServiceTime",
            SortMetric::FirstResponseTime => "firstResponseTime",
            SortMetric::Rating => "rating",
        }
    }

    /// True when a larger value ranks first.
    pub fn higher_is_better(self) -> bool {
        matches!(self, SortMetric::TotalCalls | SortMetric::Rating)
    }

    /// Read this metric from a record as a float.
    pub fn value_of(self, technician: &Technician) -> f64 {
        match self {
            SortMetric::TotalCalls => technician.total_calls as f64,
            SortMetric::AvgServiceTime => technician.avg_service_time,
            SortMetric::FirstResponseTime => technician.first_response_time,
            SortMetric::Rating => technician.rating,
        }
    }
}

impl fmt::Display for SortMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown sort metric '{0}' (expected totalCalls, avgServiceTime, firstResponseTime or rating)")]
pub struct ParseSortMetricError(pub String);

impl FromStr for SortMetric {
    type Err = ParseSortMetricError;

    /// Accepts the camelCase names plus kebab/snake spellings, ignoring case.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let folded: String = raw
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        match folded.as_str() {
            "totalcalls" => Ok(SortMetric::TotalCalls),
            "avgservicetime" => Ok(SortMetric::AvgServiceTime),
            "firstresponsetime" => Ok(SortMetric::FirstResponseTime),
            "rating" => Ok(SortMetric::Rating),
            _ => Err(ParseSortMetricError(raw.to_string())),
        }
    }
}

/// Date interval held in roster state. Ranking does not consult it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

pub const SEED_SIZE: usize = 7;

/// Default roster used when nothing has been stored yet: numbered
/// technicians with zeroed metrics.
pub fn default_seed(now: DateTime<Utc>) -> Vec<Technician> {
    (1..=SEED_SIZE)
        .map(|n| Technician {
            id: uuid::Uuid::new_v4().to_string(),
            name: format!("Técnico {n}"),
            total_calls: 0,
            avg_service_time: 0.0,
            first_response_time: 0.0,
            rating: 0.0,
            created_at: now,
            updated_at: now,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn sort_metric_parses_cli_spellings() {
        assert_eq!("totalCalls".parse(), Ok(SortMetric::TotalCalls));
        assert_eq!("avg-service-time".parse(), Ok(SortMetric::AvgServiceTime));
        assert_eq!("FIRST_RESPONSE_TIME".parse(), Ok(SortMetric::FirstResponseTime));
        assert_eq!("rating".parse(), Ok(SortMetric::Rating));
        assert!("speed".parse::<SortMetric>().is_err());
    }

    #[test]
    fn sort_metric_serializes_as_camel_case() {
        let json = serde_json::to_string(&SortMetric::FirstResponseTime).expect("serialize");
        assert_eq!(json, "\"firstResponseTime\"");
        for metric in SortMetric::ALL {
            assert_eq!(metric.to_string().parse::<SortMetric>(), Ok(metric));
        }
    }

    #[test]
    fn technician_uses_camel_case_keys() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).expect("timestamp");
        let tech = Technician {
            id: "t1".to_string(),
            name: "Ana".to_string(),
            total_calls: 3,
            avg_service_time: 12.5,
            first_response_time: 4.0,
            rating: 4.5,
            created_at: now,
            updated_at: now,
        };
        let value = serde_json::to_value(&tech).expect("serialize");
        assert_eq!(value["totalCalls"], 3);
        assert_eq!(value["avgServiceTime"], 12.5);
        assert_eq!(value["firstResponseTime"], 4.0);
        assert_eq!(value["createdAt"], "2023-11-14T22:13:20Z");
    }

    #[test]
    fn normalize_zeros_drops_negative_sign() {
        let record = Technician {
            id: "a".to_string(),
            name: "Ana".to_string(),
            total_calls: 0,
            avg_service_time: -0.0,
            first_response_time: -0.0,
            rating: -0.0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
        .normalize_zeros();
        assert!(record.avg_service_time.is_sign_positive());
        assert!(record.first_response_time.is_sign_positive());
        assert!(record.rating.is_sign_positive());
    }

    #[test]
    fn default_seed_has_unique_ids_and_zeroed_metrics() {
        let now = Utc::now();
        let seed = default_seed(now);
        assert_eq!(seed.len(), SEED_SIZE);
        let ids: HashSet<&str> = seed.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), SEED_SIZE);
        assert_eq!(seed[0].name, "Técnico 1");
        assert!(seed.iter().all(|t| t.total_calls == 0 && t.rating == 0.0));
        assert!(seed.iter().all(|t| t.created_at == now && t.updated_at == now));
    }
}
