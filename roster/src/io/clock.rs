//! Wall-clock source for record timestamps.

use chrono::{DateTime, Utc};

/// Source of "now" for stamping records. Tests substitute a stepping clock.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
