//! Test-only helpers for building records, clocks, and storage doubles.

use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

use chrono::{DateTime, TimeDelta, Utc};
use tempfile::TempDir;

use crate::error::StorageError;
use crate::io::clock::Clock;
use crate::io::init::{InitOptions, RosterPaths, init_roster};
use crate::io::storage::{MemoryStorage, RosterStorage};
use crate::technician::{NewTechnician, Technician};

/// Base instant for deterministic records (2023-11-14T22:13:20Z).
pub const BASE_SECS: i64 = 1_700_000_000;

/// UTC instant `secs` seconds after the Unix epoch.
pub fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).expect("valid timestamp")
}

/// Record with zeroed metrics stamped at [`BASE_SECS`].
pub fn tech(id: &str, name: &str) -> Technician {
    Technician {
        id: id.to_string(),
        name: name.to_string(),
        total_calls: 0,
        avg_service_time: 0.0,
        first_response_time: 0.0,
        rating: 0.0,
        created_at: at(BASE_SECS),
        updated_at: at(BASE_SECS),
    }
}

/// Record with explicit call count and rating.
pub fn scored(id: &str, name: &str, total_calls: u64, rating: f64) -> Technician {
    Technician {
        total_calls,
        rating,
        ..tech(id, name)
    }
}

pub fn input(
    name: &str,
    total_calls: u64,
    avg_service_time: f64,
    first_response_time: f64,
    rating: f64,
) -> NewTechnician {
    NewTechnician {
        name: name.to_string(),
        total_calls,
        avg_service_time,
        first_response_time,
        rating,
    }
}

/// Clock that advances one second per reading.
#[derive(Debug)]
pub struct SteppingClock {
    next: Cell<DateTime<Utc>>,
    step: TimeDelta,
}

impl SteppingClock {
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self::with_step(start, TimeDelta::seconds(1))
    }

    /// A zero step models readings within the same instant.
    pub fn with_step(start: DateTime<Utc>, step: TimeDelta) -> Self {
        Self {
            next: Cell::new(start),
            step,
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let now = self.next.get();
        self.next.set(now + self.step);
        now
    }
}

/// Memory storage whose writes can be switched to fail.
#[derive(Debug, Clone, Default)]
pub struct FailingStorage {
    inner: MemoryStorage,
    fail_writes: Rc<Cell<bool>>,
}

impl FailingStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    pub fn contents(&self) -> Option<String> {
        self.inner.contents()
    }

    fn write_error(&self) -> StorageError {
        StorageError::Write {
            location: "failing storage".to_string(),
            source: std::io::Error::other("quota exceeded"),
        }
    }
}

impl RosterStorage for FailingStorage {
    fn load(&self) -> Result<Option<Vec<Technician>>, StorageError> {
        self.inner.load()
    }

    fn save(&self, records: &[Technician]) -> Result<(), StorageError> {
        if self.fail_writes.get() {
            return Err(self.write_error());
        }
        self.inner.save(records)
    }

    fn clear(&self) -> Result<(), StorageError> {
        if self.fail_writes.get() {
            return Err(StorageError::Clear {
                location: "failing storage".to_string(),
                source: std::io::Error::other("quota exceeded"),
            });
        }
        self.inner.clear()
    }
}

/// Temporary project root with `.roster/` initialized.
pub struct TestRoot {
    dir: TempDir,
    paths: RosterPaths,
}

impl TestRoot {
    pub fn new() -> anyhow::Result<Self> {
        let dir = tempfile::tempdir()?;
        let paths = init_roster(dir.path(), &InitOptions { force: false })?;
        Ok(Self { dir, paths })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn paths(&self) -> &RosterPaths {
        &self.paths
    }
}
