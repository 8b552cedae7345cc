//! In-memory roster kept in sync with durable storage.
//!
//! [`RosterStore`] owns the roster, the transient filter state, and an
//! injected [`RosterStorage`]. Every mutation is applied to a candidate copy
//! that is flushed first and committed to memory only once the flush
//! succeeds, so a failed operation leaves the roster as it was.

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::core::invariants::validate_roster;
use crate::core::ranking::{RankedEntry, rank, ranked_positions};
use crate::core::summary::{RosterSummary, summarize};
use crate::core::validation::validate_input;
use crate::error::{NotFoundError, RosterError, RosterResult, StorageError, ValidationError};
use crate::io::clock::Clock;
use crate::io::storage::RosterStorage;
use crate::io::transfer::{ExportDocument, import_into};
use crate::technician::{DateRange, NewTechnician, SortMetric, Technician};

/// Where the roster came from when the store was opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupSource {
    /// Loaded from durable storage.
    Stored,
    /// Nothing was stored; the seed roster was used and persisted.
    Seeded,
    /// Stored content was unreadable; the seed roster is in memory and the
    /// stored entry is left untouched until the next mutation.
    Recovered { reason: String },
}

/// Transient view state. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterFilters {
    pub sort_by: SortMetric,
    pub search_query: String,
    /// Held for collaborators; ranking ignores it.
    pub date_range: Option<DateRange>,
}

pub struct RosterStore {
    records: Vec<Technician>,
    filters: RosterFilters,
    storage: Box<dyn RosterStorage>,
    clock: Box<dyn Clock>,
    startup: StartupSource,
}

impl RosterStore {
    /// Load the roster from `storage`, falling back to `initial_seed`.
    ///
    /// A missing entry seeds the store and persists the seed. Unreadable or
    /// inconsistent content also falls back to the seed, logged as a
    /// warning and reported through [`RosterStore::startup`].
    #[instrument(skip_all, fields(seed = initial_seed.len()))]
    pub fn open(
        storage: Box<dyn RosterStorage>,
        clock: Box<dyn Clock>,
        initial_seed: Vec<Technician>,
    ) -> RosterResult<Self> {
        let (records, startup) = match load_checked(storage.as_ref()) {
            Ok(Some(records)) => (records, StartupSource::Stored),
            Ok(None) => {
                storage.save(&initial_seed)?;
                info!(count = initial_seed.len(), "no stored roster; seeded");
                (initial_seed, StartupSource::Seeded)
            }
            Err(err) => {
                warn!(error = %err, "stored roster unreadable; falling back to seed");
                (
                    initial_seed,
                    StartupSource::Recovered {
                        reason: err.to_string(),
                    },
                )
            }
        };
        debug!(count = records.len(), startup = ?startup, "roster store opened");
        Ok(Self {
            records,
            filters: RosterFilters::default(),
            storage,
            clock,
            startup,
        })
    }

    pub fn startup(&self) -> &StartupSource {
        &self.startup
    }

    /// Add a technician with a fresh id and `createdAt = updatedAt = now`.
    #[instrument(skip_all, fields(name = %input.name))]
    pub fn create(&mut self, input: NewTechnician) -> RosterResult<Technician> {
        ensure_valid(&input)?;
        let now = self.clock.now();
        let technician = Technician {
            id: self.fresh_id(),
            name: input.name.trim().to_string(),
            total_calls: input.total_calls,
            avg_service_time: input.avg_service_time,
            first_response_time: input.first_response_time,
            rating: input.rating,
            created_at: now,
            updated_at: now,
        }
        .normalize_zeros();

        let mut candidate = self.records.clone();
        candidate.push(technician.clone());
        self.commit(candidate)?;
        info!(id = %technician.id, "technician created");
        Ok(technician)
    }

    /// Replace the mutable fields of an existing technician.
    ///
    /// `id` selects the record; `createdAt` is preserved and `updatedAt` is
    /// restamped, never moving backwards. Supplied timestamps are ignored.
    #[instrument(skip_all, fields(id = %record.id))]
    pub fn update(&mut self, record: Technician) -> RosterResult<Technician> {
        let position = self.position(&record.id).ok_or_else(|| NotFoundError {
            id: record.id.clone(),
        })?;
        ensure_valid(&record.to_input())?;

        let current = &self.records[position];
        let updated = Technician {
            id: current.id.clone(),
            name: record.name.trim().to_string(),
            total_calls: record.total_calls,
            avg_service_time: record.avg_service_time,
            first_response_time: record.first_response_time,
            rating: record.rating,
            created_at: current.created_at,
            updated_at: self.clock.now().max(current.updated_at),
        }
        .normalize_zeros();

        let mut candidate = self.records.clone();
        candidate[position] = updated.clone();
        self.commit(candidate)?;
        info!("technician updated");
        Ok(updated)
    }

    /// Remove a technician. Absent ids are a no-op; storage is flushed
    /// either way. Returns whether a record was removed.
    #[instrument(skip_all, fields(id = %id))]
    pub fn delete(&mut self, id: &str) -> RosterResult<bool> {
        let candidate: Vec<Technician> = self
            .records
            .iter()
            .filter(|technician| technician.id != id)
            .cloned()
            .collect();
        let removed = candidate.len() != self.records.len();
        self.commit(candidate)?;
        if removed {
            info!("technician deleted");
        } else {
            debug!("delete target absent");
        }
        Ok(removed)
    }

    /// Owned snapshot of the roster in storage order.
    pub fn get_all(&self) -> Vec<Technician> {
        self.records.clone()
    }

    pub fn get(&self, id: &str) -> Option<Technician> {
        self.position(id).map(|index| self.records[index].clone())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Ranked view for explicit filter values.
    pub fn rank(&self, sort_by: SortMetric, search_query: &str) -> Vec<Technician> {
        rank(&self.records, sort_by, search_query)
    }

    /// Ranked view using the store's own filter state.
    pub fn rank_current(&self) -> Vec<Technician> {
        self.rank(self.filters.sort_by, &self.filters.search_query)
    }

    /// [`RosterStore::rank_current`] with 1-based positions.
    pub fn ranked_entries(&self) -> Vec<RankedEntry> {
        ranked_positions(
            &self.records,
            self.filters.sort_by,
            &self.filters.search_query,
        )
    }

    pub fn summary(&self) -> RosterSummary {
        summarize(&self.records)
    }

    pub fn filters(&self) -> &RosterFilters {
        &self.filters
    }

    pub fn set_sort_by(&mut self, sort_by: SortMetric) {
        self.filters.sort_by = sort_by;
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.filters.search_query = query.into();
    }

    pub fn set_date_range(&mut self, range: Option<DateRange>) {
        self.filters.date_range = range;
    }

    /// Snapshot of the roster stamped with the current time.
    pub fn export_document(&self) -> ExportDocument {
        ExportDocument::new(self.records.clone(), self.clock.now())
    }

    /// Serialized export document.
    pub fn export_all(&self) -> RosterResult<String> {
        self.export_document().render().map_err(RosterError::Export)
    }

    /// Validate `text`, replace the stored roster with it, then reload.
    ///
    /// On any error neither storage nor memory changes. Returns the number
    /// of imported technicians.
    pub fn import_all(&mut self, text: &str) -> RosterResult<usize> {
        let imported = import_into(self.storage.as_ref(), text)?;
        self.reload()?;
        Ok(imported.len())
    }

    /// Re-read the roster from storage. An absent entry reads as empty.
    pub fn reload(&mut self) -> RosterResult<()> {
        self.records = load_checked(self.storage.as_ref())?.unwrap_or_default();
        debug!(count = self.records.len(), "roster reloaded");
        Ok(())
    }

    /// Wipe the durable entry and the in-memory roster.
    pub fn clear_all(&mut self) -> RosterResult<()> {
        self.storage.clear()?;
        self.records.clear();
        info!("roster cleared");
        Ok(())
    }

    /// Flush `candidate`, then make it the current roster.
    fn commit(&mut self, candidate: Vec<Technician>) -> RosterResult<()> {
        if let Err(err) = self.storage.save(&candidate) {
            warn!(error = %err, "flush failed; roster unchanged");
            return Err(err.into());
        }
        self.records = candidate;
        Ok(())
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|technician| technician.id == id)
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if self.position(&id).is_none() {
                return id;
            }
        }
    }
}

fn ensure_valid(input: &NewTechnician) -> Result<(), ValidationError> {
    let violations = validate_input(input);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { violations })
    }
}

/// Load from storage and reject rosters that break invariants.
fn load_checked(storage: &dyn RosterStorage) -> Result<Option<Vec<Technician>>, StorageError> {
    let Some(records) = storage.load()? else {
        return Ok(None);
    };
    let errors = validate_roster(&records);
    if !errors.is_empty() {
        return Err(StorageError::Read {
            location: "stored roster".to_string(),
            reason: errors.join("; "),
        });
    }
    Ok(Some(records))
}
