//! Durable roster storage.
//!
//! The [`RosterStorage`] trait is the only boundary that touches the durable
//! store. The roster lives under a single named entry as a JSON array of
//! technician records; every save replaces the entry wholesale.

use std::cell::RefCell;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::StorageError;
use crate::technician::Technician;

pub const DEFAULT_STORAGE_KEY: &str = "technicians";

/// Key-value persistence for the whole roster.
pub trait RosterStorage {
    /// Read the stored roster. `Ok(None)` means nothing has been stored yet.
    fn load(&self) -> Result<Option<Vec<Technician>>, StorageError>;

    /// Replace the stored roster with `records`.
    fn save(&self, records: &[Technician]) -> Result<(), StorageError>;

    /// Remove the stored entry. Clearing an absent entry succeeds.
    fn clear(&self) -> Result<(), StorageError>;
}

/// Directory-backed store; entry `<key>` lives at `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{key}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

impl RosterStorage for FileStorage {
    #[instrument(skip_all, fields(path = %self.path.display()))]
    fn load(&self) -> Result<Option<Vec<Technician>>, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("no stored roster");
                return Ok(None);
            }
            Err(err) => {
                return Err(StorageError::Read {
                    location: self.location(),
                    reason: err.to_string(),
                });
            }
        };
        let records = decode_roster(&contents, &self.location())?;
        debug!(count = records.len(), "roster loaded");
        Ok(Some(records))
    }

    #[instrument(skip_all, fields(path = %self.path.display(), count = records.len()))]
    fn save(&self, records: &[Technician]) -> Result<(), StorageError> {
        let buf = encode_roster(records)?;
        write_atomic(&self.path, &buf).map_err(|source| StorageError::Write {
            location: self.location(),
            source,
        })?;
        debug!("roster saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "roster entry removed");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Clear {
                location: self.location(),
                source,
            }),
        }
    }
}

/// In-process store holding the serialized entry.
///
/// Clones share the same entry, so a caller can keep a handle to inspect
/// what a [`crate::store::RosterStore`] has written.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entry: Rc<RefCell<Option<String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with raw serialized contents (which need not be valid).
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            entry: Rc::new(RefCell::new(Some(contents.into()))),
        }
    }

    /// Raw serialized entry, if any.
    pub fn contents(&self) -> Option<String> {
        self.entry.borrow().clone()
    }
}

impl RosterStorage for MemoryStorage {
    fn load(&self) -> Result<Option<Vec<Technician>>, StorageError> {
        match self.entry.borrow().as_deref() {
            None => Ok(None),
            Some(contents) => decode_roster(contents, "memory").map(Some),
        }
    }

    fn save(&self, records: &[Technician]) -> Result<(), StorageError> {
        let buf = encode_roster(records)?;
        *self.entry.borrow_mut() = Some(buf);
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.entry.borrow_mut() = None;
        Ok(())
    }
}

/// Serialize a roster as pretty JSON with a trailing newline.
pub fn encode_roster(records: &[Technician]) -> Result<String, StorageError> {
    let mut buf = serde_json::to_string_pretty(records)?;
    buf.push('\n');
    Ok(buf)
}

/// Parse stored text as a roster. Anything other than a JSON array of
/// well-formed records is a read error; no partial roster is returned.
pub fn decode_roster(contents: &str, location: &str) -> Result<Vec<Technician>, StorageError> {
    let read_error = |reason: String| StorageError::Read {
        location: location.to_string(),
        reason,
    };
    let value: Value = serde_json::from_str(contents)
        .map_err(|err| read_error(format!("not valid JSON: {err}")))?;
    if !value.is_array() {
        return Err(read_error("expected a JSON array of technicians".to_string()));
    }
    serde_json::from_value(value).map_err(|err| read_error(format!("malformed technician: {err}")))
}

/// Write via temp file + rename so readers never observe a partial entry.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, contents)?;
    fs::rename(&tmp_path, path)
}
