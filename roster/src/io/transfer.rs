//! Export documents and validated import.
//!
//! Export writes a portable `{ technicians, exportDate }` document. Import
//! accepts any document with a `technicians` array of valid records and
//! replaces the stored roster wholesale; `exportDate` and extra fields are
//! ignored. Import either accepts the whole document or writes nothing.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use jsonschema::validator_for;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::core::invariants::validate_roster;
use crate::error::{ImportError, ImportFormatError};
use crate::io::storage::{RosterStorage, write_atomic};
use crate::technician::Technician;

pub const EXPORT_FILE_PREFIX: &str = "ranking-tecnicos-export-";

const TECHNICIAN_SCHEMA: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../schemas/technician/v1.schema.json"
));

/// Portable snapshot of a roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub technicians: Vec<Technician>,
    pub export_date: DateTime<Utc>,
}

impl ExportDocument {
    pub fn new(technicians: Vec<Technician>, export_date: DateTime<Utc>) -> Self {
        Self {
            technicians,
            export_date,
        }
    }

    /// Pretty JSON with trailing newline.
    pub fn render(&self) -> Result<String, serde_json::Error> {
        let mut buf = serde_json::to_string_pretty(self)?;
        buf.push('\n');
        Ok(buf)
    }

    pub fn file_name(&self) -> String {
        export_file_name(self.export_date)
    }
}

/// `ranking-tecnicos-export-<YYYY-MM-DD>.json` for the given export date.
pub fn export_file_name(export_date: DateTime<Utc>) -> String {
    format!(
        "{}{}.json",
        EXPORT_FILE_PREFIX,
        export_date.format("%Y-%m-%d")
    )
}

/// Write `document` into `dir` under its conventional file name.
pub fn write_export(dir: &Path, document: &ExportDocument) -> Result<PathBuf> {
    let path = dir.join(document.file_name());
    let buf = document.render().context("serialize export document")?;
    write_atomic(&path, &buf).with_context(|| format!("write export {}", path.display()))?;
    info!(path = %path.display(), count = document.technicians.len(), "roster exported");
    Ok(path)
}

/// Read an externally supplied import document.
pub fn read_import_file(path: &Path) -> Result<String, ImportError> {
    fs::read_to_string(path).map_err(|source| ImportError::Read {
        path: path.display().to_string(),
        source,
    })
}

/// Validate an import document and return its roster.
///
/// Checks run in order: JSON syntax, presence of a `technicians` array,
/// per-record schema and shape, then roster invariants.
pub fn parse_import(text: &str) -> Result<Vec<Technician>, ImportFormatError> {
    let document: Value =
        serde_json::from_str(text).map_err(|err| ImportFormatError::NotJson(err.to_string()))?;
    let entries = match document.get("technicians") {
        Some(Value::Array(entries)) => entries,
        _ => return Err(ImportFormatError::MissingTechnicians),
    };

    let schema: Value = serde_json::from_str(TECHNICIAN_SCHEMA)
        .map_err(|err| ImportFormatError::Schema(err.to_string()))?;
    let validator =
        validator_for(&schema).map_err(|err| ImportFormatError::Schema(err.to_string()))?;

    let mut records = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let messages: Vec<String> = validator
            .iter_errors(entry)
            .map(|err| err.to_string())
            .collect();
        if !messages.is_empty() {
            return Err(ImportFormatError::InvalidRecord {
                index,
                reason: messages.join("; "),
            });
        }
        let record: Technician = serde_json::from_value(entry.clone()).map_err(|err| {
            ImportFormatError::InvalidRecord {
                index,
                reason: err.to_string(),
            }
        })?;
        records.push(record.normalize_zeros());
    }

    let errors = validate_roster(&records);
    if !errors.is_empty() {
        return Err(ImportFormatError::InvalidRoster(errors));
    }
    Ok(records)
}

/// Validate `text` and write the imported roster through `storage`.
///
/// Does not touch any in-memory roster; callers reload from storage.
#[instrument(skip_all, fields(bytes = text.len()))]
pub fn import_into(storage: &dyn RosterStorage, text: &str) -> Result<Vec<Technician>, ImportError> {
    let records = parse_import(text)?;
    debug!(count = records.len(), "import document accepted");
    storage.save(&records)?;
    info!(count = records.len(), "roster imported");
    Ok(records)
}
