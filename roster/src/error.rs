//! Error taxonomy for roster operations.

use thiserror::Error;

/// Create or update input violates field constraints.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid technician: {}", .violations.join("; "))]
pub struct ValidationError {
    pub violations: Vec<String>,
}

/// Update targeted an id that is not in the roster.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("technician '{id}' not found")]
pub struct NotFoundError {
    pub id: String,
}

/// Failure at the durable store boundary.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Stored content exists but cannot be read back as a roster.
    #[error("read roster from {location}: {reason}")]
    Read { location: String, reason: String },

    #[error("write roster to {location}")]
    Write {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("clear roster at {location}")]
    Clear {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialize roster")]
    Serialize(#[from] serde_json::Error),
}

/// Import document failed structural validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ImportFormatError {
    #[error("import file is not valid JSON: {0}")]
    NotJson(String),

    #[error("import file must contain a `technicians` array")]
    MissingTechnicians,

    #[error("technicians[{index}] is not a valid technician record: {reason}")]
    InvalidRecord { index: usize, reason: String },

    #[error("imported roster is inconsistent:\n- {}", .0.join("\n- "))]
    InvalidRoster(Vec<String>),

    #[error("technician record schema is invalid: {0}")]
    Schema(String),
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("read import file {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Format(#[from] ImportFormatError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Error)]
pub enum RosterError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("serialize export document")]
    Export(#[source] serde_json::Error),
}

impl RosterError {
    /// True when an import was rejected for its content (not for I/O).
    pub fn is_import_rejection(&self) -> bool {
        matches!(self, RosterError::Import(ImportError::Format(_)))
    }
}

pub type RosterResult<T> = Result<T, RosterError>;
