//! Error types for the towndiff library.

use thiserror::Error;

/// Errors that can occur when storing or looking up towns.
#[derive(Error, Debug)]
pub enum TownError {
    /// The underlying store cannot be reached.
    #[error("Store unavailable: {reason}")]
    StoreUnavailable { reason: String },

    /// A uniqueness constraint was violated on create or update.
    #[error("Constraint violation: {field} '{value}' already exists")]
    ConstraintViolation { field: &'static str, value: String },

    /// Every identifier has been handed out.
    #[error("No town identifier left after {last_id}")]
    IdsExhausted { last_id: u64 },

    /// No town with this identifier exists in the store.
    #[error("Town not found: id={id}")]
    NotFound { id: u64 },

    /// IO error when reading seed files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A seed file or payload could not be decoded.
    #[error("Parse error: {message}")]
    Parse { message: String },
}

impl TownError {
    pub(crate) fn duplicate_name(name: &str) -> Self {
        TownError::ConstraintViolation {
            field: "name",
            value: name.to_string(),
        }
    }

    pub(crate) fn duplicate_id(id: u64) -> Self {
        TownError::ConstraintViolation {
            field: "id",
            value: id.to_string(),
        }
    }
}

impl From<serde_json::Error> for TownError {
    fn from(e: serde_json::Error) -> Self {
        TownError::Parse {
            message: e.to_string(),
        }
    }
}

/// Result type alias using [`TownError`].
pub type Result<T> = std::result::Result<T, TownError>;
