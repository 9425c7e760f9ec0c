//! Error types for fdict
//!
//! Provides a unified error type for all operations. Duplicate and missing
//! keys are not errors: they surface as `bool` / `Option` return values.

use std::path::PathBuf;

use thiserror::Error;

use crate::Offset;

/// Result type alias using FdictError
pub type Result<T> = std::result::Result<T, FdictError>;

/// Unified error type for fdict operations
#[derive(Debug, Error)]
pub enum FdictError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Argument Errors
    // -------------------------------------------------------------------------
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // -------------------------------------------------------------------------
    // Read Errors
    // -------------------------------------------------------------------------
    #[error("Offset {offset} is out of range (log length {len})")]
    OffsetOutOfRange { offset: Offset, len: u64 },

    #[error("Corrupt record at offset {offset}: {reason}")]
    CorruptRecord { offset: Offset, reason: String },

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Type mismatch: expected '{expected}', found '{found}'")]
    TypeMismatch { expected: String, found: String },

    #[error("Type tag '{0}' is not registered")]
    UnknownType(String),

    // -------------------------------------------------------------------------
    // Resource Errors
    // -------------------------------------------------------------------------
    #[error("Cannot open backing file {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Backing file {path:?} is locked by another handle")]
    Locked { path: PathBuf },

    #[error("Dictionary is closed")]
    Closed,
}

impl FdictError {
    /// True for the errors raised while reading a record back
    pub fn is_read_error(&self) -> bool {
        matches!(
            self,
            FdictError::OffsetOutOfRange { .. }
                | FdictError::CorruptRecord { .. }
        )
    }
}

impl From<serde_json::Error> for FdictError {
    fn from(e: serde_json::Error) -> Self {
        FdictError::Serialization(e.to_string())
    }
}
