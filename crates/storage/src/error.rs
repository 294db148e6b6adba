//! Typed error enum for the storage layer.
//!
//! Lets callers tell a stale revision apart from an I/O failure or a
//! corrupted list instead of downcasting opaque boxes.

use std::path::PathBuf;

use thiserror::Error;

/// Storage-layer error with variants covering every expected failure mode.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The list changed since the caller read it.
    #[error("revision conflict: expected {expected}, found {actual}")]
    Conflict { expected: String, actual: String },

    /// A batch exceeded what the backend commits atomically.
    #[error("batch of {size} records exceeds backend limit of {limit}")]
    BatchTooLarge { size: usize, limit: usize },

    /// Filesystem failure.
    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stored data could not be decoded into journal records.
    #[error("data corruption: {context}")]
    DataCorruption {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Backend refused or dropped the request.
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    /// Whether this error is likely transient (worth retrying).
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }

    /// Whether a concurrent writer got there first.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::DataCorruption {
            context: "JSON serialization/deserialization".to_owned(),
            source: Box::new(err),
        }
    }
}
