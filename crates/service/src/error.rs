//! Typed error enum for the service layer.
//!
//! Unifies intake, storage and catalog failures into a single error type,
//! enabling callers to match on specific failure modes.

use journal_tracker_catalog::CatalogError;
use journal_tracker_core::CoreError;
use journal_tracker_storage::StorageError;
use thiserror::Error;

/// Service-layer error unifying intake, storage and catalog failures.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Caller provided unusable input (no valid rows, malformed ISSN).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Reading or writing the master list failed. Nothing was committed.
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    /// A chunked write failed part-way; the first `committed` records are
    /// already persisted.
    #[error("partial commit: {committed} of {total} records written before failure: {source}")]
    PartialCommit {
        committed: usize,
        total: usize,
        #[source]
        source: StorageError,
    },

    /// Catalog API call failed.
    #[error("catalog: {0}")]
    Catalog(#[from] CatalogError),

    /// Required collaborator (catalog client) is not configured.
    #[error("not configured: {0}")]
    NotConfigured(String),

    /// Core-layer failure (configuration, CSV encoding).
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ServiceError {
    /// Whether this error is likely transient (worth retrying).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Storage(e) | Self::PartialCommit { source: e, .. } => e.is_transient(),
            Self::Catalog(e) => e.is_transient(),
            _ => false,
        }
    }
}
