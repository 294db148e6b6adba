//! Storage capability shared by every backend.

use std::fmt;

use async_trait::async_trait;
use journal_tracker_core::{ChunkSize, JournalRecord};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::StorageError;

/// Opaque version token of the stored list.
///
/// A write must present the revision it read; a mismatch means another
/// writer committed in between.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Revision(String);

impl Revision {
    /// Content-addressed revision of a serialized list.
    #[must_use]
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Self(hex::encode(Sha256::digest(bytes)))
    }

    #[must_use]
    pub fn from_generation(generation: u64) -> Self {
        Self(format!("gen-{generation}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The full list plus the revision it was read at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub records: Vec<JournalRecord>,
    pub revision: Revision,
}

/// Read-current-list / write-new-list capability.
#[async_trait]
pub trait JournalStore: Send + Sync {
    /// Short backend name for logs.
    fn kind(&self) -> &'static str;

    /// Read the whole master list.
    async fn read_all(&self) -> Result<Snapshot, StorageError>;

    /// Replace the whole list. Fails with [`StorageError::Conflict`] when
    /// `expected` is no longer the current revision.
    async fn write_all(
        &self,
        records: &[JournalRecord],
        expected: &Revision,
    ) -> Result<Revision, StorageError>;

    /// Upsert one batch keyed by ISSN. Each call commits atomically; a
    /// sequence of calls does not.
    async fn upsert_batch(&self, records: &[JournalRecord]) -> Result<Revision, StorageError>;

    /// Largest batch `upsert_batch` accepts, for backends that persist in
    /// capped batches rather than whole-list writes.
    fn batch_limit(&self) -> Option<ChunkSize>;
}

/// Upsert `batch` into `records` in place: known ISSNs are replaced where
/// they stand, unknown ones are appended.
pub(crate) fn upsert_in_place(records: &mut Vec<JournalRecord>, batch: &[JournalRecord]) {
    for incoming in batch {
        match records.iter_mut().find(|r| r.issn == incoming.issn) {
            Some(slot) => *slot = incoming.clone(),
            None => records.push(incoming.clone()),
        }
    }
}
