//! In-process keyed document store.
//!
//! Behaves like a hosted document database: records are keyed by ISSN,
//! each `upsert_batch` commits atomically, and batches are capped at
//! [`DOCUMENT_STORE_MAX_BATCH`] writes. Nothing survives the process.

use std::num::NonZeroUsize;

use async_trait::async_trait;
use journal_tracker_core::constants::DOCUMENT_STORE_MAX_BATCH;
use journal_tracker_core::{ChunkSize, JournalRecord};
use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::traits::{JournalStore, Revision, Snapshot, upsert_in_place};

#[derive(Debug, Default)]
struct State {
    records: Vec<JournalRecord>,
    generation: u64,
}

#[derive(Debug)]
pub struct MemoryStore {
    state: RwLock<State>,
    limit: ChunkSize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self { state: RwLock::new(State::default()), limit: DEFAULT_LIMIT }
    }

    /// Store pre-populated with `records`.
    #[must_use]
    pub fn seeded(records: Vec<JournalRecord>) -> Self {
        let mut state = State::default();
        upsert_in_place(&mut state.records, &records);
        Self { state: RwLock::new(state), limit: DEFAULT_LIMIT }
    }
}

const DEFAULT_LIMIT: ChunkSize = match NonZeroUsize::new(DOCUMENT_STORE_MAX_BATCH) {
    Some(limit) => ChunkSize::from_non_zero(limit),
    None => panic!("document store batch limit must be non-zero"),
};

#[async_trait]
impl JournalStore for MemoryStore {
    fn kind(&self) -> &'static str {
        "memory"
    }

    async fn read_all(&self) -> Result<Snapshot, StorageError> {
        let state = self.state.read().await;
        Ok(Snapshot {
            records: state.records.clone(),
            revision: Revision::from_generation(state.generation),
        })
    }

    async fn write_all(
        &self,
        records: &[JournalRecord],
        expected: &Revision,
    ) -> Result<Revision, StorageError> {
        let mut state = self.state.write().await;
        let current = Revision::from_generation(state.generation);
        if &current != expected {
            return Err(StorageError::Conflict {
                expected: expected.to_string(),
                actual: current.to_string(),
            });
        }
        let mut replacement = Vec::with_capacity(records.len());
        upsert_in_place(&mut replacement, records);
        state.records = replacement;
        state.generation = state.generation.saturating_add(1);
        Ok(Revision::from_generation(state.generation))
    }

    async fn upsert_batch(&self, records: &[JournalRecord]) -> Result<Revision, StorageError> {
        if records.len() > self.limit.get() {
            return Err(StorageError::BatchTooLarge {
                size: records.len(),
                limit: self.limit.get(),
            });
        }
        let mut state = self.state.write().await;
        upsert_in_place(&mut state.records, records);
        state.generation = state.generation.saturating_add(1);
        Ok(Revision::from_generation(state.generation))
    }

    fn batch_limit(&self) -> Option<ChunkSize> {
        Some(self.limit)
    }
}
