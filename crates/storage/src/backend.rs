//! Unified storage backend with enum dispatch.

use std::path::Path;

use async_trait::async_trait;
use journal_tracker_core::{BackendKind, ChunkSize, JournalRecord, TrackerConfig};

use crate::error::StorageError;
use crate::traits::{JournalStore, Revision, Snapshot};
use crate::{FileStore, MemoryStore};

macro_rules! dispatch {
    ($self:expr, $method:ident ( $($arg:expr),* $(,)? )) => {
        match $self {
            StorageBackend::File(s) => s.$method($($arg),*).await,
            StorageBackend::Memory(s) => s.$method($($arg),*).await,
        }
    };
}

#[derive(Debug)]
pub enum StorageBackend {
    File(FileStore),
    Memory(MemoryStore),
}

impl StorageBackend {
    pub async fn new_file(path: &Path) -> Result<Self, StorageError> {
        Ok(Self::File(FileStore::open(path).await?))
    }

    #[must_use]
    pub fn new_memory() -> Self {
        Self::Memory(MemoryStore::new())
    }

    /// Open whichever backend the configuration names.
    pub async fn from_config(config: &TrackerConfig) -> Result<Self, StorageError> {
        let backend = match config.backend {
            BackendKind::File => Self::new_file(&config.data_file).await?,
            BackendKind::Memory => Self::new_memory(),
        };
        tracing::info!(backend = backend.kind(), "storage backend ready");
        Ok(backend)
    }
}

#[async_trait]
impl JournalStore for StorageBackend {
    fn kind(&self) -> &'static str {
        match self {
            Self::File(s) => s.kind(),
            Self::Memory(s) => s.kind(),
        }
    }

    async fn read_all(&self) -> Result<Snapshot, StorageError> {
        dispatch!(self, read_all())
    }

    async fn write_all(
        &self,
        records: &[JournalRecord],
        expected: &Revision,
    ) -> Result<Revision, StorageError> {
        dispatch!(self, write_all(records, expected))
    }

    async fn upsert_batch(&self, records: &[JournalRecord]) -> Result<Revision, StorageError> {
        dispatch!(self, upsert_batch(records))
    }

    fn batch_limit(&self) -> Option<ChunkSize> {
        match self {
            Self::File(s) => s.batch_limit(),
            Self::Memory(s) => s.batch_limit(),
        }
    }
}
