//! JSON-array file backend.
//!
//! The whole list lives in one pretty-printed JSON array. Writes go to a
//! sibling temp file that is then renamed over the target, so readers never
//! see a half-written list. The revision is the SHA-256 of the file bytes.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use journal_tracker_core::{ChunkSize, JournalRecord};
use tokio::sync::Mutex;

use crate::error::StorageError;
use crate::traits::{JournalStore, Revision, Snapshot, upsert_in_place};

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open the list at `path`, creating parent directories and an empty
    /// list when the file does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| StorageError::io(parent, e))?;
        }
        let exists =
            tokio::fs::try_exists(&path).await.map_err(|e| StorageError::io(&path, e))?;
        if !exists {
            tracing::info!(path = %path.display(), "journal list missing, creating empty list");
            tokio::fs::write(&path, b"[]").await.map_err(|e| StorageError::io(&path, e))?;
        }
        Ok(Self { path, write_lock: Mutex::new(()) })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_stem().map(|s| s.to_os_string()).unwrap_or_default();
        name.push(".tmp.json");
        self.path.with_file_name(name)
    }

    async fn read_bytes(&self) -> Result<Vec<u8>, StorageError> {
        tokio::fs::read(&self.path).await.map_err(|e| StorageError::io(&self.path, e))
    }

    /// Decode the stored array. Malformed JSON or a non-array is corruption;
    /// individual entries that are not valid records are skipped.
    fn decode(&self, bytes: &[u8]) -> Result<Vec<JournalRecord>, StorageError> {
        let entries: Vec<serde_json::Value> =
            serde_json::from_slice(bytes).map_err(|e| StorageError::DataCorruption {
                context: format!("decoding {}", self.path.display()),
                source: Box::new(e),
            })?;

        let total = entries.len();
        let mut records = Vec::with_capacity(total);
        for (index, entry) in entries.into_iter().enumerate() {
            match serde_json::from_value::<JournalRecord>(entry) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!(
                    path = %self.path.display(),
                    index,
                    error = %e,
                    "skipping unusable stored record"
                ),
            }
        }
        let skipped = total.saturating_sub(records.len());
        if skipped > 0 {
            tracing::warn!(
                path = %self.path.display(),
                skipped,
                total,
                "stored list had unusable records"
            );
        }
        Ok(records)
    }

    async fn replace_file(&self, records: &[JournalRecord]) -> Result<Revision, StorageError> {
        let bytes = serde_json::to_vec_pretty(records)?;
        let temp = self.temp_path();
        tokio::fs::write(&temp, &bytes).await.map_err(|e| StorageError::io(&temp, e))?;
        tokio::fs::rename(&temp, &self.path).await.map_err(|e| StorageError::io(&self.path, e))?;
        Ok(Revision::of_bytes(&bytes))
    }
}

#[async_trait]
impl JournalStore for FileStore {
    fn kind(&self) -> &'static str {
        "file"
    }

    async fn read_all(&self) -> Result<Snapshot, StorageError> {
        let bytes = self.read_bytes().await?;
        let records = self.decode(&bytes)?;
        Ok(Snapshot { records, revision: Revision::of_bytes(&bytes) })
    }

    async fn write_all(
        &self,
        records: &[JournalRecord],
        expected: &Revision,
    ) -> Result<Revision, StorageError> {
        let _guard = self.write_lock.lock().await;
        let current = Revision::of_bytes(&self.read_bytes().await?);
        if &current != expected {
            return Err(StorageError::Conflict {
                expected: expected.to_string(),
                actual: current.to_string(),
            });
        }
        let revision = self.replace_file(records).await?;
        tracing::debug!(
            path = %self.path.display(),
            count = records.len(),
            %revision,
            "wrote journal list"
        );
        Ok(revision)
    }

    async fn upsert_batch(&self, records: &[JournalRecord]) -> Result<Revision, StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut current = self.decode(&self.read_bytes().await?)?;
        upsert_in_place(&mut current, records);
        self.replace_file(&current).await
    }

    fn batch_limit(&self) -> Option<ChunkSize> {
        None
    }
}
