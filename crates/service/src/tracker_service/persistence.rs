use journal_tracker_core::{ReconcileMode, Reconciliation, chunks_of};
use journal_tracker_storage::Snapshot;

use super::TrackerService;
use crate::ServiceError;

impl TrackerService {
    /// Commit a reconciliation against the snapshot it was computed from.
    ///
    /// Whole-list backends get one revision-checked write. Backends with a
    /// batch cap receive merges as sequential upserts; a failure mid-way is
    /// reported as [`ServiceError::PartialCommit`], a failure on the first
    /// chunk as plain [`ServiceError::Storage`].
    pub(crate) async fn persist(
        &self,
        snapshot: &Snapshot,
        outcome: &Reconciliation,
        mode: ReconcileMode,
    ) -> Result<(), ServiceError> {
        if outcome.merged == snapshot.records {
            tracing::debug!("reconciliation changed nothing, skipping write");
            return Ok(());
        }

        let batch_limit = match (self.store.batch_limit(), mode) {
            (Some(limit), ReconcileMode::Merge) => limit.min(self.chunk_limit),
            _ => {
                let revision = self.store.write_all(&outcome.merged, &snapshot.revision).await?;
                tracing::debug!(backend = self.store.kind(), %revision, "master list replaced");
                return Ok(());
            },
        };

        let total = outcome.merged.len();
        let mut committed = 0_usize;
        for batch in chunks_of(&outcome.merged, batch_limit) {
            if let Err(source) = self.store.upsert_batch(batch).await {
                tracing::error!(committed, total, error = %source, "chunked write failed");
                if committed == 0 {
                    return Err(ServiceError::Storage(source));
                }
                return Err(ServiceError::PartialCommit { committed, total, source });
            }
            committed = committed.saturating_add(batch.len());
            tracing::debug!(committed, total, "chunk committed");
        }
        Ok(())
    }
}
