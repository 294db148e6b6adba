use journal_tracker_core::{Issn, RawRow, ReconcileMode, TitleChange, accept_rows, reconcile};
use serde::Serialize;

use super::TrackerService;
use crate::ServiceError;

/// Result of one ingest pass. Counts cover accepted rows only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
    /// Rows accepted after normalization.
    pub count: usize,
    /// Size of the master list after the pass.
    pub merged_count: usize,
    /// Rows rejected for a missing title or ISSN.
    pub skipped: usize,
    pub changes: Vec<TitleChange>,
    /// ISSNs removed by a replace pass.
    pub dropped: Vec<Issn>,
}

impl TrackerService {
    /// Validate `rows`, reconcile them into the master list and persist.
    ///
    /// Waits for any pass already in flight. A batch with no usable rows is
    /// rejected before anything is read or written.
    pub async fn ingest(
        &self,
        rows: Vec<RawRow>,
        mode: ReconcileMode,
    ) -> Result<IngestReport, ServiceError> {
        let intake = accept_rows(rows);
        if intake.accepted.is_empty() {
            return Err(ServiceError::InvalidInput(format!(
                "no rows with both a title and an ISSN ({} rows skipped)",
                intake.skipped
            )));
        }

        let _guard = self.pass_guard.lock().await;
        let snapshot = self.store.read_all().await?;
        let outcome = reconcile(&snapshot.records, &intake.accepted, mode, (self.today)());
        self.persist(&snapshot, &outcome, mode).await?;

        tracing::info!(
            rows = intake.rows_read(),
            accepted = intake.accepted.len(),
            skipped = intake.skipped,
            merged = outcome.merged_count(),
            changes = outcome.changes.len(),
            dropped = outcome.dropped.len(),
            %mode,
            "ingest committed"
        );

        Ok(IngestReport {
            count: intake.accepted.len(),
            merged_count: outcome.merged_count(),
            skipped: intake.skipped,
            changes: outcome.changes,
            dropped: outcome.dropped,
        })
    }
}
