mod ingest;
mod persistence;
mod refresh;


use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use journal_tracker_catalog::CatalogLookup;
use journal_tracker_core::{
    ChangeSummary, ChunkSize, JournalFilter, JournalRecord, SortSpec, TrackerConfig, export_csv,
};
use journal_tracker_storage::JournalStore;
use tokio::sync::Mutex;

use crate::ServiceError;

pub use ingest::IngestReport;
pub use refresh::{RefreshOutcome, RefreshReport};

/// Owns the master list: every write goes through one reconcile pass at a
/// time, guarded by `pass_guard`.
pub struct TrackerService {
    pub(crate) store: Arc<dyn JournalStore>,
    pub(crate) catalog: Option<Arc<dyn CatalogLookup>>,
    pub(crate) chunk_limit: ChunkSize,
    pub(crate) pass_guard: Mutex<()>,
    pub(crate) today: fn() -> NaiveDate,
}

fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

impl TrackerService {
    /// Build a service over `store`, with an optional catalog for refreshes.
    pub fn new(
        store: Arc<dyn JournalStore>,
        catalog: Option<Arc<dyn CatalogLookup>>,
        config: &TrackerConfig,
    ) -> Result<Self, ServiceError> {
        config.validate()?;
        let chunk_limit = config.chunk_limit()?;
        if catalog.is_none() {
            tracing::info!("no catalog client configured, refresh is disabled");
        }
        Ok(Self { store, catalog, chunk_limit, pass_guard: Mutex::new(()), today: utc_today })
    }

    /// Override the date stamped on reconciled records.
    #[must_use]
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    #[must_use]
    pub fn store_kind(&self) -> &'static str {
        self.store.kind()
    }

    /// The full master list in stored order.
    pub async fn list_all(&self) -> Result<Vec<JournalRecord>, ServiceError> {
        Ok(self.store.read_all().await?.records)
    }

    /// Records matching `filter`, ordered by `sort`.
    pub async fn filtered(
        &self,
        filter: &JournalFilter,
        sort: SortSpec,
    ) -> Result<Vec<JournalRecord>, ServiceError> {
        let records = self.list_all().await?;
        let mut view = filter.apply(&records);
        sort.sort(&mut view);
        Ok(view.into_iter().cloned().collect())
    }

    /// Counts over the records matching `filter`.
    pub async fn summary(&self, filter: &JournalFilter) -> Result<ChangeSummary, ServiceError> {
        let records = self.list_all().await?;
        Ok(ChangeSummary::of(filter.apply(&records)))
    }

    /// The master list as CSV, optionally restricted to updated titles.
    pub async fn export_csv(&self, changed_only: bool) -> Result<String, ServiceError> {
        let records = self.list_all().await?;
        Ok(export_csv(&records, changed_only)?)
    }
}
