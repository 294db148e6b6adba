//! Test doubles shared by the service tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use journal_tracker_catalog::{CatalogError, CatalogJournal, CatalogLookup};
use journal_tracker_core::{ChunkSize, Issn, JournalRecord, RawRow, TrackerConfig};
use journal_tracker_storage::{JournalStore, MemoryStore, Revision, Snapshot, StorageError};
use tokio::sync::Notify;

use crate::TrackerService;

pub fn test_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
}

pub fn issn(raw: &str) -> Issn {
    raw.parse().unwrap()
}

pub fn record(raw_issn: &str, title: &str) -> JournalRecord {
    JournalRecord::new(issn(raw_issn), title, NaiveDate::from_ymd_opt(2024, 1, 15))
}

pub fn row(title: &str, raw_issn: &str) -> RawRow {
    RawRow::new(title, raw_issn)
}

pub fn service_with(
    store: Arc<dyn JournalStore>,
    catalog: Option<Arc<FakeCatalog>>,
) -> TrackerService {
    let catalog = catalog.map(|c| c as Arc<dyn CatalogLookup>);
    TrackerService::new(store, catalog, &TrackerConfig::default())
        .unwrap()
        .with_clock(test_day)
}

/// Catalog answering from a fixed title table.
#[derive(Default)]
pub struct FakeCatalog {
    titles: HashMap<Issn, String>,
    fail: bool,
    gate: Option<(Arc<Notify>, Arc<Notify>)>,
    pub calls: AtomicUsize,
}

impl FakeCatalog {
    pub fn with_titles(entries: &[(&str, &str)]) -> Self {
        let titles = entries.iter().map(|(i, t)| (issn(i), (*t).to_owned())).collect();
        Self { titles, ..Self::default() }
    }

    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }

    /// Signals `entered` on each call, then blocks until `release` fires.
    pub fn gated(mut self, entered: Arc<Notify>, release: Arc<Notify>) -> Self {
        self.gate = Some((entered, release));
        self
    }
}

#[async_trait]
impl CatalogLookup for FakeCatalog {
    async fn lookup(&self, issns: &[Issn]) -> Result<Vec<CatalogJournal>, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some((entered, release)) = &self.gate {
            entered.notify_one();
            release.notified().await;
        }
        if self.fail {
            return Err(CatalogError::HttpStatus { code: 403, body: "Forbidden".to_owned() });
        }
        Ok(issns
            .iter()
            .filter_map(|i| {
                self.titles.get(i).map(|title| CatalogJournal {
                    issn: i.clone(),
                    title: title.clone(),
                    catalog_id: None,
                })
            })
            .collect())
    }
}

/// Document store that accepts `succeed` upserts and then fails every write.
pub struct FailingStore {
    inner: MemoryStore,
    limit: ChunkSize,
    succeed: usize,
    upserts: AtomicUsize,
}

impl FailingStore {
    pub fn new(limit: usize, succeed: usize, seed: Vec<JournalRecord>) -> Self {
        Self {
            inner: MemoryStore::seeded(seed),
            limit: ChunkSize::new(limit).unwrap(),
            succeed,
            upserts: AtomicUsize::new(0),
        }
    }

    pub async fn records(&self) -> Vec<JournalRecord> {
        self.inner.read_all().await.unwrap().records
    }
}

#[async_trait]
impl JournalStore for FailingStore {
    fn kind(&self) -> &'static str {
        "failing"
    }

    async fn read_all(&self) -> Result<Snapshot, StorageError> {
        self.inner.read_all().await
    }

    async fn write_all(
        &self,
        _records: &[JournalRecord],
        _expected: &Revision,
    ) -> Result<Revision, StorageError> {
        Err(StorageError::Unavailable("write rejected".to_owned()))
    }

    async fn upsert_batch(&self, records: &[JournalRecord]) -> Result<Revision, StorageError> {
        if self.upserts.fetch_add(1, Ordering::SeqCst) >= self.succeed {
            return Err(StorageError::Unavailable("quota exceeded".to_owned()));
        }
        self.inner.upsert_batch(records).await
    }

    fn batch_limit(&self) -> Option<ChunkSize> {
        Some(self.limit)
    }
}
