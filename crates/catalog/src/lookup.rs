//! Batched lookup of many ISSNs.

use std::collections::HashSet;

use async_trait::async_trait;
use journal_tracker_core::Issn;

use crate::client::CatalogClient;
use crate::error::CatalogError;
use crate::types::CatalogJournal;

/// Resolve current catalog titles for a set of ISSNs.
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    /// Look up `issns` in batches. Failed batches are logged and skipped;
    /// an error is returned only when every batch failed.
    async fn lookup(&self, issns: &[Issn]) -> Result<Vec<CatalogJournal>, CatalogError>;
}

#[async_trait]
impl CatalogLookup for CatalogClient {
    async fn lookup(&self, issns: &[Issn]) -> Result<Vec<CatalogJournal>, CatalogError> {
        let mut seen = HashSet::with_capacity(issns.len());
        let unique: Vec<Issn> = issns.iter().filter(|i| seen.insert(*i)).cloned().collect();

        let mut results = Vec::new();
        let mut failed = 0_usize;
        let mut last_error = None;
        let batches = unique.chunks(self.batch_size);
        let batch_count = batches.len();

        for batch in batches {
            match self.search_batch(batch).await {
                Ok(found) => {
                    tracing::debug!(
                        requested = batch.len(),
                        found = found.len(),
                        "catalog batch done"
                    );
                    results.extend(found);
                },
                Err(e) => {
                    let joined = batch.iter().map(Issn::as_str).collect::<Vec<_>>().join(",");
                    tracing::error!(batch = %joined, error = %e, "catalog batch failed, skipping");
                    failed += 1;
                    last_error = Some(e);
                },
            }
        }

        if let Some(err) = last_error.filter(|_| failed == batch_count) {
            return Err(err);
        }
        tracing::info!(
            issns = unique.len(),
            batches = batch_count,
            failed,
            found = results.len(),
            "catalog lookup finished"
        );
        Ok(results)
    }
}
