use std::collections::HashSet;

use journal_tracker_catalog::CatalogJournal;
use journal_tracker_core::{IncomingJournal, Issn, ReconcileMode, TitleChange, reconcile};
use serde::Serialize;

use super::TrackerService;
use crate::ServiceError;

/// Summary of a refresh that reached the catalog and committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshReport {
    /// ISSNs sent to the catalog.
    pub checked: usize,
    /// Known ISSNs the catalog returned a title for.
    pub found: usize,
    pub changes: Vec<TitleChange>,
}

/// What a refresh pass did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum RefreshOutcome {
    /// Another pass held the guard; nothing was read or written.
    Skipped,
    /// Empty list, or the catalog returned nothing usable. List untouched.
    NoData,
    Applied(RefreshReport),
}

impl TrackerService {
    /// Look up every stored ISSN in the catalog and merge current titles in.
    ///
    /// Skips immediately when another pass is running. Catalog failures
    /// leave the master list as it was.
    pub async fn refresh(&self) -> Result<RefreshOutcome, ServiceError> {
        let Some(catalog) = self.catalog.as_ref() else {
            return Err(ServiceError::NotConfigured("catalog API key".to_owned()));
        };
        let Ok(_guard) = self.pass_guard.try_lock() else {
            tracing::info!("refresh skipped, another pass is in flight");
            return Ok(RefreshOutcome::Skipped);
        };

        let snapshot = self.store.read_all().await?;
        let issns: Vec<Issn> = snapshot.records.iter().map(|r| r.issn.clone()).collect();
        if issns.is_empty() {
            tracing::info!("master list is empty, nothing to refresh");
            return Ok(RefreshOutcome::NoData);
        }

        let fetched = match catalog.lookup(&issns).await {
            Ok(fetched) => fetched,
            Err(e) => {
                tracing::warn!(error = %e, "catalog lookup failed, keeping master list");
                return Ok(RefreshOutcome::NoData);
            },
        };

        let known: HashSet<&Issn> = issns.iter().collect();
        let incoming: Vec<IncomingJournal> = fetched
            .iter()
            .filter(|j| known.contains(&j.issn))
            .map(CatalogJournal::to_incoming)
            .collect();
        if incoming.is_empty() {
            tracing::info!(checked = issns.len(), "catalog returned no known journals");
            return Ok(RefreshOutcome::NoData);
        }

        let outcome = reconcile(&snapshot.records, &incoming, ReconcileMode::Merge, (self.today)());
        self.persist(&snapshot, &outcome, ReconcileMode::Merge).await?;

        tracing::info!(
            checked = issns.len(),
            found = incoming.len(),
            changes = outcome.changes.len(),
            "refresh committed"
        );
        Ok(RefreshOutcome::Applied(RefreshReport {
            checked: issns.len(),
            found: incoming.len(),
            changes: outcome.changes,
        }))
    }

    /// Resolve catalog titles for raw ISSN strings without touching the list.
    pub async fn lookup(&self, raw_issns: &[String]) -> Result<Vec<CatalogJournal>, ServiceError> {
        let Some(catalog) = self.catalog.as_ref() else {
            return Err(ServiceError::NotConfigured("catalog API key".to_owned()));
        };
        let issns = raw_issns
            .iter()
            .map(|raw| {
                raw.parse::<Issn>()
                    .map_err(|_| ServiceError::InvalidInput(format!("invalid ISSN: {raw:?}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(catalog.lookup(&issns).await?)
    }
}
