//! Wire types for the catalog search endpoint.

use journal_tracker_core::{IncomingJournal, Issn, normalize_issn_value};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Search response envelope. `data` is kept loose: a batch whose payload is
/// not an array is skipped rather than failed.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    issn: Option<Value>,
    #[serde(default)]
    title: Option<String>,
}

/// One journal as the catalog currently describes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogJournal {
    pub issn: Issn,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_id: Option<String>,
}

impl CatalogJournal {
    /// Entries without a usable ISSN or title yield `None`.
    pub(crate) fn from_entry(entry: Value) -> Option<Self> {
        let raw: RawEntry = serde_json::from_value(entry).ok()?;
        let issn = normalize_issn_value(raw.issn.as_ref()?)?;
        let title = raw.title?.trim().to_owned();
        if title.is_empty() {
            return None;
        }
        let catalog_id = raw.id.map(|id| match id {
            Value::String(s) => s,
            other => other.to_string(),
        });
        Some(Self { issn, title, catalog_id })
    }

    /// The catalog view as a reconciler input.
    #[must_use]
    pub fn to_incoming(&self) -> IncomingJournal {
        IncomingJournal { issn: self.issn.clone(), title: self.title.clone() }
    }
}
