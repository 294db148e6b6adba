//! Journal record types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::issn::Issn;

/// One entry of the master list, keyed by its normalized ISSN.
///
/// `previous_title` is private: only the reconciler records a title change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RecordWire", into = "RecordWire")]
pub struct JournalRecord {
    pub issn: Issn,
    pub title: String,
    previous_title: Option<String>,
    pub last_checked: Option<NaiveDate>,
}

impl JournalRecord {
    /// A fresh record with no title history.
    #[must_use]
    pub fn new(issn: Issn, title: impl Into<String>, last_checked: Option<NaiveDate>) -> Self {
        Self { issn, title: title.into().trim().to_owned(), previous_title: None, last_checked }
    }

    #[must_use]
    pub fn previous_title(&self) -> Option<&str> {
        self.previous_title.as_deref()
    }

    /// True iff a previous title exists and differs from the current one.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.previous_title.as_deref().is_some_and(|prev| prev != self.title)
    }

    /// Replace the title, remembering the old one. Returns the old title.
    pub(crate) fn apply_title_change(&mut self, new_title: &str, checked_on: NaiveDate) -> String {
        let old = std::mem::replace(&mut self.title, new_title.to_owned());
        self.previous_title = Some(old.clone());
        self.last_checked = Some(checked_on);
        old
    }
}

/// A validated row ready for reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingJournal {
    pub issn: Issn,
    pub title: String,
}

impl IncomingJournal {
    /// Returns `None` when the trimmed title is empty.
    #[must_use]
    pub fn new(issn: Issn, title: &str) -> Option<Self> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        Some(Self { issn, title: title.to_owned() })
    }
}

impl From<&JournalRecord> for IncomingJournal {
    fn from(record: &JournalRecord) -> Self {
        Self { issn: record.issn.clone(), title: record.title.clone() }
    }
}

/// Change-log entry emitted when an incoming title differs from the stored one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleChange {
    pub issn: Issn,
    pub old_title: String,
    pub new_title: String,
    pub date_checked: NaiveDate,
}

/// Persisted shape. Accepts the legacy `oldTitle`/`dateChecked` names and
/// ignores the stored `changed` flag, which is always re-derived.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordWire {
    issn: Issn,
    title: String,
    #[serde(default, alias = "oldTitle", skip_serializing_if = "Option::is_none")]
    previous_title: Option<String>,
    #[serde(default)]
    changed: bool,
    #[serde(default, alias = "dateChecked", skip_serializing_if = "Option::is_none")]
    last_checked: Option<NaiveDate>,
}

impl TryFrom<RecordWire> for JournalRecord {
    type Error = String;

    fn try_from(wire: RecordWire) -> Result<Self, Self::Error> {
        let title = wire.title.trim().to_owned();
        if title.is_empty() {
            return Err(format!("record {} has an empty title", wire.issn));
        }
        // Older refresh passes wrote `oldTitle = title` for untouched rows.
        let previous_title = wire
            .previous_title
            .map(|p| p.trim().to_owned())
            .filter(|p| !p.is_empty() && *p != title);
        Ok(Self { issn: wire.issn, title, previous_title, last_checked: wire.last_checked })
    }
}

impl From<JournalRecord> for RecordWire {
    fn from(record: JournalRecord) -> Self {
        let changed = record.changed();
        Self {
            issn: record.issn,
            title: record.title,
            previous_title: record.previous_title,
            changed,
            last_checked: record.last_checked,
        }
    }
}
