//! Pure ISSN-keyed merge with title change detection.
//!
//! No I/O: the caller reads the current list, passes it in together with the
//! accepted incoming batch, and persists whatever comes back.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::issn::Issn;
use crate::record::{IncomingJournal, JournalRecord, TitleChange};

/// How records absent from the incoming batch are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconcileMode {
    /// Carry existing records over unchanged.
    #[default]
    Merge,
    /// Keep only ISSNs present in the incoming batch.
    Replace,
}

impl std::str::FromStr for ReconcileMode {
    type Err = crate::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "merge" => Ok(Self::Merge),
            "replace" => Ok(Self::Replace),
            other => Err(crate::CoreError::InvalidInput(format!("unknown reconcile mode: {other}"))),
        }
    }
}

impl std::fmt::Display for ReconcileMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Merge => f.write_str("merge"),
            Self::Replace => f.write_str("replace"),
        }
    }
}

/// Output of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// One record per distinct ISSN, in first-appearance order.
    pub merged: Vec<JournalRecord>,
    /// Title changes detected during this pass, in incoming order.
    pub changes: Vec<TitleChange>,
    /// ISSNs removed by a [`ReconcileMode::Replace`] pass. Always empty for merges.
    pub dropped: Vec<Issn>,
}

impl Reconciliation {
    #[must_use]
    pub fn merged_count(&self) -> usize {
        self.merged.len()
    }
}

/// Merge `incoming` into `existing` keyed by ISSN.
///
/// # Rules
/// - **Unknown ISSN**: inserted as a new record checked on `checked_on`; not a change.
/// - **Same title** (exact, case-sensitive): the record is left untouched.
/// - **Different title**: old title moves to `previous_title`, change logged.
/// - **Duplicate ISSNs**: a later entry overwrites the earlier one in place.
#[must_use]
pub fn reconcile(
    existing: &[JournalRecord],
    incoming: &[IncomingJournal],
    mode: ReconcileMode,
    checked_on: NaiveDate,
) -> Reconciliation {
    let mut merged: Vec<JournalRecord> =
        Vec::with_capacity(existing.len().saturating_add(incoming.len()));
    let mut index: HashMap<Issn, usize> = HashMap::with_capacity(merged.capacity());

    for record in existing {
        match index.get(&record.issn) {
            Some(&pos) => {
                if let Some(slot) = merged.get_mut(pos) {
                    *slot = record.clone();
                }
            },
            None => {
                index.insert(record.issn.clone(), merged.len());
                merged.push(record.clone());
            },
        }
    }

    let mut changes = Vec::new();
    let mut incoming_order: Vec<usize> = Vec::with_capacity(incoming.len());
    let mut seen_incoming = vec![false; merged.len().saturating_add(incoming.len())];

    for journal in incoming {
        let pos = match index.get(&journal.issn) {
            Some(&pos) => {
                if let Some(record) = merged.get_mut(pos) {
                    if record.title != journal.title {
                        let old_title = record.apply_title_change(&journal.title, checked_on);
                        changes.push(TitleChange {
                            issn: journal.issn.clone(),
                            old_title,
                            new_title: journal.title.clone(),
                            date_checked: checked_on,
                        });
                    }
                }
                pos
            },
            None => {
                let pos = merged.len();
                index.insert(journal.issn.clone(), pos);
                merged.push(JournalRecord::new(
                    journal.issn.clone(),
                    journal.title.clone(),
                    Some(checked_on),
                ));
                pos
            },
        };
        if let Some(seen) = seen_incoming.get_mut(pos) {
            if !*seen {
                *seen = true;
                incoming_order.push(pos);
            }
        }
    }

    let (merged, dropped) = match mode {
        ReconcileMode::Merge => (merged, Vec::new()),
        ReconcileMode::Replace => keep_incoming_only(merged, &incoming_order),
    };

    tracing::debug!(
        existing = existing.len(),
        incoming = incoming.len(),
        merged = merged.len(),
        changes = changes.len(),
        dropped = dropped.len(),
        ?mode,
        "reconciled journal batch"
    );

    Reconciliation { merged, changes, dropped }
}

fn keep_incoming_only(
    merged: Vec<JournalRecord>,
    incoming_order: &[usize],
) -> (Vec<JournalRecord>, Vec<Issn>) {
    let mut slots: Vec<Option<JournalRecord>> = merged.into_iter().map(Some).collect();
    let kept: Vec<JournalRecord> =
        incoming_order.iter().filter_map(|&pos| slots.get_mut(pos).and_then(Option::take)).collect();
    let dropped = slots.into_iter().flatten().map(|record| record.issn).collect();
    (kept, dropped)
}
