//! Test utilities and module declarations for storage tests.

use chrono::NaiveDate;
use journal_tracker_core::{Issn, JournalRecord};

pub fn issn(raw: &str) -> Issn {
    raw.parse().unwrap()
}

pub fn record(raw_issn: &str, title: &str) -> JournalRecord {
    JournalRecord::new(issn(raw_issn), title, NaiveDate::from_ymd_opt(2024, 5, 1))
}
