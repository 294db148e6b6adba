//! Read-side views over the master list: counts, filters and sorting.
//!
//! Everything here is a pure function of the list and the requested view;
//! stored records are never mutated.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::record::JournalRecord;
use crate::{CoreError, Result};

/// Totals shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSummary {
    pub total: usize,
    pub updated_count: usize,
    pub unchanged_count: usize,
}

impl ChangeSummary {
    #[must_use]
    pub fn of<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a JournalRecord>,
    {
        let (total, updated_count) = records
            .into_iter()
            .fold((0_usize, 0_usize), |(total, updated), r| {
                (total.saturating_add(1), updated.saturating_add(usize::from(r.changed())))
            });
        Self { total, updated_count, unchanged_count: total.saturating_sub(updated_count) }
    }
}

/// Filter state. All criteria are combined with AND; unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalFilter {
    /// Case-insensitive substring matched against ISSN or title.
    pub search: Option<String>,
    /// Inclusive lower bound on `last_checked`.
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on `last_checked`.
    pub to: Option<NaiveDate>,
    pub changed_only: bool,
    /// First letter of the title, `A`..=`Z`.
    pub letter: Option<char>,
}

impl JournalFilter {
    /// Validate and set the first-letter bucket.
    pub fn with_letter(mut self, letter: char) -> Result<Self> {
        if !letter.is_ascii_alphabetic() {
            return Err(CoreError::InvalidInput(format!("letter bucket must be A-Z, got {letter:?}")));
        }
        self.letter = Some(letter.to_ascii_uppercase());
        Ok(self)
    }

    #[must_use]
    pub fn matches(&self, record: &JournalRecord) -> bool {
        self.matches_search(record)
            && self.matches_dates(record)
            && (!self.changed_only || record.changed())
            && self.matches_letter(record)
    }

    /// Order-preserving filter over a borrowed list.
    #[must_use]
    pub fn apply<'a>(&self, records: &'a [JournalRecord]) -> Vec<&'a JournalRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }

    fn matches_search(&self, record: &JournalRecord) -> bool {
        let Some(term) = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
            return true;
        };
        let needle = term.to_lowercase();
        if record.title.to_lowercase().contains(&needle)
            || record.issn.as_str().to_lowercase().contains(&needle)
        {
            return true;
        }
        // "0036-8075" should find the stored "00368075".
        let issn_like = term
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, 'x' | 'X' | '-' | ' '));
        if issn_like && term.chars().any(|c| c.is_ascii_digit()) {
            if let Some(stripped) = crate::normalize_issn(term) {
                return record.issn.as_str().contains(stripped.as_str());
            }
        }
        false
    }

    fn matches_dates(&self, record: &JournalRecord) -> bool {
        if self.from.is_none() && self.to.is_none() {
            return true;
        }
        let Some(checked) = record.last_checked else {
            return false;
        };
        self.from.is_none_or(|from| checked >= from) && self.to.is_none_or(|to| checked <= to)
    }

    fn matches_letter(&self, record: &JournalRecord) -> bool {
        let Some(letter) = self.letter else {
            return true;
        };
        record.title.chars().next().is_some_and(|c| c.to_ascii_uppercase() == letter)
    }
}

/// Sortable table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    Issn,
    Title,
    PreviousTitle,
    Status,
}

impl std::str::FromStr for SortKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "issn" => Ok(Self::Issn),
            "title" => Ok(Self::Title),
            "previous-title" | "previous_title" | "previoustitle" => Ok(Self::PreviousTitle),
            "status" | "changed" => Ok(Self::Status),
            other => Err(CoreError::InvalidInput(format!("unknown sort key: {other}"))),
        }
    }
}

/// Column plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: SortKey,
    pub ascending: bool,
}

impl Default for SortSpec {
    /// Updated titles first.
    fn default() -> Self {
        Self { key: SortKey::Status, ascending: false }
    }
}

impl SortSpec {
    fn compare(&self, a: &JournalRecord, b: &JournalRecord) -> Ordering {
        let ord = match self.key {
            SortKey::Status => a.changed().cmp(&b.changed()),
            SortKey::Issn => a.issn.as_str().to_lowercase().cmp(&b.issn.as_str().to_lowercase()),
            SortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            SortKey::PreviousTitle => a
                .previous_title()
                .unwrap_or("")
                .to_lowercase()
                .cmp(&b.previous_title().unwrap_or("").to_lowercase()),
        };
        if self.ascending { ord } else { ord.reverse() }
    }

    /// Stable sort: records comparing equal keep their relative order.
    pub fn sort(&self, records: &mut [&JournalRecord]) {
        records.sort_by(|a, b| self.compare(a, b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{IncomingJournal, Issn, ReconcileMode, reconcile};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, d).unwrap()
    }

    fn issn(s: &str) -> Issn {
        s.parse().unwrap()
    }

    /// Five records: 2222 and 4444 updated, the rest unchanged.
    fn sample() -> Vec<JournalRecord> {
        let existing = vec![
            JournalRecord::new(issn("1111-1111"), "Annals of Botany", Some(day(1))),
            JournalRecord::new(issn("2222-2222"), "biology letters", Some(day(2))),
            JournalRecord::new(issn("3333-333X"), "Cell", Some(day(3))),
            JournalRecord::new(issn("4444-4444"), "Development", Some(day(4))),
            JournalRecord::new(issn("5555-5555"), "Ecology", None),
        ];
        let batch = vec![
            IncomingJournal::new(issn("22222222"), "Biology Letters").unwrap(),
            IncomingJournal::new(issn("44444444"), "Developmental Cell").unwrap(),
        ];
        reconcile(&existing, &batch, ReconcileMode::Merge, day(10)).merged
    }

    #[test]
    fn summary_counts() {
        let records = sample();
        let summary = ChangeSummary::of(&records);
        assert_eq!(summary, ChangeSummary { total: 5, updated_count: 2, unchanged_count: 3 });
    }

    #[test]
    fn summary_of_empty_list() {
        let empty: Vec<JournalRecord> = Vec::new();
        assert_eq!(ChangeSummary::of(&empty), ChangeSummary::default());
    }

    #[test]
    fn changed_only_returns_updated_in_order() {
        let records = sample();
        let filter = JournalFilter { changed_only: true, ..JournalFilter::default() };
        let keys: Vec<&str> = filter.apply(&records).iter().map(|r| r.issn.as_str()).collect();
        assert_eq!(keys, vec!["22222222", "44444444"]);
    }

    #[test]
    fn default_filter_matches_everything() {
        let records = sample();
        assert_eq!(JournalFilter::default().apply(&records).len(), records.len());
    }

    #[test]
    fn search_matches_title_case_insensitively() {
        let records = sample();
        let filter = JournalFilter { search: Some("CELL".to_owned()), ..JournalFilter::default() };
        let titles: Vec<&str> = filter.apply(&records).iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Cell", "Developmental Cell"]);
    }

    #[test]
    fn search_matches_issn_with_or_without_hyphen() {
        let records = sample();
        for term in ["3333333x", "3333-333X"] {
            let filter = JournalFilter { search: Some(term.to_owned()), ..JournalFilter::default() };
            let hits = filter.apply(&records);
            assert_eq!(hits.len(), 1, "term {term}");
            assert_eq!(hits[0].title, "Cell");
        }
    }

    #[test]
    fn words_with_digits_do_not_match_on_issn_digits() {
        let records = sample();
        for term in ["Ecology 5", "Cell 3", "Vol 1"] {
            let filter = JournalFilter { search: Some(term.to_owned()), ..JournalFilter::default() };
            assert!(filter.apply(&records).is_empty(), "term {term}");
        }
    }

    #[test]
    fn date_range_is_inclusive_and_skips_undated() {
        let records = sample();
        let filter =
            JournalFilter { from: Some(day(2)), to: Some(day(3)), ..JournalFilter::default() };
        let keys: Vec<&str> = filter.apply(&records).iter().map(|r| r.issn.as_str()).collect();
        // 2222 was re-checked on day 10 when its title changed.
        assert_eq!(keys, vec!["3333333X"]);
    }

    #[test]
    fn letter_bucket_ignores_case() {
        let records = sample();
        let filter = JournalFilter::default().with_letter('b').unwrap();
        let hits = filter.apply(&records);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Biology Letters");
    }

    #[test]
    fn letter_bucket_rejects_non_letters() {
        assert!(JournalFilter::default().with_letter('7').is_err());
    }

    #[test]
    fn filters_compose() {
        let records = sample();
        let filter = JournalFilter {
            search: Some("cell".to_owned()),
            changed_only: true,
            ..JournalFilter::default()
        };
        let hits = filter.apply(&records);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Developmental Cell");
    }

    #[test]
    fn default_sort_puts_updated_first_stably() {
        let records = sample();
        let mut view: Vec<&JournalRecord> = records.iter().collect();
        SortSpec::default().sort(&mut view);
        let keys: Vec<&str> = view.iter().map(|r| r.issn.as_str()).collect();
        assert_eq!(keys, vec!["22222222", "44444444", "11111111", "3333333X", "55555555"]);
    }

    #[test]
    fn sort_by_title_ignores_case() {
        let records = sample();
        let mut view: Vec<&JournalRecord> = records.iter().collect();
        SortSpec { key: SortKey::Title, ascending: false }.sort(&mut view);
        assert_eq!(view[0].title, "Ecology");
        assert_eq!(view[4].title, "Annals of Botany");
    }

    #[test]
    fn sort_key_parses_aliases() {
        assert_eq!("changed".parse::<SortKey>().unwrap(), SortKey::Status);
        assert_eq!("previous-title".parse::<SortKey>().unwrap(), SortKey::PreviousTitle);
        assert!("date".parse::<SortKey>().is_err());
    }
}
