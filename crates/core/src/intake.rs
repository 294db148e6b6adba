//! Row intake: turns parsed spreadsheet rows into validated incoming journals.
//!
//! Rows missing a title or an ISSN, and rows whose ISSN normalizes to empty,
//! are skipped and counted. They never abort the batch.

use std::io::Read;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::issn::normalize_issn_value;
use crate::record::IncomingJournal;
use crate::{CoreError, Result};

/// One row as produced by a spreadsheet-to-JSON converter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    #[serde(default, alias = "Title", alias = "TITLE")]
    pub title: Option<Value>,
    #[serde(default, alias = "ISSN", alias = "Issn")]
    pub issn: Option<Value>,
}

impl RawRow {
    #[must_use]
    pub fn new(title: impl Into<String>, issn: impl Into<String>) -> Self {
        Self { title: Some(Value::String(title.into())), issn: Some(Value::String(issn.into())) }
    }
}

/// Outcome of validating a batch of rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Intake {
    pub accepted: Vec<IncomingJournal>,
    pub skipped: usize,
}

impl Intake {
    #[must_use]
    pub fn rows_read(&self) -> usize {
        self.accepted.len().saturating_add(self.skipped)
    }
}

/// Validate rows, keeping input order.
#[must_use]
pub fn accept_rows<I>(rows: I) -> Intake
where
    I: IntoIterator<Item = RawRow>,
{
    let mut intake = Intake::default();
    for row in rows {
        match accept_row(&row) {
            Some(journal) => intake.accepted.push(journal),
            None => intake.skipped = intake.skipped.saturating_add(1),
        }
    }
    if intake.skipped > 0 {
        tracing::debug!(
            accepted = intake.accepted.len(),
            skipped = intake.skipped,
            "skipped rows without a usable title or ISSN"
        );
    }
    intake
}

fn accept_row(row: &RawRow) -> Option<IncomingJournal> {
    let title = row.title.as_ref().and_then(cell_text)?;
    let issn = row.issn.as_ref().and_then(normalize_issn_value)?;
    IncomingJournal::new(issn, &title)
}

fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Read a JSON array of row objects.
pub fn read_json_rows<R: Read>(reader: R) -> Result<Vec<RawRow>> {
    let value: Value = serde_json::from_reader(reader)?;
    match value {
        Value::Array(items) => Ok(items
            .into_iter()
            .map(|item| match item {
                // Anything but an object becomes an empty row and is counted as skipped.
                Value::Object(_) => serde_json::from_value(item).unwrap_or_default(),
                _ => RawRow::default(),
            })
            .collect()),
        other => Err(CoreError::InvalidInput(format!(
            "expected a JSON array of rows, got {}",
            json_kind(&other)
        ))),
    }
}

/// Read CSV rows. The header must name a `Title` and an `ISSN` column
/// (case-insensitive); other columns are ignored. Cells stay text so
/// leading zeros in ISSNs survive.
pub fn read_csv_rows<R: Read>(reader: R) -> Result<Vec<RawRow>> {
    let mut csv_reader =
        csv::ReaderBuilder::new().flexible(true).trim(csv::Trim::All).from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
    let (Some(title_col), Some(issn_col)) = (column("title"), column("issn")) else {
        return Err(CoreError::InvalidInput(
            "CSV header must contain 'Title' and 'ISSN' columns".to_owned(),
        ));
    };

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let cell = |idx: usize| {
            record.get(idx).filter(|s| !s.is_empty()).map(|s| Value::String(s.to_owned()))
        };
        rows.push(RawRow { title: cell(title_col), issn: cell(issn_col) });
    }
    Ok(rows)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
