//! CSV export of the master list.

use crate::constants::{CSV_EXPORT_HEADER, STATUS_UNCHANGED, STATUS_UPDATED};
use crate::record::JournalRecord;
use crate::{CoreError, Result};

/// Render records as `ISSN,Title,Previous Title,Status` with every field
/// quoted. Rows are `\n`-separated with no trailing newline.
pub fn export_csv<'a, I>(records: I, changed_only: bool) -> Result<String>
where
    I: IntoIterator<Item = &'a JournalRecord>,
{
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_EXPORT_HEADER)?;
    for record in records.into_iter().filter(|r| !changed_only || r.changed()) {
        let status = if record.changed() { STATUS_UPDATED } else { STATUS_UNCHANGED };
        writer.write_record([
            record.issn.as_str(),
            record.title.as_str(),
            record.previous_title().unwrap_or(""),
            status,
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| CoreError::Io(e.into_error()))?;
    let mut text = String::from_utf8(bytes)
        .map_err(|e| CoreError::InvalidInput(format!("export produced invalid UTF-8: {e}")))?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{IncomingJournal, Issn, ReconcileMode, reconcile};
    use chrono::NaiveDate;

    fn issn(s: &str) -> Issn {
        s.parse().unwrap()
    }

    fn sample() -> Vec<JournalRecord> {
        let existing = vec![
            JournalRecord::new(issn("00368075"), "Science", None),
            JournalRecord::new(issn("00280836"), "Nature", None),
        ];
        let batch =
            vec![IncomingJournal::new(issn("00280836"), "Nature \"International\"").unwrap()];
        let day = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        reconcile(&existing, &batch, ReconcileMode::Merge, day).merged
    }

    #[test]
    fn exports_all_rows_quoted() {
        let csv = export_csv(&sample(), false).unwrap();
        let expected = [
            r#""ISSN","Title","Previous Title","Status""#,
            r#""00368075","Science","","Unchanged""#,
            r#""00280836","Nature ""International""","Nature","Updated""#,
        ]
        .join("\n");
        assert_eq!(csv, expected);
    }

    #[test]
    fn changed_only_keeps_updated_rows() {
        let csv = export_csv(&sample(), true).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with(r#""00280836""#));
    }

    #[test]
    fn empty_list_is_header_only() {
        let empty: Vec<JournalRecord> = Vec::new();
        let csv = export_csv(&empty, false).unwrap();
        assert_eq!(csv, r#""ISSN","Title","Previous Title","Status""#);
    }
}
