use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result, bail};
use journal_tracker_core::{RawRow, ReconcileMode, TrackerConfig, read_csv_rows, read_json_rows};
use journal_tracker_service::IngestReport;
use serde::Serialize;

use crate::build_service;

#[derive(Serialize)]
struct IngestOutput<'a> {
    success: bool,
    #[serde(flatten)]
    report: &'a IngestReport,
}

#[derive(Serialize)]
struct IngestFailure {
    success: bool,
    error: String,
}

fn read_rows(path: &Path) -> Result<Vec<RawRow>> {
    let extension =
        path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).unwrap_or_default();
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let rows = match extension.as_str() {
        "csv" => read_csv_rows(file)?,
        "json" => read_json_rows(file)?,
        other => bail!("unsupported row file type {other:?}, expected .csv or .json"),
    };
    tracing::debug!(path = %path.display(), rows = rows.len(), "row file read");
    Ok(rows)
}

pub(crate) async fn run(config: &TrackerConfig, file: &Path, replace: bool) -> Result<()> {
    let mode = if replace { ReconcileMode::Replace } else { ReconcileMode::Merge };
    let result = async {
        let rows = read_rows(file)?;
        let service = build_service(config).await?;
        Ok::<_, anyhow::Error>(service.ingest(rows, mode).await?)
    }
    .await;

    match result {
        Ok(report) => {
            let output = IngestOutput { success: true, report: &report };
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        },
        Err(e) => {
            let failure = IngestFailure { success: false, error: format!("{e:#}") };
            println!("{}", serde_json::to_string_pretty(&failure)?);
            Err(e)
        },
    }
}
