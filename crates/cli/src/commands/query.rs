use std::path::PathBuf;

use anyhow::{Context, Result};
use journal_tracker_core::{JournalFilter, SortSpec, TrackerConfig};

use crate::build_service;

pub(crate) async fn run_list(
    config: &TrackerConfig,
    filter: JournalFilter,
    sort: SortSpec,
) -> Result<()> {
    let service = build_service(config).await?;
    let records = service.filtered(&filter, sort).await?;
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

pub(crate) async fn run_summary(config: &TrackerConfig, filter: JournalFilter) -> Result<()> {
    let service = build_service(config).await?;
    let summary = service.summary(&filter).await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

pub(crate) async fn run_export(
    config: &TrackerConfig,
    changed_only: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    let service = build_service(config).await?;
    let csv = service.export_csv(changed_only).await?;
    match output {
        Some(path) => {
            std::fs::write(&path, &csv).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(path = %path.display(), "export written");
        },
        None => println!("{csv}"),
    }
    Ok(())
}
