use std::time::Duration;

use anyhow::{Result, bail};
use journal_tracker_core::TrackerConfig;
use journal_tracker_service::start_scheduled_refresh;

use crate::build_service;

pub(crate) async fn run_once(config: &TrackerConfig) -> Result<()> {
    let service = build_service(config).await?;
    let outcome = service.refresh().await?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

pub(crate) async fn run_watch(config: &TrackerConfig, interval_secs: u64) -> Result<()> {
    if interval_secs == 0 {
        bail!("refresh interval must be greater than zero");
    }
    if config.catalog_api_key.is_none() {
        bail!("watch needs a catalog API key (JOURNAL_TRACKER_CATALOG_API_KEY)");
    }
    let service = build_service(config).await?;
    let period = Duration::from_secs(interval_secs);
    tracing::info!(interval_secs, backend = service.store_kind(), "scheduled refresh started");

    let handle = start_scheduled_refresh(service, period);
    tokio::signal::ctrl_c().await?;
    tracing::info!("interrupted, stopping scheduled refresh");
    handle.abort();
    Ok(())
}

pub(crate) async fn run_lookup(config: &TrackerConfig, issns: &[String]) -> Result<()> {
    let service = build_service(config).await?;
    let found = service.lookup(issns).await?;
    println!("{}", serde_json::to_string_pretty(&found)?);
    Ok(())
}
