//! Periodic catalog refresh.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::{RefreshOutcome, TrackerService};

/// Refresh now, then every `period`, forever. Failures are logged and the
/// next tick tries again.
pub async fn run_scheduled_refresh(service: Arc<TrackerService>, period: Duration) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        interval.tick().await;
        tracing::debug!("scheduled refresh: starting pass");
        match service.refresh().await {
            Ok(RefreshOutcome::Applied(report)) => {
                tracing::info!(
                    checked = report.checked,
                    changes = report.changes.len(),
                    "scheduled refresh applied"
                );
            },
            Ok(RefreshOutcome::Skipped) => {
                tracing::debug!("scheduled refresh: previous pass still running");
            },
            Ok(RefreshOutcome::NoData) => {
                tracing::info!("scheduled refresh: no catalog data, master list kept");
            },
            Err(e) => {
                tracing::warn!(error = %e, "scheduled refresh failed");
            },
        }
    }
}

/// Spawns [`run_scheduled_refresh`] on the current runtime.
pub fn start_scheduled_refresh(service: Arc<TrackerService>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(run_scheduled_refresh(service, period))
}
