//! Service layer for journal-tracker
//!
//! Centralizes ingest, catalog refresh and the read surface between the
//! binary and the core/storage/catalog crates.

#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(missing_debug_implementations, reason = "Internal types")]

mod error;
mod scheduler;
#[cfg(test)]
mod test_support;
mod tracker_service;

pub use error::ServiceError;
pub use scheduler::{run_scheduled_refresh, start_scheduled_refresh};
pub use tracker_service::{IngestReport, RefreshOutcome, RefreshReport, TrackerService};
