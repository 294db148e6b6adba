//! Core types and pure logic for journal-tracker
//!
//! ISSN normalization, row intake, ISSN-keyed reconciliation, chunking,
//! read-side filtering and CSV export. Shared by every other crate.

mod chunk;
mod config;
pub mod constants;
mod env_config;
mod error;
mod export;
mod intake;
mod issn;
mod reconcile;
mod record;
mod summary;

pub use chunk::{ChunkSize, chunk, chunks_of};
pub use config::*;
pub use env_config::{env_parse_with_default, env_string};
pub use error::*;
pub use export::export_csv;
pub use intake::{Intake, RawRow, accept_rows, read_csv_rows, read_json_rows};
pub use issn::{Issn, normalize_issn, normalize_issn_value};
pub use reconcile::{ReconcileMode, Reconciliation, reconcile};
pub use record::{IncomingJournal, JournalRecord, TitleChange};
pub use summary::{ChangeSummary, JournalFilter, SortKey, SortSpec};
