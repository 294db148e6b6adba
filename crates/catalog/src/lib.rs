//! Catalog client for resolving current journal titles by ISSN
//!
//! Queries the library catalog search endpoint in small ISSN batches,
//! retrying rate-limit and server errors with exponential backoff.

pub mod client;
pub mod error;
mod lookup;
#[cfg(test)]
mod retry_tests;
mod types;

pub use client::CatalogClient;
pub use error::CatalogError;
pub use lookup::CatalogLookup;
pub use types::CatalogJournal;
