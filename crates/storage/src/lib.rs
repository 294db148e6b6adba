//! Storage layer for the journal master list
//!
//! A JSON-array file backend and an in-process keyed document store behind
//! one [`JournalStore`] capability, selected at startup by configuration.

mod backend;
mod error;
mod file_store;
mod memory_store;
#[cfg(test)]
mod tests;
pub mod traits;

pub use backend::StorageBackend;
pub use error::StorageError;
pub use file_store::FileStore;
pub use memory_store::MemoryStore;
pub use traits::{JournalStore, Revision, Snapshot};
