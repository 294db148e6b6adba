//! Shared constants for journal-tracker.

/// ISSNs sent to the catalog API per request.
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// Records per persisted write batch.
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Document-store write limit per atomic batch (Firestore caps a batch at 500 writes).
pub const DOCUMENT_STORE_MAX_BATCH: usize = 500;

/// Library whose holdings the catalog search runs against.
pub const DEFAULT_LIBRARY_ID: u32 = 3820;

/// Public Third Iron (BrowZine) API host.
pub const DEFAULT_CATALOG_BASE_URL: &str = "https://public-api.thirdiron.com";

/// Scheduled refresh period: once a day.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 24 * 60 * 60;

/// Header row of the CSV export.
pub const CSV_EXPORT_HEADER: [&str; 4] = ["ISSN", "Title", "Previous Title", "Status"];

/// Status label for records whose title changed.
pub const STATUS_UPDATED: &str = "Updated";

/// Status label for records whose title did not change.
pub const STATUS_UNCHANGED: &str = "Unchanged";
