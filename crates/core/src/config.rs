//! Runtime configuration passed explicitly at startup.
//!
//! Values come from `JOURNAL_TRACKER_*` environment variables and are then
//! overridden by command-line flags. Nothing reads the environment after
//! startup.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::chunk::ChunkSize;
use crate::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_CATALOG_BASE_URL, DEFAULT_CHUNK_SIZE, DEFAULT_LIBRARY_ID,
    DEFAULT_REFRESH_INTERVAL_SECS,
};
use crate::env_config::{env_parse_with_default, env_string};
use crate::{CoreError, Result};

pub const ENV_CATALOG_API_KEY: &str = "JOURNAL_TRACKER_CATALOG_API_KEY";
pub const ENV_CATALOG_BASE_URL: &str = "JOURNAL_TRACKER_CATALOG_URL";
pub const ENV_LIBRARY_ID: &str = "JOURNAL_TRACKER_LIBRARY_ID";
pub const ENV_BATCH_SIZE: &str = "JOURNAL_TRACKER_BATCH_SIZE";
pub const ENV_CHUNK_SIZE: &str = "JOURNAL_TRACKER_CHUNK_SIZE";
pub const ENV_BACKEND: &str = "JOURNAL_TRACKER_BACKEND";
pub const ENV_DATA_FILE: &str = "JOURNAL_TRACKER_DATA_FILE";
pub const ENV_REFRESH_INTERVAL_SECS: &str = "JOURNAL_TRACKER_REFRESH_INTERVAL_SECS";

/// Which persistence backend to open. Chosen explicitly, never inferred.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// JSON array on the local filesystem.
    #[default]
    File,
    /// In-process keyed document store.
    Memory,
}

impl std::str::FromStr for BackendKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            other => Err(CoreError::Config(format!("unknown backend: {other}"))),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => f.write_str("file"),
            Self::Memory => f.write_str("memory"),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    pub catalog_api_key: Option<String>,
    pub catalog_base_url: String,
    pub library_id: u32,
    /// ISSNs per catalog request.
    pub batch_size: usize,
    /// Records per persisted write batch.
    pub chunk_size: usize,
    pub backend: BackendKind,
    pub data_file: PathBuf,
    pub refresh_interval_secs: u64,
}

impl fmt::Debug for TrackerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackerConfig")
            .field("catalog_api_key", &self.catalog_api_key.as_ref().map(|_| "***"))
            .field("catalog_base_url", &self.catalog_base_url)
            .field("library_id", &self.library_id)
            .field("batch_size", &self.batch_size)
            .field("chunk_size", &self.chunk_size)
            .field("backend", &self.backend)
            .field("data_file", &self.data_file)
            .field("refresh_interval_secs", &self.refresh_interval_secs)
            .finish()
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            catalog_api_key: None,
            catalog_base_url: DEFAULT_CATALOG_BASE_URL.to_owned(),
            library_id: DEFAULT_LIBRARY_ID,
            batch_size: DEFAULT_BATCH_SIZE,
            chunk_size: DEFAULT_CHUNK_SIZE,
            backend: BackendKind::File,
            data_file: default_data_file(),
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
        }
    }
}

impl TrackerConfig {
    /// Defaults overlaid with whatever `JOURNAL_TRACKER_*` variables are set.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let backend = match env_string(ENV_BACKEND).map(|raw| raw.parse::<BackendKind>()) {
            Some(Ok(kind)) => kind,
            Some(Err(e)) => {
                tracing::warn!(
                    error = %e,
                    default = %defaults.backend,
                    "invalid backend, using default"
                );
                defaults.backend
            },
            None => defaults.backend,
        };
        Self {
            catalog_api_key: env_string(ENV_CATALOG_API_KEY),
            catalog_base_url: env_string(ENV_CATALOG_BASE_URL)
                .unwrap_or(defaults.catalog_base_url),
            library_id: env_parse_with_default(ENV_LIBRARY_ID, defaults.library_id),
            batch_size: env_parse_with_default(ENV_BATCH_SIZE, defaults.batch_size),
            chunk_size: env_parse_with_default(ENV_CHUNK_SIZE, defaults.chunk_size),
            backend,
            data_file: env_string(ENV_DATA_FILE).map_or(defaults.data_file, PathBuf::from),
            refresh_interval_secs: env_parse_with_default(
                ENV_REFRESH_INTERVAL_SECS,
                defaults.refresh_interval_secs,
            ),
        }
    }

    /// Reject values that would make batching or scheduling meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(CoreError::Config("batch_size must be greater than zero".to_owned()));
        }
        ChunkSize::new(self.chunk_size)
            .map_err(|_| CoreError::Config("chunk_size must be greater than zero".to_owned()))?;
        if self.refresh_interval_secs == 0 {
            return Err(CoreError::Config(
                "refresh_interval_secs must be greater than zero".to_owned(),
            ));
        }
        if self.catalog_base_url.trim().is_empty() {
            return Err(CoreError::Config("catalog base URL must not be empty".to_owned()));
        }
        Ok(())
    }

    /// Validated chunk size.
    pub fn chunk_limit(&self) -> Result<ChunkSize> {
        ChunkSize::new(self.chunk_size)
    }
}

/// `<data_local_dir>/journal-tracker/journals.json`, or `./journals.json`.
#[must_use]
pub fn default_data_file() -> PathBuf {
    dirs::data_local_dir()
        .map_or_else(|| PathBuf::from("."), |dir| dir.join("journal-tracker"))
        .join("journals.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = TrackerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.batch_size, 5);
        assert_eq!(config.chunk_size, 500);
        assert_eq!(config.library_id, 3820);
        assert!(config.data_file.ends_with("journals.json"));
    }

    #[test]
    fn zero_sizes_are_rejected() {
        let config = TrackerConfig { batch_size: 0, ..TrackerConfig::default() };
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));

        let config = TrackerConfig { chunk_size: 0, ..TrackerConfig::default() };
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = TrackerConfig {
            catalog_api_key: Some("secret-key".to_owned()),
            ..TrackerConfig::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("***"));
    }

    #[test]
    fn backend_kind_parses() {
        assert_eq!("FILE".parse::<BackendKind>().unwrap(), BackendKind::File);
        assert_eq!("memory".parse::<BackendKind>().unwrap(), BackendKind::Memory);
        assert!("github".parse::<BackendKind>().is_err());
    }
}
