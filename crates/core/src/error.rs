use std::io;
use std::result::Result as StdResult;

use thiserror::Error;

/// Errors produced by the pure journal-tracker logic and its row readers.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid chunk size: {0} (must be greater than zero)")]
    InvalidChunkSize(usize),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = StdResult<T, CoreError>;
