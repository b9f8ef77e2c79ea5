//! Error types for deedlog-core

use chrono::NaiveDate;
use thiserror::Error;

/// Main error type for the deedlog-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed value read back from the store
    #[error("storage error: {0}")]
    Storage(String),

    /// Inverted date range passed to an aggregation
    #[error("invalid date range: {start} is after {end}")]
    Range { start: NaiveDate, end: NaiveDate },

    /// Out-of-bound query parameter (caller-side misuse)
    #[error("validation error: {0}")]
    Validation(String),
}

/// Result type alias for deedlog-core
pub type Result<T> = std::result::Result<T, Error>;
