//! Core error types for lockin-core.
//!
//! Nothing in the session flow is fatal: storage and coaching failures are
//! recovered where they happen. These types exist so the recovery sites (and
//! the CLI's administrative commands) have something precise to log.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from the configuration layer, the only fallible surface that is
/// reported to the user rather than recovered.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Key-value storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing database
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// The store refused the operation (used by in-memory test doubles too)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Coaching provider errors. Always recovered with a fallback string.
#[derive(Error, Debug)]
pub enum CoachError {
    /// No API key is available
    #[error("coaching provider is not configured")]
    NotConfigured,

    /// Transport-level failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The provider answered but produced no usable text
    #[error("provider returned no text")]
    EmptyResponse,

    /// Response body did not match the expected shape
    #[error("failed to decode provider response: {0}")]
    Decode(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Duration outside the supported range or off-step
    #[error("Invalid duration {minutes}m: must be a multiple of {step} between {min} and {max}")]
    InvalidDuration {
        minutes: u32,
        min: u32,
        max: u32,
        step: u32,
    },
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::QueryFailed(format!("invalid JSON value: {err}"))
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
