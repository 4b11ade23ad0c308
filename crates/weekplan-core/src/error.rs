//! Core error types for weekplan-core.
//!
//! This module defines the error hierarchy using thiserror so the CLI can
//! report store, configuration and validation failures uniformly.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for weekplan-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Tabular store errors (connectivity, auth, missing worksheets)
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A named entity (task, day record) does not exist
    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        CoreError::NotFound {
            kind,
            name: name.into(),
        }
    }
}

/// Errors raised at the tabular store boundary.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The worksheet does not exist in the workbook
    #[error("Worksheet not found: {0}")]
    WorksheetNotFound(String),

    /// A row or column index points outside the worksheet
    #[error("Cell ({row}, {col}) out of range in worksheet '{sheet}'")]
    OutOfRange { sheet: String, row: usize, col: usize },

    /// A header the caller relies on is missing
    #[error("Column '{column}' not found in worksheet '{sheet}'")]
    ColumnNotFound { sheet: String, column: String },

    /// Authentication with the remote store failed
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The remote store answered with an error
    #[error("Remote store error (HTTP {status}): {message}")]
    Remote { status: u16, message: String },

    /// Transport-level failure talking to the remote store
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The HTTP runtime could not be started
    #[error("Failed to start HTTP runtime: {0}")]
    Runtime(#[source] std::io::Error),

    /// Credentials could not be read from the OS keyring
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    /// Local workbook file failure
    #[error("Failed to access workbook at {path}: {message}")]
    Workbook { path: PathBuf, message: String },
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

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// The data directory could not be determined or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// A day-record edit picked a value outside the current option list
    #[error("'{value}' is not an option for '{field}'")]
    NotAnOption { field: String, value: String },

    /// Unknown day-record field
    #[error("Unknown day field: {0}")]
    UnknownField(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
