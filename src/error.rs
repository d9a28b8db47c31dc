//! Error types for coti
//!
//! This module defines the error hierarchy for the whole tool.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use std::path::Path;
use thiserror::Error;

/// The main error type for coti
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Read Errors
    // ============================================================================
    #[error("Failed to read '{path}': {message}")]
    Read { path: String, message: String },

    #[error("'{path}' contains byte sequences that are not valid {encoding}")]
    Decode { path: String, encoding: String },

    // ============================================================================
    // Write Errors
    // ============================================================================
    #[error("Failed to write chunk {chunk} to '{path}': {message}")]
    Write {
        chunk: usize,
        path: String,
        message: String,
    },

    // ============================================================================
    // Row Errors
    // ============================================================================
    #[error("Row {row}: field index {index} is out of range (row has {width} fields)")]
    FieldIndex {
        row: usize,
        index: usize,
        width: usize,
    },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a read error for a source path
    pub fn read(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::Read {
            path: path.as_ref().display().to_string(),
            message: message.into(),
        }
    }

    /// Create a write error for a chunk
    pub fn write(chunk: usize, path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::Write {
            chunk,
            path: path.as_ref().display().to_string(),
            message: message.into(),
        }
    }

    /// Create a field index error
    pub fn field_index(row: usize, index: usize, width: usize) -> Self {
        Self::FieldIndex { row, index, width }
    }

    /// Check if this error was raised while validating configuration,
    /// i.e. before any file was touched
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Error::Config { .. }
                | Error::MissingConfigField { .. }
                | Error::InvalidConfigValue { .. }
                | Error::YamlParse(_)
                | Error::JsonParse(_)
        )
    }
}

/// Result type alias for coti
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }
}
