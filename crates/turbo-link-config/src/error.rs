//! Configuration error types

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors raised while locating, loading or validating connector settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error occurred during config operations
    #[error("IO error: {operation} - {reason}")]
    IoError {
        /// What was being attempted
        operation: String,
        /// Human readable failure
        reason: String,
        /// Underlying IO error
        #[source]
        cause: Option<std::io::Error>,
    },

    /// Configuration serialization/deserialization failed
    #[error("Serialization error: {format} - {reason}")]
    SerializationError {
        /// Document format, e.g. `TOML`
        format: String,
        /// Human readable failure
        reason: String,
        /// Underlying serializer error
        #[source]
        cause: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation failed
    #[error("Invalid configuration: {field} - {reason}")]
    InvalidConfig {
        /// Dotted path of the offending setting
        field: String,
        /// Why the value was rejected
        reason: String,
        /// Underlying parse error, if any
        #[source]
        cause: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A required configuration or bootstrap file could not be located
    #[error("Configuration file not found: {}", path.display())]
    NotFound {
        /// Path that was looked up
        path: PathBuf,
    },

    /// The platform configuration directory could not be determined
    #[error("Could not determine the platform configuration directory")]
    NoConfigDir,

    /// Layered configuration could not be built or deserialized
    #[error("Configuration source error: {0}")]
    Source(#[from] config::ConfigError),
}

impl ConfigError {
    /// Creates an IO error with optional cause.
    pub fn io_error(
        operation: impl Into<String>,
        reason: impl Into<String>,
        cause: Option<std::io::Error>,
    ) -> Self {
        Self::IoError {
            operation: operation.into(),
            reason: reason.into(),
            cause,
        }
    }

    /// Creates a serialization error with optional cause.
    pub fn serialization_error(
        format: impl Into<String>,
        reason: impl Into<String>,
        cause: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::SerializationError {
            format: format.into(),
            reason: reason.into(),
            cause,
        }
    }

    /// Creates an invalid config error with optional cause.
    pub fn invalid_config(
        field: impl Into<String>,
        reason: impl Into<String>,
        cause: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
            cause,
        }
    }

    /// Creates a not-found error for the given path.
    pub fn not_found(path: &Path) -> Self {
        Self::NotFound {
            path: path.to_path_buf(),
        }
    }
}

/// Result type for configuration operations.
pub type Result<T, E = ConfigError> = std::result::Result<T, E>;
