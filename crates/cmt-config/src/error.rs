//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment extraction or merge error.
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    /// The configuration file passed on the command line does not exist.
    #[error("Configuration file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// A required configuration value is not set.
    #[error("{message}")]
    NotConfigured { message: String },

    /// A configuration field has an invalid value.
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
