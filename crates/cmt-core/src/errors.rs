//! Cross-cutting error types for commenter.
//!
//! Domain-specific errors (`DocumentError`, `TrackerError`, `SyncError`) are
//! defined in their respective crates. The CLI converges all of them through
//! `anyhow`.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can be raised while building, reading, or writing comment sheets.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The interchange file does not exist.
    #[error("Comment file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Two comments in one sheet share the same identifier.
    #[error("Duplicate comment id in sheet: {id}")]
    DuplicateId { id: String },

    /// Data failed validation (shape, format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
