//! Synchronization error types.
//!
//! Only structural failures surface here. Per-comment tracker failures are
//! reported as error outcomes and never abort a batch.

use std::path::PathBuf;

use cmt_core::CoreError;
use thiserror::Error;

use crate::template::TemplateError;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Template file not found: {}", path.display())]
    TemplateNotFound { path: PathBuf },

    #[error("invalid template: {0}")]
    Template(#[from] TemplateError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
