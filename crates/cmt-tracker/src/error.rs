//! Tracker error types.

use thiserror::Error;

/// Errors that can occur when talking to an issue tracker.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The tracker returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the tracker.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// Failed to parse a tracker response.
    #[error("parse error: {0}")]
    Parse(String),

    /// The tracker returned a 429 Too Many Requests response.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// Repository is not in `owner/name` form.
    #[error("invalid repository '{0}': expected owner/name")]
    InvalidRepository(String),
}
