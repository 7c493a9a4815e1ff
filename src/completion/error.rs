//! Error taxonomy for completion calls.
//!
//! The retry loop only retries errors classified as transient; auth and
//! network failures surface immediately to the caller.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompletionError {
    /// The backend answered but the payload was unusable (empty choices,
    /// missing content). Retried.
    #[error("Malformed completion response: {0}")]
    Malformed(String),

    /// The API rejected the request (auth, quota, bad model). Not retried.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Transport-level failure. Not retried.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl CompletionError {
    /// Whether the retry loop should spend an attempt on this error.
    pub fn is_transient(&self) -> bool {
        matches!(self, CompletionError::Malformed(_))
    }
}
