//! Error types shared across the relay.

use crate::llm::CompletionError;

/// Errors from the external records backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
}

impl StorageError {
    /// Whether a retry could plausibly succeed. Same split as
    /// [`CompletionError::is_transient`]: transport/timeout/5xx retry,
    /// 4xx does not.
    pub fn is_transient(&self) -> bool {
        match self {
            StorageError::Network(_) | StorageError::Timeout(_) => true,
            StorageError::Http { status, .. } => *status >= 500,
        }
    }
}

/// Top-level relay failure, surfaced at the HTTP boundary as a 500.
///
/// Two kinds only: the completion endpoint failed, or the forward to the
/// records backend failed. The HTTP client sees the same envelope for both.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("completion endpoint failed: {0}")]
    Upstream(#[from] CompletionError),

    #[error("records backend forward failed: {0}")]
    StorageForward(#[from] StorageError),
}
