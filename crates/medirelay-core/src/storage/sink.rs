//! SummarySink trait definition.
//!
//! The abstraction over the external records backend that persists session
//! summaries. Same RPITIT shape as [`crate::llm::CompletionBackend`].

use medirelay_types::error::StorageError;
use medirelay_types::summary::StoredSummary;

/// Trait for the external records backend.
///
/// Implementations live in medirelay-infra (e.g. `HttpSummarySink`).
pub trait SummarySink: Send + Sync {
    /// Human-readable sink name (e.g. "records-http").
    fn name(&self) -> &str;

    /// Persist a session summary. Ownership of the data transfers to the
    /// backend on success.
    fn store(
        &self,
        summary: &StoredSummary,
    ) -> impl std::future::Future<Output = Result<(), StorageError>> + Send;

    /// Probe the backend's root endpoint. Purely diagnostic; returns
    /// whatever the backend answered with.
    fn health(
        &self,
    ) -> impl std::future::Future<Output = Result<serde_json::Value, StorageError>> + Send;
}
