//! BoxSummarySink -- object-safe dynamic dispatch wrapper for
//! [`SummarySink`]. Same blanket-impl pattern as
//! [`crate::llm::BoxCompletionBackend`].

use std::future::Future;
use std::pin::Pin;

use medirelay_types::error::StorageError;
use medirelay_types::summary::StoredSummary;

use super::sink::SummarySink;

/// Object-safe version of [`SummarySink`] with boxed futures.
pub trait SummarySinkDyn: Send + Sync {
    fn name(&self) -> &str;

    fn store_boxed<'a>(
        &'a self,
        summary: &'a StoredSummary,
    ) -> Pin<Box<dyn Future<Output = Result<(), StorageError>> + Send + 'a>>;

    fn health_boxed(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<serde_json::Value, StorageError>> + Send + '_>>;
}

/// Blanket implementation: any `SummarySink` automatically implements
/// `SummarySinkDyn`.
impl<T: SummarySink> SummarySinkDyn for T {
    fn name(&self) -> &str {
        SummarySink::name(self)
    }

    fn store_boxed<'a>(
        &'a self,
        summary: &'a StoredSummary,
    ) -> Pin<Box<dyn Future<Output = Result<(), StorageError>> + Send + 'a>> {
        Box::pin(self.store(summary))
    }

    fn health_boxed(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<serde_json::Value, StorageError>> + Send + '_>> {
        Box::pin(self.health())
    }
}

/// Type-erased summary sink.
pub struct BoxSummarySink {
    inner: Box<dyn SummarySinkDyn + Send + Sync>,
}

impl BoxSummarySink {
    /// Wrap a concrete `SummarySink` in a type-erased box.
    pub fn new<T: SummarySink + 'static>(sink: T) -> Self {
        Self {
            inner: Box::new(sink),
        }
    }

    /// Human-readable sink name.
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Persist a session summary.
    pub async fn store(&self, summary: &StoredSummary) -> Result<(), StorageError> {
        self.inner.store_boxed(summary).await
    }

    /// Probe the backend's root endpoint.
    pub async fn health(&self) -> Result<serde_json::Value, StorageError> {
        self.inner.health_boxed().await
    }
}
