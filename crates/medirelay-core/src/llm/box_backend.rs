//! BoxCompletionBackend -- object-safe dynamic dispatch wrapper for
//! [`CompletionBackend`].
//!
//! Blanket-impl pattern:
//! 1. Define an object-safe `CompletionBackendDyn` trait with boxed futures
//! 2. Blanket-impl `CompletionBackendDyn` for all `T: CompletionBackend`
//! 3. `BoxCompletionBackend` wraps `Box<dyn CompletionBackendDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use medirelay_types::llm::{CompletionError, CompletionRequest, CompletionResponse};

use super::backend::CompletionBackend;

/// Object-safe version of [`CompletionBackend`] with boxed futures.
///
/// Exists solely to enable dynamic dispatch; a blanket implementation is
/// provided for all types implementing `CompletionBackend`.
pub trait CompletionBackendDyn: Send + Sync {
    fn name(&self) -> &str;

    fn complete_boxed<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<CompletionResponse, CompletionError>> + Send + 'a>>;
}

/// Blanket implementation: any `CompletionBackend` automatically implements
/// `CompletionBackendDyn`.
impl<T: CompletionBackend> CompletionBackendDyn for T {
    fn name(&self) -> &str {
        CompletionBackend::name(self)
    }

    fn complete_boxed<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<CompletionResponse, CompletionError>> + Send + 'a>>
    {
        Box::pin(self.complete(request))
    }
}

/// Type-erased completion backend.
///
/// Since `CompletionBackend` uses RPITIT it cannot be used as a trait object
/// directly; `BoxCompletionBackend` provides equivalent methods that delegate
/// to the inner `CompletionBackendDyn` trait object.
pub struct BoxCompletionBackend {
    inner: Box<dyn CompletionBackendDyn + Send + Sync>,
}

impl BoxCompletionBackend {
    /// Wrap a concrete `CompletionBackend` in a type-erased box.
    pub fn new<T: CompletionBackend + 'static>(backend: T) -> Self {
        Self {
            inner: Box::new(backend),
        }
    }

    /// Human-readable backend name.
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Send a completion request and receive the parsed reply.
    pub async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError> {
        self.inner.complete_boxed(request).await
    }
}
