//! CompletionBackend trait definition.
//!
//! The abstraction over the remote completion endpoint. Uses native async
//! fn in traits (RPITIT, Rust 2024 edition); see
//! [`super::box_backend::BoxCompletionBackend`] for the object-safe wrapper.

use medirelay_types::llm::{CompletionError, CompletionRequest, CompletionResponse};

/// Trait for completion endpoint backends.
///
/// Implementations live in medirelay-infra (e.g. `OpenAiChatBackend`).
/// A single call either succeeds or fails; retry policy belongs to the
/// caller, not the backend.
pub trait CompletionBackend: Send + Sync {
    /// Human-readable backend name (e.g. "openai").
    fn name(&self) -> &str;

    /// Send a completion request and receive the parsed reply.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, CompletionError>> + Send;
}
