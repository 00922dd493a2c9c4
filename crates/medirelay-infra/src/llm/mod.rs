//! Completion backend implementations.

pub mod openai;
pub mod types;

pub use openai::OpenAiChatBackend;
