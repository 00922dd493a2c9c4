//! Completion backend port.

pub mod backend;
pub mod box_backend;

pub use backend::CompletionBackend;
pub use box_backend::BoxCompletionBackend;
