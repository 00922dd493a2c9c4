//! HTTP request handlers.

pub mod chat;
pub mod records;
pub mod session;
