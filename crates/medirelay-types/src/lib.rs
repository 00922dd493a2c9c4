//! Shared domain types for medirelay.
//!
//! This crate contains the types used across the relay: conversation
//! messages, completion request/response shapes, session summaries, relay
//! configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod config;
pub mod error;
pub mod llm;
pub mod summary;
