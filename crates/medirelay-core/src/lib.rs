//! Relay orchestration and port trait definitions for medirelay.
//!
//! This crate defines the "ports" (completion backend, summary sink) that
//! the infrastructure layer implements, plus the pure business logic: the
//! session-keyed conversation store, the diagnosis extractor, the bounded
//! retry helper, and the session relay that ties them together. It depends
//! only on `medirelay-types` -- never on `medirelay-infra` or any IO crate.

pub mod conversation;
pub mod diagnosis;
pub mod llm;
pub mod relay;
pub mod retry;
pub mod storage;
