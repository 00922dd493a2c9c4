//! Infrastructure layer for medirelay.
//!
//! Contains implementations of the port traits defined in `medirelay-core`:
//! the OpenAI-compatible completion backend and the HTTP records sink.

pub mod llm;
pub mod records;
