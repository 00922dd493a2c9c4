//! HTTP application layer for medirelay.
//!
//! Exposed as a library so integration tests can assemble the router
//! around fake backends; the `medirelay` binary lives in `main.rs`.

pub mod config;
pub mod http;
pub mod state;
