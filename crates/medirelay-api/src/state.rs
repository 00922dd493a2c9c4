//! Application state wiring the relay to its concrete backends.

use std::sync::Arc;

use anyhow::Context;
use secrecy::SecretString;

use medirelay_core::llm::BoxCompletionBackend;
use medirelay_core::relay::SessionRelay;
use medirelay_core::storage::BoxSummarySink;
use medirelay_infra::llm::OpenAiChatBackend;
use medirelay_infra::records::HttpSummarySink;
use medirelay_types::config::{ChatFailurePolicy, RelayConfig};

use crate::config::ServerConfig;

/// Shared application state holding the relay.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<SessionRelay>,
}

impl AppState {
    /// Wire the relay to the OpenAI-compatible completion backend and the
    /// HTTP records sink.
    ///
    /// The completion API key is read from `OPENAI_API_KEY`.
    pub fn init(config: &ServerConfig) -> anyhow::Result<Self> {
        let api_key: SecretString = std::env::var("OPENAI_API_KEY")
            .context("OPENAI_API_KEY must be set")?
            .into();

        let backend =
            OpenAiChatBackend::new(api_key).with_base_url(config.completion_url.clone());
        let sink = HttpSummarySink::new(config.records_url.clone());

        let chat_failure_policy = if config.rollback_on_error {
            ChatFailurePolicy::RollbackUserMessage
        } else {
            ChatFailurePolicy::KeepUserMessage
        };

        let relay_config = RelayConfig {
            model: config.model.clone(),
            max_history_messages: config.max_history,
            chat_failure_policy,
            ..RelayConfig::default()
        };

        let relay = SessionRelay::new(
            BoxCompletionBackend::new(backend),
            BoxSummarySink::new(sink),
            relay_config,
        );

        Ok(Self {
            relay: Arc::new(relay),
        })
    }

    /// Build state around an already-constructed relay (used by tests to
    /// substitute fake backends).
    pub fn with_relay(relay: Arc<SessionRelay>) -> Self {
        Self { relay }
    }
}
