//! Relay configuration.

use serde::{Deserialize, Serialize};

/// What to do with the already-appended user message when the completion
/// call for a chat turn fails.
///
/// The original behavior leaves the message in context so the next call
/// retries with it; rollback removes it so a failed turn leaves no trace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatFailurePolicy {
    #[default]
    KeepUserMessage,
    RollbackUserMessage,
}

/// Tunables for the session relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Model identifier sent to the completion endpoint.
    pub model: String,
    /// Sliding-window cap on a session's message log. The initial system
    /// prompt never counts against eviction. Zero disables the cap.
    pub max_history_messages: usize,
    /// Handling of the appended user message when a chat turn fails upstream.
    pub chat_failure_policy: ChatFailurePolicy,
    /// Generation budget for the end-of-session summary.
    pub summary_max_tokens: u32,
    /// Low randomness favors a terse, deterministic-leaning summary.
    pub summary_temperature: f64,
    /// Total time budget for retrying a transient upstream failure.
    /// Zero effectively disables retries.
    pub retry_max_elapsed_ms: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            max_history_messages: 64,
            chat_failure_policy: ChatFailurePolicy::default(),
            summary_max_tokens: 150,
            summary_temperature: 0.3,
            retry_max_elapsed_ms: 8_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = RelayConfig::default();
        assert_eq!(config.model, "gpt-3.5-turbo");
        assert_eq!(config.max_history_messages, 64);
        assert_eq!(config.chat_failure_policy, ChatFailurePolicy::KeepUserMessage);
        assert_eq!(config.summary_max_tokens, 150);
        assert!((config.summary_temperature - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn chat_failure_policy_serde() {
        let json = serde_json::to_string(&ChatFailurePolicy::RollbackUserMessage).unwrap();
        assert_eq!(json, "\"rollback_user_message\"");
    }
}
