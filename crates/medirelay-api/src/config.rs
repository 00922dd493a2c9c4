//! Server configuration from CLI flags and environment variables.
//!
//! The completion API key is deliberately not a flag: it is read from
//! `OPENAI_API_KEY` only, at startup, in [`crate::state::AppState::init`].

use clap::Parser;

/// medirelay -- session-keyed medical chat relay.
#[derive(Debug, Parser)]
#[command(name = "medirelay", version, about)]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(long, env = "MEDIRELAY_PORT", default_value_t = 3001)]
    pub port: u16,

    /// Base URL of the completion endpoint.
    #[arg(
        long,
        env = "MEDIRELAY_COMPLETION_URL",
        default_value = "https://api.openai.com/v1"
    )]
    pub completion_url: String,

    /// Base URL of the records backend.
    #[arg(
        long,
        env = "MEDIRELAY_RECORDS_URL",
        default_value = "http://127.0.0.1:8000"
    )]
    pub records_url: String,

    /// Model identifier sent to the completion endpoint.
    #[arg(long, env = "MEDIRELAY_MODEL", default_value = "gpt-3.5-turbo")]
    pub model: String,

    /// Sliding-window cap on a session's message log (0 disables the cap).
    #[arg(long, env = "MEDIRELAY_MAX_HISTORY", default_value_t = 64)]
    pub max_history: usize,

    /// Roll back the appended user message when a chat turn fails upstream
    /// instead of leaving it in context for the next attempt.
    #[arg(long, env = "MEDIRELAY_ROLLBACK_ON_ERROR", default_value_t = false)]
    pub rollback_on_error: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_wire_contract() {
        let config = ServerConfig::parse_from(["medirelay"]);
        assert_eq!(config.port, 3001);
        assert_eq!(config.records_url, "http://127.0.0.1:8000");
        assert_eq!(config.model, "gpt-3.5-turbo");
        assert!(!config.rollback_on_error);
    }

    #[test]
    fn flags_override_defaults() {
        let config =
            ServerConfig::parse_from(["medirelay", "--port", "8080", "--rollback-on-error"]);
        assert_eq!(config.port, 8080);
        assert!(config.rollback_on_error);
    }
}
