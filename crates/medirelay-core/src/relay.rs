//! Session relay orchestration.
//!
//! `SessionRelay` coordinates the conversation store, the completion
//! backend, the diagnosis extractor, and the records sink through the full
//! session lifecycle: chat turns, end-of-session summarization, and the
//! records backend health probe.

use medirelay_types::config::{ChatFailurePolicy, RelayConfig};
use medirelay_types::error::RelayError;
use medirelay_types::llm::{CompletionRequest, Message};
use medirelay_types::summary::{SessionSummary, StoredSummary};
use std::time::Duration;
use tracing::{error, info};

use crate::conversation::ConversationStore;
use crate::diagnosis::DiagnosisExtractor;
use crate::llm::BoxCompletionBackend;
use crate::retry::retry_transient;
use crate::storage::BoxSummarySink;

/// Session key used when a request carries no session id, preserving the
/// original single-conversation wire contract.
pub const DEFAULT_SESSION: &str = "default";

/// Fixed initial system prompt every session starts from.
pub const TRIAGE_SYSTEM_PROMPT: &str = "You are a medical diagnosis chatbot. Your role is to \
assist users by asking relevant questions about their symptoms and providing potential \
diagnoses based on the information given. Always remind users that your suggestions are not \
a substitute for professional medical advice and encourage them to consult with a healthcare \
provider for accurate diagnosis and treatment. Be empathetic, clear, and thorough in your \
responses. Important: Ask only one question at a time about the user's symptoms or condition. \
Wait for the user's response before asking the next question.";

/// System prompt prepended to the conversation for the end-of-session
/// summarization call. Instructs the model to emit a single `Diagnosis:`
/// line so the extractor's prefix match is reliable.
pub const SUMMARY_SYSTEM_PROMPT: &str = "Summarize the following conversation, highlighting \
key points and providing a specific diagnosis based on the user's symptoms. Do not end with \
a question. Put the diagnosis on its own line in exactly this form: 'Diagnosis: <one or two \
words>'. Then provide a separate detailed summary of the conversation.";

/// Orchestrates chat turns and session-end summarization.
///
/// Holds the type-erased completion backend and records sink, the
/// session-keyed conversation store, and the relay tunables.
pub struct SessionRelay {
    backend: BoxCompletionBackend,
    sink: BoxSummarySink,
    conversations: ConversationStore,
    config: RelayConfig,
}

impl SessionRelay {
    /// Create a relay whose sessions start from [`TRIAGE_SYSTEM_PROMPT`].
    pub fn new(backend: BoxCompletionBackend, sink: BoxSummarySink, config: RelayConfig) -> Self {
        let conversations =
            ConversationStore::new(TRIAGE_SYSTEM_PROMPT, config.max_history_messages);
        Self {
            backend,
            sink,
            conversations,
            config,
        }
    }

    /// Access the conversation store.
    pub fn conversations(&self) -> &ConversationStore {
        &self.conversations
    }

    fn retry_budget(&self) -> Duration {
        Duration::from_millis(self.config.retry_max_elapsed_ms)
    }

    /// Relay one chat turn: append the user message, send the full session
    /// context upstream, append and return the assistant reply.
    ///
    /// On upstream failure no assistant message is appended; the appended
    /// user message stays or is rolled back per the configured
    /// [`ChatFailurePolicy`].
    #[tracing::instrument(name = "handle_chat", skip(self, message), fields(session = %session))]
    pub async fn handle_chat(&self, session: &str, message: &str) -> Result<String, RelayError> {
        self.conversations
            .append(session, Message::user(message))
            .await;

        // Snapshot so no session lock is held across the upstream call.
        let context = self.conversations.snapshot(session).await;
        let request = CompletionRequest {
            model: self.config.model.clone(),
            messages: context,
            max_tokens: None,
            temperature: None,
        };

        match retry_transient(self.retry_budget(), || self.backend.complete(&request)).await {
            Ok(response) => {
                self.conversations
                    .append(session, Message::assistant(response.content.clone()))
                    .await;
                info!(
                    backend = self.backend.name(),
                    reply_len = response.content.len(),
                    "chat turn relayed"
                );
                Ok(response.content)
            }
            Err(err) => {
                if self.config.chat_failure_policy == ChatFailurePolicy::RollbackUserMessage {
                    self.conversations.pop_last_user(session).await;
                }
                error!(backend = self.backend.name(), error = %err, "chat turn failed upstream");
                Err(RelayError::Upstream(err))
            }
        }
    }

    /// End a session: summarize the conversation, extract the diagnosis,
    /// forward both to the records backend, then reset the session.
    ///
    /// If the forward fails the session is NOT reset, so the data is still
    /// there for a retry.
    #[tracing::instrument(name = "handle_end_session", skip(self), fields(session = %session, user_id = %user_id))]
    pub async fn handle_end_session(
        &self,
        session: &str,
        user_id: &str,
    ) -> Result<SessionSummary, RelayError> {
        let context = self.conversations.snapshot(session).await;

        let mut messages = Vec::with_capacity(context.len() + 1);
        messages.push(Message::system(SUMMARY_SYSTEM_PROMPT));
        messages.extend(context);

        let request = CompletionRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: Some(self.config.summary_max_tokens),
            temperature: Some(self.config.summary_temperature),
        };

        let response = retry_transient(self.retry_budget(), || self.backend.complete(&request))
            .await
            .map_err(|err| {
                error!(backend = self.backend.name(), error = %err, "summarization failed upstream");
                RelayError::Upstream(err)
            })?;

        let summary = response.content.trim().to_string();
        let diagnosis = DiagnosisExtractor::extract(&summary);
        info!(summary_len = summary.len(), diagnosis = %diagnosis, "summary generated");

        let stored = StoredSummary {
            summary_content: summary.clone(),
            user_id: user_id.to_string(),
            diagnosis_content: diagnosis.clone(),
        };

        retry_transient(self.retry_budget(), || self.sink.store(&stored))
            .await
            .map_err(|err| {
                // Leave the conversation intact so nothing is lost on a
                // partial failure.
                error!(sink = self.sink.name(), error = %err, "summary forward failed");
                RelayError::StorageForward(err)
            })?;

        self.conversations.reset(session).await;
        info!(sink = self.sink.name(), "session ended and summary stored");

        Ok(SessionSummary { summary, diagnosis })
    }

    /// Probe the records backend's root endpoint. Diagnostic only; no
    /// state mutation and no retry.
    pub async fn check_storage(&self) -> Result<serde_json::Value, RelayError> {
        self.sink.health().await.map_err(|err| {
            error!(sink = self.sink.name(), error = %err, "records backend probe failed");
            RelayError::StorageForward(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use medirelay_types::error::StorageError;
    use medirelay_types::llm::{CompletionError, CompletionResponse, MessageRole};

    use crate::llm::CompletionBackend;
    use crate::storage::SummarySink;

    /// Backend that pops scripted outcomes and records received requests.
    struct ScriptedBackend {
        script: Mutex<VecDeque<Result<String, CompletionError>>>,
        requests: Arc<Mutex<Vec<CompletionRequest>>>,
    }

    impl ScriptedBackend {
        fn new(script: Vec<Result<String, CompletionError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl CompletionBackend for ScriptedBackend {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, CompletionError> {
            self.requests.lock().unwrap().push(request.clone());
            let outcome = self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .expect("scripted backend ran out of outcomes");
            outcome.map(|content| CompletionResponse {
                content,
                model: None,
                usage: None,
            })
        }
    }

    /// Sink that records stored summaries; optionally fails every store.
    struct RecordingSink {
        stored: Mutex<Vec<StoredSummary>>,
        fail_store: bool,
    }

    impl RecordingSink {
        fn new(fail_store: bool) -> Self {
            Self {
                stored: Mutex::new(Vec::new()),
                fail_store,
            }
        }
    }

    impl SummarySink for RecordingSink {
        fn name(&self) -> &str {
            "recording"
        }

        async fn store(&self, summary: &StoredSummary) -> Result<(), StorageError> {
            if self.fail_store {
                return Err(StorageError::Http {
                    status: 404,
                    body: "no such user".to_string(),
                });
            }
            self.stored.lock().unwrap().push(summary.clone());
            Ok(())
        }

        async fn health(&self) -> Result<serde_json::Value, StorageError> {
            Ok(serde_json::json!({"status": "ok"}))
        }
    }

    fn test_config() -> RelayConfig {
        RelayConfig {
            retry_max_elapsed_ms: 0,
            ..RelayConfig::default()
        }
    }

    fn relay_with(
        script: Vec<Result<String, CompletionError>>,
        fail_store: bool,
        config: RelayConfig,
    ) -> SessionRelay {
        SessionRelay::new(
            BoxCompletionBackend::new(ScriptedBackend::new(script)),
            BoxSummarySink::new(RecordingSink::new(fail_store)),
            config,
        )
    }

    fn upstream_400() -> CompletionError {
        CompletionError::Http {
            status: 400,
            body: "bad request".to_string(),
        }
    }

    #[tokio::test]
    async fn chat_turn_appends_user_and_assistant() {
        let relay = relay_with(vec![Ok("How long?".to_string())], false, test_config());

        let reply = relay.handle_chat("s1", "I have a headache").await.unwrap();
        assert_eq!(reply, "How long?");

        let log = relay.conversations().snapshot("s1").await;
        assert_eq!(log.len(), 3);
        assert_eq!(log[0].role, MessageRole::System);
        assert_eq!(log[1], Message::user("I have a headache"));
        assert_eq!(log[2], Message::assistant("How long?"));
    }

    #[tokio::test]
    async fn chat_failure_keeps_user_message_by_default() {
        let relay = relay_with(vec![Err(upstream_400())], false, test_config());

        let err = relay.handle_chat("s1", "hello").await.unwrap_err();
        assert!(matches!(err, RelayError::Upstream(_)));

        let log = relay.conversations().snapshot("s1").await;
        assert_eq!(log.len(), 2);
        assert_eq!(log[1], Message::user("hello"));
    }

    #[tokio::test]
    async fn chat_failure_rolls_back_user_message_when_configured() {
        let config = RelayConfig {
            chat_failure_policy: ChatFailurePolicy::RollbackUserMessage,
            ..test_config()
        };
        let relay = relay_with(vec![Err(upstream_400())], false, config);

        relay.handle_chat("s1", "hello").await.unwrap_err();
        assert_eq!(relay.conversations().len("s1").await, 1);
    }

    #[tokio::test]
    async fn end_session_stores_summary_and_resets() {
        let relay = relay_with(
            vec![
                Ok("Sure.".to_string()),
                Ok("Diagnosis: flu\nThe user reported fever and aches.".to_string()),
            ],
            false,
            test_config(),
        );

        relay.handle_chat("s1", "I feel feverish").await.unwrap();
        let summary = relay.handle_end_session("s1", "u-1").await.unwrap();
        assert_eq!(summary.diagnosis, "flu");
        assert!(summary.summary.starts_with("Diagnosis: flu"));

        // Reset back to the single system prompt.
        let log = relay.conversations().snapshot("s1").await;
        assert_eq!(log, vec![Message::system(TRIAGE_SYSTEM_PROMPT)]);
    }

    #[tokio::test]
    async fn end_session_prepends_summary_prompt_and_caps_generation() {
        let backend = ScriptedBackend::new(vec![Ok("Diagnosis: none".to_string())]);
        let requests = Arc::clone(&backend.requests);
        let relay = SessionRelay::new(
            BoxCompletionBackend::new(backend),
            BoxSummarySink::new(RecordingSink::new(false)),
            test_config(),
        );

        relay.handle_end_session("s1", "u-1").await.unwrap();

        let seen = requests.lock().unwrap();
        let request = &seen[0];
        assert_eq!(request.messages[0], Message::system(SUMMARY_SYSTEM_PROMPT));
        assert_eq!(request.messages[1], Message::system(TRIAGE_SYSTEM_PROMPT));
        assert_eq!(request.max_tokens, Some(150));
        assert_eq!(request.temperature, Some(0.3));
    }

    #[tokio::test]
    async fn storage_failure_leaves_conversation_intact() {
        let relay = relay_with(
            vec![
                Ok("Okay.".to_string()),
                Ok("Diagnosis: flu\nDetails.".to_string()),
            ],
            true,
            test_config(),
        );

        relay.handle_chat("s1", "I feel feverish").await.unwrap();
        let before = relay.conversations().snapshot("s1").await;

        let err = relay.handle_end_session("s1", "u-1").await.unwrap_err();
        assert!(matches!(err, RelayError::StorageForward(_)));
        assert_eq!(relay.conversations().snapshot("s1").await, before);
    }

    #[tokio::test]
    async fn upstream_failure_during_end_session_leaves_conversation_intact() {
        let relay = relay_with(
            vec![Ok("Okay.".to_string()), Err(upstream_400())],
            false,
            test_config(),
        );

        relay.handle_chat("s1", "hi").await.unwrap();
        let before = relay.conversations().snapshot("s1").await;

        let err = relay.handle_end_session("s1", "u-1").await.unwrap_err();
        assert!(matches!(err, RelayError::Upstream(_)));
        assert_eq!(relay.conversations().snapshot("s1").await, before);
    }

    #[tokio::test]
    async fn sessions_do_not_interleave() {
        let relay = relay_with(
            vec![Ok("a-reply".to_string()), Ok("b-reply".to_string())],
            false,
            test_config(),
        );

        relay.handle_chat("alice", "a-question").await.unwrap();
        relay.handle_chat("bob", "b-question").await.unwrap();

        let alice = relay.conversations().snapshot("alice").await;
        let bob = relay.conversations().snapshot("bob").await;
        assert_eq!(alice.len(), 3);
        assert_eq!(bob.len(), 3);
        assert_eq!(alice[1].content, "a-question");
        assert_eq!(bob[1].content, "b-question");
    }

    #[tokio::test]
    async fn check_storage_relays_backend_answer() {
        let relay = relay_with(vec![], false, test_config());
        let value = relay.check_storage().await.unwrap();
        assert_eq!(value["status"], "ok");
    }
}
