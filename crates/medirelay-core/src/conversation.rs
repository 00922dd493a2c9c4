//! Session-keyed conversation store.
//!
//! Each session owns its own ordered message log behind its own async
//! mutex, so concurrent requests for different sessions never interleave
//! into the same history. Entries are created lazily on first touch with
//! the fixed initial system prompt as their single element.
//!
//! Callers snapshot before any upstream call; a session lock is never held
//! across network I/O.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use medirelay_types::llm::{Message, MessageRole};

/// Session-keyed store of ordered, role-tagged message logs.
///
/// Invariants per session:
/// - the first element is always the fixed initial system prompt;
/// - the log never exceeds `max_messages` (when non-zero); the oldest
///   non-system messages are evicted first.
pub struct ConversationStore {
    system_prompt: String,
    max_messages: usize,
    sessions: DashMap<String, Arc<Mutex<Vec<Message>>>>,
}

impl ConversationStore {
    /// Create a store whose sessions start from `system_prompt`.
    ///
    /// `max_messages` caps each session's log (zero disables the cap).
    pub fn new(system_prompt: impl Into<String>, max_messages: usize) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            max_messages,
            sessions: DashMap::new(),
        }
    }

    /// The fixed initial system prompt.
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Get or lazily create the log for a session.
    fn entry(&self, session: &str) -> Arc<Mutex<Vec<Message>>> {
        self.sessions
            .entry(session.to_string())
            .or_insert_with(|| {
                Arc::new(Mutex::new(vec![Message::system(self.system_prompt.clone())]))
            })
            .clone()
    }

    /// Append a message to a session's log, evicting the oldest non-system
    /// messages if the window cap is exceeded.
    pub async fn append(&self, session: &str, message: Message) {
        let entry = self.entry(session);
        let mut log = entry.lock().await;
        log.push(message);

        if self.max_messages > 0 {
            while log.len() > self.max_messages {
                // Index 0 is the initial system prompt; it never counts
                // against eviction.
                let evicted = log.remove(1);
                tracing::debug!(
                    session = %session,
                    role = %evicted.role,
                    "history window full, evicted oldest message"
                );
            }
        }
    }

    /// Defensive copy of a session's current sequence, for use as model
    /// context across an async upstream call.
    pub async fn snapshot(&self, session: &str) -> Vec<Message> {
        let entry = self.entry(session);
        let log = entry.lock().await;
        log.clone()
    }

    /// Replace a session's log with exactly one system message equal to the
    /// fixed initial prompt.
    pub async fn reset(&self, session: &str) {
        let entry = self.entry(session);
        let mut log = entry.lock().await;
        log.clear();
        log.push(Message::system(self.system_prompt.clone()));
    }

    /// Remove the trailing user message, if the log ends with one.
    ///
    /// Rollback support for [`ChatFailurePolicy::RollbackUserMessage`];
    /// returns whether a message was removed.
    ///
    /// [`ChatFailurePolicy::RollbackUserMessage`]:
    /// medirelay_types::config::ChatFailurePolicy::RollbackUserMessage
    pub async fn pop_last_user(&self, session: &str) -> bool {
        let entry = self.entry(session);
        let mut log = entry.lock().await;
        if log.last().is_some_and(|m| m.role == MessageRole::User) {
            log.pop();
            true
        } else {
            false
        }
    }

    /// Current length of a session's log.
    pub async fn len(&self, session: &str) -> usize {
        let entry = self.entry(session);
        let log = entry.lock().await;
        log.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROMPT: &str = "You are a test assistant.";

    fn store() -> ConversationStore {
        ConversationStore::new(PROMPT, 0)
    }

    #[tokio::test]
    async fn new_session_starts_with_system_prompt() {
        let store = store();
        let log = store.snapshot("s1").await;
        assert_eq!(log, vec![Message::system(PROMPT)]);
    }

    #[tokio::test]
    async fn length_is_one_plus_two_per_turn() {
        let store = store();
        for n in 1..=4u32 {
            store.append("s1", Message::user(format!("q{n}"))).await;
            store.append("s1", Message::assistant(format!("a{n}"))).await;
            assert_eq!(store.len("s1").await, 1 + 2 * n as usize);
        }
    }

    #[tokio::test]
    async fn reset_restores_single_system_message() {
        let store = store();
        store.append("s1", Message::user("hello")).await;
        store.append("s1", Message::assistant("hi")).await;
        store.reset("s1").await;
        assert_eq!(store.snapshot("s1").await, vec![Message::system(PROMPT)]);
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let store = store();
        store.append("alice", Message::user("a")).await;
        store.append("bob", Message::user("b")).await;
        let alice = store.snapshot("alice").await;
        let bob = store.snapshot("bob").await;
        assert_eq!(alice[1].content, "a");
        assert_eq!(bob[1].content, "b");
        assert_eq!(alice.len(), 2);
        assert_eq!(bob.len(), 2);
    }

    #[tokio::test]
    async fn window_evicts_oldest_but_keeps_system_prompt() {
        let store = ConversationStore::new(PROMPT, 5);
        for n in 0..10 {
            store.append("s1", Message::user(format!("m{n}"))).await;
        }
        let log = store.snapshot("s1").await;
        assert_eq!(log.len(), 5);
        assert_eq!(log[0], Message::system(PROMPT));
        // Oldest survivors are the most recent four.
        assert_eq!(log[1].content, "m6");
        assert_eq!(log[4].content, "m9");
    }

    #[tokio::test]
    async fn pop_last_user_removes_only_trailing_user_message() {
        let store = store();
        store.append("s1", Message::user("q")).await;
        assert!(store.pop_last_user("s1").await);
        assert_eq!(store.len("s1").await, 1);

        store.append("s1", Message::user("q")).await;
        store.append("s1", Message::assistant("a")).await;
        assert!(!store.pop_last_user("s1").await);
        assert_eq!(store.len("s1").await, 3);
    }
}
