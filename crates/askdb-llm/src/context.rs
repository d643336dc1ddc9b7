//! Per-session conversation history.
//!
//! [`ConversationStore`] is an explicit mapping from session id to a
//! bounded history record, owned by the orchestrator and read by the
//! prompt builder. Sessions are independent: interleaved requests from
//! different sessions never touch each other's history.
//!
//! History is process-local and never persisted.

use std::collections::HashMap;

use askdb_core::ids::SessionId;
use parking_lot::Mutex;

/// Most `(query, sql)` pairs a session retains; oldest evicted first.
pub const MAX_HISTORY_PAIRS: usize = 5;

/// One session's conversational state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionHistory {
    /// Most recent `(query, sql)` pairs, oldest first.
    pub pairs: Vec<(String, String)>,
    /// Schema text cached at first sight; backfilled only when empty.
    pub schema_text: String,
}

/// Session-keyed conversation state.
#[derive(Debug, Default)]
pub struct ConversationStore {
    sessions: Mutex<HashMap<SessionId, SessionHistory>>,
}

impl ConversationStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get-or-create a session record and return a snapshot of it.
    ///
    /// A first-seen session starts with the given schema text and an empty
    /// history. An existing session keeps its history; its schema text is
    /// backfilled only if it was previously empty.
    pub fn touch(&self, session: &SessionId, schema_text: &str) -> SessionHistory {
        let mut sessions = self.sessions.lock();
        let entry = sessions.entry(session.clone()).or_default();
        if entry.schema_text.is_empty() && !schema_text.is_empty() {
            entry.schema_text = schema_text.to_string();
        }
        entry.clone()
    }

    /// Append a `(query, sql)` pair to a session's history.
    ///
    /// Keeps the most recent [`MAX_HISTORY_PAIRS`] pairs, dropping the
    /// oldest beyond that.
    pub fn record(&self, session: &SessionId, query: &str, sql: &str) {
        let mut sessions = self.sessions.lock();
        let entry = sessions.entry(session.clone()).or_default();
        entry.pairs.push((query.to_string(), sql.to_string()));
        if entry.pairs.len() > MAX_HISTORY_PAIRS {
            let excess = entry.pairs.len() - MAX_HISTORY_PAIRS;
            let _ = entry.pairs.drain(..excess);
        }
    }

    /// Snapshot a session's history, if the session exists.
    pub fn history(&self, session: &SessionId) -> Option<SessionHistory> {
        self.sessions.lock().get(session).cloned()
    }

    /// Drop one session, or all sessions when `None`.
    pub fn clear(&self, session: Option<&SessionId>) {
        let mut sessions = self.sessions.lock();
        match session {
            Some(id) => {
                let _ = sessions.remove(id);
            }
            None => sessions.clear(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
