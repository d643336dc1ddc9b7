//! Request and response types for the query service.

use askdb_core::ids::SessionId;
use askdb_core::result::QueryOutcome;
use serde::{Deserialize, Serialize};

/// A natural-language query request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The natural-language query.
    pub query: String,
    /// Caller tag recorded in the journal.
    pub user_info: String,
    /// Optional session scoping the conversational history.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub session_id: Option<SessionId>,
}

impl QueryRequest {
    /// Request without a session.
    #[must_use]
    pub fn new(query: impl Into<String>, user_info: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            user_info: user_info.into(),
            session_id: None,
        }
    }

    /// Attach a session id.
    #[must_use]
    pub fn with_session(mut self, session_id: SessionId) -> Self {
        self.session_id = Some(session_id);
        self
    }
}

/// A processed query response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    /// The query as submitted.
    pub original_query: String,
    /// The SQL the model produced, post fence-stripping.
    pub generated_sql: String,
    /// Gate/execution outcome.
    pub result: QueryOutcome,
    /// Wall-clock request time in seconds.
    pub execution_time: f64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builder() {
        let request = QueryRequest::new("list students", "cli_user")
            .with_session(SessionId::from("s1"));
        assert_eq!(request.query, "list students");
        assert_eq!(request.session_id.as_ref().unwrap().as_str(), "s1");
    }

    #[test]
    fn request_serde_omits_missing_session() {
        let json = serde_json::to_value(QueryRequest::new("q", "u")).unwrap();
        assert!(json.get("session_id").is_none());
    }
}
