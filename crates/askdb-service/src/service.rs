//! The request orchestrator.
//!
//! [`QueryService`] sequences one request end to end: snapshot the schema,
//! build the prompt (advancing conversation state), obtain SQL from the
//! generator, gate and execute it, journal the outcome, and return a typed
//! response. Nothing here raises past the request boundary: rejected or
//! failed statements come back inside the response, and pre-execution
//! failures come back as [`crate::errors::ServiceError`] values.

use std::sync::Arc;
use std::time::Instant;

use askdb_core::ids::SessionId;
use askdb_core::text::strip_code_fences;
use askdb_db::{DbEngine, SchemaDescription};
use askdb_journal::{ErrorRecord, JournalStats, QueryJournal, QueryRecord};
use askdb_llm::context::SessionHistory;
use askdb_llm::{ConversationStore, SqlGenerator, build_prompt};
use tracing::{debug, info, warn};

use crate::errors::{Result, ServiceError};
use crate::types::{QueryRequest, QueryResponse};

/// Orchestrates schema snapshot, generation, gated execution, and journaling.
pub struct QueryService {
    engine: DbEngine,
    generator: Arc<dyn SqlGenerator>,
    sessions: ConversationStore,
    journal: QueryJournal,
}

impl std::fmt::Debug for QueryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryService").finish_non_exhaustive()
    }
}

impl QueryService {
    /// Create a service over its collaborators.
    #[must_use]
    pub fn new(engine: DbEngine, generator: Arc<dyn SqlGenerator>, journal: QueryJournal) -> Self {
        Self {
            engine,
            generator,
            sessions: ConversationStore::new(),
            journal,
        }
    }

    /// Process one natural-language query.
    pub async fn query(&self, request: QueryRequest) -> Result<QueryResponse> {
        let start = Instant::now();

        if request.query.trim().is_empty() {
            return Err(ServiceError::EmptyQuery);
        }

        // 1. Fresh schema snapshot per request; never cached across requests.
        let schema_text = self.engine.schema_text(None)?;

        // 2. Conversation state: the history read here feeds the prompt;
        //    the schema text is cached per session for backfill semantics.
        let history = match &request.session_id {
            Some(session) => self.sessions.touch(session, &schema_text),
            None => SessionHistory::default(),
        };

        // 3. Obtain SQL. A generation failure ends the request here: no
        //    error string ever reaches the gate pretending to be SQL.
        let prompt = build_prompt(&request.query, &schema_text, &history.pairs);
        debug!(
            model = self.generator.model(),
            history_pairs = history.pairs.len(),
            "requesting sql generation"
        );
        let sql = match self.generator.complete(&prompt).await {
            Ok(raw) => strip_code_fences(&raw),
            Err(e) => {
                let execution_time = start.elapsed().as_secs_f64();
                warn!(error = %e, category = e.category(), "sql generation failed");
                self.journal_or_warn(&QueryRecord::failure(
                    &request.query,
                    "",
                    &e.to_string(),
                    execution_time,
                    &request.user_info,
                ));
                return Err(ServiceError::Generator(e));
            }
        };

        if let Some(session) = &request.session_id {
            self.sessions.record(session, &request.query, &sql);
        }

        // 4. Gate and execute.
        let result = self.engine.execute_sql(&sql);
        let execution_time = start.elapsed().as_secs_f64();

        // 5. Journal. A journal failure never fails the request.
        self.journal_or_warn(&QueryRecord::from_outcome(
            &request.query,
            &sql,
            &result,
            execution_time,
            &request.user_info,
        ));

        info!(
            user = %request.user_info,
            result_type = result.type_str(),
            execution_time,
            "query processed"
        );

        Ok(QueryResponse {
            original_query: request.query,
            generated_sql: sql,
            result,
            execution_time,
        })
    }

    /// Structured schema snapshot for all user tables, or a subset.
    pub fn schema(&self, tables: Option<&[String]>) -> Result<SchemaDescription> {
        Ok(self.engine.schema(tables)?)
    }

    /// Rendered schema text for all user tables, or a subset.
    pub fn schema_text(&self, tables: Option<&[String]>) -> Result<String> {
        Ok(self.engine.schema_text(tables)?)
    }

    /// Running journal statistics.
    #[must_use]
    pub fn stats(&self) -> JournalStats {
        self.journal.get_stats()
    }

    /// Most recent journaled requests, newest first.
    #[must_use]
    pub fn recent(&self, n: usize) -> Vec<QueryRecord> {
        self.journal.get_recent(n)
    }

    /// Most recent journaled failures, newest first.
    #[must_use]
    pub fn errors(&self, n: usize) -> Vec<ErrorRecord> {
        self.journal.get_errors(n)
    }

    /// Drop one session's history, or all sessions when `None`.
    pub fn clear_session(&self, session: Option<&SessionId>) {
        self.sessions.clear(session);
    }

    fn journal_or_warn(&self, record: &QueryRecord) {
        if let Err(e) = self.journal.log_query(record) {
            warn!(error = %e, "journal write failed");
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use askdb_core::policy::SensitivePolicy;
    use askdb_core::result::{ErrorKind, QueryOutcome, RowsetKind, StatementResult};
    use askdb_llm::{GeneratorError, GeneratorResult};
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// Canned generator that records the prompts it was given.
    struct FixedGenerator {
        responses: Mutex<Vec<GeneratorResult<String>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl FixedGenerator {
        fn new(responses: Vec<GeneratorResult<String>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn last_prompt(&self) -> String {
            self.prompts.lock().last().cloned().unwrap_or_default()
        }
    }

    #[async_trait]
    impl SqlGenerator for FixedGenerator {
        fn model(&self) -> &str {
            "fixed"
        }

        async fn complete(&self, prompt: &str) -> GeneratorResult<String> {
            self.prompts.lock().push(prompt.to_string());
            self.responses.lock().remove(0)
        }
    }

    fn service_with(
        generator: Arc<FixedGenerator>,
    ) -> (QueryService, tempfile::TempDir) {
        let conn = rusqlite_seeded();
        let engine = DbEngine::from_connection(conn, SensitivePolicy::default());
        let dir = tempfile::tempdir().unwrap();
        let journal = QueryJournal::open(dir.path()).unwrap();
        (QueryService::new(engine, generator, journal), dir)
    }

    fn rusqlite_seeded() -> rusqlite::Connection {
        let conn = askdb_db::connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE student (id INTEGER PRIMARY KEY, name TEXT NOT NULL, age INTEGER);
             INSERT INTO student (name, age) VALUES ('ada', 36), ('alan', 41);",
        )
        .unwrap();
        conn
    }

    #[tokio::test]
    async fn query_end_to_end_returns_rowset() {
        let generator = FixedGenerator::new(vec![Ok("SELECT name FROM student;".into())]);
        let (service, _dir) = service_with(generator.clone());

        let response = service
            .query(QueryRequest::new("list student names", "test"))
            .await
            .unwrap();

        assert_eq!(response.generated_sql, "SELECT name FROM student;");
        assert_matches!(
            response.result,
            QueryOutcome::Statement(StatementResult::Rowset { kind: RowsetKind::Select, row_count: 2, .. })
        );
        // The prompt carried the fresh schema snapshot.
        assert!(generator.last_prompt().contains("Table: student"));

        // Journaled as a success.
        let stats = service.stats();
        assert_eq!(stats.total_queries, 1);
        assert_eq!(stats.successful_queries, 1);
    }

    #[tokio::test]
    async fn fenced_sql_is_stripped_before_gating() {
        let generator =
            FixedGenerator::new(vec![Ok("```sql\nSELECT name FROM student;\n```".into())]);
        let (service, _dir) = service_with(generator);

        let response = service
            .query(QueryRequest::new("list names", "test"))
            .await
            .unwrap();
        assert_eq!(response.generated_sql, "SELECT name FROM student;");
        assert!(!response.result.is_error());
    }

    #[tokio::test]
    async fn sensitive_query_rejected_inside_response() {
        let generator = FixedGenerator::new(vec![Ok("select password from student;".into())]);
        let (service, _dir) = service_with(generator);

        let response = service
            .query(QueryRequest::new("show me passwords", "test"))
            .await
            .unwrap();
        assert_matches!(
            response.result,
            QueryOutcome::Statement(StatementResult::Error { kind: ErrorKind::SensitiveField, .. })
        );

        // Journaled as a failure.
        assert_eq!(service.stats().failed_queries, 1);
        assert_eq!(service.errors(10).len(), 1);
    }

    #[tokio::test]
    async fn generation_failure_is_typed_and_journaled() {
        let generator = FixedGenerator::new(vec![Err(GeneratorError::MissingOutput)]);
        let (service, _dir) = service_with(generator);

        let result = service.query(QueryRequest::new("anything", "test")).await;
        assert_matches!(result, Err(ServiceError::Generator(GeneratorError::MissingOutput)));

        // The failure was journaled with no SQL attached.
        let errors = service.errors(10);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].generated_sql, "");
    }

    #[tokio::test]
    async fn empty_query_rejected_before_generation() {
        let generator = FixedGenerator::new(vec![]);
        let (service, _dir) = service_with(generator.clone());

        let result = service.query(QueryRequest::new("   ", "test")).await;
        assert_matches!(result, Err(ServiceError::EmptyQuery));
        assert!(generator.prompts.lock().is_empty());
    }

    #[tokio::test]
    async fn session_history_feeds_follow_up_prompts() {
        let generator = FixedGenerator::new(vec![
            Ok("SELECT name, age FROM student;".into()),
            Ok("SELECT name, age FROM student WHERE age > 40;".into()),
        ]);
        let (service, _dir) = service_with(generator.clone());
        let session = SessionId::from("repl-1");

        let _ = service
            .query(QueryRequest::new("list students", "test").with_session(session.clone()))
            .await
            .unwrap();
        // First prompt: no history yet.
        assert!(!generator.last_prompt().contains("[Conversation context]"));

        let _ = service
            .query(QueryRequest::new("only the older ones", "test").with_session(session))
            .await
            .unwrap();
        let prompt = generator.last_prompt();
        assert!(prompt.contains("[Conversation context]"));
        assert!(prompt.contains("Query 1: list students"));
        assert!(prompt.contains("Generated SQL: SELECT name, age FROM student;"));
    }

    #[tokio::test]
    async fn new_session_starts_without_history() {
        let generator = FixedGenerator::new(vec![
            Ok("SELECT 1;".into()),
            Ok("SELECT 2;".into()),
        ]);
        let (service, _dir) = service_with(generator.clone());

        let _ = service
            .query(QueryRequest::new("first", "test").with_session(SessionId::from("a")))
            .await
            .unwrap();
        let _ = service
            .query(QueryRequest::new("second", "test").with_session(SessionId::from("b")))
            .await
            .unwrap();

        // Session b saw none of session a's history.
        assert!(!generator.last_prompt().contains("[Conversation context]"));
    }

    #[tokio::test]
    async fn sessionless_query_does_not_advance_history() {
        let generator = FixedGenerator::new(vec![
            Ok("SELECT 1;".into()),
            Ok("SELECT 2;".into()),
        ]);
        let (service, _dir) = service_with(generator.clone());

        let _ = service.query(QueryRequest::new("first", "test")).await.unwrap();
        let _ = service.query(QueryRequest::new("second", "test")).await.unwrap();
        assert!(!generator.last_prompt().contains("[Conversation context]"));
    }

    #[tokio::test]
    async fn batch_response_collects_both_statements() {
        let generator = FixedGenerator::new(vec![Ok("select 1; select 2;".into())]);
        let (service, _dir) = service_with(generator);

        let response = service
            .query(QueryRequest::new("two numbers", "test"))
            .await
            .unwrap();
        assert_matches!(response.result, QueryOutcome::Batch(batch) => {
            assert_eq!(batch.total_statements, 2);
            assert_eq!(batch.results[1].statement_index, 2);
        });
    }

    #[test]
    fn schema_text_exposed() {
        let generator = FixedGenerator::new(vec![]);
        let (service, _dir) = service_with(generator);
        let text = service.schema_text(None).unwrap();
        assert!(text.contains("Table: student"));
    }

    #[test]
    fn schema_unknown_table_is_error() {
        let generator = FixedGenerator::new(vec![]);
        let (service, _dir) = service_with(generator);
        let result = service.schema(Some(&["ghosts".to_string()]));
        assert_matches!(result, Err(ServiceError::Db(_)));
    }
}
