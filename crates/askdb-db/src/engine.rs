//! The database engine façade.
//!
//! [`DbEngine`] owns the process's single connection and the sensitive
//! policy, and wires the gate, splitter, and execution adapter together.
//! One `parking_lot::Mutex` serializes every database operation, so no two
//! are ever in flight concurrently on the shared connection.

use askdb_core::policy::SensitivePolicy;
use askdb_core::result::{BatchResult, IndexedResult, QueryOutcome};
use parking_lot::Mutex;
use rusqlite::Connection;

use crate::connection;
use crate::errors::Result;
use crate::execute::execute_statement;
use crate::gate::{ColumnLookup, StatementGate, split_statements};
use crate::introspect::{self, SchemaDescription};

/// Gated SQL execution engine over a single `SQLite` connection.
pub struct DbEngine {
    conn: Mutex<Connection>,
    policy: SensitivePolicy,
}

/// Column lookup over a live connection, used by the wildcard-select scan.
struct LiveLookup<'a> {
    conn: &'a Connection,
}

impl ColumnLookup for LiveLookup<'_> {
    fn table_columns(&self, table: &str) -> Result<Vec<String>> {
        let info = introspect::table_info(self.conn, table)?;
        Ok(info.columns.into_iter().map(|c| c.name).collect())
    }
}

impl DbEngine {
    /// Open a file-backed engine with the default policy.
    pub fn open(path: &str) -> Result<Self> {
        Ok(Self::from_connection(
            connection::open_file(path)?,
            SensitivePolicy::default(),
        ))
    }

    /// Open an in-memory engine with the default policy (for testing).
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::from_connection(
            connection::open_in_memory()?,
            SensitivePolicy::default(),
        ))
    }

    /// Build an engine from an existing connection and policy.
    #[must_use]
    pub fn from_connection(conn: Connection, policy: SensitivePolicy) -> Self {
        Self {
            conn: Mutex::new(conn),
            policy,
        }
    }

    /// Replace the sensitive policy.
    #[must_use]
    pub fn with_policy(mut self, policy: SensitivePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Gate and execute a raw SQL submission.
    ///
    /// The batch as a whole is authorized first, then split. A single
    /// statement returns a bare [`askdb_core::result::StatementResult`];
    /// two or more return a [`BatchResult`] in which every statement is
    /// independently gated and executed. One statement's failure never
    /// halts its siblings.
    pub fn execute_sql(&self, raw: &str) -> QueryOutcome {
        let conn = self.conn.lock();
        let lookup = LiveLookup { conn: &conn };
        let gate = StatementGate::new(&self.policy);

        let raw = raw.trim();
        if let Err(rejection) = gate.authorize(raw, &lookup) {
            tracing::debug!(sql = raw, "batch rejected by gate");
            return QueryOutcome::Statement(rejection);
        }

        let statements = split_statements(raw);
        if statements.len() == 1 {
            return QueryOutcome::Statement(execute_statement(&conn, &statements[0]));
        }

        let results = statements
            .into_iter()
            .enumerate()
            .map(|(idx, sql)| {
                let result = match gate.authorize(&sql, &lookup) {
                    Ok(()) => execute_statement(&conn, &sql),
                    Err(rejection) => rejection,
                };
                IndexedResult {
                    statement_index: idx + 1,
                    sql,
                    result,
                }
            })
            .collect();

        QueryOutcome::Batch(BatchResult::from_results(results))
    }

    /// Snapshot schema metadata for all user tables, or a subset.
    pub fn schema(&self, tables: Option<&[String]>) -> Result<SchemaDescription> {
        let conn = self.conn.lock();
        introspect::snapshot(&conn, tables)
    }

    /// Rendered schema text for all user tables, or a subset.
    pub fn schema_text(&self, tables: Option<&[String]>) -> Result<String> {
        Ok(introspect::render_schema_text(&self.schema(tables)?))
    }

    /// Column names of one table.
    pub fn table_columns(&self, table: &str) -> Result<Vec<String>> {
        let conn = self.conn.lock();
        LiveLookup { conn: &conn }.table_columns(table)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
