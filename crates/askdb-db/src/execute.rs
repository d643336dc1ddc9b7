//! Execution adapter.
//!
//! Runs one pre-authorized statement on the live connection and normalizes
//! the outcome into a [`StatementResult`]. The adapter never lets a driver
//! error escape its boundary; every path returns a result value.

use askdb_core::result::{ErrorKind, RowsetKind, SqlValue, StatementResult};
use rusqlite::Connection;
use rusqlite::types::ValueRef;

use crate::dialect;

/// Classify a statement by its leading verb.
///
/// Anything that reached the adapter has already passed the verb allow
/// list, so unknown leaders fall back to the generic `query` kind.
#[must_use]
pub fn classify(sql: &str) -> RowsetKind {
    let lower = sql.trim().to_lowercase();
    if lower.starts_with("select") {
        RowsetKind::Select
    } else if lower.starts_with("show") {
        RowsetKind::Show
    } else if lower.starts_with("describe") || lower.starts_with("desc") {
        RowsetKind::Describe
    } else if lower.starts_with("explain") {
        RowsetKind::Explain
    } else {
        RowsetKind::Query
    }
}

/// Execute one authorized statement and collect its rowset.
///
/// The statement is passed through the dialect shim first; classification
/// uses the original text so a rewritten `SHOW TABLES` still reports as
/// `show`.
#[must_use]
pub fn execute_statement(conn: &Connection, sql: &str) -> StatementResult {
    let kind = classify(sql);
    let rewritten = dialect::rewrite(sql);

    let mut stmt = match conn.prepare(&rewritten) {
        Ok(stmt) => stmt,
        Err(e) => return execution_error(sql, &e),
    };

    let columns: Vec<String> = stmt
        .column_names()
        .iter()
        .map(|name| (*name).to_string())
        .collect();
    let column_count = columns.len();

    let mut rows = match stmt.query([]) {
        Ok(rows) => rows,
        Err(e) => return execution_error(sql, &e),
    };

    let mut data: Vec<Vec<SqlValue>> = Vec::new();
    loop {
        match rows.next() {
            Ok(Some(row)) => {
                let mut values = Vec::with_capacity(column_count);
                for idx in 0..column_count {
                    match row.get_ref(idx) {
                        Ok(value) => values.push(to_sql_value(value)),
                        Err(e) => return execution_error(sql, &e),
                    }
                }
                data.push(values);
            }
            Ok(None) => break,
            Err(e) => return execution_error(sql, &e),
        }
    }

    let row_count = data.len();
    StatementResult::Rowset {
        kind,
        columns,
        rows: data,
        row_count,
    }
}

fn to_sql_value(value: ValueRef<'_>) -> SqlValue {
    match value {
        ValueRef::Null => SqlValue::Null,
        ValueRef::Integer(n) => SqlValue::Integer(n),
        ValueRef::Real(x) => SqlValue::Real(x),
        ValueRef::Text(bytes) => SqlValue::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => SqlValue::Blob(bytes.to_vec()),
    }
}

fn execution_error(sql: &str, err: &rusqlite::Error) -> StatementResult {
    tracing::debug!(sql, error = %err, "statement execution failed");
    StatementResult::Error {
        message: format!("sql execution failed: {err}"),
        sql: sql.to_string(),
        kind: ErrorKind::Execution,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
