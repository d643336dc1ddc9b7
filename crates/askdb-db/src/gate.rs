//! Statement gate and splitter.
//!
//! A raw submission is authorized as a whole, split into `;`-terminated
//! statements, and each statement is authorized again before execution.
//! Authorization is layered, first failure wins:
//!
//! 1. verb allow-list (read statements only),
//! 2. sensitive-identifier scan over the statement text,
//! 3. wildcard-select table scan (one schema lookup per `select *`).
//!
//! Splitting is purely lexical: it does not understand quoted strings, so a
//! literal `;` inside a string constant over-splits. Known limitation, kept
//! deliberately and pinned by test.

use askdb_core::policy::SensitivePolicy;
use askdb_core::result::{ErrorKind, StatementResult};

use crate::errors::Result;

/// Leading verbs a statement may carry, lower-cased.
pub const ALLOWED_VERBS: [&str; 5] = ["select", "show", "describe", "desc", "explain"];

/// Column lookup used by the wildcard-select table scan.
///
/// The engine implements this over its live connection; tests substitute
/// fixed tables or failing lookups.
pub trait ColumnLookup {
    /// Column names of the given table.
    fn table_columns(&self, table: &str) -> Result<Vec<String>>;
}

/// Split a raw submission into `;`-terminated statements.
///
/// Whitespace-only fragments are discarded; each retained fragment gets its
/// `;` back.
#[must_use]
pub fn split_statements(raw: &str) -> Vec<String> {
    raw.trim()
        .split(';')
        .map(str::trim)
        .filter(|frag| !frag.is_empty())
        .map(|frag| format!("{frag};"))
        .collect()
}

/// The authorization step deciding whether a statement may execute.
pub struct StatementGate<'a> {
    policy: &'a SensitivePolicy,
}

impl<'a> StatementGate<'a> {
    /// Create a gate over the given policy.
    #[must_use]
    pub fn new(policy: &'a SensitivePolicy) -> Self {
        Self { policy }
    }

    /// Authorize one statement (or a whole batch treated as text).
    ///
    /// Returns the rejection as a ready-made [`StatementResult::Error`] so
    /// callers can slot it straight into a result set.
    pub fn authorize(
        &self,
        sql: &str,
        lookup: &dyn ColumnLookup,
    ) -> std::result::Result<(), StatementResult> {
        let sql = sql.trim();
        let sql_lower = sql.to_lowercase();

        // 1. Verb allow-list.
        if !ALLOWED_VERBS.iter().any(|verb| sql_lower.starts_with(verb)) {
            return Err(StatementResult::Error {
                message: "security policy: only read statements (SELECT, SHOW, DESCRIBE, \
                          EXPLAIN) may run; this statement type is not allowed"
                    .to_string(),
                sql: sql.to_string(),
                kind: ErrorKind::Restricted,
            });
        }

        // 2. Sensitive-identifier scan.
        if let Some(field) = self.policy.match_statement(&sql_lower) {
            return Err(StatementResult::Error {
                message: format!(
                    "security policy: access to sensitive field '{field}' is forbidden"
                ),
                sql: sql.to_string(),
                kind: ErrorKind::SensitiveField,
            });
        }

        // 3. Wildcard-select table scan.
        if let Some((table, column)) = self.wildcard_scan(&sql_lower, lookup) {
            return Err(StatementResult::Error {
                message: format!(
                    "security policy: table '{table}' contains sensitive column \
                     '{column}', access forbidden"
                ),
                sql: sql.to_string(),
                kind: ErrorKind::SensitiveTable,
            });
        }

        Ok(())
    }

    /// For `select *` statements, check the target table's columns.
    ///
    /// Returns the offending `(table, column)` pair, or `None` when the
    /// statement is not a wildcard select, the table is clean, or the
    /// lookup itself fails. Introspection failure is fail-open by policy:
    /// the statement still faces the driver, which reports its own error.
    fn wildcard_scan(
        &self,
        sql_lower: &str,
        lookup: &dyn ColumnLookup,
    ) -> Option<(String, String)> {
        let tokens: Vec<&str> = sql_lower.split_whitespace().collect();
        if !(tokens.contains(&"select") && tokens.contains(&"*")) {
            return None;
        }

        let from_idx = tokens.iter().position(|t| *t == "from")?;
        let table = tokens.get(from_idx + 1)?.trim_end_matches(';').trim();
        if table.is_empty() {
            return None;
        }

        let columns = match lookup.table_columns(table) {
            Ok(cols) => cols,
            Err(e) => {
                tracing::debug!(table, error = %e, "wildcard table lookup failed, allowing");
                return None;
            }
        };

        for column in columns {
            if let Some(field) = self.policy.match_column(&column) {
                tracing::debug!(table, column = %column, field, "wildcard select blocked");
                return Some((table.to_string(), column));
            }
        }
        None
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
