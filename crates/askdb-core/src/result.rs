//! Result types for gated SQL execution.
//!
//! Every statement submitted to the engine produces a [`StatementResult`];
//! a multi-statement batch produces a [`BatchResult`] collecting one
//! indexed result per statement. [`QueryOutcome`] is the union the engine
//! returns: a single statement stays a bare result, it is never wrapped in
//! a one-element batch.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar value carried in a rowset, taken verbatim from the driver.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SqlValue {
    /// SQL NULL.
    Null,
    /// 64-bit integer.
    Integer(i64),
    /// 64-bit float.
    Real(f64),
    /// UTF-8 text.
    Text(String),
    /// Raw bytes.
    Blob(Vec<u8>),
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Real(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
            Self::Blob(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

/// Why the gate rejected a statement, or how execution failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Statement verb is not on the read-only allow list.
    Restricted,
    /// A forbidden identifier is referenced directly.
    SensitiveField,
    /// A wildcard select targets a table carrying a forbidden column.
    SensitiveTable,
    /// The driver reported a failure while executing.
    Execution,
}

impl ErrorKind {
    /// Stable string form used in journals and display.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Restricted => "restricted",
            Self::SensitiveField => "sensitive_field",
            Self::SensitiveTable => "sensitive_table",
            Self::Execution => "execution",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a rowset by the statement's leading verb.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowsetKind {
    /// `SELECT ...`
    Select,
    /// `SHOW ...`
    Show,
    /// `DESCRIBE ...` / `DESC ...`
    Describe,
    /// `EXPLAIN ...`
    Explain,
    /// Any other statement that passed the verb allow list.
    Query,
}

impl RowsetKind {
    /// Stable string form used in journals and display.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Show => "show",
            Self::Describe => "describe",
            Self::Explain => "explain",
            Self::Query => "query",
        }
    }
}

impl fmt::Display for RowsetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of gating and executing one statement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StatementResult {
    /// The statement was rejected or failed.
    Error {
        /// Human-readable reason.
        message: String,
        /// The statement as submitted.
        sql: String,
        /// Rejection/failure classification.
        kind: ErrorKind,
    },
    /// The statement ran and produced rows.
    Rowset {
        /// Leading-verb classification.
        kind: RowsetKind,
        /// Column names from the result-set descriptors.
        columns: Vec<String>,
        /// Row data, verbatim from the driver.
        rows: Vec<Vec<SqlValue>>,
        /// Number of rows returned.
        row_count: usize,
    },
    /// Reserved for future write support; the read-only policy never
    /// produces this variant.
    Modify {
        /// Human-readable summary.
        message: String,
        /// Rows changed by the statement.
        affected_rows: u64,
        /// Verb of the modifying statement.
        sql_type: String,
    },
}

impl StatementResult {
    /// Whether this result is an error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Stable string form of the result shape, for journaling.
    #[must_use]
    pub fn type_str(&self) -> &'static str {
        match self {
            Self::Error { .. } => "error",
            Self::Rowset { kind, .. } => kind.as_str(),
            Self::Modify { .. } => "modify",
        }
    }
}

/// One statement's result inside a batch, tagged with its 1-based position
/// in declaration order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndexedResult {
    /// 1-based index matching declaration order in the original batch.
    pub statement_index: usize,
    /// The statement as submitted.
    pub sql: String,
    /// The statement's outcome.
    pub result: StatementResult,
}

/// Collected outcomes of a multi-statement batch.
///
/// Invariant: `successful_statements + failed_statements == total_statements`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    /// Number of statements in the batch.
    pub total_statements: usize,
    /// Statements that executed without error.
    pub successful_statements: usize,
    /// Statements rejected by the gate or failed by the driver.
    pub failed_statements: usize,
    /// Rows changed across the batch; zero under the read-only policy.
    pub total_affected_rows: u64,
    /// Per-statement outcomes in declaration order.
    pub results: Vec<IndexedResult>,
}

impl BatchResult {
    /// Build a batch result from indexed outcomes, deriving the counters.
    #[must_use]
    pub fn from_results(results: Vec<IndexedResult>) -> Self {
        let total_statements = results.len();
        let failed_statements = results.iter().filter(|r| r.result.is_error()).count();
        Self {
            total_statements,
            successful_statements: total_statements - failed_statements,
            failed_statements,
            total_affected_rows: 0,
            results,
        }
    }
}

/// What the engine returns for a raw SQL submission: a bare statement
/// result for single statements, a batch result otherwise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryOutcome {
    /// Exactly one statement was submitted.
    Statement(StatementResult),
    /// Two or more statements were submitted.
    Batch(BatchResult),
}

impl QueryOutcome {
    /// Whether the outcome carries no successful statement at all.
    #[must_use]
    pub fn is_error(&self) -> bool {
        match self {
            Self::Statement(r) => r.is_error(),
            Self::Batch(b) => b.successful_statements == 0,
        }
    }

    /// Stable string form of the outcome shape, for journaling.
    #[must_use]
    pub fn type_str(&self) -> &'static str {
        match self {
            Self::Statement(r) => r.type_str(),
            Self::Batch(_) => "multiple",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
