//! Error types for the database engine.

use thiserror::Error;

/// Errors that can occur during engine operations.
///
/// Statement-level rejections and execution failures are NOT errors at this
/// boundary; they are values ([`askdb_core::result::StatementResult`]).
/// `DbError` covers operations with no statement result to return, such as
/// opening the database or introspecting schema.
#[derive(Debug, Error)]
pub enum DbError {
    /// `SQLite` driver error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A named table does not exist.
    #[error("table not found: {0}")]
    TableNotFound(String),
}

/// Convenience alias for engine results.
pub type Result<T> = std::result::Result<T, DbError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
