//! Error types for the query service.

use thiserror::Error;

/// Errors returned by service operations.
///
/// Statement rejections and execution failures are NOT service errors;
/// they come back inside the response as result values. A `ServiceError`
/// means the request could not be processed at all.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The query string was empty.
    #[error("query must not be empty")]
    EmptyQuery,

    /// Schema introspection failed.
    #[error("schema introspection failed: {0}")]
    Db(#[from] askdb_db::DbError),

    /// SQL generation failed; no SQL reached the gate.
    #[error("sql generation failed: {0}")]
    Generator(#[from] askdb_llm::GeneratorError),
}

/// Convenience alias for service results.
pub type Result<T> = std::result::Result<T, ServiceError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
