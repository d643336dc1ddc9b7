//! Error types for the query journal.

use thiserror::Error;

/// Errors that can occur while journaling.
#[derive(Debug, Error)]
pub enum JournalError {
    /// Filesystem operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Record could not be serialized.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Convenience alias for journal results.
pub type Result<T> = std::result::Result<T, JournalError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_display() {
        let err: JournalError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert!(err.to_string().contains("io error"));
    }

    #[test]
    fn serde_error_display() {
        let err: JournalError = serde_json::from_str::<String>("x").unwrap_err().into();
        assert!(err.to_string().contains("serde error"));
    }
}
