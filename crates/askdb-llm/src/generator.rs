//! # Generator Trait
//!
//! Core abstraction for the text-generation backend. The orchestrator only
//! sees [`SqlGenerator`]; the concrete HTTP provider lives in
//! [`crate::dashscope`].
//!
//! A failed call is a typed [`GeneratorError`], never an error string
//! standing in for SQL. The caller rejects failures explicitly instead of
//! relying on the statement gate to catch prose by accident.

use async_trait::async_trait;

/// Result type alias for generator operations.
pub type GeneratorResult<T> = Result<T, GeneratorError>;

/// Errors that can occur while obtaining SQL from the model.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// HTTP transport failed.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not valid JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The provider returned a non-success status.
    #[error("api error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Provider error message.
        message: String,
    },

    /// The response parsed but carried no `output.text` field.
    #[error("malformed api response: missing output.text")]
    MissingOutput,

    /// No API key is configured.
    #[error("auth error: {message}")]
    Auth {
        /// Error description.
        message: String,
    },
}

impl GeneratorError {
    /// Error category string for journaling and logging.
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Http(_) => "transport",
            Self::Json(_) | Self::MissingOutput => "api_format",
            Self::Api { .. } => "api",
            Self::Auth { .. } => "auth",
        }
    }
}

/// Text-in/text-out SQL generation backend.
///
/// Implementors must be `Send + Sync` for use across async tasks. One
/// synchronous round trip per call; no retry logic.
#[async_trait]
pub trait SqlGenerator: Send + Sync {
    /// Model identifier sent with each request.
    fn model(&self) -> &str;

    /// Complete a prompt into raw model output.
    ///
    /// The returned text is untrusted: callers strip code fences and hand
    /// it to the statement gate.
    async fn complete(&self, prompt: &str) -> GeneratorResult<String>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
