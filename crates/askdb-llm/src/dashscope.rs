//! `DashScope` text-generation provider implementing [`SqlGenerator`].
//!
//! Speaks the plain (non-streaming) generation endpoint: a JSON POST of
//! `{ "model", "input": { "prompt" } }` with Bearer auth, answered by
//! `{ "output": { "text" } }`. One round trip per call, no retries, no
//! timeout beyond the client's defaults.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::{Value, json};
use tracing::{debug, error};

use crate::generator::{GeneratorError, GeneratorResult, SqlGenerator};

/// Default generation endpoint.
pub const DEFAULT_BASE_URL: &str =
    "https://dashscope.aliyuncs.com/api/v1/services/aigc/text-generation/generation";

/// Default model.
pub const DEFAULT_MODEL: &str = "qwen-turbo";

/// `DashScope` provider configuration.
#[derive(Clone, Debug)]
pub struct DashScopeConfig {
    /// Generation endpoint URL.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// API key for Bearer auth.
    pub api_key: String,
}

impl DashScopeConfig {
    /// Config with default endpoint and model.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
        }
    }
}

/// `DashScope` SQL generator.
pub struct DashScopeGenerator {
    config: DashScopeConfig,
    client: reqwest::Client,
}

impl DashScopeGenerator {
    /// Create a new generator.
    #[must_use]
    pub fn new(config: DashScopeConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Create a new generator with a shared HTTP client.
    #[must_use]
    pub fn with_client(config: DashScopeConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    /// Build HTTP headers for the request.
    fn build_headers(&self) -> GeneratorResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        let _ = headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let auth_value = format!("Bearer {}", self.config.api_key);
        let _ = headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth_value).map_err(|e| GeneratorError::Auth {
                message: format!("invalid api key header: {e}"),
            })?,
        );
        Ok(headers)
    }

    /// Build the request body.
    fn build_request(&self, prompt: &str) -> Value {
        json!({
            "model": self.config.model,
            "input": { "prompt": prompt },
        })
    }

    /// Pull `output.text` out of a parsed response body.
    fn extract_text(body: &Value) -> GeneratorResult<String> {
        body.get("output")
            .and_then(|o| o.get("text"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(GeneratorError::MissingOutput)
    }

    /// Pull a provider error message out of an error body, falling back to
    /// the raw text.
    fn extract_error_message(body_text: &str) -> String {
        serde_json::from_str::<Value>(body_text)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| body_text.to_string())
    }
}

#[async_trait]
impl SqlGenerator for DashScopeGenerator {
    fn model(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, prompt: &str) -> GeneratorResult<String> {
        let headers = self.build_headers()?;
        let body = self.build_request(prompt);

        debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            "sending generation request"
        );

        let response = self
            .client
            .post(&self.config.base_url)
            .headers(headers)
            .json(&body)
            .send()
            .await
            .map_err(GeneratorError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            let message = Self::extract_error_message(&body_text);
            error!(status = status.as_u16(), message = %message, "generation api error");
            return Err(GeneratorError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: Value = response.json().await.map_err(GeneratorError::Http)?;
        Self::extract_text(&parsed)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn generator_for(server: &MockServer) -> DashScopeGenerator {
        DashScopeGenerator::new(DashScopeConfig {
            base_url: format!("{}/generation", server.uri()),
            model: "qwen-turbo".into(),
            api_key: "test-key".into(),
        })
    }

    // ── Request building ────────────────────────────────────────────

    #[test]
    fn headers_have_bearer_auth() {
        let generator = DashScopeGenerator::new(DashScopeConfig::new("test-key"));
        let headers = generator.build_headers().unwrap();
        assert_eq!(headers[AUTHORIZATION], "Bearer test-key");
        assert_eq!(headers[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn request_body_shape() {
        let generator = DashScopeGenerator::new(DashScopeConfig::new("k"));
        let body = generator.build_request("list students");
        assert_eq!(body["model"], "qwen-turbo");
        assert_eq!(body["input"]["prompt"], "list students");
    }

    #[test]
    fn default_config_values() {
        let config = DashScopeConfig::new("k");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    // ── Response handling ───────────────────────────────────────────

    #[test]
    fn extract_text_happy_path() {
        let body = serde_json::json!({"output": {"text": "SELECT 1;"}});
        assert_eq!(DashScopeGenerator::extract_text(&body).unwrap(), "SELECT 1;");
    }

    #[test]
    fn extract_text_missing_field() {
        let body = serde_json::json!({"output": {}});
        assert_matches!(
            DashScopeGenerator::extract_text(&body),
            Err(GeneratorError::MissingOutput)
        );
    }

    #[test]
    fn extract_error_message_prefers_message_field() {
        let msg = DashScopeGenerator::extract_error_message(
            r#"{"code": "Throttling", "message": "rate limited"}"#,
        );
        assert_eq!(msg, "rate limited");
    }

    #[test]
    fn extract_error_message_falls_back_to_raw() {
        assert_eq!(DashScopeGenerator::extract_error_message("oops"), "oops");
    }

    // ── End-to-end over wiremock ────────────────────────────────────

    #[tokio::test]
    async fn complete_returns_output_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/generation"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({"model": "qwen-turbo"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "output": {"text": "SELECT name FROM student;"}
            })))
            .mount(&server)
            .await;

        let sql = generator_for(&server)
            .complete("list student names")
            .await
            .unwrap();
        assert_eq!(sql, "SELECT name FROM student;");
    }

    #[tokio::test]
    async fn complete_maps_error_status_to_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "code": "Throttling", "message": "requests throttled"
            })))
            .mount(&server)
            .await;

        let err = generator_for(&server).complete("q").await.unwrap_err();
        assert_matches!(
            err,
            GeneratorError::Api { status: 429, message } if message == "requests throttled"
        );
    }

    #[tokio::test]
    async fn complete_maps_malformed_body_to_missing_output() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"request_id": "abc"})),
            )
            .mount(&server)
            .await;

        let err = generator_for(&server).complete("q").await.unwrap_err();
        assert_matches!(err, GeneratorError::MissingOutput);
    }

    #[tokio::test]
    async fn complete_maps_transport_failure_to_http_error() {
        // Nothing listens on this port.
        let generator = DashScopeGenerator::new(DashScopeConfig {
            base_url: "http://127.0.0.1:1/generation".into(),
            model: "qwen-turbo".into(),
            api_key: "k".into(),
        });
        let err = generator.complete("q").await.unwrap_err();
        assert_matches!(err, GeneratorError::Http(_));
        assert_eq!(err.category(), "transport");
    }
}
