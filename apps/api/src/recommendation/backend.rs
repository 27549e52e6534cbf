//! Completion backends — pluggable transports the requester sends prompts through.
//!
//! Default: `GeminiBackend` (calls the Gemini API from this process).
//! Alternative: `ProxyBackend` (forwards to a separate proxy that holds the key).
//!
//! `AppState` holds an `Arc<dyn CompletionBackend>`, chosen at startup via config.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::llm_client::{LlmClient, LlmError};

pub const PROXY_ROUTE: &str = "/api/ai-recommendations";

#[derive(Debug, Error)]
pub enum RecommendError {
    /// No credential configured locally. Raised before any network call.
    #[error("{0}")]
    MissingCredential(String),

    /// The model service (or proxy) answered non-2xx. `message` is verbatim.
    #[error("{message}")]
    Upstream {
        status: u16,
        message: String,
        hint: Option<String>,
    },

    #[error("Failed to reach recommendation service: {0}")]
    Transport(String),
}

impl From<LlmError> for RecommendError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::MissingApiKey => {
                RecommendError::MissingCredential(LlmError::MissingApiKey.to_string())
            }
            LlmError::Api {
                status,
                message,
                hint,
            } => RecommendError::Upstream {
                status,
                message,
                hint,
            },
            LlmError::Http(err) => RecommendError::Transport(err.to_string()),
        }
    }
}

impl From<RecommendError> for AppError {
    fn from(e: RecommendError) -> Self {
        match e {
            RecommendError::MissingCredential(msg) => AppError::Configuration(msg),
            RecommendError::Upstream {
                status,
                message,
                hint,
            } => AppError::Upstream {
                status,
                message,
                hint,
            },
            RecommendError::Transport(msg) => AppError::Llm(msg),
        }
    }
}

/// The completion trait. Implement this to swap transports without touching
/// the requester or the handlers.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Sends one prompt and returns the model's free-text reply.
    async fn complete(&self, prompt: &str) -> Result<String, RecommendError>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// GeminiBackend — in-process call
// ────────────────────────────────────────────────────────────────────────────

pub struct GeminiBackend(pub LlmClient);

#[async_trait]
impl CompletionBackend for GeminiBackend {
    async fn complete(&self, prompt: &str) -> Result<String, RecommendError> {
        Ok(self.0.generate_text(prompt).await?)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// ProxyBackend — remote proxy call
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ProxyRequest<'a> {
    prompt: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct ProxyReply {
    #[serde(default)]
    content: Vec<ProxyContent>,
}

#[derive(Debug, Default, Deserialize)]
struct ProxyContent {
    text: Option<String>,
}

pub struct ProxyBackend {
    client: Client,
    base_url: String,
}

impl ProxyBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}{PROXY_ROUTE}", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionBackend for ProxyBackend {
    async fn complete(&self, prompt: &str) -> Result<String, RecommendError> {
        let response = self
            .client
            .post(self.endpoint())
            .json(&ProxyRequest { prompt })
            .send()
            .await
            .map_err(|e| RecommendError::Transport(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let message = body
                .get("error")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("Server error: {}", status.as_u16()));
            let hint = body.get("hint").and_then(Value::as_str).map(str::to_string);
            warn!("Proxy returned {}: {}", status, message);
            return Err(RecommendError::Upstream {
                status: status.as_u16(),
                message,
                hint,
            });
        }

        let reply: ProxyReply = response
            .json()
            .await
            .map_err(|e| RecommendError::Transport(e.to_string()))?;
        let text = reply
            .content
            .into_iter()
            .next()
            .and_then(|c| c.text)
            .unwrap_or_default();
        debug!("Proxy reply received ({} bytes)", text.len());
        Ok(text)
    }

    fn name(&self) -> &'static str {
        "proxy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_proxy_backend_unwraps_content_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", PROXY_ROUTE)
            .match_body(mockito::Matcher::Json(serde_json::json!({"prompt": "hi"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"content":[{"text":"{\"recommendations\":[]}"}]}"#)
            .create_async()
            .await;

        let backend = ProxyBackend::new(server.url());
        let text = backend.complete("hi").await.unwrap();
        assert_eq!(text, r#"{"recommendations":[]}"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_proxy_backend_surfaces_error_and_hint_verbatim() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", PROXY_ROUTE)
            .with_status(404)
            .with_body(r#"{"error":"model not found","hint":"pick another model"}"#)
            .create_async()
            .await;

        let err = ProxyBackend::new(server.url()).complete("hi").await.unwrap_err();
        match err {
            RecommendError::Upstream {
                status,
                message,
                hint,
            } => {
                assert_eq!(status, 404);
                assert_eq!(message, "model not found");
                assert_eq!(hint.as_deref(), Some("pick another model"));
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_proxy_backend_without_error_body_reports_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", PROXY_ROUTE)
            .with_status(503)
            .with_body("upstream unavailable")
            .create_async()
            .await;

        let err = ProxyBackend::new(server.url()).complete("hi").await.unwrap_err();
        assert_eq!(err.to_string(), "Server error: 503");
    }

    #[tokio::test]
    async fn test_proxy_backend_empty_content_is_empty_text() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", PROXY_ROUTE)
            .with_status(200)
            .with_body(r#"{"content":[]}"#)
            .create_async()
            .await;

        let text = ProxyBackend::new(server.url()).complete("hi").await.unwrap();
        assert_eq!(text, "");
    }

    #[tokio::test]
    async fn test_gemini_backend_missing_key_is_credential_error() {
        let backend = GeminiBackend(LlmClient::new("http://127.0.0.1:9", "gemini-test", None));
        let err = backend.complete("hi").await.unwrap_err();
        assert!(matches!(err, RecommendError::MissingCredential(_)));
        assert_eq!(err.to_string(), "GEMINI_API_KEY not configured on server");
    }
}
