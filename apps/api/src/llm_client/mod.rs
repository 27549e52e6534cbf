//! LLM Client — the single point of entry for all Gemini API calls in Spotfinder.
//!
//! Both the proxy route and the in-process recommendation backend go through
//! this module; nothing else talks to the Gemini API directly.
//!
//! No retries, no caching: one request per call.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const API_VERSION: &str = "v1beta";
const TEMPERATURE: f32 = 0.7;
const TOP_K: u32 = 40;
const TOP_P: f32 = 0.95;
const MAX_OUTPUT_TOKENS: u32 = 1000;

/// Fallback message when the API returns an error without a readable body.
pub const DEFAULT_ERROR_MESSAGE: &str = "Gemini API request failed";

/// Attached to upstream errors that look like an unknown or unsupported model.
pub const MODEL_HINT: &str = "Try setting GEMINI_MODEL in .env to one of: \
    gemini-pro, gemini-1.5-pro, gemini-1.5-flash-latest";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("GEMINI_API_KEY not configured on server")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx from the API. `message` is the API's own text, untouched.
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        hint: Option<String>,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: TEMPERATURE,
            top_k: TOP_K,
            top_p: TOP_P,
            max_output_tokens: MAX_OUTPUT_TOKENS,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate, or "" when absent.
    pub fn text(&self) -> &str {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.first())
            .and_then(|p| p.text.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

/// Gemini `generateContent` client.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_base: String,
    model: String,
    api_key: Option<String>,
    generation: GenerationConfig,
}

impl LlmClient {
    pub fn new(api_base: impl Into<String>, model: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into(),
            model: model.into(),
            api_key,
            generation: GenerationConfig::default(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{API_VERSION}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }

    /// Sends one prompt and returns the full response object.
    ///
    /// Fails with `MissingApiKey` before touching the network when no key is set.
    pub async fn call(&self, prompt: &str) -> Result<GenerateContentResponse, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let request_body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: self.generation.clone(),
        };

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = extract_error_message(&body);
            let hint = model_hint_for(&message);
            if hint.is_some() {
                warn!(
                    "Model \"{}\" not available ({}): {}",
                    self.model, status, message
                );
            } else {
                warn!("Gemini API returned {}: {}", status, message);
            }
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
                hint,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        debug!(
            "Gemini call succeeded: model={}, candidates={}",
            self.model,
            parsed.candidates.len()
        );
        Ok(parsed)
    }

    /// Convenience wrapper returning only the reply text.
    pub async fn generate_text(&self, prompt: &str) -> Result<String, LlmError> {
        Ok(self.call(prompt).await?.text().to_string())
    }
}

/// Pulls `error.message` out of an error body, falling back to a fixed message.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorEnvelope>(body)
        .ok()
        .and_then(|e| e.error)
        .and_then(|e| e.message)
        .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string())
}

/// Returns the model hint when the error text suggests an unknown model.
pub fn model_hint_for(message: &str) -> Option<String> {
    if message.contains("not found") || message.contains("not supported") {
        Some(MODEL_HINT.to_string())
    } else {
        None
    }
}
