use axum::{
    extract::{rejection::JsonRejection, FromRequest, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::llm_client::LlmError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProxyRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProxyContent {
    pub text: String,
}

/// Reply shape clients expect: `{"content":[{"text": "..."}]}`.
#[derive(Debug, Serialize)]
pub struct ProxyReply {
    pub content: Vec<ProxyContent>,
}

/// Flat error body: `{"error": "...", "hint": "..."}`.
#[derive(Debug, Serialize)]
struct ProxyErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
}

#[derive(Debug)]
pub struct ProxyError {
    status: StatusCode,
    error: String,
    hint: Option<String>,
}

impl ProxyError {
    fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            hint: None,
        }
    }
}

impl From<LlmError> for ProxyError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::MissingApiKey => ProxyError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                LlmError::MissingApiKey.to_string(),
            ),
            LlmError::Api {
                status,
                message,
                hint,
            } => ProxyError {
                status: StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                error: message,
                hint,
            },
            LlmError::Http(err) => {
                error!("Proxy error: {err}");
                ProxyError::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ProxyError {
    fn from(rejection: JsonRejection) -> Self {
        ProxyError::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let body = ProxyErrorBody {
            error: self.error,
            hint: self.hint,
        };
        (self.status, Json(body)).into_response()
    }
}

/// JSON body whose rejection is reported in the flat proxy error shape.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ProxyError))]
pub struct PromptBody<T>(pub T);

/// POST /api/ai-recommendations
///
/// Forwards a raw prompt to Gemini and wraps the reply text.
pub async fn handle_proxy_prompt(
    State(state): State<AppState>,
    PromptBody(request): PromptBody<ProxyRequest>,
) -> Result<Json<ProxyReply>, ProxyError> {
    let prompt = request
        .prompt
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ProxyError::new(StatusCode::BAD_REQUEST, "Prompt is required"))?;

    info!("Proxying prompt ({} chars) to {}", prompt.len(), state.llm.model());
    let text = state.llm.generate_text(&prompt).await?;

    Ok(Json(ProxyReply {
        content: vec![ProxyContent { text }],
    }))
}
