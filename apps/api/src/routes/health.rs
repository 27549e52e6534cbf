use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version and model wiring.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "spotfinder",
        "model": state.llm.model(),
        "credential_configured": state.llm.has_api_key(),
        "recommender_backend": state.requester.backend_name(),
        "active_sessions": state.recommendations.session_count().await,
    }))
}
