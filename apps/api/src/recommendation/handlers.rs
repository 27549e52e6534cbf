//! Axum route handlers for the Recommendation API.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::catalog::Coordinate;
use crate::errors::AppError;
use crate::extract::{ApiJson, ApiPath};
use crate::recommendation::session::{Completion, StoredRecommendation};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    /// Omit to start a new session.
    pub session_id: Option<Uuid>,
    pub campus_id: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub session_id: Uuid,
    pub recommendation: StoredRecommendation,
}

/// POST /api/v1/recommendations
///
/// Asks the model for a ranking of the campus's spots from the given position
/// and stores it as the session's current recommendation. A reply that lost
/// the race to a newer request from the same session is discarded with 409.
pub async fn handle_recommend(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RecommendRequest>,
) -> Result<Json<RecommendResponse>, AppError> {
    let campus = state
        .catalog
        .campus(&request.campus_id)
        .ok_or_else(|| AppError::NotFound(format!("Campus {} not found", request.campus_id)))?;
    let origin = Coordinate::new(request.latitude, request.longitude);

    let session_id = request.session_id.unwrap_or_else(Uuid::new_v4);
    let ticket = state.recommendations.begin(session_id).await;

    let outcome = match state.requester.recommend(campus, origin).await {
        Ok(outcome) => outcome,
        Err(e) => {
            state.recommendations.abandon(ticket).await;
            return Err(e.into());
        }
    };

    let recommendation = StoredRecommendation {
        sequence: ticket.sequence,
        campus_id: campus.id.clone(),
        origin,
        outcome,
        received_at: Utc::now(),
    };

    match state
        .recommendations
        .complete(ticket, recommendation.clone())
        .await
    {
        Completion::Applied => Ok(Json(RecommendResponse {
            session_id,
            recommendation,
        })),
        Completion::Stale { latest } => {
            info!(
                "Discarding stale recommendation for session {}: sequence {} < {}",
                session_id, ticket.sequence, latest
            );
            Err(AppError::Conflict(format!(
                "Request {} was superseded by request {}",
                ticket.sequence, latest
            )))
        }
    }
}

/// GET /api/v1/recommendations/:session_id
pub async fn handle_get_recommendation(
    State(state): State<AppState>,
    ApiPath(session_id): ApiPath<Uuid>,
) -> Result<Json<StoredRecommendation>, AppError> {
    state
        .recommendations
        .current(session_id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No recommendation for session {session_id}")))
}

/// DELETE /api/v1/recommendations/:session_id
pub async fn handle_clear_recommendation(
    State(state): State<AppState>,
    ApiPath(session_id): ApiPath<Uuid>,
) -> StatusCode {
    state.recommendations.clear(session_id).await;
    StatusCode::NO_CONTENT
}
