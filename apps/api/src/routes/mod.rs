pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::catalog::handlers as catalog;
use crate::proxy::handlers as proxy;
use crate::recommendation::handlers as recommendation;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Catalog API
        .route("/api/v1/campuses", get(catalog::handle_list_campuses))
        .route("/api/v1/campuses/:campus_id", get(catalog::handle_get_campus))
        .route(
            "/api/v1/campuses/:campus_id/spots",
            get(catalog::handle_list_spots),
        )
        .route(
            "/api/v1/campuses/:campus_id/nearby",
            get(catalog::handle_nearby_spots),
        )
        .route("/api/v1/spots/:spot_id", get(catalog::handle_get_spot))
        // Recommendation API
        .route(
            "/api/v1/recommendations",
            post(recommendation::handle_recommend),
        )
        .route(
            "/api/v1/recommendations/:session_id",
            get(recommendation::handle_get_recommendation)
                .delete(recommendation::handle_clear_recommendation),
        )
        // Prompt proxy
        .route("/api/ai-recommendations", post(proxy::handle_proxy_prompt))
        .with_state(state)
}
