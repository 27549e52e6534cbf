mod catalog;
mod config;
mod errors;
mod extract;
mod llm_client;
mod proxy;
mod recommendation;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, RecommenderBackend};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Spotfinder v{}", env!("CARGO_PKG_VERSION"));

    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; recommendation requests will fail until it is configured");
    }

    let state = AppState::from_config(&config);
    info!(
        "Gemini client initialized (model: {}), recommender backend: {}",
        state.llm.model(),
        state.requester.backend_name()
    );
    if config.backend == RecommenderBackend::Proxy {
        info!("Forwarding recommendation prompts to {}", config.api_proxy_url);
    }
    info!(
        "Catalog loaded: {} campuses, {} spots",
        state.catalog.campuses().len(),
        state.catalog.spot_ids().len()
    );

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
