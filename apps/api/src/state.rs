use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::{Config, RecommenderBackend};
use crate::llm_client::LlmClient;
use crate::recommendation::backend::{CompletionBackend, GeminiBackend, ProxyBackend};
use crate::recommendation::requester::RecommendationRequester;
use crate::recommendation::session::RecommendationStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub catalog: &'static Catalog,
    /// Direct Gemini client, used by the prompt proxy route.
    pub llm: LlmClient,
    /// Recommendation requester; its backend is chosen by RECOMMENDER_BACKEND.
    pub requester: RecommendationRequester,
    /// Owner of every session's current recommendation.
    pub recommendations: Arc<RecommendationStore>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        let llm = LlmClient::new(
            config.gemini_api_base.clone(),
            config.gemini_model.clone(),
            config.gemini_api_key.clone(),
        );

        let backend: Arc<dyn CompletionBackend> = match config.backend {
            RecommenderBackend::Direct => Arc::new(GeminiBackend(llm.clone())),
            RecommenderBackend::Proxy => Arc::new(ProxyBackend::new(config.api_proxy_url.clone())),
        };

        Self {
            catalog: Catalog::builtin(),
            llm,
            requester: RecommendationRequester::new(backend),
            recommendations: Arc::new(RecommendationStore::new()),
        }
    }
}
