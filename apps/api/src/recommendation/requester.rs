use std::sync::Arc;

use tracing::info;

use crate::catalog::{Campus, Coordinate};
use crate::recommendation::backend::{CompletionBackend, RecommendError};
use crate::recommendation::parser::{parse_reply, RecommendationOutcome};
use crate::recommendation::prompts::build_recommendation_prompt;

/// Turns a campus catalog and a user position into a parsed recommendation.
///
/// Exactly one backend call per invocation: no retries, no caching.
#[derive(Clone)]
pub struct RecommendationRequester {
    backend: Arc<dyn CompletionBackend>,
}

impl RecommendationRequester {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub async fn recommend(
        &self,
        campus: &Campus,
        origin: Coordinate,
    ) -> Result<RecommendationOutcome, RecommendError> {
        let prompt = build_recommendation_prompt(campus, origin);
        info!(
            "Requesting recommendations: campus={}, origin=({}, {}), backend={}",
            campus.id,
            origin.latitude,
            origin.longitude,
            self.backend.name()
        );

        let reply = self.backend.complete(&prompt).await?;
        let outcome = parse_reply(&reply, &campus.spots);

        info!("Recommendation reply parsed as {}", outcome.kind());
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::llm_client::{LlmClient, MODEL_HINT};
    use crate::recommendation::backend::GeminiBackend;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Returns a canned reply and records the prompt it was given.
    struct CannedBackend {
        reply: String,
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl CompletionBackend for CannedBackend {
        async fn complete(&self, prompt: &str) -> Result<String, RecommendError> {
            self.seen.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.clone())
        }

        fn name(&self) -> &'static str {
            "canned"
        }
    }

    fn canned(reply: &str) -> Arc<CannedBackend> {
        Arc::new(CannedBackend {
            reply: reply.to_string(),
            seen: Mutex::new(Vec::new()),
        })
    }

    #[tokio::test]
    async fn test_recommend_sends_one_prompt_and_parses_reply() {
        let backend = canned(r#"{"recommendations":[{"spotName":"Odegaard Library"}]}"#);
        let requester = RecommendationRequester::new(backend.clone());
        let uw = Catalog::builtin().campus("uw").unwrap();

        let outcome = requester
            .recommend(uw, Coordinate::new(47.6553, -122.3080))
            .await
            .unwrap();

        match outcome {
            RecommendationOutcome::Structured(result) => {
                assert_eq!(result.recommendations.len(), 1);
                assert_eq!(result.recommendations[0].spot_name, "Odegaard Library");
                assert_eq!(result.ranked_ids, vec![2]);
            }
            other => panic!("expected structured outcome, got {other:?}"),
        }

        let seen = backend.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].contains("47.6553, -122.308"));
    }

    #[tokio::test]
    async fn test_recommend_with_prose_reply_is_raw_text() {
        let requester = RecommendationRequester::new(canned("Go to Hornbake."));
        let umd = Catalog::builtin().campus("umd").unwrap();
        let outcome = requester.recommend(umd, umd.center).await.unwrap();
        assert_eq!(outcome.kind(), "raw_text");
    }

    #[tokio::test]
    async fn test_recommend_surfaces_model_not_found_with_hint() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/gemini-test:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(404)
            .with_body(r#"{"error":{"message":"model not found"}}"#)
            .create_async()
            .await;

        let llm = LlmClient::new(server.url(), "gemini-test", Some("key".into()));
        let requester = RecommendationRequester::new(Arc::new(GeminiBackend(llm)));
        let uw = Catalog::builtin().campus("uw").unwrap();

        let err = requester.recommend(uw, uw.center).await.unwrap_err();
        assert_eq!(err.to_string(), "model not found");
        match err {
            RecommendError::Upstream { hint, .. } => assert_eq!(hint.as_deref(), Some(MODEL_HINT)),
            other => panic!("expected upstream error, got {other:?}"),
        }
    }
}
