use anyhow::{bail, Context, Result};

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_PROXY_URL: &str = "http://localhost:3001";

/// Which transport the recommendation requester uses to reach the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommenderBackend {
    /// Call the Gemini API from this process.
    Direct,
    /// Forward prompts to a separate proxy at `api_proxy_url`.
    Proxy,
}

impl std::str::FromStr for RecommenderBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(Self::Direct),
            "proxy" => Ok(Self::Proxy),
            other => bail!("RECOMMENDER_BACKEND must be 'direct' or 'proxy', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
///
/// The Gemini key is optional on purpose: a missing key is reported per
/// request as a configuration error instead of refusing to start.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub api_proxy_url: String,
    pub backend: RecommenderBackend,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            gemini_model: optional_env("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_api_base: optional_env("GEMINI_API_BASE")
                .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string()),
            api_proxy_url: optional_env("API_PROXY_URL")
                .unwrap_or_else(|| DEFAULT_PROXY_URL.to_string()),
            backend: optional_env("RECOMMENDER_BACKEND")
                .map(|v| v.parse::<RecommenderBackend>())
                .transpose()?
                .unwrap_or(RecommenderBackend::Direct),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Reads an env var, treating an empty or whitespace-only value as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
impl Config {
    /// Config pointing the Gemini client at a local stub server.
    pub fn for_tests(gemini_api_base: &str, api_key: Option<&str>) -> Self {
        Config {
            gemini_api_key: api_key.map(str::to_string),
            gemini_model: "gemini-test".to_string(),
            gemini_api_base: gemini_api_base.to_string(),
            api_proxy_url: DEFAULT_PROXY_URL.to_string(),
            backend: RecommenderBackend::Direct,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}
