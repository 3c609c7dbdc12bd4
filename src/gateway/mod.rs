//! Generative model gateway
//!
//! Single outbound call per request against an Ollama-compatible endpoint
//! (POST /api/generate, non-streaming). The gateway classifies failures
//! into the coaching taxonomy and deliberately never retries: callers see
//! upstream trouble immediately instead of amplified load.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::{CoachError, Result};

/// Default generation endpoint
pub const DEFAULT_MODEL_URL: &str = "http://127.0.0.1:11434";

/// Default fast-tier model (daily advice, motivation, session summary,
/// alternative technique)
pub const DEFAULT_FAST_MODEL: &str = "qwen2.5:7b-instruct";

/// Default heavy-tier model (weekly report; slower, better analysis)
pub const DEFAULT_HEAVY_MODEL: &str = "qwen2.5:14b-instruct";

/// Per-tier request timeouts; on expiry the call reports Unavailable
const FAST_TIMEOUT: Duration = Duration::from_secs(10);
const HEAVY_TIMEOUT: Duration = Duration::from_secs(15);

/// Capability/latency tier, selected by artifact type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelTier {
    /// Lightweight and quick
    Fast,

    /// Higher capability, budgeted at several seconds
    Heavy,
}

impl ModelTier {
    fn timeout(&self) -> Duration {
        match self {
            ModelTier::Fast => FAST_TIMEOUT,
            ModelTier::Heavy => HEAVY_TIMEOUT,
        }
    }
}

/// Result of probing the model endpoint
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub healthy: bool,
    pub model: Option<String>,
    pub error: Option<String>,
    pub checked_at: DateTime<Utc>,
}

/// Seam between the orchestrator and the concrete transport
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send a prompt and return the raw completion text
    async fn generate(&self, prompt: &str, tier: ModelTier) -> Result<String>;

    /// Model identifier used for the given tier
    fn model_tag(&self, tier: ModelTier) -> &str;

    /// Verify the model actually answers, not just that the port is open
    async fn health(&self) -> HealthReport;
}

/// Gateway to an Ollama-compatible generation API
#[derive(Debug, Clone)]
pub struct OllamaGateway {
    client: Client,
    base_url: String,
    fast_model: String,
    heavy_model: String,
}

impl OllamaGateway {
    pub fn new(base_url: &str, fast_model: &str, heavy_model: &str) -> Result<Self> {
        let client = Client::builder()
            // Per-request timeouts are tier-specific; this caps pathological
            // connection setup
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| CoachError::Unavailable(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            fast_model: fast_model.to_string(),
            heavy_model: heavy_model.to_string(),
        })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(DEFAULT_MODEL_URL, DEFAULT_FAST_MODEL, DEFAULT_HEAVY_MODEL)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn classify_transport(e: reqwest::Error) -> CoachError {
        if e.is_timeout() {
            CoachError::Unavailable("model call timed out".to_string())
        } else {
            CoachError::Unavailable(format!("model endpoint unreachable: {}", e))
        }
    }
}

#[async_trait]
impl TextGenerator for OllamaGateway {
    async fn generate(&self, prompt: &str, tier: ModelTier) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);
        let model = self.model_tag(tier);

        info!(model, prompt_chars = prompt.len(), "sending generation request");

        let request = GenerateRequest {
            model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .timeout(tier.timeout())
            .json(&request)
            .send()
            .await
            .map_err(Self::classify_transport)?;

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => {
                warn!(model, "model endpoint reported rate limit");
                return Err(CoachError::RateLimited(
                    "model endpoint quota exhausted".to_string(),
                ));
            }
            StatusCode::SERVICE_UNAVAILABLE => {
                return Err(CoachError::Unavailable(
                    "model endpoint reported itself unavailable".to_string(),
                ));
            }
            status if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                return Err(CoachError::UpstreamError(format!(
                    "model endpoint answered {}: {}",
                    status,
                    body.chars().take(200).collect::<String>()
                )));
            }
            _ => {}
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| CoachError::UpstreamError(format!("malformed provider body: {}", e)))?;

        let text = body.response.unwrap_or_default();
        if text.trim().is_empty() {
            return Err(CoachError::UpstreamError(
                "provider returned an empty completion".to_string(),
            ));
        }

        info!(model, response_chars = text.len(), "generation response received");
        Ok(text)
    }

    fn model_tag(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Fast => &self.fast_model,
            ModelTier::Heavy => &self.heavy_model,
        }
    }

    async fn health(&self) -> HealthReport {
        // A real minimal completion: proves the model answers, not just
        // that the socket accepts
        let probe = self
            .generate("Answer with the single word: ready", ModelTier::Fast)
            .await;

        match probe {
            Ok(_) => HealthReport {
                healthy: true,
                model: Some(self.fast_model.clone()),
                error: None,
                checked_at: Utc::now(),
            },
            Err(e) => HealthReport {
                healthy: false,
                model: None,
                error: Some(e.to_string()),
                checked_at: Utc::now(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}
