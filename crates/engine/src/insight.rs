//! Generative-text commentary for notebook sections
//!
//! Commentary comes from the Gemini `generateContent` API. It is decoration
//! around the scorers: any failure turns into a fixed offline message and
//! never reaches the recommendation code paths. There is no retry or backoff.

use crate::notebook::Section;
use async_trait::async_trait;
use cinerec_core::{CineRecError, InsightConfig};
use dashmap::{DashMap, DashSet};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Served whenever the upstream call fails
pub const OFFLINE_FALLBACK: &str =
    "The AI consultant is currently offline. Please review the model metrics directly.";

/// Served when the model answers without any text
pub const EMPTY_RESPONSE_FALLBACK: &str = "Failed to generate insights.";

/// Context sent with every notebook insight request
pub const DEFAULT_CONTEXT: &str =
    "Reviewing the current model performance and architectural choices.";

const SERVICE_NAME: &str = "gemini";

/// Source of commentary text
#[async_trait]
pub trait InsightProvider: Send + Sync {
    async fn generate(&self, topic: &str, context: &str) -> anyhow::Result<String>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Gemini REST client
#[derive(Clone)]
pub struct GeminiInsightClient {
    http_client: Client,
    config: InsightConfig,
}

impl GeminiInsightClient {
    pub fn new(config: InsightConfig) -> cinerec_core::Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CineRecError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            model = %config.model,
            api_key_configured = config.has_api_key(),
            timeout_ms = config.timeout.as_millis() as u64,
            "Initialized insight client"
        );

        Ok(Self {
            http_client,
            config,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl InsightProvider for GeminiInsightClient {
    async fn generate(&self, topic: &str, context: &str) -> anyhow::Result<String> {
        if !self.config.has_api_key() {
            return Err(CineRecError::ConfigurationError {
                message: "insight API key not configured".to_string(),
                key: Some("CINEREC_INSIGHT_API_KEY".to_string()),
            }
            .into());
        }

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(build_prompt(topic, context)),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                top_p: self.config.top_p,
            },
        };

        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| CineRecError::upstream(SERVICE_NAME, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| match e.error.status {
                    Some(code) => format!("{}: {}", code, e.error.message),
                    None => e.error.message,
                })
                .unwrap_or(body);
            return Err(CineRecError::upstream(
                SERVICE_NAME,
                format!("{} returned {}", status, message),
            )
            .into());
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| {
                CineRecError::upstream(SERVICE_NAME, format!("invalid response: {}", e))
            })?;

        let text = extract_text(body);
        if text.trim().is_empty() {
            debug!("Insight API returned no text");
            return Ok(EMPTY_RESPONSE_FALLBACK.to_string());
        }

        Ok(text)
    }
}

fn extract_text(response: GenerateContentResponse) -> String {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default()
}

/// Prompt framing the topic from a streaming-business data science angle
pub fn build_prompt(topic: &str, context: &str) -> String {
    format!(
        "As a Senior Data Scientist at a Netflix-like company, explain the following: {topic}. \n\
         Context: {context}. \n\
         Keep it professional, data-driven, and focused on business value (retention, DAU, engagement). \n\
         Format with clean Markdown. Use bullet points."
    )
}

/// Commentary for `topic`, or [`OFFLINE_FALLBACK`] on any failure
pub async fn get_insight(provider: &dyn InsightProvider, topic: &str, context: &str) -> String {
    match provider.generate(topic, context).await {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, topic, "Insight generation failed, serving fallback");
            OFFLINE_FALLBACK.to_string()
        }
    }
}

/// Outcome of a panel request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsightStatus {
    Ready(String),
    /// Another request for the same section is still running
    Pending,
}

/// Per-section commentary cache with an in-flight guard
///
/// Each section is fetched at most once at a time; finished text (fallback
/// included) is cached for the lifetime of the panels.
pub struct InsightPanels {
    provider: Arc<dyn InsightProvider>,
    cache: DashMap<Section, String>,
    in_flight: DashSet<Section>,
}

struct InFlightGuard<'a> {
    in_flight: &'a DashSet<Section>,
    section: Section,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.remove(&self.section);
    }
}

impl InsightPanels {
    pub fn new(provider: Arc<dyn InsightProvider>) -> Self {
        Self {
            provider,
            cache: DashMap::new(),
            in_flight: DashSet::new(),
        }
    }

    pub fn cached(&self, section: Section) -> Option<String> {
        self.cache.get(&section).map(|entry| entry.value().clone())
    }

    pub fn is_loading(&self, section: Section) -> bool {
        self.in_flight.contains(&section)
    }

    /// Snapshot of every cached section
    pub fn snapshot(&self) -> Vec<(Section, String)> {
        let mut entries: Vec<_> = self
            .cache
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        entries.sort_by_key(|(section, _)| section.position());
        entries
    }

    /// Commentary for `section` on `topic`
    pub async fn request(&self, section: Section, topic: &str) -> InsightStatus {
        if let Some(text) = self.cached(section) {
            debug!(section = section.id(), "Insight cache hit");
            return InsightStatus::Ready(text);
        }

        if !self.in_flight.insert(section) {
            debug!(section = section.id(), "Insight already loading");
            return InsightStatus::Pending;
        }
        let _guard = InFlightGuard {
            in_flight: &self.in_flight,
            section,
        };

        // Finished between the cache check and claiming the slot
        if let Some(text) = self.cached(section) {
            return InsightStatus::Ready(text);
        }

        let text = get_insight(self.provider.as_ref(), topic, DEFAULT_CONTEXT).await;
        self.cache.insert(section, text.clone());
        InsightStatus::Ready(text)
    }
}
