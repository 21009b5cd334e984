//! Google Gemini `generateContent` adapter.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::classify;
use super::traits::ChatAdapter;
use super::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use crate::types::{AttemptResult, Mode, ProviderFailure};

/// Default base URL for the Generative Language API
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Adapter for Gemini models.
///
/// Authenticates with the `x-goog-api-key` header rather than a query
/// parameter so the key never appears in logged URLs.
#[derive(Clone)]
pub struct GeminiAdapter {
    name: String,
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiAdapter {
    pub fn new(
        name: impl Into<String>,
        http: Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl ChatAdapter for GeminiAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn call(&self, prompt: &str, mode: Mode) -> AttemptResult {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&GenerateContentRequest {
                system_instruction: Content {
                    role: None,
                    parts: vec![Part {
                        text: mode.instruction(),
                    }],
                },
                contents: vec![Content {
                    role: Some("user"),
                    parts: vec![Part { text: prompt }],
                }],
                generation_config: GenerationConfig {
                    temperature: DEFAULT_TEMPERATURE,
                    max_output_tokens: DEFAULT_MAX_TOKENS,
                },
            })
            .send()
            .await
            .map_err(classify::transport_failure)?;

        let body: GenerateContentResponse = classify::read_json(response).await?;

        let candidate = body.candidates.into_iter().next().ok_or_else(|| {
            ProviderFailure::MalformedResponse("no candidates in response".into())
        })?;

        // Blocked candidates come back without content.
        let content = candidate.content.ok_or_else(|| {
            ProviderFailure::MalformedResponse(format!(
                "candidate has no content (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            ))
        })?;

        let text = content
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect::<Vec<_>>()
            .join("");

        classify::non_empty(text)
    }
}

// --- Gemini wire types ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}
