//! HuggingFace Inference API adapter for text generation.
//!
//! Uses the serverless `models/{model}` endpoint with a single framed
//! prompt rather than a message array.
//! See: <https://huggingface.co/docs/api-inference/index>

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::classify;
use super::traits::ChatAdapter;
use super::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use crate::types::{AttemptResult, Mode, ProviderFailure};

/// Default base URL for HuggingFace Inference API
pub const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";

/// Adapter for HuggingFace text generation.
#[derive(Clone)]
pub struct HuggingFaceAdapter {
    name: String,
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl HuggingFaceAdapter {
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

/// Frame instruction and message as a single completion prompt.
fn frame_prompt(mode: Mode, prompt: &str) -> String {
    format!("{}\n\nUser: {prompt}\nAssistant:", mode.instruction())
}

#[async_trait]
impl ChatAdapter for HuggingFaceAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn call(&self, prompt: &str, mode: Mode) -> AttemptResult {
        let url = format!("{}/models/{}", self.base_url, self.model);
        let inputs = frame_prompt(mode, prompt);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&GenerationRequest {
                inputs: &inputs,
                parameters: GenerationParameters {
                    max_new_tokens: DEFAULT_MAX_TOKENS,
                    temperature: DEFAULT_TEMPERATURE,
                    return_full_text: false,
                },
            })
            .send()
            .await
            .map_err(classify::transport_failure)?;

        let generated = match classify::read_json(response).await? {
            GenerationResponse::Batch(items) => items.into_iter().next(),
            GenerationResponse::Single(item) => Some(item),
        }
        .ok_or_else(|| ProviderFailure::MalformedResponse("empty generation list".into()))?;

        classify::non_empty(generated.generated_text)
    }
}

#[derive(Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
}

#[derive(Serialize)]
struct GenerationParameters {
    max_new_tokens: u32,
    temperature: f32,
    return_full_text: bool,
}

/// The API returns a list for most models but a bare object for some.
#[derive(Deserialize)]
#[serde(untagged)]
enum GenerationResponse {
    Batch(Vec<Generated>),
    Single(Generated),
}

#[derive(Deserialize)]
struct Generated {
    generated_text: String,
}
