//! OpenAI-compatible chat completions adapter.
//!
//! Serves both Groq and Together AI, which expose the same
//! `/chat/completions` message-array API under different base URLs.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::classify;
use super::traits::ChatAdapter;
use super::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use crate::types::{AttemptResult, Mode, ProviderFailure};

/// Adapter for any API speaking the OpenAI chat completions format.
#[derive(Clone)]
pub struct OpenAiCompatibleAdapter {
    name: String,
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiCompatibleAdapter {
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
impl ChatAdapter for OpenAiCompatibleAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn call(&self, prompt: &str, mode: Mode) -> AttemptResult {
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&CompletionRequest {
                model: &self.model,
                messages: [
                    WireMessage {
                        role: "system",
                        content: mode.instruction(),
                    },
                    WireMessage {
                        role: "user",
                        content: prompt,
                    },
                ],
                temperature: DEFAULT_TEMPERATURE,
                max_tokens: DEFAULT_MAX_TOKENS,
            })
            .send()
            .await
            .map_err(classify::transport_failure)?;

        let completion: CompletionResponse = classify::read_json(response).await?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ProviderFailure::MalformedResponse("no choices in completion".into()))?;

        classify::non_empty(content)
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [WireMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}
