//! Known provider kinds and their resolved configuration.

use std::fmt;
use std::sync::Arc;

use reqwest::Client;

use super::gemini::{self, GeminiAdapter};
use super::huggingface::{self, HuggingFaceAdapter};
use super::openai_compat::OpenAiCompatibleAdapter;
use super::traits::ChatAdapter;
use crate::config::{Credentials, ProviderOverride};

/// The provider families munez knows how to talk to.
///
/// Declaration order is the default priority: fastest and most generous
/// free tier first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProviderKind {
    Groq,
    TogetherAi,
    HuggingFace,
    Gemini,
}

impl ProviderKind {
    /// Every kind, in default priority order.
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::Groq,
        ProviderKind::TogetherAi,
        ProviderKind::HuggingFace,
        ProviderKind::Gemini,
    ];

    /// Human-facing name used in diagnostics and the health endpoint.
    pub fn display_name(self) -> &'static str {
        match self {
            ProviderKind::Groq => "Groq",
            ProviderKind::TogetherAi => "Together AI",
            ProviderKind::HuggingFace => "Hugging Face",
            ProviderKind::Gemini => "Gemini",
        }
    }

    /// Config table name (`[providers.<key>]`).
    pub fn key(self) -> &'static str {
        match self {
            ProviderKind::Groq => "groq",
            ProviderKind::TogetherAi => "together",
            ProviderKind::HuggingFace => "huggingface",
            ProviderKind::Gemini => "gemini",
        }
    }

    /// Environment variable holding the API key.
    pub fn env_var(self) -> &'static str {
        match self {
            ProviderKind::Groq => "GROQ_API_KEY",
            ProviderKind::TogetherAi => "TOGETHER_API_KEY",
            ProviderKind::HuggingFace => "HUGGINGFACE_API_KEY",
            ProviderKind::Gemini => "GEMINI_API_KEY",
        }
    }

    pub fn default_endpoint(self) -> &'static str {
        match self {
            ProviderKind::Groq => "https://api.groq.com/openai/v1",
            ProviderKind::TogetherAi => "https://api.together.xyz/v1",
            ProviderKind::HuggingFace => huggingface::DEFAULT_BASE_URL,
            ProviderKind::Gemini => gemini::DEFAULT_BASE_URL,
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            ProviderKind::Groq => "llama-3.3-70b-versatile",
            ProviderKind::TogetherAi => "meta-llama/Llama-3.3-70B-Instruct-Turbo",
            ProviderKind::HuggingFace => "meta-llama/Meta-Llama-3-70B-Instruct",
            ProviderKind::Gemini => "gemini-flash-latest",
        }
    }

    pub fn default_priority(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A provider's fully resolved settings.
#[derive(Clone)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub name: String,
    /// Lower is tried first.
    pub priority: u32,
    pub credential: Option<String>,
    pub endpoint: String,
    pub model: String,
    pub enabled: bool,
}

impl ProviderConfig {
    /// Apply config overrides and credentials on top of the kind's defaults.
    pub fn resolve(
        kind: ProviderKind,
        overrides: Option<&ProviderOverride>,
        credentials: &Credentials,
    ) -> Self {
        Self {
            kind,
            name: kind.display_name().to_string(),
            priority: overrides
                .and_then(|o| o.priority)
                .unwrap_or_else(|| kind.default_priority()),
            credential: credentials.get(kind).map(str::to_string),
            endpoint: overrides
                .and_then(|o| o.endpoint.clone())
                .unwrap_or_else(|| kind.default_endpoint().to_string()),
            model: overrides
                .and_then(|o| o.model.clone())
                .unwrap_or_else(|| kind.default_model().to_string()),
            enabled: overrides.is_none_or(|o| o.enabled),
        }
    }

    /// Whether this provider belongs in the active registry.
    pub fn is_active(&self) -> bool {
        self.enabled && self.credential.is_some()
    }

    /// Build the adapter for this provider, or `None` without a credential.
    pub fn adapter(&self, http: Client) -> Option<Arc<dyn ChatAdapter>> {
        let key = self.credential.clone()?;
        let adapter: Arc<dyn ChatAdapter> = match self.kind {
            ProviderKind::Groq | ProviderKind::TogetherAi => Arc::new(
                OpenAiCompatibleAdapter::new(&self.name, http, &self.endpoint, key, &self.model),
            ),
            ProviderKind::HuggingFace => Arc::new(HuggingFaceAdapter::new(
                &self.name,
                http,
                &self.endpoint,
                key,
                &self.model,
            )),
            ProviderKind::Gemini => Arc::new(GeminiAdapter::new(
                &self.name,
                http,
                &self.endpoint,
                key,
                &self.model,
            )),
        };
        Some(adapter)
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("enabled", &self.enabled)
            .finish()
    }
}
