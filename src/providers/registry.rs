//! Provider registry: the ordered list of active adapters.
//!
//! The `ProviderRegistry` stores adapters in priority order (index 0 = highest).
//! It is built once at startup from configuration plus credentials and is
//! read-only afterwards; the orchestrator walks it for every request.
//!
//! # Registry Build Flow
//!
//! ```text
//!   ProvidersConfig + Credentials
//!                │
//!                ▼
//!   ┌─────────────────────────┐
//!   │ resolve each kind       │ ──► defaults ← [providers.<kind>] overrides
//!   └───────────┬─────────────┘
//!               │ keep: enabled && credential present
//!               ▼
//!   ┌─────────────────────────┐
//!   │ stable sort by priority │ ──► ties keep Groq < Together < HF < Gemini
//!   └───────────┬─────────────┘
//!               ▼
//!   [Groq, Together AI, Hugging Face, Gemini]  (subset)
//! ```
//!
//! An empty registry is a valid, degraded state rather than a startup
//! failure: [`ProviderRegistry::check`] reports `NoProvidersConfigured`.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tracing::{info, warn};

use super::kind::{ProviderConfig, ProviderKind};
use super::traits::ChatAdapter;
use crate::config::{Credentials, ProvidersConfig};
use crate::{MunezError, Result};

/// Registry of chat adapters in fallback order.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    adapters: Vec<Arc<dyn ChatAdapter>>,
}

impl ProviderRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry from configuration and credentials.
    ///
    /// `http_timeout` bounds every outbound call at the client level. Only
    /// fails if the HTTP client cannot be constructed.
    pub fn build(
        providers: &ProvidersConfig,
        credentials: &Credentials,
        http_timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(http_timeout)
            .build()
            .map_err(|e| MunezError::Configuration(format!("failed to build HTTP client: {e}")))?;

        let mut registry = Self::new();
        for config in Self::active_configs(providers, credentials) {
            if let Some(adapter) = config.adapter(http.clone()) {
                info!(
                    provider = %config.name,
                    priority = config.priority,
                    model = %config.model,
                    "registered provider"
                );
                registry.add(adapter);
            }
        }

        if registry.is_empty() {
            let vars: Vec<_> = ProviderKind::ALL.iter().map(|k| k.env_var()).collect();
            warn!(
                "No API providers configured. Set at least one of {}.",
                vars.join(", ")
            );
        }

        Ok(registry)
    }

    /// Resolve every known kind and keep the active ones, in priority order.
    pub fn active_configs(
        providers: &ProvidersConfig,
        credentials: &Credentials,
    ) -> Vec<ProviderConfig> {
        let mut configs: Vec<ProviderConfig> = ProviderKind::ALL
            .into_iter()
            .map(|kind| ProviderConfig::resolve(kind, providers.get(kind), credentials))
            .filter(ProviderConfig::is_active)
            .collect();
        // Stable: equal priorities keep declaration order.
        configs.sort_by_key(|c| c.priority);
        configs
    }

    /// Add an adapter (appended to end = lowest priority).
    pub fn add(&mut self, adapter: Arc<dyn ChatAdapter>) {
        self.adapters.push(adapter);
    }

    /// Adapters in priority order.
    pub fn adapters(&self) -> &[Arc<dyn ChatAdapter>] {
        &self.adapters
    }

    /// Provider names in priority order.
    pub fn names(&self) -> Vec<String> {
        self.adapters.iter().map(|a| a.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// `Err(NoProvidersConfigured)` when nothing is registered.
    pub fn check(&self) -> Result<()> {
        if self.is_empty() {
            Err(MunezError::NoProvidersConfigured)
        } else {
            Ok(())
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
