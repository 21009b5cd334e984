//! Fallback orchestration across the provider registry.
//!
//! One linear sweep per request:
//! - providers are tried strictly in registry order, one at a time
//! - the first `Ok` reply wins and nothing after it is called
//! - every failure is recorded and the sweep moves on
//!
//! Nothing is remembered between requests: a provider that failed on one
//! request is tried at full priority on the next.
//!
//! # Fallback Sweep
//!
//! ```text
//!   dispatch(request)
//!         │
//!         ▼
//!   registry empty? ──yes──► NoProvidersConfigured (no network call)
//!         │ no
//!         ▼
//!   ┌──────────────┐  Ok(text)   ┌───────────────────────────┐
//!   │ adapter[i]   │ ──────────► │ ChatReply{text, provider} │
//!   │ (timeout)    │             └───────────────────────────┘
//!   └──────┬───────┘
//!          │ Err(failure) → record Attempt, i += 1
//!          ▼
//!   exhausted ──► AllProvidersFailed{attempts}
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{error, info, instrument, warn};

use crate::providers::{ChatAdapter, ProviderRegistry};
use crate::telemetry;
use crate::types::{Attempt, AttemptResult, ChatReply, ChatRequest, ProviderFailure};
use crate::{MunezError, Result};

/// Default budget for a single provider attempt.
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(15);

/// Walks the registry in priority order until one provider replies.
///
/// Holds no mutable state; share it behind an `Arc` across requests.
#[derive(Clone)]
pub struct FallbackOrchestrator {
    registry: Arc<ProviderRegistry>,
    attempt_timeout: Duration,
}

impl FallbackOrchestrator {
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self {
            registry,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
        }
    }

    /// Set the per-attempt timeout budget.
    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn attempt_timeout(&self) -> Duration {
        self.attempt_timeout
    }

    /// Run one fallback sweep for `request`.
    ///
    /// Returns the first successful reply, `NoProvidersConfigured` for an
    /// empty registry, or `AllProvidersFailed` with one attempt per
    /// provider in priority order.
    #[instrument(skip(self, request), fields(mode = %request.mode()))]
    pub async fn dispatch(&self, request: &ChatRequest) -> Result<ChatReply> {
        if let Err(e) = self.registry.check() {
            Self::record_dispatch("no_providers");
            return Err(e);
        }

        let mut attempts = Vec::with_capacity(self.registry.len());
        for adapter in self.registry.adapters() {
            let name = adapter.name();
            info!(provider = name, "attempting provider");

            let start = Instant::now();
            let outcome = self.attempt(adapter.as_ref(), request).await;

            match outcome {
                Ok(text) => {
                    Self::record_attempt(name, start, None);
                    Self::record_dispatch("ok");
                    info!(
                        provider = name,
                        failed_before = attempts.len(),
                        "provider succeeded"
                    );
                    return Ok(ChatReply {
                        text,
                        provider_used: name.to_string(),
                    });
                }
                Err(failure) => {
                    Self::record_attempt(name, start, Some(&failure));
                    warn!(
                        provider = name,
                        failure = %failure.kind(),
                        error = %failure,
                        "provider failed, trying next provider"
                    );
                    attempts.push(Attempt::new(name, failure.kind()));
                }
            }
        }

        Self::record_dispatch("all_failed");
        error!(attempts = ?attempts, "all providers failed");
        Err(MunezError::AllProvidersFailed { attempts })
    }

    /// One adapter call bounded by the attempt timeout.
    async fn attempt(&self, adapter: &dyn ChatAdapter, request: &ChatRequest) -> AttemptResult {
        match tokio::time::timeout(
            self.attempt_timeout,
            adapter.call(request.message(), request.mode()),
        )
        .await
        {
            Ok(outcome) => outcome,
            Err(_) => Err(ProviderFailure::NetworkError(format!(
                "attempt exceeded {:?} budget",
                self.attempt_timeout
            ))),
        }
    }

    // ========================================================================
    // Metrics recording
    // ========================================================================

    fn record_attempt(provider: &str, start: Instant, failure: Option<&ProviderFailure>) {
        let (status, failure) = match failure {
            None => ("ok", "none"),
            Some(f) => ("error", f.kind().as_str()),
        };
        metrics::counter!(telemetry::ATTEMPTS_TOTAL,
            "provider" => provider.to_owned(),
            "status" => status,
            "failure" => failure,
        )
        .increment(1);
        metrics::histogram!(telemetry::ATTEMPT_DURATION_SECONDS,
            "provider" => provider.to_owned(),
        )
        .record(start.elapsed().as_secs_f64());
    }

    fn record_dispatch(status: &'static str) {
        metrics::counter!(telemetry::DISPATCH_TOTAL, "status" => status).increment(1);
    }
}
