//! Per-attempt outcomes reported by provider adapters.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a single provider attempt failed.
///
/// The payload is a human-readable detail kept for logs; it is never
/// returned to HTTP clients.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderFailure {
    #[error("quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("authentication failed: {0}")]
    AuthFailure(String),

    #[error("network error: {0}")]
    NetworkError(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Any other non-success status (5xx, 404, model loading, ...).
    #[error("upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },
}

impl ProviderFailure {
    /// Detail-free tag for diagnostics.
    pub fn kind(&self) -> FailureKind {
        match self {
            ProviderFailure::QuotaExceeded(_) => FailureKind::QuotaExceeded,
            ProviderFailure::AuthFailure(_) => FailureKind::AuthFailure,
            ProviderFailure::NetworkError(_) => FailureKind::NetworkError,
            ProviderFailure::MalformedResponse(_) => FailureKind::MalformedResponse,
            ProviderFailure::Upstream { .. } => FailureKind::UpstreamError,
        }
    }
}

/// Outcome of one adapter call: the reply text, or why it failed.
pub type AttemptResult = std::result::Result<String, ProviderFailure>;

/// Failure category, serialized in diagnostics as snake_case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    QuotaExceeded,
    AuthFailure,
    NetworkError,
    MalformedResponse,
    UpstreamError,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::QuotaExceeded => "quota_exceeded",
            FailureKind::AuthFailure => "auth_failure",
            FailureKind::NetworkError => "network_error",
            FailureKind::MalformedResponse => "malformed_response",
            FailureKind::UpstreamError => "upstream_error",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One failed provider attempt, as recorded by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    pub provider: String,
    pub failure: FailureKind,
}

impl Attempt {
    pub fn new(provider: impl Into<String>, failure: FailureKind) -> Self {
        Self {
            provider: provider.into(),
            failure,
        }
    }
}
