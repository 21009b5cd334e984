//! Munez error types

use crate::types::Attempt;

/// Munez error types
#[derive(Debug, thiserror::Error)]
pub enum MunezError {
    // Client errors
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    // Dispatch errors
    #[error("No API providers configured")]
    NoProvidersConfigured,

    /// Every active provider was tried and none produced a reply.
    /// `attempts` is in priority order, one entry per provider.
    #[error("All API providers failed")]
    AllProvidersFailed { attempts: Vec<Attempt> },

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl MunezError {
    /// Whether the caller is at fault (maps to a 4xx response).
    pub fn is_client_error(&self) -> bool {
        matches!(self, MunezError::InvalidRequest(_))
    }
}

/// Result type alias for Munez operations
pub type Result<T> = std::result::Result<T, MunezError>;
