//! Munez - chat assistant backend with ordered LLM provider fallback
//!
//! A request carries a message and a [`Mode`]. The [`FallbackOrchestrator`]
//! walks the [`ProviderRegistry`] in priority order (Groq, Together AI,
//! Hugging Face, Gemini by default), returns the first reply it gets, and
//! reports every failed attempt if none succeeds.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use munez::config::{Credentials, ProvidersConfig};
//! use munez::{ChatRequest, FallbackOrchestrator, Mode, ProviderRegistry};
//!
//! #[tokio::main]
//! async fn main() -> munez::Result<()> {
//!     let registry = ProviderRegistry::build(
//!         &ProvidersConfig::default(),
//!         &Credentials::from_env(),
//!         Duration::from_secs(15),
//!     )?;
//!     let orchestrator = FallbackOrchestrator::new(Arc::new(registry));
//!
//!     let request = ChatRequest::new("Explain ownership in Rust", Mode::Chat)?;
//!     let reply = orchestrator.dispatch(&request).await?;
//!
//!     println!("[{}] {}", reply.provider_used, reply.text);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod providers;
#[cfg(feature = "server")]
pub mod server;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use error::{MunezError, Result};
pub use orchestrator::FallbackOrchestrator;
pub use providers::{ChatAdapter, ProviderKind, ProviderRegistry};

pub use types::{
    Attempt, AttemptResult, ChatReply, ChatRequest, FailureKind, Mode, ProviderFailure,
};

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
