//! The uniform adapter contract every provider implements.
//!
//! Adapters hide their provider's wire format entirely: the orchestrator
//! only ever sees a prompt, a [`Mode`] and an [`AttemptResult`].
//!
//! # Failure Semantics
//!
//! Adapters never panic and never return a crate-level error. Every
//! outcome of the outbound call is folded into the attempt result:
//! - `Ok(text)`: a non-empty reply
//! - `Err(ProviderFailure::*)`: the orchestrator records it and tries the
//!   next provider
//!
//! # Example
//!
//! ```ignore
//! async fn call(&self, prompt: &str, mode: Mode) -> AttemptResult {
//!     let response = self.http.post(&self.url).json(&body).send().await
//!         .map_err(classify::transport_failure)?;
//!     let reply: WireReply = classify::read_json(response).await?;
//!     classify::non_empty(reply.text)
//! }
//! ```

use async_trait::async_trait;

use crate::types::{AttemptResult, Mode};

/// A single external LLM API behind the uniform call contract.
///
/// Implementations must be stateless with respect to calls: the same
/// adapter is shared by every concurrent request.
#[async_trait]
pub trait ChatAdapter: Send + Sync {
    /// Provider display name for diagnostics and logging.
    fn name(&self) -> &str;

    /// Send `prompt` framed by `mode`'s instruction and return the reply.
    async fn call(&self, prompt: &str, mode: Mode) -> AttemptResult;
}
