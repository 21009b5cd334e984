//! Provider adapters and the registry that orders them.
//!
//! Each adapter translates the uniform [`ChatAdapter`] call into one
//! provider's wire format. Groq and Together AI share the
//! OpenAI-compatible adapter.

pub mod classify;
pub mod gemini;
pub mod huggingface;
pub mod kind;
pub mod openai_compat;
pub mod registry;
pub mod traits;

pub use gemini::GeminiAdapter;
pub use huggingface::HuggingFaceAdapter;
pub use kind::{ProviderConfig, ProviderKind};
pub use openai_compat::OpenAiCompatibleAdapter;
pub use registry::ProviderRegistry;
pub use traits::ChatAdapter;

/// Sampling temperature sent to every provider.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Reply token cap sent to every provider.
pub const DEFAULT_MAX_TOKENS: u32 = 2048;
