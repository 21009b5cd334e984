//! Public types for the Munez API.

mod attempt;
mod chat;
mod mode;

pub use attempt::{Attempt, AttemptResult, FailureKind, ProviderFailure};
pub use chat::{ChatReply, ChatRequest};
pub use mode::Mode;
