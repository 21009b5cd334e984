//! Conversational modes and their system instructions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::MunezError;

/// A named behaviour preset that selects the system instruction sent to
/// the provider alongside the user's message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// General question answering.
    #[default]
    Chat,
    /// Condense the supplied text.
    Summarize,
    /// Walk a beginner through a piece of code.
    CodeExplain,
    /// Correct grammar and explain the changes.
    Grammar,
}

impl Mode {
    /// Every mode, in wire-name order.
    pub const ALL: [Mode; 4] = [Mode::Chat, Mode::Summarize, Mode::CodeExplain, Mode::Grammar];

    /// Wire name as accepted in the `mode` request field.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Chat => "chat",
            Mode::Summarize => "summarize",
            Mode::CodeExplain => "code_explain",
            Mode::Grammar => "grammar",
        }
    }

    /// The system instruction template for this mode.
    pub fn instruction(self) -> &'static str {
        match self {
            Mode::Chat => {
                "You are a helpful AI assistant for students and developers. \
                 Answer questions clearly and concisely."
            }
            Mode::Summarize => {
                "You are an expert summarizer. Provide a concise summary of the \
                 following text, capturing the main points."
            }
            Mode::CodeExplain => {
                "You are a coding tutor. Explain the following code step-by-step \
                 for a beginner."
            }
            Mode::Grammar => {
                "You are a grammar corrector. Correct the grammar of the following \
                 text and provide a brief explanation of the changes."
            }
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = MunezError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| MunezError::InvalidRequest(format!("Unknown mode '{s}'")))
    }
}
