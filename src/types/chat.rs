//! Inbound chat requests and outbound replies.

use std::str::FromStr;

use serde::Serialize;

use super::Mode;
use crate::{MunezError, Result};

/// A validated chat request: non-empty message plus a known mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    message: String,
    mode: Mode,
}

impl ChatRequest {
    /// Build a request from an already-parsed mode.
    ///
    /// The message is trimmed; an empty result is rejected.
    pub fn new(message: impl AsRef<str>, mode: Mode) -> Result<Self> {
        let message = message.as_ref().trim();
        if message.is_empty() {
            return Err(MunezError::InvalidRequest(
                "Message must not be empty".to_string(),
            ));
        }
        Ok(Self {
            message: message.to_string(),
            mode,
        })
    }

    /// Validate raw wire values.
    ///
    /// The message is checked first, so an empty message with a bogus mode
    /// reports the message problem.
    pub fn parse(raw_message: &str, raw_mode: &str) -> Result<Self> {
        if raw_message.trim().is_empty() {
            return Self::new(raw_message, Mode::default());
        }
        let mode = Mode::from_str(raw_mode)?;
        Self::new(raw_message, mode)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }
}

/// A reply produced by the first provider that succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatReply {
    /// Markdown-formatted reply text.
    pub text: String,
    /// Display name of the provider that produced the reply.
    pub provider_used: String,
}
