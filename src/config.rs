//! Configuration loading for munezd.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.munez/config.toml` (user)
//! 3. `/etc/munez/config.toml` (system)
//! 4. built-in defaults
//!
//! Credentials never live in the config file; they come from one
//! environment variable per provider (see [`Credentials`]).

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::providers::ProviderKind;
use crate::{MunezError, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:8000).
    #[serde(default = "default_address")]
    pub address: String,
    /// Whole-request timeout in seconds (default: 120).
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_address() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_request_timeout() -> u64 {
    120
}

/// Fallback sweep configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DispatchConfig {
    /// Budget for a single provider attempt in seconds (default: 15).
    #[serde(default = "default_attempt_timeout")]
    pub attempt_timeout_secs: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            attempt_timeout_secs: default_attempt_timeout(),
        }
    }
}

impl DispatchConfig {
    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_secs(self.attempt_timeout_secs)
    }

    /// Longest a sweep over `providers` adapters can take.
    pub fn worst_case_sweep(&self, providers: usize) -> Duration {
        self.attempt_timeout()
            .saturating_mul(u32::try_from(providers).unwrap_or(u32::MAX))
    }
}

fn default_attempt_timeout() -> u64 {
    15
}

/// Per-provider overrides, keyed by provider table name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub groq: Option<ProviderOverride>,
    #[serde(default)]
    pub together: Option<ProviderOverride>,
    #[serde(default)]
    pub huggingface: Option<ProviderOverride>,
    #[serde(default)]
    pub gemini: Option<ProviderOverride>,
}

impl ProvidersConfig {
    /// Overrides for one provider kind, if a table was given.
    pub fn get(&self, kind: ProviderKind) -> Option<&ProviderOverride> {
        match kind {
            ProviderKind::Groq => self.groq.as_ref(),
            ProviderKind::TogetherAi => self.together.as_ref(),
            ProviderKind::HuggingFace => self.huggingface.as_ref(),
            ProviderKind::Gemini => self.gemini.as_ref(),
        }
    }
}

/// Optional replacements for a provider's built-in defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderOverride {
    /// Set to false to exclude the provider even when a key is present.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Lower is tried first.
    #[serde(default)]
    pub priority: Option<u32>,
}

fn default_enabled() -> bool {
    true
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided; must exist)
    /// 2. `~/.munez/config.toml`
    /// 3. `/etc/munez/config.toml`
    /// 4. defaults
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Parse a config file at a known path.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            MunezError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| {
            MunezError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the daemon cannot serve with.
    pub fn validate(&self) -> Result<()> {
        if self.dispatch.attempt_timeout_secs == 0 {
            return Err(MunezError::Configuration(
                "dispatch.attempt_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.server.request_timeout_secs == 0 {
            return Err(MunezError::Configuration(
                "server.request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(MunezError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".munez").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        let system_config = PathBuf::from("/etc/munez/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }
}

/// Provider API keys.
///
/// Empty values and template placeholders (`your_..._here`) are treated as
/// absent, so a freshly copied `.env` template configures nothing.
#[derive(Clone, Default)]
pub struct Credentials {
    keys: HashMap<ProviderKind, String>,
}

impl Credentials {
    /// Read every provider's key from its environment variable.
    pub fn from_env() -> Self {
        Self::from_pairs(
            ProviderKind::ALL
                .into_iter()
                .filter_map(|kind| std::env::var(kind.env_var()).ok().map(|key| (kind, key))),
        )
    }

    /// Build from explicit pairs; unusable keys are dropped.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (ProviderKind, S)>,
        S: Into<String>,
    {
        let keys = pairs
            .into_iter()
            .map(|(kind, key)| (kind, key.into().trim().to_string()))
            .filter(|(_, key)| is_usable_key(key))
            .collect();
        Self { keys }
    }

    /// The key for a provider, if usable.
    pub fn get(&self, kind: ProviderKind) -> Option<&str> {
        self.keys.get(&kind).map(String::as_str)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.keys.keys().map(|k| k.key()).collect();
        kinds.sort_unstable();
        f.debug_struct("Credentials")
            .field("configured", &kinds)
            .finish()
    }
}

fn is_usable_key(key: &str) -> bool {
    !key.is_empty() && !(key.starts_with("your_") && key.ends_with("_here"))
}

/// Mask a secret for display: first 8 and last 4 characters.
///
/// Short secrets are fully hidden.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 12 {
        return "***".to_string();
    }
    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}
