//! Runtime configuration loaded from the environment

use crate::error::{Error, Result};
use std::time::Duration;
use url::Url;

/// Default Gemini model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default Gemini API endpoint
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Settings for the generative-AI backend
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// API key sent with every request
    pub api_key: String,
    /// Model name, e.g. "gemini-2.5-flash"
    pub model: String,
    /// Base URL of the API (no trailing path)
    pub api_base: Url,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl AppConfig {
    /// Build a config with defaults for everything but the key
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            api_base: parse_api_base(DEFAULT_API_BASE)?,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Load configuration from process environment, reading `.env` first if present.
    ///
    /// A missing API key is fatal: the application cannot do anything useful without it.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenv::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env file");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = non_empty("GEMINI_API_KEY")
            .or_else(|| non_empty("API_KEY"))
            .ok_or_else(|| Error::Configuration {
                reason: "GEMINI_API_KEY environment variable not set".to_string(),
            })?;

        let mut config = Self::new(api_key.trim())?;

        if let Some(model) = non_empty("GEMINI_MODEL") {
            config.model = model.trim().to_string();
        }
        if let Some(base) = non_empty("GEMINI_API_BASE") {
            config.api_base = parse_api_base(base.trim())?;
        }
        if let Some(secs) = non_empty("GEMINI_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| Error::Configuration {
                reason: format!("GEMINI_TIMEOUT_SECS must be a whole number, got {:?}", secs),
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

fn parse_api_base(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| Error::Configuration {
        reason: format!("Invalid API base URL {:?}: {}", raw, e),
    })
}
