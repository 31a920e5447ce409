//! Remote normalizer configuration.

use std::env;
use std::time::Duration;

use crate::error::{CalcError, CalcResult};

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

#[derive(Clone, PartialEq, Eq)]
pub struct NormalizerConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    pub timeout: Duration,
}

// Keep the key out of logs.
impl std::fmt::Debug for NormalizerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NormalizerConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl NormalizerConfig {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read `NATMATH_AI_KEY` (or `OPENAI_API_KEY`), `NATMATH_AI_MODEL`,
    /// `NATMATH_AI_ENDPOINT` and `NATMATH_AI_TIMEOUT_SECS`.
    pub fn from_env() -> CalcResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> CalcResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get("NATMATH_AI_KEY")
            .or_else(|| get("OPENAI_API_KEY"))
            .ok_or_else(|| {
                CalcError::Configuration("NATMATH_AI_KEY (or OPENAI_API_KEY) is not set".into())
            })?;
        let model = get("NATMATH_AI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let mut config = Self::new(api_key, model);
        if let Some(endpoint) = get("NATMATH_AI_ENDPOINT") {
            config.endpoint = endpoint;
        }
        if let Some(raw) = get("NATMATH_AI_TIMEOUT_SECS") {
            let secs: u64 = raw.parse().map_err(|_| {
                CalcError::Configuration(format!("NATMATH_AI_TIMEOUT_SECS is not a number: {raw}"))
            })?;
            config.timeout = Duration::from_secs(secs.max(1));
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CalcResult<()> {
        if self.api_key.trim().is_empty() {
            return Err(CalcError::Configuration("API key is empty".into()));
        }
        if self.model.trim().is_empty() {
            return Err(CalcError::Configuration("model name is empty".into()));
        }
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(CalcError::Configuration(format!(
                "endpoint must be an http(s) URL: {}",
                self.endpoint
            )));
        }
        if self.timeout.is_zero() {
            return Err(CalcError::Configuration("timeout must be positive".into()));
        }
        Ok(())
    }
}
