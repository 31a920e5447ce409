//! Server configuration from the environment.

use std::env;
use std::net::SocketAddr;

use crate::error::{CalcError, CalcResult};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8081;

/// `1`, `true`, `yes`, `on` (any case) turn a toggle on.
pub fn flag_enabled(value: Option<&str>) -> bool {
    value
        .map(|v| {
            let v = v.trim().to_ascii_lowercase();
            matches!(v.as_str(), "1" | "true" | "yes" | "on")
        })
        .unwrap_or(false)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Never call the remote normalizer, even when it is configured.
    pub local_only: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            local_only: false,
        }
    }
}

impl ServerConfig {
    /// `HOST`, `PORT`, `NATMATH_LOCAL_ONLY`.
    pub fn from_env() -> CalcResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> CalcResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(host) = lookup("HOST").filter(|h| !h.trim().is_empty()) {
            config.host = host.trim().to_string();
        }
        if let Some(port) = lookup("PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| CalcError::Configuration(format!("PORT is not a valid port: {port}")))?;
        }
        config.local_only = flag_enabled(lookup("NATMATH_LOCAL_ONLY").as_deref());
        Ok(config)
    }

    pub fn addr(&self) -> CalcResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| CalcError::Configuration(format!("invalid HOST/PORT: {e}")))
    }
}
