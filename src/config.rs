//! Configuration for the Robinhood client

use std::time::Duration;

use crate::error::{Error, Result};

/// Production API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.robinhood.com";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How the transport picks an outbound proxy
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProxyMode {
    /// Read `HTTP_PROXY` / `HTTPS_PROXY` / `ALL_PROXY` / `NO_PROXY`
    #[default]
    FromEnvironment,
    /// Never use a proxy
    Disabled,
    /// Send everything through this proxy URL
    Url(String),
}

impl std::fmt::Display for ProxyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FromEnvironment => write!(f, "environment"),
            Self::Disabled => write!(f, "disabled"),
            Self::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Configuration for [`crate::robinhood::RobinhoodClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL, endpoint paths are appended to it
    pub base_url: String,

    /// Per-request timeout
    pub timeout: Duration,

    /// Outbound proxy selection
    pub proxy: ProxyMode,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            proxy: ProxyMode::FromEnvironment,
        }
    }
}

impl ClientConfig {
    /// Load config from environment variables
    ///
    /// Reads (all optional):
    /// - `ROBINHOOD_BASE_URL` - API base URL, defaults to production
    /// - `ROBINHOOD_TIMEOUT_SECS` - request timeout in seconds
    /// - `ROBINHOOD_PROXY` - `none` to disable proxies, or a proxy URL
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(base_url) = std::env::var("ROBINHOOD_BASE_URL") {
            config.base_url = base_url;
        }

        if let Ok(secs) = std::env::var("ROBINHOOD_TIMEOUT_SECS") {
            let secs = secs.trim().parse::<u64>().map_err(|_| {
                Error::InvalidConfig(format!(
                    "ROBINHOOD_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                    secs
                ))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        if let Ok(proxy) = std::env::var("ROBINHOOD_PROXY") {
            config.proxy = Self::parse_proxy(&proxy);
        }

        Ok(config)
    }

    /// Point the client at a different API host (used against mock servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_proxy(mut self, proxy: ProxyMode) -> Self {
        self.proxy = proxy;
        self
    }

    fn parse_proxy(value: &str) -> ProxyMode {
        let value = value.trim();
        match value.to_lowercase().as_str() {
            "" | "env" | "environment" => ProxyMode::FromEnvironment,
            "none" | "off" | "disabled" => ProxyMode::Disabled,
            _ => ProxyMode::Url(value.to_string()),
        }
    }
}
