//! API configuration
//!
//! Built once at process start from the environment plus CLI overrides and
//! validated before any request is made.

use super::retry::RetryPolicy;
use std::time::Duration;
use url::Url;

/// Environment variable holding the bearer token
pub const TOKEN_ENV_VAR: &str = "DATAWRAPPER_API_TOKEN";

/// Environment variable overriding the API base URL
pub const BASE_URL_ENV_VAR: &str = "DATAWRAPPER_API_BASE";

/// Datawrapper API v3 base URL
pub const DEFAULT_BASE_URL: &str = "https://api.datawrapper.de/v3";

/// Maximum attempts per request, including the first one.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Upper bound accepted for `max_retries`
pub const MAX_RETRIES_LIMIT: u32 = 20;

/// Wait before the second attempt; doubled for every further attempt.
pub const DEFAULT_BASE_WAIT_MS: u64 = 1000;

/// Exports of large charts can take a while to render.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Connect timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Token variable unset or blank
    #[error("DATAWRAPPER_API_TOKEN environment variable not set")]
    MissingToken,

    /// Base URL does not parse
    #[error("invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// Offending URL
        url: String,
        /// Parse failure
        reason: String,
    },

    /// Retry settings out of range
    #[error("invalid retry settings: {0}")]
    InvalidRetry(String),

    /// reqwest client could not be built
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Validated API configuration
#[derive(Clone)]
pub struct ApiConfig {
    /// Bearer token
    pub token: String,
    /// Base URL without trailing slash
    pub base_url: Url,
    /// Total request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Retry behavior for every request
    pub retry: RetryPolicy,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("retry", &self.retry)
            .finish()
    }
}

impl ApiConfig {
    /// Read token and base URL from the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(
            std::env::var(TOKEN_ENV_VAR).ok(),
            std::env::var(BASE_URL_ENV_VAR).ok(),
        )
    }

    /// Build from raw values; `None` base URL selects [`DEFAULT_BASE_URL`]
    pub fn from_values(token: Option<String>, base_url: Option<String>) -> Result<Self, ConfigError> {
        let token = token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let base_url = parse_base_url(base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;

        let config = Self {
            token,
            base_url,
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            retry: RetryPolicy::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Override the base URL
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    /// Override the retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Result<Self, ConfigError> {
        self.retry = retry;
        self.validate()?;
        Ok(self)
    }

    /// Override the request timeouts
    pub fn with_timeouts(mut self, timeout: Duration, connect_timeout: Duration) -> Self {
        self.timeout = timeout;
        self.connect_timeout = connect_timeout;
        self
    }

    /// Check invariants that construction alone cannot guarantee
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token.trim().is_empty() {
            return Err(ConfigError::MissingToken);
        }

        let max = self.retry.max_retries;
        if max == 0 || max > MAX_RETRIES_LIMIT {
            return Err(ConfigError::InvalidRetry(format!(
                "max_retries must be within 1..={MAX_RETRIES_LIMIT}, got {max}"
            )));
        }

        Ok(())
    }

    /// Join an API path (e.g. "/charts/abc") onto the base URL
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }

    Ok(url)
}
