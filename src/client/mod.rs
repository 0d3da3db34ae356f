//! Datawrapper API client
//!
//! - [`config`] - API configuration, validated once at startup
//! - [`retry`] - Exponential backoff around every outbound call
//! - [`http`] - reqwest-backed [`ChartApi`] implementation
//! - [`embed`] - Embed-code response parsing
//! - [`options`] - Export request parameters

use crate::{ChartDetails, FolderNode, ImageFormat};
use async_trait::async_trait;
use std::path::Path;

pub mod config;
pub mod embed;
pub mod http;
pub mod options;
pub mod retry;

pub use config::{ApiConfig, ConfigError};
pub use http::DatawrapperClient;
pub use options::{ExportHeight, ExportOptions};
pub use retry::{with_retry, RetryPolicy};

/// Errors returned by API accessors
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-2xx response from the API
    #[error("HTTP error {status}: {message}")]
    Http {
        /// Upstream status code
        status: u16,
        /// Response body or reason phrase
        message: String,
    },

    /// Connection failure (refused, reset, DNS)
    #[error("network error: {0}")]
    Network(String),

    /// Request or read timed out
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Response body could not be decoded
    #[error("parse error: {0}")]
    Parse(String),

    /// Response decoded but was not usable
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Local IO failure while writing an export
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Build an HTTP error from a status code and message
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Whether the failure is worth retrying.
    ///
    /// Network errors, timeouts, 429 and 5xx are transient. Other 4xx
    /// responses, decode failures and local IO are not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) => true,
            Self::Http { status, .. } => *status == 429 || (500..=599).contains(status),
            Self::Parse(_) | Self::InvalidResponse(_) | Self::Io(_) => false,
        }
    }

    /// Whether the failure only concerns the current chart.
    ///
    /// Per-item failures are logged and skipped by batch operations, everything
    /// else aborts them.
    pub fn is_per_item(&self) -> bool {
        match self {
            Self::Parse(_) | Self::InvalidResponse(_) => true,
            Self::Http { status, .. } => (400..=499).contains(status) && *status != 429,
            Self::Network(_) | Self::Timeout(_) | Self::Io(_) => false,
        }
    }

    /// Short description used inside retry log messages
    pub fn description(&self) -> &'static str {
        match self {
            Self::Network(_) => "connection failed",
            Self::Timeout(_) => "network timeout",
            Self::Http { status, .. } => match status {
                401 | 403 => "authentication failed",
                404 => "resource not found",
                429 => "rate limit exceeded",
                500 => "internal server error",
                502 => "bad gateway",
                503 => "service unavailable",
                504 => "gateway timeout",
                s if (500..=599).contains(s) => "server error",
                _ => "client error",
            },
            Self::Parse(_) => "malformed response",
            Self::InvalidResponse(_) => "invalid response",
            Self::Io(_) => "local IO error",
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Timeout(err.to_string());
        }
        if err.is_decode() {
            return Self::Parse(err.to_string());
        }
        if let Some(status) = err.status() {
            return Self::http(status.as_u16(), err.to_string());
        }
        Self::Network(err.to_string())
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Typed accessors for the Datawrapper API
///
/// Implementations are expected to wrap every call in [`with_retry`].
#[async_trait]
pub trait ChartApi: Send + Sync {
    /// Fetch a folder listing (`GET /folders/{id}`)
    async fn get_folder(&self, folder_id: u64) -> ApiResult<FolderNode>;

    /// Fetch chart metadata (`GET /charts/{id}`)
    async fn get_chart(&self, chart_id: &str) -> ApiResult<ChartDetails>;

    /// Fetch the iframe embed code (`GET /charts/{id}/embed-codes`)
    ///
    /// Returns an empty string when the response holds no matching variant.
    async fn get_iframe_code(&self, chart_id: &str, responsive: bool) -> ApiResult<String>;

    /// Publish a chart (`POST /charts/{id}/publish`)
    async fn publish_chart(&self, chart_id: &str) -> ApiResult<()>;

    /// Render a chart (`GET /charts/{id}/export/{format}`) and write it to `filepath`
    async fn export_chart(
        &self,
        chart_id: &str,
        format: ImageFormat,
        filepath: &Path,
        options: &ExportOptions,
    ) -> ApiResult<()>;
}
