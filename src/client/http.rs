//! reqwest-backed Datawrapper client
//!
//! One authenticated request per call, wrapped in [`with_retry`]. Non-2xx
//! responses become [`ApiError::Http`] so the retry layer can classify them.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

use super::config::{ApiConfig, ConfigError};
use super::embed::parse_embed_code;
use super::options::ExportOptions;
use super::retry::{with_retry, RetryPolicy};
use super::{ApiError, ApiResult, ChartApi};
use crate::{ChartDetails, FolderNode, ImageFormat};

/// Datawrapper API client
#[derive(Debug, Clone)]
pub struct DatawrapperClient {
    client: Client,
    config: ApiConfig,
}

impl DatawrapperClient {
    /// Create a client sending `Authorization: Bearer <token>` with every request
    pub fn new(config: ApiConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|e| ConfigError::HttpClient(format!("invalid auth token: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        self.config.base_url.as_str()
    }

    /// Retry policy applied to every request
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.config.retry
    }

    /// GET a JSON document
    async fn get_json<T>(&self, path: &str) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        let url = self.config.endpoint(path);
        let url = url.as_str();
        let client = &self.client;

        debug!("GET {}", url);
        with_retry(&self.config.retry, path, move || fetch_json::<T>(client, url)).await
    }

    /// GET a binary body
    async fn get_bytes(&self, path: &str, query: &[(&'static str, String)]) -> ApiResult<Vec<u8>> {
        let url = self.config.endpoint(path);
        let url = url.as_str();
        let client = &self.client;

        debug!("GET {} with {} params", url, query.len());
        with_retry(&self.config.retry, path, move || fetch_bytes(client, url, query)).await
    }

    /// POST without a body
    async fn post(&self, path: &str) -> ApiResult<()> {
        let url = self.config.endpoint(path);
        let url = url.as_str();
        let client = &self.client;

        debug!("POST {}", url);
        with_retry(&self.config.retry, path, move || send_post(client, url)).await
    }
}

async fn fetch_json<T>(client: &Client, url: &str) -> ApiResult<T>
where
    T: DeserializeOwned,
{
    let response = check_status(client.get(url).send().await?).await?;
    // Body read failures (timeouts included) go through `From<reqwest::Error>`
    let body = response.bytes().await?;
    serde_json::from_slice(&body)
        .map_err(|e| ApiError::Parse(format!("Failed to deserialize response: {e}")))
}

async fn fetch_bytes(
    client: &Client,
    url: &str,
    query: &[(&'static str, String)],
) -> ApiResult<Vec<u8>> {
    let response = check_status(client.get(url).query(query).send().await?).await?;
    Ok(response.bytes().await?.to_vec())
}

async fn send_post(client: &Client, url: &str) -> ApiResult<()> {
    check_status(client.post(url).send().await?).await?;
    Ok(())
}

/// Turn non-2xx responses into [`ApiError::Http`]
async fn check_status(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        body
    };
    Err(ApiError::http(status.as_u16(), message))
}

#[async_trait]
impl ChartApi for DatawrapperClient {
    async fn get_folder(&self, folder_id: u64) -> ApiResult<FolderNode> {
        self.get_json(&format!("/folders/{folder_id}")).await
    }

    async fn get_chart(&self, chart_id: &str) -> ApiResult<ChartDetails> {
        self.get_json(&format!("/charts/{chart_id}")).await
    }

    async fn get_iframe_code(&self, chart_id: &str, responsive: bool) -> ApiResult<String> {
        let body: Value = self
            .get_json(&format!("/charts/{chart_id}/embed-codes"))
            .await?;
        let code = parse_embed_code(&body, responsive);
        if code.is_empty() {
            debug!("No {} embed code for chart {}", embed_kind(responsive), chart_id);
        }
        Ok(code)
    }

    async fn publish_chart(&self, chart_id: &str) -> ApiResult<()> {
        self.post(&format!("/charts/{chart_id}/publish")).await?;
        debug!("Published chart {}", chart_id);
        Ok(())
    }

    async fn export_chart(
        &self,
        chart_id: &str,
        format: ImageFormat,
        filepath: &Path,
        options: &ExportOptions,
    ) -> ApiResult<()> {
        let query = options.query();
        let bytes = self
            .get_bytes(&format!("/charts/{chart_id}/export/{format}"), &query)
            .await?;

        if bytes.is_empty() {
            return Err(ApiError::InvalidResponse(format!(
                "empty {format} export for chart {chart_id}"
            )));
        }

        tokio::fs::write(filepath, &bytes).await?;
        debug!("Wrote {} bytes to {}", bytes.len(), filepath.display());
        Ok(())
    }
}

fn embed_kind(responsive: bool) -> &'static str {
    if responsive {
        "responsive"
    } else {
        "static"
    }
}
