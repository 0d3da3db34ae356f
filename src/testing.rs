//! Test utilities
//!
//! [`FakeChartApi`] is an in-memory [`ChartApi`] that serves a fixed folder
//! tree, records publish and export calls, and fails on demand.

use crate::client::{ApiError, ApiResult, ChartApi, ExportOptions};
use crate::{ChartDetails, ChartRef, FolderNode, FolderRef, ImageFormat};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::client::embed::parse_embed_code;

/// Kind of failure injected into a fake call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// HTTP 404
    NotFound,
    /// Undecodable response
    Malformed,
    /// HTTP 503 (transient, already retried)
    Unavailable,
    /// Local IO failure
    Io,
}

impl Failure {
    fn to_error(self, what: &str) -> ApiError {
        match self {
            Failure::NotFound => ApiError::http(404, format!("{what} not found")),
            Failure::Malformed => ApiError::Parse(format!("malformed response for {what}")),
            Failure::Unavailable => ApiError::http(503, "Service Unavailable"),
            Failure::Io => ApiError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                format!("cannot write {what}"),
            )),
        }
    }
}

/// One recorded `export_chart` call
#[derive(Debug, Clone, PartialEq)]
pub struct ExportCall {
    /// Chart ID
    pub chart_id: String,
    /// Requested format
    pub format: ImageFormat,
    /// Destination file
    pub filepath: PathBuf,
    /// Request options
    pub options: ExportOptions,
}

/// In-memory Datawrapper API
#[derive(Debug, Default)]
pub struct FakeChartApi {
    folders: HashMap<u64, FolderNode>,
    charts: HashMap<String, ChartDetails>,
    embeds: HashMap<String, Value>,
    folder_failures: HashMap<u64, Failure>,
    chart_failures: HashMap<String, Failure>,
    embed_failures: HashMap<String, Failure>,
    publish_failures: HashSet<String>,
    export_failures: HashMap<String, Failure>,
    published: Mutex<Vec<String>>,
    exports: Mutex<Vec<ExportCall>>,
}

impl FakeChartApi {
    /// Empty API
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a folder holding `charts` and child folder IDs `children`
    pub fn with_folder(mut self, id: u64, name: &str, charts: &[&str], children: &[u64]) -> Self {
        self.folders.insert(
            id,
            FolderNode {
                id,
                name: name.to_string(),
                charts: charts
                    .iter()
                    .map(|c| ChartRef { id: c.to_string() })
                    .collect(),
                children: children
                    .iter()
                    .map(|&c| FolderRef { id: c, name: None })
                    .collect(),
            },
        );
        self
    }

    /// Add chart metadata
    pub fn with_chart(mut self, id: &str, title: &str, public_version: Option<u32>) -> Self {
        self.charts.insert(
            id.to_string(),
            ChartDetails {
                id: id.to_string(),
                title: title.to_string(),
                public_version,
            },
        );
        self
    }

    /// Set the raw embed-codes response for a chart
    pub fn with_embed(mut self, id: &str, body: Value) -> Self {
        self.embeds.insert(id.to_string(), body);
        self
    }

    /// Make `get_folder` fail for this folder
    pub fn failing_folder(mut self, id: u64, failure: Failure) -> Self {
        self.folder_failures.insert(id, failure);
        self
    }

    /// Make `get_chart` fail for this chart
    pub fn failing_chart(mut self, id: &str, failure: Failure) -> Self {
        self.chart_failures.insert(id.to_string(), failure);
        self
    }

    /// Make `get_iframe_code` fail for this chart
    pub fn failing_embed(mut self, id: &str, failure: Failure) -> Self {
        self.embed_failures.insert(id.to_string(), failure);
        self
    }

    /// Make `publish_chart` fail for this chart
    pub fn failing_publish(mut self, id: &str) -> Self {
        self.publish_failures.insert(id.to_string());
        self
    }

    /// Make `export_chart` fail for this chart
    pub fn failing_export(mut self, id: &str, failure: Failure) -> Self {
        self.export_failures.insert(id.to_string(), failure);
        self
    }

    /// Chart IDs passed to `publish_chart`, in call order
    pub fn published(&self) -> Vec<String> {
        self.published.lock().map(|p| p.clone()).unwrap_or_default()
    }

    /// Successful and failed `export_chart` calls, in call order
    pub fn exports(&self) -> Vec<ExportCall> {
        self.exports.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ChartApi for FakeChartApi {
    async fn get_folder(&self, folder_id: u64) -> ApiResult<FolderNode> {
        if let Some(failure) = self.folder_failures.get(&folder_id) {
            return Err(failure.to_error(&format!("folder {folder_id}")));
        }
        self.folders
            .get(&folder_id)
            .cloned()
            .ok_or_else(|| ApiError::http(404, format!("folder {folder_id} not found")))
    }

    async fn get_chart(&self, chart_id: &str) -> ApiResult<ChartDetails> {
        if let Some(failure) = self.chart_failures.get(chart_id) {
            return Err(failure.to_error(&format!("chart {chart_id}")));
        }
        self.charts
            .get(chart_id)
            .cloned()
            .ok_or_else(|| ApiError::http(404, format!("chart {chart_id} not found")))
    }

    async fn get_iframe_code(&self, chart_id: &str, responsive: bool) -> ApiResult<String> {
        if let Some(failure) = self.embed_failures.get(chart_id) {
            return Err(failure.to_error(&format!("embed codes of {chart_id}")));
        }
        Ok(self
            .embeds
            .get(chart_id)
            .map(|body| parse_embed_code(body, responsive))
            .unwrap_or_default())
    }

    async fn publish_chart(&self, chart_id: &str) -> ApiResult<()> {
        if let Ok(mut published) = self.published.lock() {
            published.push(chart_id.to_string());
        }
        if self.publish_failures.contains(chart_id) {
            return Err(ApiError::http(403, "publishing not allowed"));
        }
        Ok(())
    }

    async fn export_chart(
        &self,
        chart_id: &str,
        format: ImageFormat,
        filepath: &Path,
        options: &ExportOptions,
    ) -> ApiResult<()> {
        if let Ok(mut exports) = self.exports.lock() {
            exports.push(ExportCall {
                chart_id: chart_id.to_string(),
                format,
                filepath: filepath.to_path_buf(),
                options: *options,
            });
        }
        if let Some(failure) = self.export_failures.get(chart_id) {
            return Err(failure.to_error(&format!("{format} export of {chart_id}")));
        }
        std::fs::write(filepath, format!("{format}:{chart_id}"))?;
        Ok(())
    }
}
