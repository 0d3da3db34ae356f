//! # Datawrapper Export Library
//!
//! Walks Datawrapper folder trees to export charts as image files and to dump
//! chart metadata (titles, IDs, embed codes) into spreadsheets.
//!
//! ## Features
//!
//! - **Retrying API client**: every call to the Datawrapper API is wrapped in
//!   bounded exponential backoff
//! - **Folder traversal**: depth-first walk with skip rules and placeholder
//!   chart filtering
//! - **Chart numbering**: filenames taken from a human-curated lookup table,
//!   falling back to `{chart id}-{title}`
//! - **Export driver**: writes each requested format into a directory tree
//!   mirroring the folder hierarchy (or a flat directory)
//!
//! ## Quick Start
//!
//! ```no_run
//! use datawrapper_export::client::{ApiConfig, DatawrapperClient};
//! use datawrapper_export::collector::{collect_export_tasks, CollectOptions, ExportFormats};
//! use datawrapper_export::exporter::{export_tasks, ExportTarget};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ApiConfig::from_env()?;
//! let client = DatawrapperClient::new(config)?;
//!
//! let options = CollectOptions::new(ExportFormats::default()).recursive(true);
//! let tasks = collect_export_tasks(&client, 312749, &options).await?;
//!
//! let target = ExportTarget::new("./charts");
//! let summary = export_tasks(&client, &tasks, &target).await?;
//! println!("exported {} files", summary.exported);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`client`] - API configuration, retry wrapper and the [`client::ChartApi`] accessors
//! - [`numbering`] - Chart numbering lookup table
//! - [`collector`] - Folder traversal producing export tasks and metadata rows
//! - [`exporter`] - Export driver writing files to disk
//! - [`output`] - Filename sanitising, path building and spreadsheet writers
//! - [`cli`] - Command line interface
//! - `testing` - In-memory [`client::ChartApi`] for tests (`testing` feature)

#![warn(missing_docs)]
#![warn(clippy::all)]

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// CLI command implementations
pub mod cli;

/// Datawrapper API client
pub mod client;

/// Folder traversal and chart collection
pub mod collector;

/// Export driver
pub mod exporter;

/// Chart numbering lookup
pub mod numbering;

/// Output helpers and writers
pub mod output;

/// In-memory API for tests
#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Title of template charts that were never filled in.
///
/// Datawrapper folders tend to hold a few of these, invisible in the UI.
pub const PLACEHOLDER_TITLE: &str = "[ Insert title here ]";

/// Folder listing as returned by `GET /folders/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FolderNode {
    /// Folder ID
    pub id: u64,
    /// Display name
    pub name: String,
    /// Charts directly inside this folder
    #[serde(default)]
    pub charts: Vec<ChartRef>,
    /// Child folders
    #[serde(default)]
    pub children: Vec<FolderRef>,
}

/// Child folder entry inside a folder listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FolderRef {
    /// Folder ID
    pub id: u64,
    /// Display name, when the listing includes it
    #[serde(default)]
    pub name: Option<String>,
}

/// Chart entry inside a folder listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChartRef {
    /// Chart ID (e.g., "abc12")
    pub id: String,
}

/// Chart metadata as returned by `GET /charts/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartDetails {
    /// Chart ID
    pub id: String,
    /// Chart title
    #[serde(default)]
    pub title: String,
    /// Latest published version, absent or zero when never published
    #[serde(default)]
    pub public_version: Option<u32>,
}

impl ChartDetails {
    /// Whether the chart has a public version
    pub fn is_published(&self) -> bool {
        matches!(self.public_version, Some(v) if v > 0)
    }

    /// Whether this is an unfilled template chart
    pub fn is_placeholder(&self) -> bool {
        self.title == PLACEHOLDER_TITLE
    }
}

/// Rendered output format of an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// Raster PNG
    Png,
    /// Vector SVG
    Svg,
    /// Vector PDF
    Pdf,
}

impl ImageFormat {
    /// File extension and API path segment
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
            ImageFormat::Pdf => "pdf",
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "svg" => Ok(ImageFormat::Svg),
            "pdf" => Ok(ImageFormat::Pdf),
            _ => Err(format!("Invalid image format: {s}. Valid options: png, svg, pdf")),
        }
    }
}
