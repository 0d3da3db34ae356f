//! Folder traversal and chart collection
//!
//! Walks a Datawrapper folder tree depth-first and turns every exportable
//! chart into one [`ExportTask`] per requested format. The metadata walk used
//! by the `list` command lives in [`metadata`].
//!
//! Both walks share the same rules:
//! - a folder whose name equals the skip name is pruned with its subtree
//! - placeholder charts ([`crate::PLACEHOLDER_TITLE`]) are left out
//! - child folders are only visited when recursing

use crate::client::{ApiResult, ChartApi};
use crate::numbering::ChartNumbering;
use crate::output::sanitize;
use crate::ImageFormat;
use futures::future::BoxFuture;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, error, info, warn};

pub mod metadata;
pub mod naming;

pub use metadata::{collect_chart_metadata, ChartMetadata, MetadataOptions};
pub use naming::resolve_filename;

/// Per-format export parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExportParams {
    /// Omit header and footer
    pub plain: bool,
    /// Width in pixels, chart default when `None`
    pub width: Option<u32>,
}

/// Ordered mapping of output format to export parameters.
///
/// Defaults to a plain SVG followed by a full PNG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFormats {
    formats: IndexMap<ImageFormat, ExportParams>,
}

impl Default for ExportFormats {
    fn default() -> Self {
        Self::new()
            .with(
                ImageFormat::Svg,
                ExportParams {
                    plain: true,
                    width: None,
                },
            )
            .with(ImageFormat::Png, ExportParams::default())
    }
}

impl ExportFormats {
    /// Empty mapping
    pub fn new() -> Self {
        Self {
            formats: IndexMap::new(),
        }
    }

    /// Add or replace a format, keeping its original position when replaced
    pub fn with(mut self, format: ImageFormat, params: ExportParams) -> Self {
        self.formats.insert(format, params);
        self
    }

    /// Build the mapping from CLI specs such as `svg:plain` or `png:width=600`
    pub fn from_specs<S: AsRef<str>>(specs: &[S]) -> Result<Self, String> {
        specs.iter().try_fold(Self::new(), |formats, spec| {
            let (format, params) = parse_format_spec(spec.as_ref())?;
            Ok(formats.with(format, params))
        })
    }

    /// Formats in order
    pub fn iter(&self) -> impl Iterator<Item = (ImageFormat, ExportParams)> + '_ {
        self.formats.iter().map(|(format, params)| (*format, *params))
    }

    /// Number of formats
    pub fn len(&self) -> usize {
        self.formats.len()
    }

    /// Whether no format is configured
    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}

/// Parse `format[:plain][:width=N]`
fn parse_format_spec(spec: &str) -> Result<(ImageFormat, ExportParams), String> {
    let mut parts = spec.split(':').map(str::trim);
    let format = ImageFormat::from_str(parts.next().unwrap_or_default())?;

    let mut params = ExportParams::default();
    for option in parts {
        match option.split_once('=') {
            None if option == "plain" => params.plain = true,
            Some(("width", value)) => {
                let width = value
                    .parse::<u32>()
                    .map_err(|_| format!("Invalid width '{value}' in format '{spec}'"))?;
                params.width = Some(width);
            }
            _ => {
                return Err(format!(
                    "Unknown option '{option}' in format '{spec}'. Valid options: plain, width=N"
                ))
            }
        }
    }

    Ok((format, params))
}

/// One file to export
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportTask {
    /// Chart ID
    pub chart_id: String,
    /// Raw chart title
    pub title: String,
    /// Sanitised filename without extension
    pub filename: String,
    /// Sanitised folder segments below the export root
    pub folder_path: Vec<String>,
    /// Output format
    pub output_format: ImageFormat,
    /// Export parameters for this format
    pub export_params: ExportParams,
}

/// Options for [`collect_export_tasks`]
#[derive(Debug, Clone, Default)]
pub struct CollectOptions {
    /// Formats to export for each chart
    pub export_formats: ExportFormats,
    /// Descend into child folders
    pub recursive: bool,
    /// Prune folders with exactly this name
    pub skip_folder_name: Option<String>,
    /// Publish unpublished charts before exporting
    pub publish: bool,
    /// Chart number lookup for filenames
    pub numbering: Option<ChartNumbering>,
}

impl CollectOptions {
    /// Options exporting `export_formats` from the root folder only
    pub fn new(export_formats: ExportFormats) -> Self {
        Self {
            export_formats,
            ..Self::default()
        }
    }

    /// Descend into child folders
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Prune folders with this exact name
    pub fn skip_folder(mut self, name: impl Into<String>) -> Self {
        self.skip_folder_name = Some(name.into());
        self
    }

    /// Publish unpublished charts before exporting
    pub fn publish(mut self, publish: bool) -> Self {
        self.publish = publish;
        self
    }

    /// Name files from a chart numbering table
    pub fn numbering(mut self, numbering: ChartNumbering) -> Self {
        self.numbering = Some(numbering);
        self
    }
}

/// Whether a folder is pruned by the skip rule (exact, case-sensitive)
pub(crate) fn is_skipped(folder_name: &str, skip_folder_name: Option<&str>) -> bool {
    skip_folder_name.is_some_and(|skip| skip == folder_name)
}

/// Collect export tasks below `folder_id`.
///
/// The root folder's own name is not part of any task path; each descendant
/// folder adds its sanitised name. Charts that fail with a per-item error
/// ([`crate::client::ApiError::is_per_item`]) are logged and left out; any
/// other error, and every folder error, aborts the walk. Publishing failures
/// only log a warning.
pub async fn collect_export_tasks<A: ChartApi + ?Sized>(
    api: &A,
    folder_id: u64,
    options: &CollectOptions,
) -> ApiResult<Vec<ExportTask>> {
    let tasks = collect_folder(api, folder_id, Vec::new(), true, options).await?;
    info!("Collected {} export tasks", tasks.len());
    Ok(tasks)
}

fn collect_folder<'a, A: ChartApi + ?Sized>(
    api: &'a A,
    folder_id: u64,
    parent_path: Vec<String>,
    is_root: bool,
    options: &'a CollectOptions,
) -> BoxFuture<'a, ApiResult<Vec<ExportTask>>> {
    Box::pin(async move {
        let folder = api.get_folder(folder_id).await?;

        if is_skipped(&folder.name, options.skip_folder_name.as_deref()) {
            info!("Skipping folder: {} ({})", folder.name, folder.id);
            return Ok(Vec::new());
        }

        let mut folder_path = parent_path;
        if !is_root {
            let segment = sanitize(&folder.name);
            if !segment.is_empty() {
                folder_path.push(segment);
            }
        }
        info!(
            "Processing folder: {} ({} charts)",
            folder.name,
            folder.charts.len()
        );

        let mut tasks = Vec::new();
        for chart_ref in &folder.charts {
            let chart = match api.get_chart(&chart_ref.id).await {
                Ok(chart) => chart,
                Err(e) if e.is_per_item() => {
                    error!("Skipping chart {}: {}", chart_ref.id, e);
                    continue;
                }
                Err(e) => return Err(e),
            };
            if chart.is_placeholder() {
                debug!("Skipping placeholder chart {}", chart.id);
                continue;
            }

            let filename = resolve_filename(&chart.id, &chart.title, options.numbering.as_ref());

            if options.publish && !chart.is_published() {
                match api.publish_chart(&chart.id).await {
                    Ok(()) => info!("Published chart {}", chart.id),
                    Err(e) => warn!("Failed to publish chart {}: {}", chart.id, e),
                }
            }

            for (format, params) in options.export_formats.iter() {
                tasks.push(ExportTask {
                    chart_id: chart.id.clone(),
                    title: chart.title.clone(),
                    filename: filename.clone(),
                    folder_path: folder_path.clone(),
                    output_format: format,
                    export_params: params,
                });
            }
        }

        if options.recursive {
            for child in &folder.children {
                let child_tasks =
                    collect_folder(api, child.id, folder_path.clone(), false, options).await?;
                tasks.extend(child_tasks);
            }
        }

        Ok(tasks)
    })
}
