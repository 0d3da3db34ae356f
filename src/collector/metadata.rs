//! Chart metadata walk for the `list` command
//!
//! Produces one [`ChartMetadata`] row per chart. Unlike the export walk it
//! keeps going when something fails: a chart that cannot be fetched still gets
//! a row with error markers, and a folder that cannot be fetched below the
//! root is logged and left out.

use crate::client::{ApiResult, ChartApi};
use futures::future::BoxFuture;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::is_skipped;

/// Title recorded when `get_chart` fails
pub const TITLE_ERROR: &str = "Error retrieving title";

/// iframe code recorded when the embed code cannot be fetched
pub const IFRAME_ERROR: &str = "Error retrieving iframe code";

/// One row of the metadata spreadsheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartMetadata {
    /// Chart number, left blank for the numbering table to be filled in by hand
    pub chart_number: String,
    /// Chart ID
    pub chart_id: String,
    /// Chart title
    pub title: String,
    /// iframe embed code
    pub iframe_code: String,
    /// `/`-joined folder names, root included
    pub folder_path: String,
}

/// Options for [`collect_chart_metadata`]
#[derive(Debug, Clone)]
pub struct MetadataOptions {
    /// Descend into child folders
    pub recursive: bool,
    /// Prune folders with exactly this name
    pub skip_folder_name: Option<String>,
    /// Publish unpublished charts first so their embed codes resolve
    pub publish: bool,
    /// Fetch the responsive embed code instead of the static one
    pub responsive: bool,
}

impl Default for MetadataOptions {
    fn default() -> Self {
        Self {
            recursive: false,
            skip_folder_name: None,
            publish: false,
            responsive: true,
        }
    }
}

/// Collect metadata rows for every chart below `folder_id`.
///
/// Only a failure fetching the root folder is returned as an error.
pub async fn collect_chart_metadata<A: ChartApi + ?Sized>(
    api: &A,
    folder_id: u64,
    options: &MetadataOptions,
) -> ApiResult<Vec<ChartMetadata>> {
    let rows = metadata_folder(api, folder_id, String::new(), true, options).await?;
    info!("Collected metadata for {} charts", rows.len());
    Ok(rows)
}

fn metadata_folder<'a, A: ChartApi + ?Sized>(
    api: &'a A,
    folder_id: u64,
    parent_path: String,
    is_root: bool,
    options: &'a MetadataOptions,
) -> BoxFuture<'a, ApiResult<Vec<ChartMetadata>>> {
    Box::pin(async move {
        let folder = match api.get_folder(folder_id).await {
            Ok(folder) => folder,
            Err(e) if is_root => return Err(e),
            Err(e) => {
                error!("Error processing folder {}: {}", folder_id, e);
                return Ok(Vec::new());
            }
        };

        if is_skipped(&folder.name, options.skip_folder_name.as_deref()) {
            info!("Skipping folder: {} ({})", folder.name, folder.id);
            return Ok(Vec::new());
        }

        let current_path = if parent_path.is_empty() {
            folder.name.clone()
        } else {
            format!("{}/{}", parent_path, folder.name)
        };
        info!("Processing folder: {}", current_path);

        let mut rows = Vec::new();
        for chart_ref in &folder.charts {
            if let Some(row) = chart_row(api, &chart_ref.id, &current_path, options).await {
                rows.push(row);
            }
        }

        if options.recursive {
            for child in &folder.children {
                let child_rows =
                    metadata_folder(api, child.id, current_path.clone(), false, options).await?;
                rows.extend(child_rows);
            }
        }

        Ok(rows)
    })
}

/// Build the row for one chart, `None` for placeholders
async fn chart_row<A: ChartApi + ?Sized>(
    api: &A,
    chart_id: &str,
    folder_path: &str,
    options: &MetadataOptions,
) -> Option<ChartMetadata> {
    let chart = match api.get_chart(chart_id).await {
        Ok(chart) => chart,
        Err(e) => {
            error!("Error getting details for chart {}: {}", chart_id, e);
            return Some(ChartMetadata {
                chart_number: String::new(),
                chart_id: chart_id.to_string(),
                title: TITLE_ERROR.to_string(),
                iframe_code: IFRAME_ERROR.to_string(),
                folder_path: folder_path.to_string(),
            });
        }
    };

    if chart.is_placeholder() {
        debug!("Skipping placeholder chart {}", chart.id);
        return None;
    }

    if options.publish && !chart.is_published() {
        match api.publish_chart(&chart.id).await {
            Ok(()) => info!("Published chart {}", chart.id),
            Err(e) => warn!("Failed to publish chart {}: {}", chart.id, e),
        }
    }

    let iframe_code = match api.get_iframe_code(&chart.id, options.responsive).await {
        Ok(code) => code,
        Err(e) => {
            warn!("Could not get iframe code for chart {}: {}", chart.id, e);
            IFRAME_ERROR.to_string()
        }
    };

    debug!("Found chart: {} - {}", chart.id, chart.title);
    Some(ChartMetadata {
        chart_number: String::new(),
        chart_id: chart.id,
        title: chart.title,
        iframe_code,
        folder_path: folder_path.to_string(),
    })
}
