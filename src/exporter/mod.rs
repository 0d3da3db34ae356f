//! Export driver
//!
//! Runs [`ExportTask`]s one at a time against a [`ChartApi`], writing each
//! rendered file below an [`ExportTarget`]. Failures that only concern one
//! chart (malformed response, 4xx) are logged and recorded; anything else
//! aborts the batch.

use crate::client::{ApiError, ApiResult, ChartApi, ExportHeight, ExportOptions};
use crate::collector::ExportTask;
use crate::output::{ExportPathBuilder, OutputError};
use crate::ImageFormat;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{error, info};

/// Where exports are written
#[derive(Debug, Clone)]
pub struct ExportTarget {
    /// Base directory
    pub base_path: PathBuf,
    /// Write every file directly into `base_path`
    pub flatten: bool,
}

impl ExportTarget {
    /// Target mirroring the folder hierarchy below `base_path`
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            flatten: false,
        }
    }

    /// Write every file directly into the base directory
    pub fn with_flatten(mut self, flatten: bool) -> Self {
        self.flatten = flatten;
        self
    }

    fn path_builder(&self) -> ExportPathBuilder {
        ExportPathBuilder::new(self.base_path.clone()).with_flatten(self.flatten)
    }
}

/// An export that was skipped after a per-chart failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedExport {
    /// Chart ID
    pub chart_id: String,
    /// Format that failed
    pub format: ImageFormat,
    /// Error message
    pub reason: String,
}

/// Outcome of an export batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    /// Files written
    pub exported: usize,
    /// Exports skipped after per-chart failures
    pub skipped: Vec<SkippedExport>,
}

impl ExportSummary {
    /// Total number of tasks processed
    pub fn total(&self) -> usize {
        self.exported + self.skipped.len()
    }
}

/// Request options for a task
pub fn export_options(task: &ExportTask) -> ExportOptions {
    ExportOptions {
        width: task.export_params.width,
        height: ExportHeight::Auto,
        border_width: 0,
        plain: task.export_params.plain,
    }
}

/// Export every task in order.
///
/// `on_progress` is called after each task with the number processed so far.
pub async fn export_tasks_with_progress<A, F>(
    api: &A,
    tasks: &[ExportTask],
    target: &ExportTarget,
    mut on_progress: F,
) -> ApiResult<ExportSummary>
where
    A: ChartApi + ?Sized,
    F: FnMut(usize),
{
    let paths = target.path_builder();
    let mut summary = ExportSummary::default();

    for (index, task) in tasks.iter().enumerate() {
        paths
            .ensure_directory(&task.folder_path)
            .map_err(output_to_api)?;
        let filepath = paths.file_path(&task.folder_path, &task.filename, task.output_format);

        let options = export_options(task);
        match api
            .export_chart(&task.chart_id, task.output_format, &filepath, &options)
            .await
        {
            Ok(()) => {
                info!("Exported {}", filepath.display());
                summary.exported += 1;
            }
            Err(e) if e.is_per_item() => {
                error!(
                    "Skipping {} export of chart {}: {}",
                    task.output_format, task.chart_id, e
                );
                summary.skipped.push(SkippedExport {
                    chart_id: task.chart_id.clone(),
                    format: task.output_format,
                    reason: e.to_string(),
                });
            }
            Err(e) => {
                error!(
                    "Aborting export at chart {} ({}): {}",
                    task.chart_id, task.output_format, e
                );
                return Err(e);
            }
        }

        on_progress(index + 1);
    }

    info!(
        "Export finished: {} exported, {} skipped",
        summary.exported,
        summary.skipped.len()
    );
    Ok(summary)
}

/// Export every task in order
pub async fn export_tasks<A: ChartApi + ?Sized>(
    api: &A,
    tasks: &[ExportTask],
    target: &ExportTarget,
) -> ApiResult<ExportSummary> {
    export_tasks_with_progress(api, tasks, target, |_| {}).await
}

fn output_to_api(err: OutputError) -> ApiError {
    ApiError::Io(std::io::Error::other(err.to_string()))
}
