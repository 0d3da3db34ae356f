//! Export command implementation

use crate::client::ChartApi;
use crate::collector::{collect_export_tasks, CollectOptions, ExportFormats};
use crate::exporter::{export_tasks_with_progress, ExportSummary, ExportTarget};
use crate::numbering::ChartNumbering;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::info;

use super::{Cli, CliError, OutputFormat};

/// Arguments of the `export` command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Datawrapper folder ID to export from
    #[arg(long)]
    pub folder_id: u64,

    /// Output directory
    #[arg(long, default_value = "charts")]
    pub out: PathBuf,

    /// Export format, repeatable: FORMAT[:plain][:width=N] (default: svg:plain and png)
    #[arg(long = "format", value_name = "FORMAT")]
    pub formats: Vec<String>,

    /// Include charts from subfolders
    #[arg(long, default_value_t = false)]
    pub recursive: bool,

    /// Skip folders with exactly this name, including their subfolders
    #[arg(long)]
    pub skip_folder: Option<String>,

    /// Publish unpublished charts before exporting
    #[arg(long, default_value_t = false)]
    pub publish: bool,

    /// Spreadsheet (.xlsx, .xls, .ods) or CSV with "Chart ID" and "Chart number" columns used to name files
    #[arg(long)]
    pub numbering: Option<PathBuf>,

    /// Write all files directly into the output directory
    #[arg(long, default_value_t = false)]
    pub flatten: bool,
}

impl ExportArgs {
    /// Collect options described by the arguments
    pub fn collect_options(&self) -> Result<CollectOptions, CliError> {
        let formats = if self.formats.is_empty() {
            ExportFormats::default()
        } else {
            ExportFormats::from_specs(&self.formats).map_err(CliError::InvalidArgument)?
        };

        let mut options = CollectOptions::new(formats)
            .recursive(self.recursive)
            .publish(self.publish);
        if let Some(skip) = &self.skip_folder {
            options = options.skip_folder(skip.clone());
        }
        if let Some(path) = &self.numbering {
            options = options.numbering(ChartNumbering::from_path(path)?);
        }
        Ok(options)
    }

    /// Export target described by the arguments
    pub fn target(&self) -> ExportTarget {
        ExportTarget::new(self.out.clone()).with_flatten(self.flatten)
    }

    /// Execute the export command
    pub async fn execute(&self, cli: &Cli) -> Result<(), CliError> {
        let client = cli.client()?;
        let options = self.collect_options()?;
        let summary = self.run(&client, &options).await?;

        match cli.output_format {
            OutputFormat::Json => output_json(&self.out, &summary),
            OutputFormat::Human => output_human(&self.out, &summary),
        }
        Ok(())
    }

    /// Collect and export against any API implementation
    pub async fn run<A: ChartApi + ?Sized>(
        &self,
        api: &A,
        options: &CollectOptions,
    ) -> Result<ExportSummary, CliError> {
        info!(
            "Exporting folder {} to {}",
            self.folder_id,
            self.out.display()
        );
        let tasks = collect_export_tasks(api, self.folder_id, options).await?;

        let progress = create_progress_bar(tasks.len() as u64);
        let result = export_tasks_with_progress(api, &tasks, &self.target(), |done| {
            progress.set_position(done as u64)
        })
        .await;
        progress.finish_and_clear();

        Ok(result?)
    }
}

fn output_json(out: &std::path::Path, summary: &ExportSummary) {
    let output = serde_json::json!({
        "success": true,
        "output_path": out.display().to_string(),
        "exported": summary.exported,
        "skipped": summary.skipped,
    });
    println!("{output}");
}

fn output_human(out: &std::path::Path, summary: &ExportSummary) {
    println!("\nExport completed!");
    println!("Output: {}", out.display());
    println!("Files exported: {}", summary.exported);
    if !summary.skipped.is_empty() {
        println!("Skipped: {}", summary.skipped.len());
        for skipped in &summary.skipped {
            println!("  {} ({}): {}", skipped.chart_id, skipped.format, skipped.reason);
        }
    }
}

fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb.set_message("Exporting charts");
    pb
}
