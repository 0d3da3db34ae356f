//! List command implementation
//!
//! Dumps chart metadata of a folder tree into a spreadsheet that is then
//! filled in by hand to become the numbering table of the `export` command.

use crate::client::ChartApi;
use crate::collector::{collect_chart_metadata, ChartMetadata, MetadataOptions};
use crate::output::write_metadata;
use clap::Args;
use std::path::PathBuf;
use tracing::{info, warn};

use super::{Cli, CliError, OutputFormat};

/// Arguments of the `list` command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Datawrapper folder ID to list
    #[arg(long)]
    pub folder_id: u64,

    /// Output spreadsheet, .csv or .xlsx
    #[arg(long, default_value = "chart_numbering.xlsx")]
    pub out: PathBuf,

    /// Include charts from subfolders
    #[arg(long, default_value_t = false)]
    pub recursive: bool,

    /// Skip folders with exactly this name, including their subfolders
    #[arg(long)]
    pub skip_folder: Option<String>,

    /// Publish unpublished charts before fetching embed codes
    #[arg(long, default_value_t = false)]
    pub publish: bool,

    /// Record the static iframe code instead of the responsive one
    #[arg(long, default_value_t = false)]
    pub static_embed: bool,
}

impl ListArgs {
    /// Metadata options described by the arguments
    pub fn metadata_options(&self) -> MetadataOptions {
        MetadataOptions {
            recursive: self.recursive,
            skip_folder_name: self.skip_folder.clone(),
            publish: self.publish,
            responsive: !self.static_embed,
        }
    }

    /// Execute the list command
    pub async fn execute(&self, cli: &Cli) -> Result<(), CliError> {
        let client = cli.client()?;
        let rows = self.run(&client).await?;

        match cli.output_format {
            OutputFormat::Json => output_json(&self.out, &rows),
            OutputFormat::Human => output_human(&self.out, &rows),
        }
        Ok(())
    }

    /// Collect metadata and write the spreadsheet against any API implementation
    pub async fn run<A: ChartApi + ?Sized>(&self, api: &A) -> Result<Vec<ChartMetadata>, CliError> {
        info!("Listing charts from folder ID: {}", self.folder_id);
        let rows = collect_chart_metadata(api, self.folder_id, &self.metadata_options()).await?;

        if rows.is_empty() {
            warn!("No charts found in folder {}", self.folder_id);
        } else {
            write_metadata(&self.out, &rows)?;
        }
        Ok(rows)
    }
}

fn output_json(out: &std::path::Path, rows: &[ChartMetadata]) {
    let output = serde_json::json!({
        "success": true,
        "output_path": out.display().to_string(),
        "charts": rows,
    });
    println!("{output}");
}

fn output_human(out: &std::path::Path, rows: &[ChartMetadata]) {
    if rows.is_empty() {
        println!("No charts found in the specified folder.");
        return;
    }
    println!("Successfully saved {} charts to {}", rows.len(), out.display());
}
