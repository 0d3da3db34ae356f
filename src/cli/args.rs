//! Command line definition and shared setup

use crate::client::config::{DEFAULT_MAX_RETRIES, MAX_RETRIES_LIMIT};
use crate::client::{ApiConfig, DatawrapperClient, RetryPolicy};
use clap::{Parser, Subcommand};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

use super::{CliError, ExportArgs, ListArgs};

/// Parse a non-negative number of seconds that fits a [`Duration`]
fn parse_wait_secs(s: &str) -> Result<Duration, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number of seconds"))?;

    Duration::try_from_secs_f64(value)
        .map_err(|_| format!("base wait must be a non-negative number of seconds, got '{s}'"))
}

/// Datawrapper export CLI
#[derive(Parser, Debug)]
#[command(name = "datawrapper-export")]
#[command(about = "Export Datawrapper charts and chart metadata", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (json or human)
    #[arg(long, global = true, default_value = "human")]
    pub output_format: OutputFormat,

    /// Maximum number of attempts per API request (default: 5, range: 1-20)
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_RETRIES, value_parser = clap::value_parser!(u32).range(1..=MAX_RETRIES_LIMIT as i64))]
    pub max_retries: u32,

    /// Initial backoff in seconds, doubled after every failed attempt
    #[arg(long, global = true, default_value = "1", value_parser = parse_wait_secs)]
    pub base_wait_secs: Duration,

    /// Datawrapper API base URL
    #[arg(long, global = true, env = "DATAWRAPPER_API_BASE")]
    pub api_base_url: Option<String>,
}

impl Cli {
    /// Build and validate the API configuration.
    ///
    /// The token always comes from `DATAWRAPPER_API_TOKEN`.
    pub fn api_config(&self) -> Result<ApiConfig, CliError> {
        let mut config = ApiConfig::from_env()?;
        if let Some(base_url) = &self.api_base_url {
            config = config.with_base_url(base_url)?;
        }
        let retry = RetryPolicy::new(self.max_retries, self.base_wait_secs);
        let config = config.with_retry(retry)?;
        debug!("API configuration: {:?}", config);
        Ok(config)
    }

    /// Build the API client from [`Cli::api_config`]
    pub fn client(&self) -> Result<DatawrapperClient, CliError> {
        Ok(DatawrapperClient::new(self.api_config()?)?)
    }
}

/// CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export charts of a folder tree as image files
    Export(ExportArgs),

    /// Write chart metadata of a folder tree to a spreadsheet
    List(ListArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Human-readable output
    Human,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "human" => Ok(OutputFormat::Human),
            _ => Err(format!("Invalid output format: {s}")),
        }
    }
}
