//! Main entry point for the datawrapper-export CLI

use clap::Parser;
use datawrapper_export::cli::{Cli, Commands};
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber with optional JSON formatting
fn init_tracing() {
    let json_format = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("datawrapper_export=info"));

    if json_format {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Export(ref args) => args.execute(&cli).await.map_err(|e| anyhow::anyhow!(e)),
        Commands::List(ref args) => args.execute(&cli).await.map_err(|e| anyhow::anyhow!(e)),
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        std::process::exit(1);
    }
}
