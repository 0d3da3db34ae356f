//! CLI command implementations

pub mod args;
pub mod error;
pub mod export;
pub mod list;

pub use args::{Cli, Commands, OutputFormat};
pub use error::CliError;
pub use export::ExportArgs;
pub use list::ListArgs;
