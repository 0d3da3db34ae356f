//! CLI error types and conversions

use crate::client::{ApiError, ConfigError};
use crate::numbering::NumberingError;
use crate::output::OutputError;

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration error
    #[error("configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    /// API error
    #[error("API error: {0}")]
    ApiError(#[from] ApiError),

    /// Numbering table error
    #[error("numbering error: {0}")]
    NumberingError(#[from] NumberingError),

    /// Output error
    #[error("output error: {0}")]
    OutputError(#[from] OutputError),

    /// Invalid argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
