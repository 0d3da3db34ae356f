//! Output helpers and metadata writers
//!
//! - [`sanitize`] - Filesystem-safe names
//! - [`path`] - Export destination paths
//! - [`csv`] / [`xlsx`] - Chart metadata spreadsheets

use crate::collector::ChartMetadata;
use std::path::Path;
use tracing::info;

pub mod csv;
pub mod path;
pub mod sanitize;
pub mod xlsx;

pub use path::ExportPathBuilder;
pub use sanitize::sanitize;

/// Header row of the metadata spreadsheet
pub const METADATA_COLUMNS: [&str; 5] = [
    "Chart number",
    "Chart ID",
    "Chart title",
    "iframe code",
    "Folder path",
];

/// Output writer errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// IO error
    #[error("IO error: {0}")]
    IoError(String),

    /// CSV write error
    #[error("CSV error: {0}")]
    CsvError(String),

    /// XLSX write error
    #[error("XLSX error: {0}")]
    XlsxError(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Generic output writer trait
pub trait OutputWriter {
    /// Flush any buffered data to disk
    fn flush(&mut self) -> OutputResult<()>;

    /// Close the writer and finalize output
    fn close(self) -> OutputResult<()>;
}

/// Trait for writing chart metadata rows
pub trait MetadataWriter: OutputWriter {
    /// Write a single row
    fn write_chart(&mut self, chart: &ChartMetadata) -> OutputResult<()>;

    /// Write multiple rows at once
    fn write_charts(&mut self, charts: &[ChartMetadata]) -> OutputResult<()> {
        for chart in charts {
            self.write_chart(chart)?;
        }
        Ok(())
    }
}

/// Write metadata rows to `path`, choosing the format from its extension.
///
/// `.xlsx` produces a workbook, anything else CSV.
pub fn write_metadata(path: &Path, charts: &[ChartMetadata]) -> OutputResult<()> {
    let is_xlsx = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"));

    if is_xlsx {
        let mut writer = xlsx::XlsxMetadataWriter::new(path)?;
        writer.write_charts(charts)?;
        writer.close()?;
    } else {
        let mut writer = csv::CsvMetadataWriter::new(path)?;
        writer.write_charts(charts)?;
        writer.close()?;
    }

    info!("Saved {} charts to {}", charts.len(), path.display());
    Ok(())
}
