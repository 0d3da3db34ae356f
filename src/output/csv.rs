//! CSV metadata writer

use crate::collector::ChartMetadata;
use csv::Writer;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::{debug, info};

use super::{MetadataWriter, OutputError, OutputResult, OutputWriter};

/// CSV record for one chart, columns in spreadsheet order
#[derive(Debug, Serialize)]
struct ChartRecord<'a> {
    #[serde(rename = "Chart number")]
    chart_number: &'a str,
    #[serde(rename = "Chart ID")]
    chart_id: &'a str,
    #[serde(rename = "Chart title")]
    title: &'a str,
    #[serde(rename = "iframe code")]
    iframe_code: &'a str,
    #[serde(rename = "Folder path")]
    folder_path: &'a str,
}

impl<'a> From<&'a ChartMetadata> for ChartRecord<'a> {
    fn from(chart: &'a ChartMetadata) -> Self {
        Self {
            chart_number: &chart.chart_number,
            chart_id: &chart.chart_id,
            title: &chart.title,
            iframe_code: &chart.iframe_code,
            folder_path: &chart.folder_path,
        }
    }
}

/// CSV writer for chart metadata
pub struct CsvMetadataWriter {
    writer: Writer<BufWriter<File>>,
    rows_written: u64,
}

impl CsvMetadataWriter {
    /// Create a writer, creating parent directories as needed
    pub fn new<P: AsRef<Path>>(path: P) -> OutputResult<Self> {
        let path = path.as_ref();
        info!("Creating CSV writer: path={}", path.display());

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| OutputError::IoError(format!("Failed to create directory: {}", e)))?;
        }

        let file = File::create(path)
            .map_err(|e| OutputError::IoError(format!("Failed to create file: {}", e)))?;

        Ok(Self {
            writer: Writer::from_writer(BufWriter::new(file)),
            rows_written: 0,
        })
    }

    /// Number of rows written so far
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }
}

impl MetadataWriter for CsvMetadataWriter {
    fn write_chart(&mut self, chart: &ChartMetadata) -> OutputResult<()> {
        self.writer
            .serialize(ChartRecord::from(chart))
            .map_err(|e| OutputError::CsvError(format!("Failed to write chart {}: {}", chart.chart_id, e)))?;
        self.rows_written += 1;
        Ok(())
    }
}

impl OutputWriter for CsvMetadataWriter {
    fn flush(&mut self) -> OutputResult<()> {
        self.writer
            .flush()
            .map_err(|e| OutputError::IoError(format!("Failed to flush: {}", e)))
    }

    fn close(mut self) -> OutputResult<()> {
        if self.rows_written == 0 {
            // serialize() only emits headers alongside the first record
            self.writer
                .write_record(super::METADATA_COLUMNS)
                .map_err(|e| OutputError::CsvError(format!("Failed to write header: {}", e)))?;
        }
        self.flush()?;

        let buf_writer = self
            .writer
            .into_inner()
            .map_err(|e| OutputError::IoError(format!("Failed to get inner writer: {}", e)))?;
        let file = buf_writer
            .into_inner()
            .map_err(|e| OutputError::IoError(format!("Failed to get file handle: {}", e)))?;
        file.sync_all()
            .map_err(|e| OutputError::IoError(format!("Failed to sync file: {}", e)))?;

        debug!("CSV writer closed: {} rows written", self.rows_written);
        Ok(())
    }
}
