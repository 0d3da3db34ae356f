//! XLSX metadata writer
//!
//! The workbook is buffered in memory and written on [`OutputWriter::close`].

use crate::collector::ChartMetadata;
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{MetadataWriter, OutputError, OutputResult, OutputWriter, METADATA_COLUMNS};

const SHEET_NAME: &str = "Charts";

fn xlsx_error(e: XlsxError) -> OutputError {
    OutputError::XlsxError(e.to_string())
}

/// Single-sheet workbook writer for chart metadata
pub struct XlsxMetadataWriter {
    path: PathBuf,
    workbook: Workbook,
    next_row: u32,
}

impl XlsxMetadataWriter {
    /// Create a writer and emit the header row
    pub fn new<P: AsRef<Path>>(path: P) -> OutputResult<Self> {
        let path = path.as_ref().to_path_buf();
        info!("Creating XLSX writer: path={}", path.display());

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| OutputError::IoError(format!("Failed to create directory: {}", e)))?;
        }

        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME).map_err(xlsx_error)?;
        for (col, name) in METADATA_COLUMNS.iter().enumerate() {
            sheet
                .write_string_with_format(0, col as u16, *name, &header)
                .map_err(xlsx_error)?;
        }
        sheet.set_freeze_panes(1, 0).map_err(xlsx_error)?;

        Ok(Self {
            path,
            workbook,
            next_row: 1,
        })
    }

    /// Number of data rows written so far
    pub fn rows_written(&self) -> u32 {
        self.next_row - 1
    }
}

impl MetadataWriter for XlsxMetadataWriter {
    fn write_chart(&mut self, chart: &ChartMetadata) -> OutputResult<()> {
        let row = self.next_row;
        let sheet = self.workbook.worksheet_from_index(0).map_err(xlsx_error)?;
        let cells = [
            chart.chart_number.as_str(),
            chart.chart_id.as_str(),
            chart.title.as_str(),
            chart.iframe_code.as_str(),
            chart.folder_path.as_str(),
        ];
        for (col, value) in cells.iter().enumerate() {
            sheet
                .write_string(row, col as u16, *value)
                .map_err(xlsx_error)?;
        }
        self.next_row += 1;
        Ok(())
    }
}

impl OutputWriter for XlsxMetadataWriter {
    fn flush(&mut self) -> OutputResult<()> {
        // Nothing reaches disk before close
        Ok(())
    }

    fn close(mut self) -> OutputResult<()> {
        let rows = self.rows_written();
        let sheet = self.workbook.worksheet_from_index(0).map_err(xlsx_error)?;
        sheet.autofit();
        self.workbook.save(&self.path).map_err(xlsx_error)?;
        debug!("XLSX writer closed: {} rows written", rows);
        Ok(())
    }
}
