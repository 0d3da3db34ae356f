//! Chart numbering lookup
//!
//! Maps chart IDs to the human-assigned chart numbers used as export
//! filenames. The table is read once per run, either from the first sheet
//! of the numbering workbook written by `list` or from a CSV export of it.
//! Both need at least the columns `Chart ID` and `Chart number`.

use calamine::{open_workbook_auto, Data, Reader};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Column holding the chart ID
pub const CHART_ID_COLUMN: &str = "Chart ID";

/// Column holding the chart number
pub const CHART_NUMBER_COLUMN: &str = "Chart number";

/// Errors loading the numbering table
#[derive(Debug, thiserror::Error)]
pub enum NumberingError {
    /// File could not be opened
    #[error("failed to open {path}: {reason}")]
    Io {
        /// File path
        path: String,
        /// Underlying error
        reason: String,
    },

    /// Malformed CSV
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Unreadable workbook
    #[error("spreadsheet error: {0}")]
    Sheet(#[from] calamine::Error),

    /// Workbook without a sheet or without a header row
    #[error("no header row in {0}")]
    EmptySheet(String),

    /// A required column is absent from the header
    #[error("missing column '{0}'")]
    MissingColumn(&'static str),
}

/// Outcome of looking up a chart ID
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberLookup<'a> {
    /// Row found with a non-blank number
    Found(&'a str),
    /// Row found but the number cell is blank
    Blank,
    /// No row for this chart ID
    Missing,
}

/// In-memory `Chart ID → Chart number` table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartNumbering {
    entries: HashMap<String, Option<String>>,
}

impl ChartNumbering {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the table from `path`, choosing the reader from its extension.
    ///
    /// `.xlsx`, `.xlsm`, `.xls` and `.ods` are read as workbooks (first sheet),
    /// anything else as CSV.
    pub fn from_path(path: &Path) -> Result<Self, NumberingError> {
        let is_workbook = path.extension().is_some_and(|ext| {
            WORKBOOK_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        });

        if is_workbook {
            Self::from_workbook_path(path)
        } else {
            Self::from_csv_path(path)
        }
    }

    /// Load the table from the first sheet of a workbook
    pub fn from_workbook_path(path: &Path) -> Result<Self, NumberingError> {
        let mut workbook = open_workbook_auto(path).map_err(|e| NumberingError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| NumberingError::EmptySheet(path.display().to_string()))??;

        let mut rows = range.rows();
        let headers: Vec<String> = rows
            .next()
            .ok_or_else(|| NumberingError::EmptySheet(path.display().to_string()))?
            .iter()
            .map(cell_text)
            .collect();
        let id_idx = column_index(headers.iter().map(String::as_str), CHART_ID_COLUMN)?;
        let number_idx = column_index(headers.iter().map(String::as_str), CHART_NUMBER_COLUMN)?;

        let mut numbering = Self::new();
        for row in rows {
            let chart_id = row.get(id_idx).map(cell_text).unwrap_or_default();
            let number = row.get(number_idx).map(cell_text).unwrap_or_default();
            numbering.push_row(&chart_id, &number);
        }

        info!(
            "Loaded {} chart numbers from {}",
            numbering.len(),
            path.display()
        );
        Ok(numbering)
    }

    /// Load the table from a CSV file
    pub fn from_csv_path(path: &Path) -> Result<Self, NumberingError> {
        let reader = csv::Reader::from_path(path).map_err(|e| NumberingError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let numbering = Self::from_csv_reader(reader)?;
        info!(
            "Loaded {} chart numbers from {}",
            numbering.len(),
            path.display()
        );
        Ok(numbering)
    }

    /// Load the table from any CSV reader
    pub fn from_csv_reader<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Self, NumberingError> {
        let headers = reader.headers()?.clone();
        let id_idx = column_index(headers.iter(), CHART_ID_COLUMN)?;
        let number_idx = column_index(headers.iter(), CHART_NUMBER_COLUMN)?;

        let mut numbering = Self::new();
        for record in reader.records() {
            let record = record?;
            numbering.push_row(
                record.get(id_idx).unwrap_or_default(),
                record.get(number_idx).unwrap_or_default(),
            );
        }

        Ok(numbering)
    }

    /// Add a data row, ignoring rows without an ID and repeated IDs
    fn push_row(&mut self, chart_id: &str, number: &str) {
        let chart_id = chart_id.trim();
        if chart_id.is_empty() {
            debug!("Skipping numbering row without chart ID");
            return;
        }
        if self.entries.contains_key(chart_id) {
            warn!("Duplicate chart ID {} in numbering table, keeping first", chart_id);
            return;
        }
        self.insert(chart_id, Some(number));
    }

    /// Add an entry; `None` or a blank string records a blank number cell
    pub fn insert(&mut self, chart_id: impl Into<String>, number: Option<&str>) {
        let number = number
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        self.entries.insert(chart_id.into(), number);
    }

    /// Look up a chart ID
    pub fn lookup(&self, chart_id: &str) -> NumberLookup<'_> {
        match self.entries.get(chart_id) {
            Some(Some(number)) => NumberLookup::Found(number),
            Some(None) => NumberLookup::Blank,
            None => NumberLookup::Missing,
        }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Extensions read as workbooks
const WORKBOOK_EXTENSIONS: [&str; 4] = ["xlsx", "xlsm", "xls", "ods"];

fn column_index<'a>(
    mut headers: impl Iterator<Item = &'a str>,
    name: &'static str,
) -> Result<usize, NumberingError> {
    headers
        .position(|h| h.trim() == name)
        .ok_or(NumberingError::MissingColumn(name))
}

/// Cell contents as text; whole numbers typed into the sheet lose their `.0`
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}
