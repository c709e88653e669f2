//! Wide-format table reader.
//!
//! A wide file has one header row and one row per trial. Parameters live
//! in the header labels, not in the cells. Rows are read with a flexible
//! reader so that a short row only fails when a missing cell is needed.

use crate::utils::error::ParseError;
use log::debug;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// In-memory wide table: header labels plus raw string rows
#[derive(Debug, Clone, Default)]
pub struct WideTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl WideTable {
    /// Build a table from already-split values (mostly useful in tests)
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Index of a header label, if present
    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == label)
    }

    /// Raw cell, `None` when the row is shorter than the header
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
    }

    /// Raw cell that must exist
    pub fn required_cell(&self, row: usize, column: usize) -> Result<&str, ParseError> {
        self.cell(row, column).ok_or_else(|| {
            ParseError::MissingField(format!(
                "{} (row {})",
                self.label(column),
                display_row(row)
            ))
        })
    }

    /// Parse a cell as a float; empty or malformed cells are errors
    pub fn number(&self, row: usize, column: usize) -> Result<f64, ParseError> {
        let raw = self.required_cell(row, column)?;
        parse_number(raw).ok_or_else(|| ParseError::MalformedNumber {
            column: self.label(column).to_string(),
            row: display_row(row),
            value: raw.to_string(),
        })
    }

    /// Parse a cell as a float, treating an absent or blank cell as `None`
    pub fn optional_number(&self, row: usize, column: usize) -> Result<Option<f64>, ParseError> {
        match self.cell(row, column) {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(_) => self.number(row, column).map(Some),
        }
    }

    fn label(&self, column: usize) -> &str {
        self.headers.get(column).map(String::as_str).unwrap_or("?")
    }
}

/// Row numbers in messages are 1-based data rows (the header is row 0)
pub fn display_row(row: usize) -> usize {
    row + 1
}

fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Read a wide table from any reader
///
/// # Errors
/// * `ParseError::EmptyInput` - no header row
/// * `ParseError::Csv` - malformed CSV
pub fn read_wide<R: Read>(reader: R) -> Result<WideTable, ParseError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(ParseError::EmptyInput);
    }

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    debug!("Read wide table: {} columns, {} rows", headers.len(), rows.len());

    Ok(WideTable { headers, rows })
}

/// Read a wide table from a file
pub fn read_wide_file(path: impl AsRef<Path>) -> Result<WideTable, ParseError> {
    let path = path.as_ref();
    debug!("Reading wide table from: {}", path.display());
    let file = File::open(path)?;
    read_wide(file)
}
