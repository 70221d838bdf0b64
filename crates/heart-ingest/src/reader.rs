//! CSV reading into a raw text [`Table`].

use std::path::Path;

use heart_model::{Cell, Column, Table, UCI_COLUMNS};
use polars::prelude::{AnyValue, CsvReadOptions, DataFrame, SerReader};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{IngestError, Result};
use crate::stats::DatasetStats;

/// Cell texts treated as missing, compared case-insensitively after trimming.
pub const MISSING_MARKERS: [&str; 4] = ["?", "na", "nan", "null"];

/// How the input file is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractOptions {
    /// First line holds column names. Without it the UCI column order applies.
    pub has_header: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self { has_header: true }
    }
}

impl ExtractOptions {
    #[must_use]
    pub fn with_has_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }
}

/// Converts a raw CSV value to a cell. Missing markers become [`Cell::Missing`].
pub fn raw_cell(value: &str) -> Cell {
    let trimmed = value.trim();
    if trimmed.is_empty()
        || MISSING_MARKERS
            .iter()
            .any(|marker| trimmed.eq_ignore_ascii_case(marker))
    {
        Cell::Missing
    } else {
        Cell::Text(trimmed.to_string())
    }
}

fn any_to_cell(value: AnyValue) -> Cell {
    match value {
        AnyValue::Null => Cell::Missing,
        AnyValue::String(s) => raw_cell(s),
        AnyValue::StringOwned(s) => raw_cell(s.as_str()),
        other => raw_cell(&other.to_string()),
    }
}

fn read_frame(path: &Path, has_header: bool) -> Result<DataFrame> {
    let parse_error = |e: polars::prelude::PolarsError| IngestError::CsvParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    };
    // Schema inference is disabled so every column is read as text.
    CsvReadOptions::default()
        .with_has_header(has_header)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(parse_error)?
        .finish()
        .map_err(parse_error)
}

fn frame_to_table(df: &DataFrame, names: Option<&[&str]>) -> Result<Table> {
    let height = df.height();
    let mut columns = Vec::with_capacity(df.width());
    for (idx, series) in df.get_columns().iter().enumerate() {
        let name = match names {
            Some(names) => names[idx].to_string(),
            None => series.name().to_string(),
        };
        let mut cells = Vec::with_capacity(height);
        for row in 0..height {
            cells.push(any_to_cell(series.get(row)?));
        }
        columns.push(Column::new(name, cells));
    }
    Ok(Table::new(columns)?)
}

/// Reads a CSV file into a table of raw text cells.
///
/// Type decisions are left to the transformation engine; this only maps
/// missing markers to [`Cell::Missing`].
pub fn extract_csv(path: &Path, options: &ExtractOptions) -> Result<Table> {
    if !path.exists() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    info!(path = %path.display(), has_header = options.has_header, "extracting dataset");

    let df = read_frame(path, options.has_header)?;
    let table = if options.has_header {
        frame_to_table(&df, None)?
    } else {
        if df.width() != UCI_COLUMNS.len() {
            return Err(IngestError::ColumnCount {
                path: path.to_path_buf(),
                expected: UCI_COLUMNS.len(),
                actual: df.width(),
            });
        }
        debug!("applying UCI column names");
        frame_to_table(&df, Some(UCI_COLUMNS.as_slice()))?
    };

    DatasetStats::from_table(&table).log();
    Ok(table)
}
