//! Error types for dataset extraction.

use std::path::PathBuf;

use heart_model::TableError;
use thiserror::Error;

/// Errors that can occur while reading the raw dataset.
#[derive(Debug, Error)]
pub enum IngestError {
    /// CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to parse CSV with Polars.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// A header-less file does not have the expected number of columns.
    #[error("expected {expected} columns in header-less file {path}, found {actual}")]
    ColumnCount {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },

    /// The extracted columns did not form a valid table.
    #[error(transparent)]
    Table(#[from] TableError),
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
