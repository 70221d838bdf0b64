//! Error types for loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while converting or writing records.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A non-nullable column is absent from the transformed table.
    #[error("required column '{column}' not found")]
    MissingColumn { column: String },

    /// A non-nullable cell is missing.
    #[error("row {row}: '{column}' is required but missing")]
    MissingValue { row: usize, column: String },

    /// A cell does not hold the type its column is stored as.
    #[error("row {row}: '{column}' expected {expected}, found '{value}'")]
    InvalidValue {
        row: usize,
        column: String,
        expected: &'static str,
        value: String,
    },

    /// Batches must hold at least one record.
    #[error("batch size must be at least 1")]
    InvalidBatchSize,

    /// Failed to create an output location.
    #[error("failed to prepare {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for load operations.
pub type Result<T> = std::result::Result<T, LoadError>;
