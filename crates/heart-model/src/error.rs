use thiserror::Error;

/// Structural errors raised by table operations.
///
/// Cell-level problems never surface here; they degrade to
/// [`Cell::Missing`](crate::Cell::Missing) instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("column '{column}' has {actual} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },
    #[error("column '{column}' not found")]
    MissingColumn { column: String },
    #[error("row mask has {actual} entries, table has {expected} rows")]
    MaskLength { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, TableError>;
