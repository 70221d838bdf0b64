//! Error types for the transformation engine.

use heart_model::TableError;
use thiserror::Error;

/// Fatal errors that abort a transformation run.
///
/// Unparsable or out-of-domain cells are not errors; they are degraded to
/// missing and imputed. Only structural problems end up here.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A step needed a column that the table does not have.
    #[error("{step}: required column '{column}' not found")]
    MissingColumn { step: &'static str, column: String },

    /// A table operation violated a structural invariant.
    #[error("{step}: {source}")]
    Table {
        step: &'static str,
        #[source]
        source: TableError,
    },
}

impl TransformError {
    /// Attach the failing step's name to a table error.
    pub(crate) fn table(step: &'static str, source: TableError) -> Self {
        match source {
            TableError::MissingColumn { column } => Self::MissingColumn { step, column },
            other => Self::Table {
                step,
                source: other,
            },
        }
    }
}

/// Result type for transformation operations.
pub type Result<T> = std::result::Result<T, TransformError>;
