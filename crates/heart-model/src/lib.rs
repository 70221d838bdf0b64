//! Data model for the heart disease ETL pipeline.
//!
//! - **table**: positional, column-oriented [`Table`] of typed [`Cell`]s
//! - **schema**: the fixed column contract ([`Schema`], [`ColumnSpec`]) and
//!   the [`TargetPolicy`] that shapes it
//! - **error**: structural [`TableError`]s

pub mod error;
pub mod schema;
pub mod table;

pub use error::{Result, TableError};
pub use schema::{
    ColumnSpec, DEFAULT_SOURCE, HAS_DISEASE, Imputation, PROCESSED_AT_COLUMN, RAW_TARGET,
    SOURCE_COLUMN, Schema, SemanticType, TARGET, TargetPolicy, UCI_COLUMNS,
};
pub use table::{Cell, CellKey, Column, Table, format_numeric};
