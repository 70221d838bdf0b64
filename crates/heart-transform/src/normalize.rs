//! Column name normalization.

use std::collections::HashSet;

use heart_model::{Column, RAW_TARGET, TARGET, Table};
use tracing::{info, warn};

/// Lower-cases a column name and replaces spaces with underscores.
pub fn normalize_column_name(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// Canonicalizes every column name and renames `num` to `target`.
///
/// Cannot fail; a table without a `num` column only gets its names
/// canonicalized.
pub fn normalize_columns(mut table: Table) -> Table {
    for column in table.columns_mut() {
        column.name = normalize_column_name(&column.name);
        if column.name == RAW_TARGET {
            column.name = TARGET.to_string();
            info!("renamed '{RAW_TARGET}' column to '{TARGET}'");
        }
    }
    let mut seen = HashSet::new();
    for column in table.columns() {
        if !seen.insert(column.name.as_str()) {
            warn!(column = %column.name, "duplicate column name after normalization");
        }
    }
    info!(columns = %join_names(table.columns()), "standardized column names");
    table
}

fn join_names(columns: &[Column]) -> String {
    columns
        .iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
