//! Exact duplicate row removal.

use std::collections::HashSet;

use heart_model::Table;
use tracing::info;

use crate::error::{Result, TransformError};
use crate::report::{StepCounts, Transformed};

const STEP: &str = "drop_duplicates";

/// Marks the first occurrence of every distinct row.
pub fn first_occurrences(table: &Table) -> Vec<bool> {
    let mut seen = HashSet::with_capacity(table.height());
    (0..table.height())
        .map(|idx| seen.insert(table.row_key(idx)))
        .collect()
}

/// Removes rows equal to an earlier row across all columns.
///
/// Survivors keep their relative order and are renumbered positionally.
pub fn drop_duplicates(table: Table) -> Result<Transformed> {
    let keep = first_occurrences(&table);
    let duplicates = keep.iter().filter(|keep| !**keep).count();
    if duplicates == 0 {
        info!("no duplicate records found");
        return Ok(Transformed::unchanged_counts(table));
    }
    let table = table
        .filter_rows(&keep)
        .map_err(|e| TransformError::table(STEP, e))?;
    info!(duplicates, "removed duplicate records");
    Ok(Transformed::new(
        table,
        StepCounts {
            duplicates_removed: duplicates,
            ..StepCounts::default()
        },
    ))
}
