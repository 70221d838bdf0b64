//! Lineage metadata columns.

use chrono::{DateTime, SecondsFormat, Utc};
use heart_model::{Cell, PROCESSED_AT_COLUMN, SOURCE_COLUMN, Table};
use tracing::info;

use crate::report::Transformed;

/// Text form of a lineage timestamp (RFC 3339, microseconds, UTC).
pub fn format_processed_at(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Stamps every row with `source` and a single run timestamp.
///
/// Existing lineage columns are overwritten in place, so re-annotating a
/// table never duplicates them.
pub fn annotate_lineage(mut table: Table, source: &str, processed_at: DateTime<Utc>) -> Transformed {
    let stamp = Cell::Text(format_processed_at(processed_at));
    table.set_constant(SOURCE_COLUMN, &Cell::Text(source.to_string()));
    table.set_constant(PROCESSED_AT_COLUMN, &stamp);
    info!(source, processed_at = %stamp, "added metadata columns");
    Transformed::unchanged_counts(table)
}
