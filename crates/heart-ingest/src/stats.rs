//! Dataset statistics logged after extraction.

use heart_model::Table;
use serde::Serialize;
use tracing::info;

/// Shape and missingness of an extracted table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetStats {
    pub rows: usize,
    pub columns: usize,
    /// Missing cell count per column, in column order.
    pub missing: Vec<(String, usize)>,
}

impl DatasetStats {
    pub fn from_table(table: &Table) -> Self {
        Self {
            rows: table.height(),
            columns: table.width(),
            missing: table
                .columns()
                .iter()
                .map(|c| (c.name.clone(), c.missing_count()))
                .collect(),
        }
    }

    pub fn total_missing(&self) -> usize {
        self.missing.iter().map(|(_, n)| n).sum()
    }

    pub fn log(&self) {
        info!(
            rows = self.rows,
            columns = self.columns,
            missing = self.total_missing(),
            "dataset statistics"
        );
        for (column, missing) in self.missing.iter().filter(|(_, n)| *n > 0) {
            info!(column = %column, missing, "missing values");
        }
    }
}
