//! Step outputs and the run report.

use heart_model::{Table, TargetPolicy};
use serde::Serialize;

/// Counters a step reports about what it changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StepCounts {
    /// Present cells that could not be coerced and became missing.
    pub cells_invalidated: usize,
    /// Missing cells filled by median or mode.
    pub cells_imputed: usize,
    /// Rows removed because of high missingness.
    pub rows_dropped: usize,
    /// Out-of-domain cells replaced by a valid value.
    pub cells_corrected: usize,
    /// Duplicate rows removed.
    pub duplicates_removed: usize,
    /// Cells rewritten to `YYYY-MM-DD`.
    pub dates_standardized: usize,
}

impl StepCounts {
    pub fn merge(&mut self, other: Self) {
        self.cells_invalidated += other.cells_invalidated;
        self.cells_imputed += other.cells_imputed;
        self.rows_dropped += other.rows_dropped;
        self.cells_corrected += other.cells_corrected;
        self.duplicates_removed += other.duplicates_removed;
        self.dates_standardized += other.dates_standardized;
    }
}

/// A step's output table together with its counters.
#[derive(Debug, Clone)]
pub struct Transformed {
    pub table: Table,
    pub counts: StepCounts,
}

impl Transformed {
    pub fn new(table: Table, counts: StepCounts) -> Self {
        Self { table, counts }
    }

    /// Output of a step that only reshapes the table.
    pub fn unchanged_counts(table: Table) -> Self {
        Self::new(table, StepCounts::default())
    }

    pub fn into_table(self) -> Table {
        self.table
    }
}

/// Row counts and counters for one executed step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepSummary {
    pub step: String,
    pub rows_before: usize,
    pub rows_after: usize,
    pub counts: StepCounts,
}

/// Summary of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransformReport {
    pub target_policy: TargetPolicy,
    pub rows_in: usize,
    pub rows_out: usize,
    pub steps: Vec<StepSummary>,
    pub totals: StepCounts,
}

impl TransformReport {
    pub fn new(target_policy: TargetPolicy, rows_in: usize) -> Self {
        Self {
            target_policy,
            rows_in,
            rows_out: rows_in,
            steps: Vec::new(),
            totals: StepCounts::default(),
        }
    }

    pub fn record(&mut self, step: &str, rows_before: usize, rows_after: usize, counts: StepCounts) {
        self.totals.merge(counts);
        self.rows_out = rows_after;
        self.steps.push(StepSummary {
            step: step.to_string(),
            rows_before,
            rows_after,
            counts,
        });
    }

    /// Names of the executed steps, in order.
    pub fn executed_steps(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.step.as_str()).collect()
    }
}

/// Final table and report of a pipeline run.
#[derive(Debug, Clone)]
pub struct TransformOutput {
    pub table: Table,
    pub report: TransformReport,
}
