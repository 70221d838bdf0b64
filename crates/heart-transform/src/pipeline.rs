//! Ordered transformation pipeline.
//!
//! # Standard Pipeline Order
//!
//! 1. **NormalizeColumnsStep** - Canonicalize column names, `num` -> `target`
//! 2. **CoerceTypesStep** - Cast schema columns to their semantic types
//! 3. **StandardizeDatesStep** - Rewrite date columns (opt-in, skipped by default)
//! 4. **ResolveMissingStep** - Impute sparse gaps, drop rows for dense ones
//! 5. **ValidateDomainsStep** - Replace out-of-domain values, refresh `has_disease`
//! 6. **DropDuplicatesStep** - Remove exact duplicate rows
//! 7. **AnnotateLineageStep** - Stamp `source` and `processed_at`
//!
//! Each step takes ownership of the table and hands a new one to the next
//! step. A failing step aborts the run; nothing it produced is kept.
//!
//! # Example
//!
//! ```ignore
//! use heart_transform::{TransformConfig, TransformContext, build_default_pipeline};
//!
//! let pipeline = build_default_pipeline();
//! let output = pipeline.run(raw, &TransformContext::new(TransformConfig::default()))?;
//! ```

use chrono::Utc;
use heart_model::Table;
use tracing::{error, info, info_span};

use crate::coerce::coerce_types;
use crate::config::{TransformConfig, TransformContext};
use crate::dates::standardize_dates;
use crate::dedupe::drop_duplicates;
use crate::error::Result;
use crate::lineage::annotate_lineage;
use crate::missing::resolve_missing;
use crate::normalize::normalize_columns;
use crate::report::{TransformOutput, TransformReport, Transformed};
use crate::validate::validate_domains;

/// A single step of the transformation pipeline.
pub trait TransformStep: Send + Sync {
    /// Consume `table` and produce the next version of it.
    fn apply(&self, table: Table, ctx: &TransformContext) -> Result<Transformed>;

    /// Human-readable name for this step (for logging/reporting).
    fn step_name(&self) -> &'static str;

    /// Whether this step should be skipped based on context.
    ///
    /// Default implementation always runs the step.
    fn should_skip(&self, _ctx: &TransformContext) -> bool {
        false
    }
}

/// An ordered pipeline of transformation steps.
pub struct TransformPipeline {
    steps: Vec<Box<dyn TransformStep>>,
}

impl Default for TransformPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformPipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Add a step to the end of the pipeline.
    #[must_use]
    pub fn add_step(mut self, step: Box<dyn TransformStep>) -> Self {
        self.steps.push(step);
        self
    }

    /// Remove every step with the given name.
    #[must_use]
    pub fn remove_step(mut self, name: &str) -> Self {
        self.steps.retain(|s| s.step_name() != name);
        self
    }

    /// List step names in execution order.
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.step_name()).collect()
    }

    /// Execute all steps in order.
    pub fn run(&self, table: Table, ctx: &TransformContext) -> Result<TransformOutput> {
        let mut report = TransformReport::new(ctx.config.target_policy, table.height());
        let mut table = table;
        info!(
            rows = table.height(),
            columns = table.width(),
            "starting data transformation"
        );
        for step in &self.steps {
            if step.should_skip(ctx) {
                continue;
            }
            let _span = info_span!("transform_step", step = step.step_name()).entered();
            let rows_before = table.height();
            let output = step.apply(table, ctx).inspect_err(|e| {
                error!(step = step.step_name(), error = %e, "transformation failed");
            })?;
            report.record(
                step.step_name(),
                rows_before,
                output.table.height(),
                output.counts,
            );
            table = output.table;
        }
        info!(rows = table.height(), "transformation completed");
        Ok(TransformOutput { table, report })
    }
}

/// Step 1: canonicalize column names.
pub struct NormalizeColumnsStep;

impl TransformStep for NormalizeColumnsStep {
    fn apply(&self, table: Table, _ctx: &TransformContext) -> Result<Transformed> {
        Ok(Transformed::unchanged_counts(normalize_columns(table)))
    }

    fn step_name(&self) -> &'static str {
        "normalize_columns"
    }
}

/// Step 2: cast columns to their semantic types.
pub struct CoerceTypesStep;

impl TransformStep for CoerceTypesStep {
    fn apply(&self, table: Table, ctx: &TransformContext) -> Result<Transformed> {
        coerce_types(table, &ctx.schema)
    }

    fn step_name(&self) -> &'static str {
        "coerce_types"
    }
}

/// Step 4: impute or drop missing values.
pub struct ResolveMissingStep;

impl TransformStep for ResolveMissingStep {
    fn apply(&self, table: Table, ctx: &TransformContext) -> Result<Transformed> {
        resolve_missing(table, &ctx.schema)
    }

    fn step_name(&self) -> &'static str {
        "resolve_missing"
    }
}

/// Step 3 (optional): standardize date columns. Dates that do not parse
/// become missing and are handled by the resolver.
pub struct StandardizeDatesStep;

impl TransformStep for StandardizeDatesStep {
    fn apply(&self, table: Table, _ctx: &TransformContext) -> Result<Transformed> {
        Ok(standardize_dates(table))
    }

    fn step_name(&self) -> &'static str {
        "standardize_dates"
    }

    fn should_skip(&self, ctx: &TransformContext) -> bool {
        !ctx.config.standardize_dates
    }
}

/// Step 5: replace out-of-domain values.
pub struct ValidateDomainsStep;

impl TransformStep for ValidateDomainsStep {
    fn apply(&self, table: Table, ctx: &TransformContext) -> Result<Transformed> {
        Ok(validate_domains(table, &ctx.schema))
    }

    fn step_name(&self) -> &'static str {
        "validate_domains"
    }
}

/// Step 6: remove exact duplicate rows.
pub struct DropDuplicatesStep;

impl TransformStep for DropDuplicatesStep {
    fn apply(&self, table: Table, _ctx: &TransformContext) -> Result<Transformed> {
        drop_duplicates(table)
    }

    fn step_name(&self) -> &'static str {
        "drop_duplicates"
    }
}

/// Step 7: stamp lineage metadata.
pub struct AnnotateLineageStep;

impl TransformStep for AnnotateLineageStep {
    fn apply(&self, table: Table, ctx: &TransformContext) -> Result<Transformed> {
        let processed_at = ctx.processed_at.unwrap_or_else(Utc::now);
        Ok(annotate_lineage(table, &ctx.config.source, processed_at))
    }

    fn step_name(&self) -> &'static str {
        "annotate_lineage"
    }
}

/// Build the default transformation pipeline.
pub fn build_default_pipeline() -> TransformPipeline {
    TransformPipeline::new()
        .add_step(Box::new(NormalizeColumnsStep))
        .add_step(Box::new(CoerceTypesStep))
        .add_step(Box::new(StandardizeDatesStep))
        .add_step(Box::new(ResolveMissingStep))
        .add_step(Box::new(ValidateDomainsStep))
        .add_step(Box::new(DropDuplicatesStep))
        .add_step(Box::new(AnnotateLineageStep))
}

/// Run the default pipeline on a raw table.
pub fn transform(table: Table, config: &TransformConfig) -> Result<TransformOutput> {
    build_default_pipeline().run(table, &TransformContext::new(config.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pipeline_order() {
        assert_eq!(
            build_default_pipeline().step_names(),
            vec![
                "normalize_columns",
                "coerce_types",
                "standardize_dates",
                "resolve_missing",
                "validate_domains",
                "drop_duplicates",
                "annotate_lineage",
            ]
        );
    }

    #[test]
    fn date_step_is_skipped_by_default() {
        let output = transform(Table::empty(), &TransformConfig::default()).unwrap();
        assert!(!output.report.executed_steps().contains(&"standardize_dates"));
        assert_eq!(output.report.steps.len(), 6);
    }

    #[test]
    fn date_step_runs_when_enabled() {
        let config = TransformConfig::default().with_standardize_dates(true);
        let output = transform(Table::empty(), &config).unwrap();
        assert!(output.report.executed_steps().contains(&"standardize_dates"));
    }
}
