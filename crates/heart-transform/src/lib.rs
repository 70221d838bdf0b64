//! Transformation and validation engine for the heart disease dataset.
//!
//! A raw [`Table`](heart_model::Table) runs through an ordered pipeline:
//!
//! - **normalize**: canonical column names, `num` renamed to `target`
//! - **coerce**: schema-driven casting, unparsable values become missing
//! - **dates**: optional `YYYY-MM-DD` rewrite of date-like columns
//! - **missing**: impute sparse gaps, drop rows for dense ones
//! - **validate**: replace out-of-range and out-of-category values
//! - **dedupe**: remove exact duplicate rows
//! - **lineage**: stamp `source` and `processed_at`
//!
//! Each step is a pure function from table to table; [`pipeline`] sequences
//! them and collects a [`TransformReport`].

pub mod coerce;
pub mod config;
pub mod dates;
pub mod dedupe;
pub mod error;
pub mod lineage;
pub mod missing;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod stats;
pub mod validate;

pub use coerce::coerce_types;
pub use config::{TransformConfig, TransformContext};
pub use dates::standardize_dates;
pub use dedupe::drop_duplicates;
pub use error::{Result, TransformError};
pub use lineage::{annotate_lineage, format_processed_at};
pub use missing::{IMPUTE_THRESHOLD, resolve_missing};
pub use normalize::{normalize_column_name, normalize_columns};
pub use pipeline::{
    AnnotateLineageStep, CoerceTypesStep, DropDuplicatesStep, NormalizeColumnsStep,
    ResolveMissingStep, StandardizeDatesStep, TransformPipeline, TransformStep,
    ValidateDomainsStep, build_default_pipeline, transform,
};
pub use report::{StepCounts, StepSummary, TransformOutput, TransformReport, Transformed};
pub use validate::validate_domains;
