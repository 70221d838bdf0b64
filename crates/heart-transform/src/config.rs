//! Engine configuration and per-run context.

use chrono::{DateTime, Utc};
use heart_model::{DEFAULT_SOURCE, Schema, TargetPolicy};
use serde::{Deserialize, Serialize};

/// User-facing engine options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformConfig {
    /// How the diagnosis column is represented.
    pub target_policy: TargetPolicy,
    /// Lineage source tag written to every row.
    pub source: String,
    /// Run the date standardization step between imputation and validation.
    pub standardize_dates: bool,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            target_policy: TargetPolicy::default(),
            source: DEFAULT_SOURCE.to_string(),
            standardize_dates: false,
        }
    }
}

impl TransformConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_target_policy(mut self, policy: TargetPolicy) -> Self {
        self.target_policy = policy;
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    #[must_use]
    pub fn with_standardize_dates(mut self, enable: bool) -> Self {
        self.standardize_dates = enable;
        self
    }
}

/// Everything a step may consult while it runs.
#[derive(Debug, Clone)]
pub struct TransformContext {
    pub config: TransformConfig,
    pub schema: Schema,
    /// Fixed lineage timestamp; the wall clock is read at annotation when unset.
    pub processed_at: Option<DateTime<Utc>>,
}

impl TransformContext {
    pub fn new(config: TransformConfig) -> Self {
        let schema = Schema::for_policy(config.target_policy);
        Self {
            config,
            schema,
            processed_at: None,
        }
    }

    #[must_use]
    pub fn with_processed_at(mut self, processed_at: DateTime<Utc>) -> Self {
        self.processed_at = Some(processed_at);
        self
    }
}

impl Default for TransformContext {
    fn default() -> Self {
        Self::new(TransformConfig::default())
    }
}
