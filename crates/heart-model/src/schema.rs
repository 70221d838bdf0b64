//! Fixed column contract for the UCI heart disease dataset.
//!
//! Coercion, missing-value resolution and validation all consult the same
//! [`Schema`], so the column set, semantic types and valid domains live in
//! exactly one place. The schema is not inferred from data.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of the diagnosis column after normalization.
pub const TARGET: &str = "target";
/// Name the raw source uses for the diagnosis column.
pub const RAW_TARGET: &str = "num";
/// Binary column derived from `target` under [`TargetPolicy::MultiClass`].
pub const HAS_DISEASE: &str = "has_disease";
/// Lineage column carrying the source tag.
pub const SOURCE_COLUMN: &str = "source";
/// Lineage column carrying the pipeline-run timestamp.
pub const PROCESSED_AT_COLUMN: &str = "processed_at";
/// Default lineage source tag.
pub const DEFAULT_SOURCE: &str = "uci_ml_repo";

/// Column order of the header-less UCI `processed.*.data` files.
pub const UCI_COLUMNS: [&str; 14] = [
    "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang", "oldpeak",
    "slope", "ca", "thal", "num",
];

/// How the diagnosis column is represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetPolicy {
    /// Any nonzero severity collapses to 1; `target` ∈ {0, 1}.
    Binary,
    /// Severity 0–4 is kept and `has_disease` (`target > 0`) is derived.
    #[default]
    MultiClass,
}

impl TargetPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::MultiClass => "multi-class",
        }
    }

    /// Whether this policy derives the `has_disease` column.
    pub fn derives_has_disease(self) -> bool {
        matches!(self, Self::MultiClass)
    }
}

impl fmt::Display for TargetPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared semantic type of a schema column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    Bool,
    Int,
    Float,
}

impl SemanticType {
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
        }
    }
}

/// Statistic used to fill a missing cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Imputation {
    /// Median over the present values.
    Median,
    /// Most frequent present value; ties go to the first seen.
    Mode,
}

/// One entry of the fixed schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub semantic_type: SemanticType,
    /// Inclusive numeric bounds.
    pub range: Option<(f64, f64)>,
    /// Allowed integer codes.
    pub categories: Option<&'static [i64]>,
}

impl ColumnSpec {
    const fn new(name: &'static str, semantic_type: SemanticType) -> Self {
        Self {
            name,
            semantic_type,
            range: None,
            categories: None,
        }
    }

    const fn with_range(mut self, min: f64, max: f64) -> Self {
        self.range = Some((min, max));
        self
    }

    const fn with_categories(mut self, categories: &'static [i64]) -> Self {
        self.categories = Some(categories);
        self
    }

    /// Imputation for original missingness: median for numeric types, mode otherwise.
    pub fn missing_imputation(&self) -> Imputation {
        if self.semantic_type.is_numeric() {
            Imputation::Median
        } else {
            Imputation::Mode
        }
    }

    pub fn in_range(&self, value: f64) -> bool {
        self.range
            .is_none_or(|(min, max)| value >= min && value <= max)
    }

    pub fn in_categories(&self, value: f64) -> bool {
        self.categories.is_none_or(|allowed| {
            value.fract() == 0.0 && allowed.iter().any(|code| *code as f64 == value)
        })
    }
}

const CP_CODES: &[i64] = &[1, 2, 3, 4];
const RESTECG_CODES: &[i64] = &[0, 1, 2];
const BINARY_CODES: &[i64] = &[0, 1];
const SEVERITY_CODES: &[i64] = &[0, 1, 2, 3, 4];

/// The column contract for one target policy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    policy: TargetPolicy,
    columns: Vec<ColumnSpec>,
}

impl Schema {
    pub fn for_policy(policy: TargetPolicy) -> Self {
        use SemanticType::{Bool, Float, Int};

        let mut columns = vec![
            ColumnSpec::new("age", Int).with_range(0.0, 120.0),
            ColumnSpec::new("sex", Bool),
            ColumnSpec::new("cp", Int).with_categories(CP_CODES),
            ColumnSpec::new("trestbps", Int).with_range(0.0, 300.0),
            ColumnSpec::new("chol", Int).with_range(0.0, 600.0),
            ColumnSpec::new("fbs", Bool),
            ColumnSpec::new("restecg", Int).with_categories(RESTECG_CODES),
            ColumnSpec::new("thalach", Int).with_range(0.0, 250.0),
            ColumnSpec::new("exang", Bool),
            ColumnSpec::new("oldpeak", Float).with_range(0.0, 10.0),
            ColumnSpec::new("slope", Int).with_range(1.0, 3.0),
            ColumnSpec::new("ca", Int).with_range(0.0, 3.0),
            ColumnSpec::new("thal", Int).with_range(3.0, 7.0),
        ];
        match policy {
            TargetPolicy::Binary => {
                columns.push(ColumnSpec::new(TARGET, Int).with_categories(BINARY_CODES));
            }
            TargetPolicy::MultiClass => {
                columns.push(
                    ColumnSpec::new(TARGET, Int)
                        .with_range(0.0, 4.0)
                        .with_categories(SEVERITY_CODES),
                );
                columns.push(ColumnSpec::new(HAS_DISEASE, Int).with_categories(BINARY_CODES));
            }
        }
        Self { policy, columns }
    }

    pub fn policy(&self) -> TargetPolicy {
        self.policy
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn get(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|spec| spec.name == name)
    }

    /// Columns carrying an inclusive numeric range.
    pub fn range_checked(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.iter().filter(|spec| spec.range.is_some())
    }

    /// Columns carrying an enumerated code set.
    pub fn category_checked(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.iter().filter(|spec| spec.categories.is_some())
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::for_policy(TargetPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_schema_has_no_has_disease() {
        let schema = Schema::for_policy(TargetPolicy::Binary);
        assert!(schema.get(HAS_DISEASE).is_none());
        let target = schema.get(TARGET).unwrap();
        assert_eq!(target.range, None);
        assert_eq!(target.categories, Some(BINARY_CODES));
    }

    #[test]
    fn multi_class_target_is_range_and_category_checked() {
        let schema = Schema::for_policy(TargetPolicy::MultiClass);
        let target = schema.get(TARGET).unwrap();
        assert_eq!(target.range, Some((0.0, 4.0)));
        assert_eq!(target.categories, Some(SEVERITY_CODES));
        assert!(schema.get(HAS_DISEASE).is_some());
    }

    #[test]
    fn imputation_follows_semantic_type() {
        let schema = Schema::default();
        assert_eq!(
            schema.get("sex").unwrap().missing_imputation(),
            Imputation::Mode
        );
        assert_eq!(
            schema.get("oldpeak").unwrap().missing_imputation(),
            Imputation::Median
        );
    }

    #[test]
    fn category_membership_rejects_fractions() {
        let schema = Schema::default();
        let cp = schema.get("cp").unwrap();
        assert!(cp.in_categories(4.0));
        assert!(!cp.in_categories(2.5));
        assert!(!cp.in_categories(9.0));
    }
}
