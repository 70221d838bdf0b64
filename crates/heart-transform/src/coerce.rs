//! Type coercion to the schema's semantic types.
//!
//! Values that cannot be read as the declared type become
//! [`Cell::Missing`]; nothing in this module returns an error for bad cells.

use heart_model::{Cell, Column, HAS_DISEASE, Schema, SemanticType, TARGET, Table, TargetPolicy};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::report::{StepCounts, Transformed};

const FALSE_TOKENS: [&str; 4] = ["false", "f", "no", "n"];

/// Parses a string as a finite f64, returning None for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses a string as i64, accepting integral decimals such as `"63.0"`.
pub fn parse_i64(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<i64>()
        .ok()
        .or_else(|| parse_f64(trimmed).and_then(integral))
}

fn integral(value: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
    let in_range = value >= i64::MIN as f64 && value < i64::MAX as f64;
    (value.is_finite() && value.fract() == 0.0 && in_range).then_some(value as i64)
}

/// Coerces a cell to a boolean. Any present value has a truth value.
pub fn to_bool(cell: &Cell) -> Cell {
    match cell {
        Cell::Missing => Cell::Missing,
        Cell::Bool(v) => Cell::Bool(*v),
        Cell::Int(v) => Cell::Bool(*v != 0),
        Cell::Float(v) if v.is_nan() => Cell::Missing,
        Cell::Float(v) => Cell::Bool(*v != 0.0),
        Cell::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Cell::Missing;
            }
            if let Some(v) = parse_f64(trimmed) {
                return Cell::Bool(v != 0.0);
            }
            // Any other non-empty text is truthy.
            let lower = trimmed.to_lowercase();
            Cell::Bool(!FALSE_TOKENS.contains(&lower.as_str()))
        }
    }
}

/// Coerces a cell to an integer. Fractional and unparsable values become missing.
pub fn to_int(cell: &Cell) -> Cell {
    let value = match cell {
        Cell::Missing => None,
        Cell::Bool(v) => Some(i64::from(*v)),
        Cell::Int(v) => Some(*v),
        Cell::Float(v) => integral(*v),
        Cell::Text(text) => parse_i64(text),
    };
    value.map_or(Cell::Missing, Cell::Int)
}

/// Coerces a cell to a float. Unparsable and non-finite values become missing.
pub fn to_float(cell: &Cell) -> Cell {
    let value = match cell {
        Cell::Missing => None,
        Cell::Bool(v) => Some(if *v { 1.0 } else { 0.0 }),
        Cell::Int(v) => Some(*v as f64),
        Cell::Float(v) => Some(*v).filter(|v| v.is_finite()),
        Cell::Text(text) => parse_f64(text),
    };
    value.map_or(Cell::Missing, Cell::Float)
}

/// Coerces a target cell to an integer and applies the target policy.
pub fn to_target(cell: &Cell, policy: TargetPolicy) -> Cell {
    match (to_int(cell), policy) {
        (Cell::Int(v), TargetPolicy::Binary) => Cell::Int(i64::from(v != 0)),
        (other, _) => other,
    }
}

/// `has_disease` for a coerced target cell: 1 when `target > 0`.
pub fn has_disease(target: &Cell) -> Cell {
    match target {
        Cell::Int(v) => Cell::Int(i64::from(*v > 0)),
        _ => Cell::Missing,
    }
}

/// Rebuilds `has_disease` from the current `target` under
/// [`TargetPolicy::MultiClass`]. Returns whether the column was written.
pub fn derive_has_disease(table: &mut Table, policy: TargetPolicy) -> bool {
    policy.derives_has_disease() && table.derive_column(HAS_DISEASE, TARGET, has_disease)
}

fn coerce_cell(cell: &Cell, semantic_type: SemanticType) -> Cell {
    match semantic_type {
        SemanticType::Bool => to_bool(cell),
        SemanticType::Int => to_int(cell),
        SemanticType::Float => to_float(cell),
    }
}

fn coerce_column(column: &mut Column, convert: impl Fn(&Cell) -> Cell) -> usize {
    let mut invalidated = 0;
    for cell in &mut column.cells {
        let converted = convert(cell);
        if converted.is_missing() && !cell.is_missing() {
            invalidated += 1;
        }
        *cell = converted;
    }
    invalidated
}

/// Casts every schema column present in the table to its semantic type.
///
/// Columns outside the schema pass through unchanged. Under
/// [`TargetPolicy::MultiClass`] a `has_disease` column is derived from
/// `target` (replacing any existing one).
pub fn coerce_types(mut table: Table, schema: &Schema) -> Result<Transformed> {
    let policy = schema.policy();
    let mut counts = StepCounts::default();

    for column in table.columns_mut() {
        let invalidated = if column.name == TARGET {
            coerce_column(column, |cell| to_target(cell, policy))
        } else if let Some(spec) = schema.get(&column.name) {
            let semantic_type = spec.semantic_type;
            coerce_column(column, |cell| coerce_cell(cell, semantic_type))
        } else {
            continue;
        };
        if invalidated > 0 {
            warn!(
                column = %column.name,
                invalidated,
                "unparsable values coerced to missing"
            );
        }
        debug!(column = %column.name, "coerced column");
        counts.cells_invalidated += invalidated;
    }

    if derive_has_disease(&mut table, policy) {
        info!("derived '{HAS_DISEASE}' from '{TARGET}'");
    }

    info!(
        policy = %policy,
        invalidated = counts.cells_invalidated,
        "converted data types"
    );
    Ok(Transformed::new(table, counts))
}
