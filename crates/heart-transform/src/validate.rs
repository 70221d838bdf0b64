//! Range and category validation with re-imputation.
//!
//! Out-of-domain cells are set to missing and immediately refilled from the
//! values that remain valid: numeric ranges use the median, code sets use
//! the mode. Rows are never dropped here, and cells that were already
//! missing are left alone.

use heart_model::{Cell, Column, ColumnSpec, HAS_DISEASE, Imputation, Schema, TARGET, Table};
use tracing::{debug, info, warn};

use crate::coerce::derive_has_disease;
use crate::report::{StepCounts, Transformed};
use crate::stats::fill_value;

/// Validates every range-checked column, then every category-checked column.
pub fn validate_domains(mut table: Table, schema: &Schema) -> Transformed {
    let mut counts = StepCounts::default();

    for spec in schema.range_checked() {
        let Some(column) = table.column_mut(spec.name) else {
            continue;
        };
        let corrected = correct_column(column, |v| spec.in_range(v), Imputation::Median, |cell| {
            clamp_to_range(spec, cell)
        });
        if corrected > 0 {
            warn!(column = spec.name, corrected, "out-of-range values replaced");
        }
        counts.cells_corrected += corrected;
    }

    for spec in schema.category_checked() {
        let Some(column) = table.column_mut(spec.name) else {
            continue;
        };
        let corrected = correct_column(
            column,
            |v| spec.in_categories(v),
            Imputation::Mode,
            |cell| nearest_category(spec, cell),
        );
        if corrected > 0 {
            warn!(column = spec.name, corrected, "invalid category values replaced");
        }
        counts.cells_corrected += corrected;
    }

    if derive_has_disease(&mut table, schema.policy()) {
        debug!("re-derived '{HAS_DISEASE}' from validated '{TARGET}'");
    }

    info!(
        issues = counts.cells_corrected,
        "data validation complete"
    );
    Transformed::new(table, counts)
}

/// Replaces the invalid present cells of `column`; returns how many.
///
/// When no valid value is left to compute a statistic from, each invalid
/// cell gets its own `fallback` instead.
fn correct_column(
    column: &mut Column,
    is_valid: impl Fn(f64) -> bool,
    imputation: Imputation,
    fallback: impl Fn(&Cell) -> Cell,
) -> usize {
    let invalid: Vec<(usize, Cell)> = column
        .cells
        .iter()
        .enumerate()
        .filter(|(_, cell)| !cell.is_missing() && !cell.as_f64().is_some_and(&is_valid))
        .map(|(idx, cell)| (idx, cell.clone()))
        .collect();
    if invalid.is_empty() {
        return 0;
    }

    for (idx, _) in &invalid {
        column.cells[*idx] = Cell::Missing;
    }
    let fill = fill_value(column, imputation);
    for (idx, original) in &invalid {
        column.cells[*idx] = match &fill {
            Some(value) => value.clone(),
            None => fallback(original),
        };
    }
    invalid.len()
}

/// Nearest bound of the column's range, typed like the original cell.
fn clamp_to_range(spec: &ColumnSpec, original: &Cell) -> Cell {
    let Some((min, max)) = spec.range else {
        return original.clone();
    };
    let clamped = original.as_f64().map_or(min, |v| v.clamp(min, max));
    match original {
        Cell::Float(_) => Cell::Float(clamped),
        _ => Cell::Int(clamped.round() as i64),
    }
}

/// Allowed code closest to the original value; ties go to the lower code.
fn nearest_category(spec: &ColumnSpec, original: &Cell) -> Cell {
    let Some(allowed) = spec.categories else {
        return original.clone();
    };
    let target = original.as_f64().unwrap_or(f64::NEG_INFINITY);
    allowed
        .iter()
        .copied()
        .min_by(|a, b| {
            let da = (*a as f64 - target).abs();
            let db = (*b as f64 - target).abs();
            da.total_cmp(&db).then(a.cmp(b))
        })
        .map_or(Cell::Missing, Cell::Int)
}

#[cfg(test)]
mod tests {
    use super::*;
    use heart_model::TargetPolicy;

    fn ints(name: &str, values: &[i64]) -> Column {
        Column::new(name, values.iter().copied().map(Cell::Int).collect())
    }

    #[test]
    fn out_of_range_value_gets_median_of_valid() {
        let table = Table::new(vec![ints("age", &[40, 50, 60, 500])]).unwrap();
        let out = validate_domains(table, &Schema::for_policy(TargetPolicy::Binary));
        assert_eq!(
            out.table.column("age").unwrap().cells,
            vec![Cell::Int(40), Cell::Int(50), Cell::Int(60), Cell::Int(50)]
        );
        assert_eq!(out.counts.cells_corrected, 1);
    }

    #[test]
    fn invalid_category_gets_mode_of_valid() {
        let table = Table::new(vec![ints("cp", &[4, 2, 4, 9])]).unwrap();
        let out = validate_domains(table, &Schema::for_policy(TargetPolicy::Binary));
        assert_eq!(out.table.column("cp").unwrap().cells[3], Cell::Int(4));
    }

    #[test]
    fn missing_cells_are_not_touched() {
        let table = Table::new(vec![Column::new("age", vec![Cell::Missing, Cell::Int(30)])])
            .unwrap();
        let out = validate_domains(table, &Schema::default());
        assert_eq!(out.table.column("age").unwrap().cells[0], Cell::Missing);
        assert_eq!(out.counts.cells_corrected, 0);
    }

    #[test]
    fn all_invalid_range_falls_back_to_clamping() {
        let table = Table::new(vec![Column::new(
            "oldpeak",
            vec![Cell::Float(-1.0), Cell::Float(12.5)],
        )])
        .unwrap();
        let out = validate_domains(table, &Schema::default());
        assert_eq!(
            out.table.column("oldpeak").unwrap().cells,
            vec![Cell::Float(0.0), Cell::Float(10.0)]
        );
    }

    #[test]
    fn all_invalid_category_falls_back_to_nearest_code() {
        let table = Table::new(vec![ints("restecg", &[7, -3])]).unwrap();
        let out = validate_domains(table, &Schema::default());
        assert_eq!(
            out.table.column("restecg").unwrap().cells,
            vec![Cell::Int(2), Cell::Int(0)]
        );
    }

    #[test]
    fn corrected_target_refreshes_has_disease() {
        let table = Table::new(vec![
            ints("target", &[0, 0, 0, 7]),
            ints("has_disease", &[0, 0, 0, 1]),
        ])
        .unwrap();
        let out = validate_domains(table, &Schema::for_policy(TargetPolicy::MultiClass));
        assert_eq!(
            out.table.column("target").unwrap().cells,
            vec![Cell::Int(0); 4]
        );
        assert_eq!(
            out.table.column("has_disease").unwrap().cells,
            vec![Cell::Int(0); 4]
        );
    }

    #[test]
    fn binary_policy_adds_no_has_disease() {
        let table = Table::new(vec![ints("target", &[0, 1])]).unwrap();
        let out = validate_domains(table, &Schema::for_policy(TargetPolicy::Binary));
        assert!(!out.table.has_column("has_disease"));
    }

    #[test]
    fn multi_class_target_range_then_category() {
        let table = Table::new(vec![ints("target", &[0, 3, 3, 8])]).unwrap();
        let out = validate_domains(table, &Schema::for_policy(TargetPolicy::MultiClass));
        assert_eq!(out.table.column("target").unwrap().cells[3], Cell::Int(3));
    }
}
