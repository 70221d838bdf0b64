//! Missing-value resolution: impute sparse gaps, drop rows for dense ones.

use heart_model::{Column, Imputation, Schema, Table};
use tracing::{debug, info, warn};

use crate::error::{Result, TransformError};
use crate::report::{StepCounts, Transformed};
use crate::stats::fill_value;

const STEP: &str = "resolve_missing";

/// Columns whose missing ratio is below this are imputed; the rest drop rows.
pub const IMPUTE_THRESHOLD: f64 = 0.05;

/// Imputation used for a column during missing-value resolution.
///
/// Schema columns follow their semantic type; other columns use the median
/// when all present values are numeric and the mode otherwise.
pub fn missing_imputation(schema: &Schema, column: &Column) -> Imputation {
    match schema.get(&column.name) {
        Some(spec) => spec.missing_imputation(),
        None if column.is_numeric() => Imputation::Median,
        None => Imputation::Mode,
    }
}

/// Resolves missing values column by column, left to right.
///
/// Each column's ratio is computed against the table as left by the
/// previous columns, so rows dropped for one column change the ratios of
/// the columns after it. A column with no present values has no median or
/// mode and always drops its rows.
pub fn resolve_missing(table: Table, schema: &Schema) -> Result<Transformed> {
    let mut table = table;
    let mut counts = StepCounts::default();
    let names: Vec<String> = table.columns().iter().map(|c| c.name.clone()).collect();

    // Row filtering keeps column order, so `idx` stays aligned with `names`.
    for (idx, name) in names.iter().enumerate() {
        let column = &table.columns()[idx];
        let missing = column.missing_count();
        if missing == 0 {
            continue;
        }
        let total = table.height();
        let ratio = missing as f64 / total as f64;
        info!(
            column = %name,
            missing,
            percent = %format!("{:.2}", ratio * 100.0),
            "column has missing values"
        );

        let imputation = missing_imputation(schema, column);
        let fill = if ratio < IMPUTE_THRESHOLD {
            fill_value(column, imputation)
        } else {
            None
        };

        match fill {
            Some(value) => {
                debug!(column = %name, ?imputation, fill = %value, "imputing missing values");
                for cell in &mut table.columns_mut()[idx].cells {
                    if cell.is_missing() {
                        *cell = value.clone();
                    }
                }
                counts.cells_imputed += missing;
            }
            None => {
                warn!(
                    column = %name,
                    percent = %format!("{:.2}", ratio * 100.0),
                    "dropping rows with missing values"
                );
                let keep: Vec<bool> = column.cells.iter().map(|c| !c.is_missing()).collect();
                table = table
                    .filter_rows(&keep)
                    .map_err(|e| TransformError::table(STEP, e))?;
                counts.rows_dropped += missing;
            }
        }
    }

    if counts.cells_imputed == 0 && counts.rows_dropped == 0 {
        info!("no missing values found");
    } else {
        info!(
            imputed = counts.cells_imputed,
            dropped = counts.rows_dropped,
            "handled missing values"
        );
    }
    Ok(Transformed::new(table, counts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use heart_model::{Cell, TargetPolicy};

    fn schema() -> Schema {
        Schema::for_policy(TargetPolicy::Binary)
    }

    fn ints(name: &str, values: &[Option<i64>]) -> Column {
        Column::new(
            name,
            values
                .iter()
                .map(|v| v.map_or(Cell::Missing, Cell::Int))
                .collect(),
        )
    }

    #[test]
    fn sparse_numeric_gap_gets_median() {
        let mut values: Vec<Option<i64>> = (1..=20).map(Some).collect();
        values.push(None);
        values.extend((21..=40).map(Some));
        // 1 of 41 rows missing (2.4%)
        let table = Table::new(vec![ints("age", &values)]).unwrap();
        let out = resolve_missing(table, &schema()).unwrap();
        assert_eq!(out.table.height(), 41);
        assert_eq!(out.table.column("age").unwrap().cells[20], Cell::Int(21));
        assert_eq!(out.counts.cells_imputed, 1);
    }

    #[test]
    fn dense_gap_drops_rows() {
        let table = Table::new(vec![
            ints("chol", &[Some(200), None, Some(250), None]),
            ints("age", &[Some(1), Some(2), Some(3), Some(4)]),
        ])
        .unwrap();
        let out = resolve_missing(table, &schema()).unwrap();
        assert_eq!(out.table.height(), 2);
        assert_eq!(
            out.table.column("age").unwrap().cells,
            vec![Cell::Int(1), Cell::Int(3)]
        );
        assert_eq!(out.counts.rows_dropped, 2);
    }

    /// 40 rows: `chol` misses rows 0..10, `trestbps` misses rows 0..3 and 30.
    fn overlapping_gaps() -> (Column, Column) {
        let chol: Vec<Option<i64>> = (0..40).map(|i| (i >= 10).then_some(200 + i)).collect();
        let bp: Vec<Option<i64>> = (0..40)
            .map(|i| (i >= 3 && i != 30).then_some(120))
            .collect();
        (ints("chol", &chol), ints("trestbps", &bp))
    }

    #[test]
    fn ratio_is_recomputed_after_earlier_drops() {
        // trestbps starts at 10% missing; after chol drops its rows it is at 1/30.
        let (chol, bp) = overlapping_gaps();
        let table = Table::new(vec![chol, bp]).unwrap();
        let out = resolve_missing(table, &schema()).unwrap();

        assert_eq!(out.table.height(), 30);
        assert_eq!(out.counts.rows_dropped, 10);
        assert_eq!(out.counts.cells_imputed, 1);
        assert_eq!(out.table.column("trestbps").unwrap().cells[20], Cell::Int(120));
        assert_eq!(out.table.missing_count(), 0);
    }

    #[test]
    fn column_order_decides_what_is_dropped() {
        let (chol, bp) = overlapping_gaps();
        let table = Table::new(vec![bp, chol]).unwrap();
        let out = resolve_missing(table, &schema()).unwrap();

        // trestbps drops 4 rows first; chol then misses 7 of 36 and drops too.
        assert_eq!(out.table.height(), 29);
        assert_eq!(out.counts.rows_dropped, 11);
        assert_eq!(out.counts.cells_imputed, 0);
    }

    #[test]
    fn sparse_columns_end_without_missing_values() {
        let mut ages: Vec<Option<i64>> = (30..70).map(Some).collect();
        ages.push(None);
        let mut chol: Vec<Option<i64>> = vec![None];
        chol.extend((0..40).map(|i| Some(180 + i)));
        let mut sites: Vec<Cell> = vec![Cell::Text("cleveland".into()); 40];
        sites[7] = Cell::Missing;
        sites.push(Cell::Text("va".into()));

        let table = Table::new(vec![
            ints("age", &ages),
            ints("chol", &chol),
            Column::new("site", sites),
        ])
        .unwrap();
        let out = resolve_missing(table, &schema()).unwrap();

        assert_eq!(out.table.height(), 41);
        assert_eq!(out.table.missing_count(), 0);
        assert_eq!(out.counts.cells_imputed, 3);
        assert_eq!(
            out.table.column("site").unwrap().cells[7],
            Cell::Text("cleveland".into())
        );
    }

    #[test]
    fn empty_table_passes_through() {
        let table = Table::new(vec![ints("age", &[])]).unwrap();
        let out = resolve_missing(table, &schema()).unwrap();
        assert_eq!(out.table.height(), 0);
        assert_eq!(out.counts, StepCounts::default());
    }

    #[test]
    fn non_schema_text_column_uses_mode() {
        let column = Column::new("site", vec![Cell::Text("a".into())]);
        assert_eq!(missing_imputation(&schema(), &column), Imputation::Mode);
        let numeric = Column::new("extra", vec![Cell::Float(1.0)]);
        assert_eq!(missing_imputation(&schema(), &numeric), Imputation::Median);
    }
}
