//! Column statistics used for imputation.

use std::collections::HashMap;

use heart_model::{Cell, CellKey, Column, Imputation};

/// Median of `values`; `None` when empty. Sorts the slice in place.
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// Most frequent present cell. Ties go to the value seen first.
pub fn mode<'a>(cells: impl IntoIterator<Item = &'a Cell>) -> Option<&'a Cell> {
    let mut counts: HashMap<CellKey<'a>, (usize, usize)> = HashMap::new();
    let mut order: Vec<&'a Cell> = Vec::new();
    for cell in cells.into_iter().filter(|cell| !cell.is_missing()) {
        let entry = counts.entry(cell.key()).or_insert_with(|| {
            order.push(cell);
            (0, order.len() - 1)
        });
        entry.0 += 1;
    }
    let mut best: Option<(usize, usize)> = None;
    for (count, first_seen) in counts.values().copied() {
        let better = match best {
            None => true,
            Some((best_count, best_seen)) => {
                count > best_count || (count == best_count && first_seen < best_seen)
            }
        };
        if better {
            best = Some((count, first_seen));
        }
    }
    best.map(|(_, first_seen)| order[first_seen])
}

/// Median of the present numeric cells of a column, typed like the column.
///
/// Integer columns get the median rounded half away from zero.
pub fn column_median(column: &Column) -> Option<Cell> {
    if !column.is_numeric() {
        return None;
    }
    let mut values: Vec<f64> = column.present().filter_map(Cell::as_f64).collect();
    let value = median(&mut values)?;
    if column.present().all(|cell| matches!(cell, Cell::Int(_))) {
        Some(Cell::Int(value.round() as i64))
    } else {
        Some(Cell::Float(value))
    }
}

/// Value used to fill missing cells of `column`, or `None` when the
/// statistic is undefined (no present values).
///
/// A median requested on a non-numeric column falls back to the mode.
pub fn fill_value(column: &Column, imputation: Imputation) -> Option<Cell> {
    match imputation {
        Imputation::Median => {
            column_median(column).or_else(|| mode(&column.cells).cloned())
        }
        Imputation::Mode => mode(&column.cells).cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_of_even_count_averages_middle() {
        assert_eq!(median(&mut [4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&mut [5.0, 1.0, 3.0]), Some(3.0));
        assert_eq!(median(&mut []), None);
    }

    #[test]
    fn mode_breaks_ties_by_first_seen() {
        let cells = vec![
            Cell::Int(3),
            Cell::Missing,
            Cell::Int(1),
            Cell::Int(1),
            Cell::Int(3),
        ];
        assert_eq!(mode(&cells), Some(&Cell::Int(3)));
    }

    #[test]
    fn mode_ignores_missing() {
        let cells = vec![Cell::Missing, Cell::Missing, Cell::Bool(false)];
        assert_eq!(mode(&cells), Some(&Cell::Bool(false)));
        assert_eq!(mode(&[Cell::Missing]), None);
    }

    #[test]
    fn integer_median_is_rounded() {
        let column = Column::new("age", vec![Cell::Int(40), Cell::Int(45), Cell::Missing]);
        assert_eq!(column_median(&column), Some(Cell::Int(43)));
    }

    #[test]
    fn float_median_keeps_fraction() {
        let column = Column::new("oldpeak", vec![Cell::Float(1.0), Cell::Int(2)]);
        assert_eq!(column_median(&column), Some(Cell::Float(1.5)));
    }

    #[test]
    fn all_missing_has_no_fill_value() {
        let column = Column::new("oldpeak", vec![Cell::Missing, Cell::Missing]);
        assert_eq!(fill_value(&column, Imputation::Median), None);
        assert_eq!(fill_value(&column, Imputation::Mode), None);
    }
}
