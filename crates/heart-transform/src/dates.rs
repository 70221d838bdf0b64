//! Optional date standardization to `YYYY-MM-DD`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use heart_model::{Cell, Column, PROCESSED_AT_COLUMN, SOURCE_COLUMN, Table};
use tracing::{debug, info};

use crate::report::{StepCounts, Transformed};

/// Name fragments that mark a column as a date candidate.
pub const DATE_TERMS: [&str; 4] = ["date", "day", "time", "dt"];

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses a date in any accepted format, dropping any time component.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        })
}

fn is_candidate(column: &Column) -> bool {
    if column.name == PROCESSED_AT_COLUMN || column.name == SOURCE_COLUMN {
        return false;
    }
    let lower = column.name.to_lowercase();
    if !DATE_TERMS.iter().any(|term| lower.contains(term)) {
        return false;
    }
    let mut present = column.present().peekable();
    present.peek().is_some() && present.all(|cell| matches!(cell, Cell::Text(_)))
}

/// Rewrites text date columns to `YYYY-MM-DD`.
///
/// A candidate column is rewritten only when more than half of its rows
/// parse; unparsable values in a rewritten column become missing. Other
/// columns are untouched.
pub fn standardize_dates(mut table: Table) -> Transformed {
    let height = table.height();
    let mut counts = StepCounts::default();
    let mut standardized = Vec::new();

    for column in table.columns_mut() {
        if !is_candidate(column) {
            continue;
        }
        let parsed: Vec<Option<NaiveDate>> = column
            .cells
            .iter()
            .map(|cell| cell.as_str().and_then(parse_date))
            .collect();
        let parsed_count = parsed.iter().filter(|d| d.is_some()).count();
        if (parsed_count as f64) <= 0.5 * height as f64 {
            debug!(column = %column.name, parsed_count, "not enough parsable dates");
            continue;
        }
        for (cell, date) in column.cells.iter_mut().zip(parsed) {
            *cell = date.map_or(Cell::Missing, |d| {
                Cell::Text(d.format("%Y-%m-%d").to_string())
            });
        }
        counts.dates_standardized += parsed_count;
        standardized.push(column.name.clone());
    }

    if standardized.is_empty() {
        info!("no date columns identified");
    } else {
        info!(columns = %standardized.join(", "), "standardized date formats to YYYY-MM-DD");
    }
    Transformed::new(table, counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_column(name: &str, values: &[&str]) -> Column {
        Column::new(
            name,
            values.iter().map(|v| Cell::Text((*v).to_string())).collect(),
        )
    }

    #[test]
    fn parses_accepted_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 7);
        assert_eq!(parse_date("2024-03-07"), expected);
        assert_eq!(parse_date("03/07/2024"), expected);
        assert_eq!(parse_date("07.03.2024"), expected);
        assert_eq!(parse_date("2024-03-07T10:15:00"), expected);
        assert_eq!(parse_date("2024-03-07T10:15:00+02:00"), expected);
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn mostly_parsable_column_is_rewritten() {
        let table = Table::new(vec![text_column(
            "visit_date",
            &["2024/01/02", "01/03/2024", "soon"],
        )])
        .unwrap();
        let out = standardize_dates(table);
        assert_eq!(
            out.table.column("visit_date").unwrap().cells,
            vec![
                Cell::Text("2024-01-02".into()),
                Cell::Text("2024-01-03".into()),
                Cell::Missing
            ]
        );
        assert_eq!(out.counts.dates_standardized, 2);
    }

    #[test]
    fn mostly_unparsable_column_is_untouched() {
        let table = Table::new(vec![text_column("visit_date", &["a", "b", "2024-01-01"])]).unwrap();
        let before = table.clone();
        let out = standardize_dates(table);
        assert_eq!(out.table, before);
    }

    #[test]
    fn numeric_columns_are_not_candidates() {
        let table = Table::new(vec![Column::new("days", vec![Cell::Int(3)])]).unwrap();
        let out = standardize_dates(table);
        assert_eq!(out.counts.dates_standardized, 0);
    }
}
