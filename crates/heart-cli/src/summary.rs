use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use heart_cli::etl::EtlResult;

pub fn print_summary(result: &EtlResult) {
    println!("Input: {}", result.input.display());
    println!("Target policy: {}", result.transform.target_policy);
    if let Some(path) = &result.database {
        println!("Database: {}", path.display());
    }
    if let Some(path) = &result.csv_output {
        println!("CSV output: {}", path.display());
    }
    if result.dry_run {
        println!("Dry run: nothing was loaded");
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Step"),
        header_cell("Rows in"),
        header_cell("Rows out"),
        header_cell("Invalidated"),
        header_cell("Imputed"),
        header_cell("Dropped"),
        header_cell("Corrected"),
        header_cell("Duplicates"),
        header_cell("Dates"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..9 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for step in &result.transform.steps {
        let counts = step.counts;
        table.add_row(vec![
            Cell::new(&step.step).fg(Color::Green),
            Cell::new(step.rows_before),
            Cell::new(step.rows_after),
            count_cell(counts.cells_invalidated, Color::Yellow),
            count_cell(counts.cells_imputed, Color::Yellow),
            count_cell(counts.rows_dropped, Color::Red),
            count_cell(counts.cells_corrected, Color::Yellow),
            count_cell(counts.duplicates_removed, Color::Yellow),
            count_cell(counts.dates_standardized, Color::Yellow),
        ]);
    }
    let totals = result.transform.totals;
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(result.transform.rows_in).add_attribute(Attribute::Bold),
        Cell::new(result.transform.rows_out).add_attribute(Attribute::Bold),
        Cell::new(totals.cells_invalidated).add_attribute(Attribute::Bold),
        Cell::new(totals.cells_imputed).add_attribute(Attribute::Bold),
        Cell::new(totals.rows_dropped).add_attribute(Attribute::Bold),
        Cell::new(totals.cells_corrected).add_attribute(Attribute::Bold),
        Cell::new(totals.duplicates_removed).add_attribute(Attribute::Bold),
        Cell::new(totals.dates_standardized).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    println!(
        "Loaded {} records in {} ms",
        result.records_loaded, result.elapsed_ms
    );
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count == 0 {
        dim_cell("-")
    } else {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
