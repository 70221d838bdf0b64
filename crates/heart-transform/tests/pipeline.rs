//! End-to-end tests for the transformation pipeline.

use chrono::{TimeZone, Utc};
use heart_model::{
    Cell, Column, HAS_DISEASE, PROCESSED_AT_COLUMN, SOURCE_COLUMN, Table, TargetPolicy,
};
use heart_transform::{
    TransformConfig, TransformContext, TransformError, TransformStep, Transformed,
    build_default_pipeline, transform,
};

/// Raw table of text cells, as the extractor produces it. `"?"` stays text
/// so coercion has to turn it into missing.
fn raw(names: &[&str], rows: &[&[&str]]) -> Table {
    let columns = names
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            Column::new(
                *name,
                rows.iter()
                    .map(|row| Cell::Text(row[idx].to_string()))
                    .collect(),
            )
        })
        .collect();
    Table::new(columns).unwrap()
}

fn ctx(policy: TargetPolicy) -> TransformContext {
    TransformContext::new(TransformConfig::default().with_target_policy(policy))
        .with_processed_at(Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap())
}

fn cells(table: &Table, name: &str) -> Vec<Cell> {
    table.column(name).unwrap().cells.clone()
}

fn scenario_a() -> Table {
    raw(
        &["Age", "Sex", "CP", "num"],
        &[
            &["45", "1", "9", "0"],
            &["50", "0", "4", "1"],
            &["55", "1", "4", "0"],
            &["60", "1", "2", "2"],
        ],
    )
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn out_of_domain_category_is_replaced_by_mode() {
    let output = build_default_pipeline()
        .run(scenario_a(), &ctx(TargetPolicy::Binary))
        .unwrap();
    let table = output.table;

    assert_eq!(table.height(), 4);
    assert_eq!(cells(&table, "cp")[0], Cell::Int(4));
    assert_eq!(cells(&table, "target")[0], Cell::Int(0));
    assert_eq!(cells(&table, "sex")[0], Cell::Bool(true));
    assert_eq!(output.report.totals.cells_corrected, 1);
}

#[test]
fn binary_policy_collapses_severity() {
    let table = build_default_pipeline()
        .run(scenario_a(), &ctx(TargetPolicy::Binary))
        .unwrap()
        .table;
    assert_eq!(
        cells(&table, "target"),
        vec![Cell::Int(0), Cell::Int(1), Cell::Int(0), Cell::Int(1)]
    );
    assert!(!table.has_column(HAS_DISEASE));
}

#[test]
fn multi_class_policy_keeps_severity_and_derives_flag() {
    let table = build_default_pipeline()
        .run(scenario_a(), &ctx(TargetPolicy::MultiClass))
        .unwrap()
        .table;
    assert_eq!(
        cells(&table, "target"),
        vec![Cell::Int(0), Cell::Int(1), Cell::Int(0), Cell::Int(2)]
    );
    assert_eq!(
        cells(&table, HAS_DISEASE),
        vec![Cell::Int(0), Cell::Int(1), Cell::Int(0), Cell::Int(1)]
    );
}

#[test]
fn densely_missing_column_drops_rows() {
    let input = raw(
        &["age", "chol"],
        &[
            &["40", "200"],
            &["41", "?"],
            &["42", "?"],
            &["43", "?"],
            &["44", "240"],
        ],
    );
    let output = build_default_pipeline()
        .run(input, &ctx(TargetPolicy::Binary))
        .unwrap();

    assert_eq!(
        cells(&output.table, "age"),
        vec![Cell::Int(40), Cell::Int(44)]
    );
    assert_eq!(
        cells(&output.table, "chol"),
        vec![Cell::Int(200), Cell::Int(240)]
    );
    assert_eq!(output.report.totals.rows_dropped, 3);
    assert_eq!(output.report.totals.cells_imputed, 0);
}

#[test]
fn identical_rows_collapse_to_one() {
    let input = raw(
        &["age", "sex", "num"],
        &[&["63", "1", "0"], &["67", "1", "2"], &["63", "1", "0"]],
    );
    let output = build_default_pipeline()
        .run(input, &ctx(TargetPolicy::MultiClass))
        .unwrap();

    assert_eq!(output.table.height(), 2);
    assert_eq!(
        cells(&output.table, "age"),
        vec![Cell::Int(63), Cell::Int(67)]
    );
    assert_eq!(output.report.totals.duplicates_removed, 1);
}

#[test]
fn column_without_values_drops_rows_instead_of_failing() {
    let input = raw(
        &["age", "oldpeak"],
        &[&["50", "?"], &["51", ""], &["52", "?"]],
    );
    let output = build_default_pipeline()
        .run(input, &ctx(TargetPolicy::Binary))
        .unwrap();

    assert_eq!(output.table.height(), 0);
    assert_eq!(output.report.rows_out, 0);
    assert!(output.table.has_column(SOURCE_COLUMN));
}

// ============================================================================
// Properties of a full run
// ============================================================================

#[test]
fn empty_input_yields_empty_output() {
    let output = transform(Table::empty(), &TransformConfig::default()).unwrap();
    assert!(output.table.is_empty());
    assert_eq!(output.report.rows_in, 0);
    assert_eq!(output.report.rows_out, 0);
}

#[test]
fn rerun_is_a_fixed_point_except_timestamp() {
    let first = build_default_pipeline()
        .run(
            raw(
                &["age", "oldpeak", "num"],
                &[&["50", "1.5", "1"], &["60", "2.0", "0"], &["70", "0.5", "3"]],
            ),
            &ctx(TargetPolicy::MultiClass),
        )
        .unwrap()
        .table;

    let later = TransformContext::new(TransformConfig::default())
        .with_processed_at(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
    let second = build_default_pipeline().run(first.clone(), &later).unwrap().table;

    assert_eq!(first.column_names(), second.column_names());
    for name in first.column_names() {
        if name == PROCESSED_AT_COLUMN {
            continue;
        }
        assert_eq!(first.column(name), second.column(name), "column {name}");
    }
    assert_ne!(
        first.column(PROCESSED_AT_COLUMN),
        second.column(PROCESSED_AT_COLUMN)
    );
}

#[test]
fn lineage_uses_configured_source_and_one_timestamp() {
    let config = TransformConfig::default().with_source("cleveland");
    let context = TransformContext::new(config)
        .with_processed_at(Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap());
    let table = build_default_pipeline()
        .run(scenario_a(), &context)
        .unwrap()
        .table;

    assert!(
        cells(&table, SOURCE_COLUMN)
            .iter()
            .all(|c| *c == Cell::Text("cleveland".into()))
    );
    assert!(
        cells(&table, PROCESSED_AT_COLUMN)
            .iter()
            .all(|c| *c == Cell::Text("2024-05-01T08:00:00.000000Z".into()))
    );
}

#[test]
fn normalized_column_names() {
    let table = build_default_pipeline()
        .run(
            raw(&["Age", "Resting BP", "NUM"], &[&["40", "120", "0"]]),
            &ctx(TargetPolicy::Binary),
        )
        .unwrap()
        .table;
    insta::assert_snapshot!(
        table.column_names().join(","),
        @"age,resting_bp,target,source,processed_at"
    );
}

#[test]
fn report_lists_executed_steps() {
    let output = build_default_pipeline()
        .run(scenario_a(), &ctx(TargetPolicy::Binary))
        .unwrap();
    assert_eq!(
        output.report.executed_steps(),
        vec![
            "normalize_columns",
            "coerce_types",
            "resolve_missing",
            "validate_domains",
            "drop_duplicates",
            "annotate_lineage",
        ]
    );
    assert_eq!(output.report.target_policy, TargetPolicy::Binary);
}

#[test]
fn corrected_target_keeps_has_disease_consistent() {
    let input = raw(
        &["age", "num"],
        &[&["40", "0"], &["41", "0"], &["42", "0"], &["43", "7"]],
    );
    let first = build_default_pipeline()
        .run(input, &ctx(TargetPolicy::MultiClass))
        .unwrap()
        .table;
    assert_eq!(cells(&first, "target"), vec![Cell::Int(0); 4]);
    assert_eq!(cells(&first, HAS_DISEASE), vec![Cell::Int(0); 4]);

    let second = build_default_pipeline()
        .run(first.clone(), &ctx(TargetPolicy::MultiClass))
        .unwrap()
        .table;
    assert_eq!(first, second);
}

#[test]
fn stale_flag_does_not_merge_rows_on_rerun() {
    let input = raw(
        &["age", "cp", "num"],
        &[&["0", "0", "0"], &["0", "0", "5"]],
    );
    let first = build_default_pipeline()
        .run(input, &ctx(TargetPolicy::MultiClass))
        .unwrap()
        .table;
    let second = build_default_pipeline()
        .run(first.clone(), &ctx(TargetPolicy::MultiClass))
        .unwrap()
        .table;
    assert_eq!(first.height(), second.height());
    assert_eq!(first, second);
}

#[test]
fn unparsable_dates_are_resolved_like_other_gaps() {
    let context = TransformContext::new(TransformConfig::default().with_standardize_dates(true))
        .with_processed_at(Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap());
    let input = raw(
        &["age", "visit_date"],
        &[
            &["40", "2024-01-01"],
            &["41", "2024-01-02"],
            &["42", "2024-01-03"],
            &["43", "soon"],
        ],
    );
    let table = build_default_pipeline().run(input, &context).unwrap().table;

    assert_eq!(table.missing_count(), 0);
    assert_eq!(
        cells(&table, "age"),
        vec![Cell::Int(40), Cell::Int(41), Cell::Int(42)]
    );
}

#[test]
fn date_columns_are_standardized_when_enabled() {
    let context = TransformContext::new(TransformConfig::default().with_standardize_dates(true));
    let table = build_default_pipeline()
        .run(
            raw(
                &["age", "visit_date"],
                &[&["40", "03/07/2024"], &["41", "2024-03-08"]],
            ),
            &context,
        )
        .unwrap()
        .table;
    assert_eq!(
        cells(&table, "visit_date"),
        vec![
            Cell::Text("2024-03-07".into()),
            Cell::Text("2024-03-08".into())
        ]
    );
}

// ============================================================================
// Pipeline composition
// ============================================================================

#[test]
fn failing_step_aborts_run() {
    struct RequireSite;
    impl TransformStep for RequireSite {
        fn apply(&self, table: Table, _ctx: &TransformContext) -> heart_transform::Result<Transformed> {
            if table.has_column("site") {
                Ok(Transformed::unchanged_counts(table))
            } else {
                Err(TransformError::MissingColumn {
                    step: "require_site",
                    column: "site".into(),
                })
            }
        }
        fn step_name(&self) -> &'static str {
            "require_site"
        }
    }

    let pipeline = build_default_pipeline().add_step(Box::new(RequireSite));
    let err = pipeline
        .run(scenario_a(), &ctx(TargetPolicy::Binary))
        .unwrap_err();
    assert!(matches!(err, TransformError::MissingColumn { .. }));
}

#[test]
fn steps_can_be_removed() {
    let pipeline = build_default_pipeline().remove_step("drop_duplicates");
    let names = pipeline.step_names();
    assert_eq!(names.len(), 6);
    assert!(!names.contains(&"drop_duplicates"));
}
