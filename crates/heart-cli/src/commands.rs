use anyhow::Result;
use comfy_table::Table;
use heart_cli::etl::{EtlOptions, EtlResult, run_etl, write_report};
use heart_ingest::ExtractOptions;
use heart_model::{Schema, TargetPolicy};
use heart_transform::TransformConfig;

use crate::cli::{RunArgs, SchemaArgs};
use crate::summary::apply_table_style;

pub fn run_schema(args: &SchemaArgs) {
    let schema = Schema::for_policy(TargetPolicy::from(args.target_policy));
    let mut table = Table::new();
    table.set_header(vec!["Column", "Type", "Range", "Categories", "Imputation"]);
    apply_table_style(&mut table);
    for spec in schema.columns() {
        let range = spec
            .range
            .map(|(min, max)| format!("{min}..={max}"))
            .unwrap_or_default();
        let categories = spec
            .categories
            .map(|codes| {
                codes
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();
        table.add_row(vec![
            spec.name.to_string(),
            spec.semantic_type.as_str().to_string(),
            range,
            categories,
            format!("{:?}", spec.missing_imputation()).to_lowercase(),
        ]);
    }
    println!("Target policy: {}", schema.policy());
    println!("{table}");
}

pub fn run_pipeline(args: &RunArgs) -> Result<EtlResult> {
    let options = EtlOptions {
        extract: ExtractOptions::default().with_has_header(!args.no_header),
        transform: TransformConfig::new()
            .with_target_policy(args.target_policy.into())
            .with_source(args.source.clone())
            .with_standardize_dates(args.standardize_dates),
        database: args.database.clone(),
        csv_output: args.csv_output.clone(),
        batch_size: args.batch_size as usize,
        dry_run: args.dry_run,
        ..EtlOptions::new(args.input.clone())
    };
    let result = run_etl(&options)?;
    if let Some(path) = &args.report {
        write_report(path, &result)?;
    }
    Ok(result)
}
