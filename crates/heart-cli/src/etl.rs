//! Extract, transform and load, wired together for one run.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use heart_ingest::{DatasetStats, ExtractOptions, extract_csv};
use heart_load::{CsvSink, DEFAULT_BATCH_SIZE, Loader, SqliteSink};
use heart_transform::{TransformConfig, TransformContext, TransformReport, build_default_pipeline};
use serde::Serialize;
use tracing::{info, info_span, trace};

use crate::logging::redact_value;

/// Default SQLite database path.
pub const DEFAULT_DATABASE: &str = "heart_disease.db";

/// Everything one ETL run needs.
#[derive(Debug, Clone)]
pub struct EtlOptions {
    pub input: PathBuf,
    pub extract: ExtractOptions,
    pub transform: TransformConfig,
    pub database: PathBuf,
    pub csv_output: Option<PathBuf>,
    pub batch_size: usize,
    /// Transform and report without writing any output.
    pub dry_run: bool,
}

impl EtlOptions {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            extract: ExtractOptions::default(),
            transform: TransformConfig::default(),
            database: PathBuf::from(DEFAULT_DATABASE),
            csv_output: None,
            batch_size: DEFAULT_BATCH_SIZE,
            dry_run: false,
        }
    }
}

/// Outcome of a run, as printed and optionally written to `--report`.
#[derive(Debug, Clone, Serialize)]
pub struct EtlResult {
    pub input: PathBuf,
    pub extracted: DatasetStats,
    pub transform: TransformReport,
    pub records_loaded: usize,
    pub database: Option<PathBuf>,
    pub csv_output: Option<PathBuf>,
    pub dry_run: bool,
    pub elapsed_ms: u64,
}

/// Runs the whole pipeline.
pub fn run_etl(options: &EtlOptions) -> Result<EtlResult> {
    let started = Instant::now();
    let span = info_span!("etl", input = %options.input.display());
    let _guard = span.enter();

    let raw = extract_csv(&options.input, &options.extract)
        .with_context(|| format!("extract {}", options.input.display()))?;
    let extracted = DatasetStats::from_table(&raw);

    let ctx = TransformContext::new(options.transform.clone());
    let output = build_default_pipeline()
        .run(raw, &ctx)
        .context("transform dataset")?;
    if output.table.height() > 0 {
        let first_row = output
            .table
            .row(0)
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        trace!(row = redact_value(&first_row), "first transformed row");
    }

    let mut records_loaded = 0;
    let mut database = None;
    let mut csv_output = None;
    if options.dry_run {
        info!("dry run: skipping load");
    } else {
        let loader = Loader::new(options.batch_size);
        let mut sink = SqliteSink::open(&options.database)
            .with_context(|| format!("open database {}", options.database.display()))?;
        records_loaded = loader
            .load(&output.table, &mut sink)
            .context("load into database")?;
        database = Some(options.database.clone());

        if let Some(path) = &options.csv_output {
            let mut sink =
                CsvSink::create(path).with_context(|| format!("create {}", path.display()))?;
            loader
                .load(&output.table, &mut sink)
                .with_context(|| format!("write {}", path.display()))?;
            csv_output = Some(path.clone());
        }
    }

    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    info!(
        rows_in = output.report.rows_in,
        rows_out = output.report.rows_out,
        records_loaded,
        elapsed_ms,
        "ETL pipeline completed"
    );
    Ok(EtlResult {
        input: options.input.clone(),
        extracted,
        transform: output.report,
        records_loaded,
        database,
        csv_output,
        dry_run: options.dry_run,
        elapsed_ms,
    })
}

/// Writes the run result as pretty JSON.
pub fn write_report(path: &Path, result: &EtlResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result).context("serialize report")?;
    std::fs::write(path, json).with_context(|| format!("write report {}", path.display()))?;
    Ok(())
}
