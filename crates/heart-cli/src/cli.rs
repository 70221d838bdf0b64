//! CLI argument definitions for the heart disease ETL runner.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use heart_model::TargetPolicy;

#[derive(Parser)]
#[command(
    name = "heart-etl",
    version,
    about = "Heart disease ETL - clean, validate and load the UCI heart disease dataset",
    long_about = "Extract the UCI heart disease dataset from CSV, normalize, coerce,\n\
                  impute, validate and deduplicate it, then load it into SQLite.\n\n\
                  Every run option can also be set through a HEART_* environment variable."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow dataset values to appear in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Prefix pretty and compact log lines with a timestamp.
    #[arg(long = "log-timestamps", env = "HEART_LOG_TIMESTAMPS", global = true)]
    pub log_timestamps: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Extract, transform and load a dataset file.
    Run(RunArgs),

    /// Print the column schema the engine enforces.
    Schema(SchemaArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Path to the raw dataset CSV.
    #[arg(long = "input", env = "HEART_INPUT", value_name = "PATH")]
    pub input: PathBuf,

    /// The file has no header row; UCI column order is assumed.
    #[arg(long = "no-header", env = "HEART_NO_HEADER")]
    pub no_header: bool,

    /// SQLite database to load into.
    #[arg(
        long = "database",
        env = "HEART_DATABASE",
        value_name = "PATH",
        default_value = "heart_disease.db"
    )]
    pub database: PathBuf,

    /// Also write the transformed records to this CSV file.
    #[arg(long = "csv-output", env = "HEART_CSV_OUTPUT", value_name = "PATH")]
    pub csv_output: Option<PathBuf>,

    /// Records per load batch.
    #[arg(
        long = "batch-size",
        env = "HEART_BATCH_SIZE",
        default_value_t = 1000,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub batch_size: u32,

    /// How the diagnosis column is represented.
    #[arg(
        long = "target-policy",
        env = "HEART_TARGET_POLICY",
        value_enum,
        default_value = "multi-class"
    )]
    pub target_policy: TargetPolicyArg,

    /// Lineage source tag written to every record.
    #[arg(long = "source", env = "HEART_SOURCE", default_value = "uci_ml_repo")]
    pub source: String,

    /// Rewrite date-like text columns to YYYY-MM-DD.
    #[arg(long = "standardize-dates", env = "HEART_STANDARDIZE_DATES")]
    pub standardize_dates: bool,

    /// Transform and report without loading anything.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Write the run report as JSON.
    #[arg(long = "report", value_name = "PATH")]
    pub report: Option<PathBuf>,
}

#[derive(Parser)]
pub struct SchemaArgs {
    /// Target policy whose schema to print.
    #[arg(long = "target-policy", value_enum, default_value = "multi-class")]
    pub target_policy: TargetPolicyArg,
}

/// CLI target policy choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum TargetPolicyArg {
    Binary,
    MultiClass,
}

impl From<TargetPolicyArg> for TargetPolicy {
    fn from(arg: TargetPolicyArg) -> Self {
        match arg {
            TargetPolicyArg::Binary => Self::Binary,
            TargetPolicyArg::MultiClass => Self::MultiClass,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
