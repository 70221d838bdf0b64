//! CLI library components for the heart disease ETL runner.

pub mod etl;
pub mod logging;
