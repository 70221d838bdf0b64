//! Extraction of the raw heart disease dataset from CSV.
//!
//! Every value is read as text; typing is the transformation engine's job.

pub mod error;
pub mod reader;
pub mod stats;

pub use error::{IngestError, Result};
pub use reader::{ExtractOptions, MISSING_MARKERS, extract_csv, raw_cell};
pub use stats::DatasetStats;
