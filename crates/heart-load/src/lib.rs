//! Loading of transformed heart disease records.
//!
//! [`records_from_table`] turns the engine's output table into typed
//! [`HeartDiseaseRecord`]s, and a [`Loader`] writes them in batches to any
//! [`RecordSink`]: SQLite via `rusqlite` or CSV via `csv`.

pub mod error;
pub mod loader;
pub mod record;
pub mod sink;

pub use error::{LoadError, Result};
pub use loader::{DEFAULT_BATCH_SIZE, Loader};
pub use record::{HeartDiseaseRecord, records_from_table};
pub use sink::{CsvSink, RecordSink, SqliteSink};
