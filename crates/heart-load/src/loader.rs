//! Batched loading of a transformed table.

use heart_model::Table;
use tracing::{error, info};

use crate::error::{LoadError, Result};
use crate::record::records_from_table;
use crate::sink::RecordSink;

/// Records written per batch unless configured otherwise.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Writes a table to a sink in fixed-size batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Loader {
    batch_size: usize,
}

impl Default for Loader {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

impl Loader {
    pub fn new(batch_size: usize) -> Self {
        Self { batch_size }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Converts `table` to records and writes them; returns the total written.
    ///
    /// Conversion happens up front, so a bad row fails the load before
    /// any batch reaches the sink. A sink error aborts the remaining batches;
    /// batches already written stay written.
    pub fn load(&self, table: &Table, sink: &mut dyn RecordSink) -> Result<usize> {
        if self.batch_size == 0 {
            return Err(LoadError::InvalidBatchSize);
        }
        let records = records_from_table(table)?;
        info!(records = records.len(), "loading records");

        let total_chunks = records.len().div_ceil(self.batch_size);
        let mut total = 0;
        for (idx, chunk) in records.chunks(self.batch_size).enumerate() {
            let written = sink.write_batch(chunk).inspect_err(|e| {
                error!(chunk = idx + 1, error = %e, "error loading chunk");
            })?;
            total += written;
            info!("loaded chunk {}/{}: {} records", idx + 1, total_chunks, written);
        }
        info!(total, "successfully loaded records");
        Ok(total)
    }
}
