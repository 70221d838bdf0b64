//! Destinations for record batches.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use rusqlite::{Connection, params};
use tracing::debug;

use crate::error::{LoadError, Result};
use crate::record::HeartDiseaseRecord;

/// A destination that accepts records one batch at a time.
pub trait RecordSink {
    /// Writes `batch` and returns how many records were stored.
    fn write_batch(&mut self, batch: &[HeartDiseaseRecord]) -> Result<usize>;
}

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS heart_disease (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    age          INTEGER NOT NULL,
    sex          BOOLEAN NOT NULL,
    cp           INTEGER,
    trestbps     INTEGER,
    chol         INTEGER,
    fbs          BOOLEAN,
    restecg      INTEGER,
    thalach      INTEGER,
    exang        BOOLEAN,
    oldpeak      REAL,
    slope        INTEGER,
    ca           INTEGER,
    thal         INTEGER,
    target       INTEGER NOT NULL,
    has_disease  BOOLEAN,
    source       TEXT NOT NULL,
    processed_at TEXT NOT NULL
);
"#;

const INSERT_RECORD: &str = "INSERT INTO heart_disease (
    age, sex, cp, trestbps, chol, fbs, restecg, thalach, exang, oldpeak,
    slope, ca, thal, target, has_disease, source, processed_at
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)";

/// SQLite-backed sink writing to the `heart_disease` table.
pub struct SqliteSink {
    conn: Connection,
}

impl SqliteSink {
    /// Opens (or creates) the database file and ensures the table exists.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| LoadError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        Self::with_connection(Connection::open(path)?)
    }

    pub fn in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(CREATE_TABLE)?;
        Ok(Self { conn })
    }

    /// Number of stored records.
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM heart_disease", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl RecordSink for SqliteSink {
    fn write_batch(&mut self, batch: &[HeartDiseaseRecord]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(INSERT_RECORD)?;
            for r in batch {
                stmt.execute(params![
                    r.age,
                    r.sex,
                    r.cp,
                    r.trestbps,
                    r.chol,
                    r.fbs,
                    r.restecg,
                    r.thalach,
                    r.exang,
                    r.oldpeak,
                    r.slope,
                    r.ca,
                    r.thal,
                    r.target,
                    r.has_disease,
                    r.source,
                    r.processed_at,
                ])?;
            }
        }
        tx.commit()?;
        debug!(records = batch.len(), "committed batch");
        Ok(batch.len())
    }
}

/// CSV sink with one header row followed by one line per record.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl CsvSink<File> {
    pub fn create(path: &Path) -> Result<Self> {
        Ok(Self {
            writer: csv::Writer::from_path(path)?,
        })
    }
}

impl<W: Write> CsvSink<W> {
    pub fn from_writer(writer: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(writer),
        }
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| LoadError::Csv(csv::Error::from(e.into_error())))
    }
}

impl<W: Write> RecordSink for CsvSink<W> {
    fn write_batch(&mut self, batch: &[HeartDiseaseRecord]) -> Result<usize> {
        for record in batch {
            self.writer.serialize(record)?;
        }
        self.writer.flush().map_err(csv::Error::from)?;
        Ok(batch.len())
    }
}
