//! Plain record reader/writer backend

use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use tracing::debug;

use crate::config::BackendKind;
use crate::error::{Result, StoreError};
use crate::model::Rows;

use super::{Backend, Dialect};

/// Backend that writes each row straight through the `csv` crate
pub struct CsvBackend {
    dialect: Dialect,
}

impl CsvBackend {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    fn write_to(&self, file: File, rows: &[Vec<String>], path: &Path) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.dialect.delimiter)
            .terminator(self.dialect.line_ending.terminator())
            .from_writer(BufWriter::new(file));

        for row in rows {
            writer
                .write_record(row)
                .map_err(|e| StoreError::csv(path, e))?;
        }
        writer.flush().map_err(|e| StoreError::io(path, e))
    }
}

impl Default for CsvBackend {
    fn default() -> Self {
        Self::new(Dialect::default())
    }
}

impl Backend for CsvBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Csv
    }

    fn read_rows(&self, path: &Path) -> Result<Rows> {
        let file = File::open(path).map_err(|e| StoreError::io(path, e))?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.dialect.delimiter)
            .from_reader(BufReader::new(file));

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| StoreError::csv(path, e))?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        debug!(path = %path.display(), rows = rows.len(), "csv backend read");
        Ok(rows)
    }

    fn write_rows(&self, rows: &[Vec<String>], path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| StoreError::io(path, e))?;
        self.write_to(file, rows, path)
    }

    fn append_rows(&self, rows: &[Vec<String>], path: &Path) -> Result<()> {
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .map_err(|e| StoreError::io(path, e))?;
        self.write_to(file, rows, path)
    }
}
