//! Columnar backend built on Arrow record batches

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, StringArray};
use arrow::compute::concat_batches;
use arrow::csv::reader::Format;
use arrow::csv::{ReaderBuilder, WriterBuilder};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use tracing::debug;

use crate::config::BackendKind;
use crate::error::{Result, StoreError};
use crate::model::Rows;

use super::{Backend, Dialect};

/// Backend that stores every column as an Arrow `Utf8` array.
///
/// Batches are rectangular, so every row must have the same number of
/// fields. Files are always written with `\n` terminators.
pub struct ArrowBackend {
    dialect: Dialect,
}

impl ArrowBackend {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    /// Read `path` into record batches, or `None` when the file is empty
    pub fn read_batches(&self, path: &Path) -> Result<Option<(SchemaRef, Vec<RecordBatch>)>> {
        let width = match self.detect_width(path)? {
            Some(w) => w,
            None => return Ok(None),
        };
        let schema = utf8_schema(width);

        let file = File::open(path).map_err(|e| StoreError::io(path, e))?;
        let reader = ReaderBuilder::new(schema.clone())
            .with_header(false)
            .with_delimiter(self.dialect.delimiter)
            .build(BufReader::new(file))
            .map_err(|e| StoreError::arrow(path, e))?;

        let batches = reader
            .collect::<std::result::Result<Vec<_>, ArrowError>>()
            .map_err(|e| StoreError::arrow(path, e))?;

        Ok(Some((schema, batches)))
    }

    /// Column count of the first record
    fn detect_width(&self, path: &Path) -> Result<Option<usize>> {
        let len = std::fs::metadata(path)
            .map_err(|e| StoreError::io(path, e))?
            .len();
        if len == 0 {
            return Ok(None);
        }

        let file = File::open(path).map_err(|e| StoreError::io(path, e))?;
        let (schema, _) = Format::default()
            .with_header(false)
            .with_delimiter(self.dialect.delimiter)
            .infer_schema(BufReader::new(file), Some(1))
            .map_err(|e| StoreError::arrow(path, e))?;

        match schema.fields().len() {
            0 => Ok(None),
            n => Ok(Some(n)),
        }
    }

    fn write_batch(&self, batch: &RecordBatch, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| StoreError::io(path, e))?;
        let mut writer = WriterBuilder::new()
            .with_header(false)
            .with_delimiter(self.dialect.delimiter)
            .build(BufWriter::new(file));
        writer.write(batch).map_err(|e| StoreError::arrow(path, e))?;
        writer.into_inner().flush().map_err(|e| StoreError::io(path, e))
    }
}

impl Default for ArrowBackend {
    fn default() -> Self {
        Self::new(Dialect::default())
    }
}

impl Backend for ArrowBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Arrow
    }

    fn read_rows(&self, path: &Path) -> Result<Rows> {
        let Some((_, batches)) = self.read_batches(path)? else {
            return Ok(Vec::new());
        };

        let mut rows = Vec::new();
        for batch in &batches {
            rows.extend(batch_rows(batch).map_err(|e| StoreError::arrow(path, e))?);
        }

        debug!(path = %path.display(), batches = batches.len(), rows = rows.len(), "arrow backend read");
        Ok(rows)
    }

    fn write_rows(&self, rows: &[Vec<String>], path: &Path) -> Result<()> {
        if rows.is_empty() {
            File::create(path).map_err(|e| StoreError::io(path, e))?;
            return Ok(());
        }
        let width = rows[0].len();
        let batch = rows_to_batch(rows, width, 0, path)?;
        self.write_batch(&batch, path)
    }

    fn append_rows(&self, rows: &[Vec<String>], path: &Path) -> Result<()> {
        let existing = if path.exists() {
            self.read_batches(path)?
        } else {
            None
        };

        let Some((schema, mut batches)) = existing else {
            return self.write_rows(rows, path);
        };
        if rows.is_empty() {
            return Ok(());
        }

        let offset = batches.iter().map(RecordBatch::num_rows).sum();
        batches.push(rows_to_batch(rows, schema.fields().len(), offset, path)?);

        let combined = concat_batches(&schema, &batches).map_err(|e| StoreError::arrow(path, e))?;
        debug!(path = %path.display(), rows = combined.num_rows(), "arrow backend rewrite");
        self.write_batch(&combined, path)
    }
}

fn utf8_schema(width: usize) -> SchemaRef {
    let fields: Vec<Field> = (0..width)
        .map(|i| Field::new(format!("column_{}", i + 1), DataType::Utf8, true))
        .collect();
    Arc::new(Schema::new(fields))
}

/// Build a `Utf8` batch. `offset` is the number of rows already in the file,
/// so errors report the line the row would land on.
fn rows_to_batch(rows: &[Vec<String>], width: usize, offset: usize, path: &Path) -> Result<RecordBatch> {
    if let Some((i, bad)) = rows
        .iter()
        .enumerate()
        .find(|(_, r)| r.len() != width || r.is_empty())
    {
        return Err(StoreError::RaggedRows {
            line: offset + i + 1,
            expected: width.max(1),
            found: bad.len(),
        });
    }

    let arrays: Vec<ArrayRef> = (0..width)
        .map(|c| {
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r[c].as_str()))) as ArrayRef
        })
        .collect();

    RecordBatch::try_new(utf8_schema(width), arrays).map_err(|e| StoreError::arrow(path, e))
}

/// Null cells come back as empty strings
fn batch_rows(batch: &RecordBatch) -> std::result::Result<Rows, ArrowError> {
    let columns = batch
        .columns()
        .iter()
        .map(|col| {
            col.as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| ArrowError::CastError(format!("expected Utf8 column, got {}", col.data_type())))
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok((0..batch.num_rows())
        .map(|r| {
            columns
                .iter()
                .map(|col| {
                    if col.is_null(r) {
                        String::new()
                    } else {
                        col.value(r).to_string()
                    }
                })
                .collect()
        })
        .collect())
}
