//! Error types for store operations

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors raised by the store and its backends.
///
/// A missing file on a read path is not represented here: loads return an
/// empty table instead.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Arrow error in {}", .path.display())]
    Arrow {
        path: PathBuf,
        #[source]
        source: arrow::error::ArrowError,
    },

    #[error("record {record} has fields [{}], expected [{}]", .found.join(", "), .expected.join(", "))]
    SchemaMismatch {
        record: usize,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("record {record} is missing field '{field}'")]
    MissingField { record: usize, field: String },

    #[error("line {line} has {found} fields, header has {expected}")]
    RowWidth {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("column '{column}' has {found} values, expected {expected}")]
    RaggedColumns {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("row {line} has {found} fields, columnar backend needs {expected}")]
    RaggedRows {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("row {line} has no fields")]
    EmptyRow { line: usize },

    #[error("frame {frame} has columns [{}], expected [{}]", .found.join(", "), .expected.join(", "))]
    FrameMismatch {
        frame: usize,
        expected: Vec<String>,
        found: Vec<String>,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        StoreError::Csv {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn arrow(path: impl Into<PathBuf>, source: arrow::error::ArrowError) -> Self {
        StoreError::Arrow {
            path: path.into(),
            source,
        }
    }
}
