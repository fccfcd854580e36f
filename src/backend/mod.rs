//! Backends that move a row grid to and from a delimited text file

mod arrow;
mod csv;
mod frame;

use std::path::Path;

use crate::config::{BackendKind, LineEnding, StoreConfig};
use crate::error::Result;
use crate::model::Rows;

pub use self::arrow::ArrowBackend;
pub use self::csv::CsvBackend;
pub use self::frame::FrameBackend;

/// Trait for the library adapter behind a store.
///
/// Backends see only raw rows; headers, records and columns are the
/// store's concern. Reads expect the file to exist.
pub trait Backend: Send + Sync {
    /// Which backend this is
    fn kind(&self) -> BackendKind;

    /// Read every line of `path` into a row of fields
    fn read_rows(&self, path: &Path) -> Result<Rows>;

    /// Create or truncate `path` and write `rows`
    fn write_rows(&self, rows: &[Vec<String>], path: &Path) -> Result<()>;

    /// Add `rows` after the existing content of `path`, creating it if absent
    fn append_rows(&self, rows: &[Vec<String>], path: &Path) -> Result<()>;
}

/// Text format settings shared by all backends
#[derive(Debug, Clone, Copy)]
pub struct Dialect {
    pub delimiter: u8,
    pub line_ending: LineEnding,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            delimiter: b',',
            line_ending: LineEnding::default(),
        }
    }
}

impl From<&StoreConfig> for Dialect {
    fn from(config: &StoreConfig) -> Self {
        Self {
            delimiter: config.delimiter,
            line_ending: config.line_ending,
        }
    }
}

/// Create a backend of the given kind
pub fn create(kind: BackendKind, dialect: Dialect) -> Box<dyn Backend> {
    match kind {
        BackendKind::Csv => Box::new(CsvBackend::new(dialect)),
        BackendKind::Frame => Box::new(FrameBackend::new(dialect)),
        BackendKind::Arrow => Box::new(ArrowBackend::new(dialect)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_matches_kind() {
        for kind in [BackendKind::Csv, BackendKind::Frame, BackendKind::Arrow] {
            assert_eq!(create(kind, Dialect::default()).kind(), kind);
        }
    }
}
