//! Backend that goes through an in-memory [`Frame`]

use std::path::Path;

use tracing::debug;

use crate::config::BackendKind;
use crate::error::Result;
use crate::model::{Frame, Rows};

use super::csv::CsvBackend;
use super::{Backend, Dialect};

/// Loads whole files into a [`Frame`] and writes frames back out.
///
/// Appending is load, concat, save: the file is rewritten each time.
pub struct FrameBackend {
    text: CsvBackend,
}

impl FrameBackend {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            text: CsvBackend::new(dialect),
        }
    }

    /// Read `path` as a headerless frame
    pub fn load(&self, path: &Path) -> Result<Frame> {
        Ok(Frame::headerless(self.text.read_rows(path)?))
    }

    /// Write a frame, header first when it has one
    pub fn save(&self, frame: &Frame, path: &Path) -> Result<()> {
        self.text.write_rows(&frame.to_rows(), path)
    }
}

impl Default for FrameBackend {
    fn default() -> Self {
        Self::new(Dialect::default())
    }
}

impl Backend for FrameBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Frame
    }

    fn read_rows(&self, path: &Path) -> Result<Rows> {
        let frame = self.load(path)?;
        debug!(
            path = %path.display(),
            rows = frame.row_count(),
            columns = frame.column_count(),
            "frame backend read"
        );
        Ok(frame.into_rows())
    }

    fn write_rows(&self, rows: &[Vec<String>], path: &Path) -> Result<()> {
        self.save(&Frame::headerless(rows.to_vec()), path)
    }

    fn append_rows(&self, rows: &[Vec<String>], path: &Path) -> Result<()> {
        let incoming = Frame::headerless(rows.to_vec());
        let combined = if path.exists() {
            Frame::concat(vec![self.load(path)?, incoming])?
        } else {
            incoming
        };
        debug!(path = %path.display(), rows = combined.row_count(), "frame backend rewrite");
        self.save(&combined, path)
    }
}
