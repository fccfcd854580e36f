//! The store facade: path resolution, read/write policies, shape conversion

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::backend::{self, Backend, Dialect};
use crate::config::{BackendKind, SchemaPolicy, StoreConfig};
use crate::error::{Result, StoreError};
use crate::model::{
    columns_to_rows, project_records, records_to_rows, rows_to_columns, rows_to_records, Columns,
    Frame, Record, Rows,
};

const EXTENSION: &str = "csv";

/// Saves tables to CSV files and loads them back.
///
/// Every operation is a single synchronous call: nothing is cached between
/// calls and the file on disk is the only state.
///
/// # Missing files
///
/// Loads never fail because a file is absent. `load_rows`, `load_dicts` and
/// `load_columns` return an empty table and `load_frame` returns `None`,
/// with a `warn!` diagnostic. Use [`TabularStore::exists`] beforehand when
/// an empty file and a missing one need to be told apart.
pub struct TabularStore {
    backend: Box<dyn Backend>,
    base_dir: Option<PathBuf>,
    schema_policy: SchemaPolicy,
}

impl TabularStore {
    /// Store that uses every path exactly as given
    pub fn new(backend: Box<dyn Backend>) -> Self {
        Self {
            backend,
            base_dir: None,
            schema_policy: SchemaPolicy::default(),
        }
    }

    /// Store rooted at `dir`, which is created (with parents) if absent.
    ///
    /// Relative names are joined to `dir` and get a `.csv` suffix when they
    /// lack one.
    pub fn with_base_dir(dir: impl Into<PathBuf>, backend: Box<dyn Backend>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;
        Ok(Self {
            backend,
            base_dir: Some(dir),
            schema_policy: SchemaPolicy::default(),
        })
    }

    /// Build a store from configuration
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        let backend = backend::create(config.backend, Dialect::from(config));
        let store = match &config.base_dir {
            Some(dir) => Self::with_base_dir(dir, backend)?,
            None => Self::new(backend),
        };
        Ok(store.with_schema_policy(config.schema_policy))
    }

    /// Set how dict saves treat records with differing keys
    pub fn with_schema_policy(mut self, policy: SchemaPolicy) -> Self {
        self.schema_policy = policy;
        self
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    /// Resolve a caller-supplied name to the file it refers to.
    ///
    /// Absolute paths are returned unchanged, with or without a base directory.
    pub fn resolve(&self, name: impl AsRef<Path>) -> PathBuf {
        let name = name.as_ref();
        let Some(dir) = self.base_dir.as_ref().filter(|_| !name.is_absolute()) else {
            return name.to_path_buf();
        };

        let mut path = dir.join(name);
        if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
            let mut file_name = path.file_name().map(|f| f.to_os_string()).unwrap_or_default();
            file_name.push(".");
            file_name.push(EXTENSION);
            path.set_file_name(file_name);
        }
        path
    }

    /// Whether the resolved file exists. No side effects.
    pub fn exists(&self, name: impl AsRef<Path>) -> bool {
        self.resolve(name).exists()
    }

    /// Write each row as one line, replacing any existing file.
    ///
    /// A row with no fields fails with [`StoreError::EmptyRow`] and nothing
    /// is written.
    pub fn save_rows(&self, rows: &[Vec<String>], name: impl AsRef<Path>) -> Result<PathBuf> {
        reject_empty_rows(rows)?;
        let path = self.resolve(name);
        self.backend.write_rows(rows, &path)?;
        info!(path = %path.display(), rows = rows.len(), "saved rows");
        Ok(path)
    }

    /// Read every line into a row of strings; empty if the file is missing
    pub fn load_rows(&self, name: impl AsRef<Path>) -> Result<Rows> {
        let path = self.resolve(name);
        let rows = self.read_existing(&path)?.unwrap_or_default();
        Ok(rows)
    }

    /// Add rows after the existing content, creating the file if absent.
    /// Rows with no fields are rejected as in [`TabularStore::save_rows`].
    pub fn append_rows(&self, rows: &[Vec<String>], name: impl AsRef<Path>) -> Result<PathBuf> {
        reject_empty_rows(rows)?;
        let path = self.resolve(name);
        self.backend.append_rows(rows, &path)?;
        info!(path = %path.display(), rows = rows.len(), "appended rows");
        Ok(path)
    }

    /// Write rows under an explicit header. Every row must match the header's width.
    pub fn save_table(
        &self,
        header: &[String],
        rows: &[Vec<String>],
        name: impl AsRef<Path>,
    ) -> Result<PathBuf> {
        if let Some((i, bad)) = rows.iter().enumerate().find(|(_, r)| r.len() != header.len()) {
            return Err(StoreError::RowWidth {
                line: i + 2,
                expected: header.len(),
                found: bad.len(),
            });
        }

        let mut grid = Vec::with_capacity(rows.len() + 1);
        grid.push(header.to_vec());
        grid.extend_from_slice(rows);
        self.save_rows(&grid, name)
    }

    /// Write a header from the first record's keys, then one line per record.
    ///
    /// Returns `Ok(None)` without touching the file when `records` is empty.
    pub fn save_dicts(&self, records: &[Record], name: impl AsRef<Path>) -> Result<Option<PathBuf>> {
        if records.is_empty() {
            info!("no records to save");
            return Ok(None);
        }

        let rows = records_to_rows(records, self.schema_policy)?;
        reject_empty_rows(&rows)?;
        let path = self.resolve(name);
        self.backend.write_rows(&rows, &path)?;
        info!(path = %path.display(), records = records.len(), "saved records");
        Ok(Some(path))
    }

    /// Save a single record as a header line and one value line
    pub fn save_record(&self, record: &Record, name: impl AsRef<Path>) -> Result<PathBuf> {
        let rows = records_to_rows(std::slice::from_ref(record), self.schema_policy)?;
        self.save_rows(&rows, name)
    }

    /// Read the header as field names and zip every later line with it
    pub fn load_dicts(&self, name: impl AsRef<Path>) -> Result<Vec<Record>> {
        let path = self.resolve(name);
        match self.read_existing(&path)? {
            Some(rows) => rows_to_records(rows, 1),
            None => Ok(Vec::new()),
        }
    }

    /// Append records to a dict file.
    ///
    /// An existing file's header is the schema the records are checked
    /// against; otherwise the first record's keys become the header.
    pub fn append_dicts(&self, records: &[Record], name: impl AsRef<Path>) -> Result<Option<PathBuf>> {
        if records.is_empty() {
            info!("no records to append");
            return Ok(None);
        }

        let path = self.resolve(name);
        let header = match self.read_existing(&path)? {
            Some(rows) => rows.into_iter().next(),
            None => None,
        };

        match header {
            Some(header) => {
                let rows = project_records(&header, records, self.schema_policy)?;
                reject_empty_rows(&rows)?;
                self.backend.append_rows(&rows, &path)?;
            }
            None => {
                let rows = records_to_rows(records, self.schema_policy)?;
                reject_empty_rows(&rows)?;
                self.backend.write_rows(&rows, &path)?;
            }
        }

        info!(path = %path.display(), records = records.len(), "appended records");
        Ok(Some(path))
    }

    /// Write a column map as a header line plus one line per row
    pub fn save_columns(&self, columns: &Columns, name: impl AsRef<Path>) -> Result<PathBuf> {
        let rows = columns_to_rows(columns)?;
        reject_empty_rows(&rows)?;
        let path = self.resolve(name);
        self.backend.write_rows(&rows, &path)?;
        info!(path = %path.display(), columns = columns.len(), "saved columns");
        Ok(path)
    }

    /// Read a file back into a column map; empty if the file is missing
    pub fn load_columns(&self, name: impl AsRef<Path>) -> Result<Columns> {
        let path = self.resolve(name);
        match self.read_existing(&path)? {
            Some(rows) => rows_to_columns(rows),
            None => Ok(Columns::new()),
        }
    }

    /// Load with the first line as column names and inferred column types
    pub fn load_frame(&self, name: impl AsRef<Path>) -> Result<Option<Frame>> {
        let path = self.resolve(name);
        Ok(self.read_existing(&path)?.map(Frame::with_header))
    }

    /// Sorted names of the `.csv` files in the base directory
    pub fn list_files(&self) -> Result<Vec<String>> {
        let Some(dir) = &self.base_dir else {
            return Ok(Vec::new());
        };

        let mut names = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(|e| StoreError::io(dir, e))? {
            let path = entry.map_err(|e| StoreError::io(dir, e))?.path();
            if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(EXTENSION) {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();

        Ok(names)
    }

    /// Rows of `path`, or `None` (with a diagnostic) when it does not exist
    fn read_existing(&self, path: &Path) -> Result<Option<Rows>> {
        if !path.exists() {
            warn!(path = %path.display(), "file not found");
            return Ok(None);
        }

        let rows = self.backend.read_rows(path)?;
        info!(path = %path.display(), rows = rows.len(), "loaded rows");
        Ok(Some(rows))
    }
}

/// A zero-field row has no faithful text form: the `csv` writer emits `""`,
/// which reads back as one empty field, and Arrow batches cannot hold it.
fn reject_empty_rows(rows: &[Vec<String>]) -> Result<()> {
    match rows.iter().position(Vec::is_empty) {
        Some(i) => Err(StoreError::EmptyRow { line: i + 1 }),
        None => Ok(()),
    }
}
