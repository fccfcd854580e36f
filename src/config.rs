//! Configuration handling for tabstore

use std::path::PathBuf;

/// Which library adapter moves rows to and from disk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BackendKind {
    /// Plain `csv` record reader/writer
    #[default]
    Csv,
    /// Row-and-column [`Frame`](crate::model::Frame)
    Frame,
    /// Arrow record batches
    Arrow,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Csv => "csv",
            BackendKind::Frame => "frame",
            BackendKind::Arrow => "arrow",
        }
    }
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" | "easy" => Ok(BackendKind::Csv),
            "frame" | "normal" => Ok(BackendKind::Frame),
            "arrow" | "hard" => Ok(BackendKind::Arrow),
            _ => Err(format!("Unknown backend: {}", s)),
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record terminator used when writing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineEnding {
    #[default]
    Lf,
    Crlf,
}

impl LineEnding {
    pub(crate) fn terminator(self) -> csv::Terminator {
        match self {
            LineEnding::Lf => csv::Terminator::Any(b'\n'),
            LineEnding::Crlf => csv::Terminator::CRLF,
        }
    }
}

/// How `save_dicts` treats records whose keys differ from the first record's
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchemaPolicy {
    /// Reject the whole save when any record has a different key set
    #[default]
    Strict,
    /// Use the first record's keys; drop extra keys, fail on missing ones
    FirstRecord,
}

/// Configuration for a [`TabularStore`](crate::TabularStore)
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory that bare file names are resolved against
    pub base_dir: Option<PathBuf>,
    /// Backend used for reads and writes
    pub backend: BackendKind,
    /// Field delimiter
    pub delimiter: u8,
    /// Record terminator for writes
    pub line_ending: LineEnding,
    /// Key-set handling for dict saves
    pub schema_policy: SchemaPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_dir: None,
            backend: BackendKind::default(),
            delimiter: b',',
            line_ending: LineEnding::default(),
            schema_policy: SchemaPolicy::default(),
        }
    }
}

impl StoreConfig {
    /// Create a config rooted at a base directory
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
            ..Default::default()
        }
    }

    /// Set the backend
    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    /// Set the field delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the record terminator
    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    /// Set the dict key-set policy
    pub fn with_schema_policy(mut self, policy: SchemaPolicy) -> Self {
        self.schema_policy = policy;
        self
    }
}
