//! Output formatting for loaded tables

mod json;
mod table;

use std::io::Write;

use anyhow::Result;

use crate::model::{Record, Rows};

pub use json::JsonOutput;
pub use table::TableOutput;

/// Output format for printed data
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Data loaded in one of the store's shapes
#[derive(Debug, Clone)]
pub enum Dataset {
    Rows(Rows),
    Records(Vec<Record>),
}

impl Dataset {
    pub fn len(&self) -> usize {
        match self {
            Dataset::Rows(rows) => rows.len(),
            Dataset::Records(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Trait for output formatters
pub trait OutputFormatter {
    /// Render a dataset to a writer
    fn render(&self, data: &Dataset, writer: &mut dyn Write) -> Result<()>;
}

/// Factory for creating output formatters
pub struct OutputFactory;

impl OutputFactory {
    /// Create an output formatter based on format type
    pub fn create(format: OutputFormat) -> Box<dyn OutputFormatter> {
        match format {
            OutputFormat::Table => Box::new(TableOutput::new()),
            OutputFormat::Json => Box::new(JsonOutput::new()),
        }
    }
}

/// Render a dataset to stdout
pub fn render_to_stdout(data: &Dataset, format: OutputFormat) -> Result<()> {
    let formatter = OutputFactory::create(format);
    let mut stdout = std::io::stdout();
    formatter.render(data, &mut stdout)
}
