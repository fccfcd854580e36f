//! JSON output format

use std::io::Write;

use anyhow::Result;

use super::{Dataset, OutputFormatter};

/// JSON output formatter
pub struct JsonOutput {
    pretty: bool,
}

impl JsonOutput {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for JsonOutput {
    fn render(&self, data: &Dataset, writer: &mut dyn Write) -> Result<()> {
        let value = match data {
            Dataset::Rows(rows) => serde_json::to_value(rows)?,
            Dataset::Records(records) => serde_json::to_value(records)?,
        };

        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, &value)?;
        } else {
            serde_json::to_writer(&mut *writer, &value)?;
        }
        writeln!(writer)?;
        Ok(())
    }
}
