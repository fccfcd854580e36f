//! Plain-text table output

use std::io::Write;

use anyhow::Result;
use tabled::builder::Builder;
use tabled::settings::Style;

use super::{Dataset, OutputFormatter};

/// Box-drawn table, one line per row
pub struct TableOutput;

impl TableOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TableOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TableOutput {
    fn render(&self, data: &Dataset, writer: &mut dyn Write) -> Result<()> {
        if data.is_empty() {
            writeln!(writer, "(no rows)")?;
            return Ok(());
        }

        let mut builder = Builder::default();
        match data {
            Dataset::Rows(rows) => {
                for row in rows {
                    builder.push_record(row.iter().cloned());
                }
            }
            Dataset::Records(records) => {
                builder.push_record(records[0].keys().cloned());
                for rec in records {
                    builder.push_record(rec.values().cloned());
                }
            }
        }

        let mut table = builder.build();
        table.with(Style::sharp());
        writeln!(writer, "{}", table)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::row;

    #[test]
    fn test_renders_every_cell() {
        let data = Dataset::Rows(vec![row(["name", "age"]), row(["Taro", "25"])]);
        let mut out = Vec::new();

        TableOutput::new().render(&data, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("name"));
        assert!(text.contains("Taro"));
        assert!(text.contains("25"));
    }

    #[test]
    fn test_empty_dataset() {
        let mut out = Vec::new();
        TableOutput::new().render(&Dataset::Rows(Vec::new()), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "(no rows)\n");
    }
}
