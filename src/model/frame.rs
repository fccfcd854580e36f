//! Row-and-column table with named, type-annotated columns

use serde::Serialize;

use crate::error::{Result, StoreError};

use super::schema::{CellType, Column};
use super::table::{Record, Rows};

/// A table of text cells with column metadata.
///
/// Cells are kept verbatim; `Column::inferred_type` only describes them.
/// Rows may be shorter than the column list when the source was ragged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Frame {
    /// Column definitions
    pub columns: Vec<Column>,
    /// Data rows (header excluded)
    pub rows: Rows,
    /// Whether the column names came from a header row
    pub has_header: bool,
}

impl Frame {
    /// Build a frame whose first row names the columns
    pub fn with_header(mut rows: Rows) -> Self {
        if rows.is_empty() {
            return Self {
                has_header: true,
                ..Default::default()
            };
        }
        let header = rows.remove(0);
        let columns = header
            .into_iter()
            .enumerate()
            .map(|(i, name)| Column::new(name, i))
            .collect();

        let mut frame = Self {
            columns,
            rows,
            has_header: true,
        };
        frame.infer_column_types();
        frame
    }

    /// Build a frame with positional column names (`column_1`, `column_2`, ...)
    pub fn headerless(rows: Rows) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut frame = Self {
            columns: positional_columns(width),
            rows,
            has_header: false,
        };
        frame.infer_column_types();
        frame
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get column index by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Get column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Values of one column, with missing cells as empty strings
    pub fn column_values(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(|r| r.get(idx).map(String::as_str).unwrap_or(""))
                .collect(),
        )
    }

    /// Data rows as records keyed by column name
    pub fn records(&self) -> Vec<Record> {
        self.rows
            .iter()
            .map(|r| {
                self.columns
                    .iter()
                    .map(|c| (c.name.clone(), r.get(c.index).cloned().unwrap_or_default()))
                    .collect()
            })
            .collect()
    }

    /// Stack frames vertically.
    ///
    /// Frames with headers must agree on column names. Headerless frames are
    /// aligned by position and widened to the widest input.
    pub fn concat(frames: Vec<Frame>) -> Result<Frame> {
        let mut iter = frames.into_iter();
        let Some(mut combined) = iter.next() else {
            return Ok(Frame::default());
        };

        for (idx, frame) in iter.enumerate() {
            if combined.has_header || frame.has_header {
                let expected: Vec<String> = combined.columns.iter().map(|c| c.name.clone()).collect();
                let found: Vec<String> = frame.columns.iter().map(|c| c.name.clone()).collect();
                if expected != found {
                    return Err(StoreError::FrameMismatch {
                        frame: idx + 1,
                        expected,
                        found,
                    });
                }
            } else if frame.column_count() > combined.column_count() {
                combined.columns = positional_columns(frame.column_count());
            }
            combined.rows.extend(frame.rows);
        }

        combined.infer_column_types();
        Ok(combined)
    }

    /// Grid of rows as written to disk, header first when there is one
    pub fn to_rows(&self) -> Rows {
        let mut rows = Vec::with_capacity(self.rows.len() + 1);
        if self.has_header {
            rows.push(self.columns.iter().map(|c| c.name.clone()).collect());
        }
        rows.extend(self.rows.iter().cloned());
        rows
    }

    /// Consume the frame into its on-disk grid
    pub fn into_rows(self) -> Rows {
        if !self.has_header {
            return self.rows;
        }
        let mut rows = self.rows;
        rows.insert(0, self.columns.into_iter().map(|c| c.name).collect());
        rows
    }

    fn infer_column_types(&mut self) {
        for col in &mut self.columns {
            col.inferred_type = self
                .rows
                .iter()
                .filter_map(|r| r.get(col.index))
                .fold(CellType::Null, |acc, cell| acc.widen(CellType::infer(cell)));
        }
    }
}

fn positional_columns(width: usize) -> Vec<Column> {
    (0..width)
        .map(|i| Column::new(format!("column_{}", i + 1), i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::row;

    fn scores() -> Frame {
        Frame::with_header(vec![
            row(["name", "age", "score"]),
            row(["Taro", "25", "1500"]),
            row(["Hanako", "30", "2400.5"]),
        ])
    }

    #[test]
    fn test_with_header_infers_types() {
        let frame = scores();
        assert_eq!(frame.row_count(), 2);
        assert_eq!(frame.column_count(), 3);
        assert_eq!(frame.column("name").unwrap().inferred_type, CellType::String);
        assert_eq!(frame.column("age").unwrap().inferred_type, CellType::Int);
        assert_eq!(frame.column("score").unwrap().inferred_type, CellType::Float);
        assert_eq!(frame.column_values("age").unwrap(), vec!["25", "30"]);
    }

    #[test]
    fn test_cells_kept_verbatim() {
        let frame = Frame::with_header(vec![row(["v"]), row([" 3.10 "])]);
        assert_eq!(frame.rows[0][0], " 3.10 ");
        assert_eq!(frame.to_rows(), vec![row(["v"]), row([" 3.10 "])]);
    }

    #[test]
    fn test_headerless_widens_to_longest_row() {
        let frame = Frame::headerless(vec![row(["a"]), row(["b", "c"])]);
        assert_eq!(frame.column_count(), 2);
        assert_eq!(frame.columns[1].name, "column_2");
        assert_eq!(frame.to_rows(), vec![row(["a"]), row(["b", "c"])]);
    }

    #[test]
    fn test_concat_with_header() {
        let extra = Frame::with_header(vec![row(["name", "age", "score"]), row(["Ichiro", "22", "3200"])]);
        let combined = Frame::concat(vec![scores(), extra]).unwrap();
        assert_eq!(combined.row_count(), 3);
        assert_eq!(combined.rows[2][0], "Ichiro");
        assert_eq!(combined.column("score").unwrap().inferred_type, CellType::Float);
    }

    #[test]
    fn test_concat_rejects_different_columns() {
        let other = Frame::with_header(vec![row(["name", "score"]), row(["Ichiro", "3200"])]);
        let err = Frame::concat(vec![scores(), other]).unwrap_err();
        assert!(matches!(err, StoreError::FrameMismatch { frame: 1, .. }));
        assert!(err.to_string().starts_with("frame 1 has columns [name, score]"));
    }

    #[test]
    fn test_records() {
        let records = scores().records();
        assert_eq!(records[1]["name"], "Hanako");
        assert_eq!(records[1].keys().collect::<Vec<_>>(), vec!["name", "age", "score"]);
    }
}
