//! Data model for tabular data representation

mod frame;
mod schema;
mod table;

pub use frame::Frame;
pub use schema::{CellType, Column};
pub use table::{
    columns_to_rows, project_records, record, records_to_rows, row, rows_to_columns,
    rows_to_records, Columns, Record, Rows,
};
