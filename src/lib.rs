//! tabstore - Save and load tabular data as CSV
//!
//! A [`TabularStore`] persists row lists, record lists and column maps to
//! delimited text files through one of three interchangeable backends
//! (plain `csv` records, an in-memory [`Frame`], or Arrow record batches).

pub mod backend;
pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod store;

pub use config::{BackendKind, LineEnding, SchemaPolicy, StoreConfig};
pub use error::{Result, StoreError};
pub use model::{record, row, Columns, Frame, Record, Rows};
pub use store::TabularStore;
