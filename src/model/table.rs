//! In-memory table shapes and the conversions between them
//!
//! Every backend moves a plain row grid; the record and column shapes are
//! converted to and from that grid here, with the first row as the header.

use indexmap::IndexMap;
use tracing::warn;

use crate::config::SchemaPolicy;
use crate::error::{Result, StoreError};

/// Row-oriented table: each row is a sequence of fields
pub type Rows = Vec<Vec<String>>;

/// One record of a dictionary-oriented table, keyed by field name in header order
pub type Record = IndexMap<String, String>;

/// Column-oriented table: field name to that field's values across all rows
pub type Columns = IndexMap<String, Vec<String>>;

/// Build a row from anything displayable
pub fn row<I>(fields: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: ToString,
{
    fields.into_iter().map(|f| f.to_string()).collect()
}

/// Build a record from `(name, value)` pairs, keeping their order
pub fn record<I, K, V>(pairs: I) -> Record
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: ToString,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.to_string()))
        .collect()
}

/// Flatten records into a header row followed by one row per record.
///
/// The header is the first record's keys in insertion order. `policy`
/// decides what happens when a later record's keys differ.
pub fn records_to_rows(records: &[Record], policy: SchemaPolicy) -> Result<Rows> {
    let Some(first) = records.first() else {
        return Ok(Vec::new());
    };
    let header: Vec<String> = first.keys().cloned().collect();

    let mut rows = project_records(&header, records, policy)?;
    rows.insert(0, header);
    Ok(rows)
}

/// Extract each record's values in `header` order.
///
/// Under [`SchemaPolicy::Strict`] every record must have exactly the header's
/// key set, checked before any row is built. Under
/// [`SchemaPolicy::FirstRecord`] extra keys are dropped and a missing key is
/// an error.
pub fn project_records(header: &[String], records: &[Record], policy: SchemaPolicy) -> Result<Rows> {
    if policy == SchemaPolicy::Strict {
        for (idx, rec) in records.iter().enumerate() {
            let same_keys = rec.len() == header.len() && header.iter().all(|k| rec.contains_key(k));
            if !same_keys {
                return Err(StoreError::SchemaMismatch {
                    record: idx,
                    expected: header.to_vec(),
                    found: rec.keys().cloned().collect(),
                });
            }
        }
    }

    let mut rows = Vec::with_capacity(records.len() + 1);
    for (idx, rec) in records.iter().enumerate() {
        let extra: Vec<&str> = rec
            .keys()
            .filter(|k| !header.contains(*k))
            .map(String::as_str)
            .collect();
        if !extra.is_empty() {
            warn!(record = idx, fields = ?extra, "dropping fields not present in the header");
        }

        let values = header
            .iter()
            .map(|name| {
                rec.get(name).cloned().ok_or_else(|| StoreError::MissingField {
                    record: idx,
                    field: name.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        rows.push(values);
    }

    Ok(rows)
}

/// Zip each data row with the header row.
///
/// `first_line` is the 1-based file line of the header, used in errors.
pub fn rows_to_records(mut rows: Rows, first_line: usize) -> Result<Vec<Record>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let header = rows.remove(0);

    rows.into_iter()
        .enumerate()
        .map(|(i, values)| {
            if values.len() != header.len() {
                return Err(StoreError::RowWidth {
                    line: first_line + i + 1,
                    expected: header.len(),
                    found: values.len(),
                });
            }
            Ok(header.iter().cloned().zip(values).collect())
        })
        .collect()
}

/// Turn a column map into a header row followed by data rows
pub fn columns_to_rows(columns: &Columns) -> Result<Rows> {
    let Some((_, first)) = columns.first() else {
        return Ok(Vec::new());
    };
    let height = first.len();

    if let Some((name, values)) = columns.iter().find(|(_, v)| v.len() != height) {
        return Err(StoreError::RaggedColumns {
            column: name.clone(),
            expected: height,
            found: values.len(),
        });
    }

    let mut rows = Vec::with_capacity(height + 1);
    rows.push(columns.keys().cloned().collect());
    for i in 0..height {
        rows.push(columns.values().map(|v| v[i].clone()).collect());
    }

    Ok(rows)
}

/// Pivot a header row plus data rows into a column map
pub fn rows_to_columns(rows: Rows) -> Result<Columns> {
    let records = rows_to_records(rows.clone(), 1)?;
    let Some(header) = rows.into_iter().next() else {
        return Ok(Columns::new());
    };

    let mut columns: Columns = header
        .into_iter()
        .map(|name| (name, Vec::with_capacity(records.len())))
        .collect();
    for rec in records {
        for (name, value) in rec {
            if let Some(col) = columns.get_mut(&name) {
                col.push(value);
            }
        }
    }

    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> Vec<Record> {
        vec![
            record([("name", "Taro"), ("age", "25")]),
            record([("name", "Hanako"), ("age", "30")]),
        ]
    }

    #[test]
    fn test_records_to_rows() {
        let rows = records_to_rows(&people(), SchemaPolicy::Strict).unwrap();
        assert_eq!(
            rows,
            vec![row(["name", "age"]), row(["Taro", "25"]), row(["Hanako", "30"])]
        );
    }

    #[test]
    fn test_values_follow_header_order() {
        let records = vec![
            record([("name", "Taro"), ("age", "25")]),
            record([("age", "30"), ("name", "Hanako")]),
        ];
        let rows = records_to_rows(&records, SchemaPolicy::Strict).unwrap();
        assert_eq!(rows[2], row(["Hanako", "30"]));
    }

    #[test]
    fn test_strict_rejects_extra_key() {
        let mut records = people();
        records[1].insert("score".into(), "2400".into());
        let err = records_to_rows(&records, SchemaPolicy::Strict).unwrap_err();
        assert!(matches!(err, StoreError::SchemaMismatch { record: 1, .. }));
    }

    #[test]
    fn test_first_record_drops_extra_key() {
        let mut records = people();
        records[1].insert("score".into(), "2400".into());
        let rows = records_to_rows(&records, SchemaPolicy::FirstRecord).unwrap();
        assert_eq!(rows[2], row(["Hanako", "30"]));
    }

    #[test]
    fn test_first_record_fails_on_missing_key() {
        let mut records = people();
        records[1].shift_remove("age");
        let err = records_to_rows(&records, SchemaPolicy::FirstRecord).unwrap_err();
        match err {
            StoreError::MissingField { record, field } => {
                assert_eq!(record, 1);
                assert_eq!(field, "age");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_project_onto_existing_header() {
        let header = row(["age", "name"]);
        let rows = project_records(&header, &people(), SchemaPolicy::Strict).unwrap();
        assert_eq!(rows, vec![row(["25", "Taro"]), row(["30", "Hanako"])]);
    }

    #[test]
    fn test_rows_to_records_width_mismatch() {
        let rows = vec![row(["a", "b"]), row(["1", "2"]), row(["3"])];
        let err = rows_to_records(rows, 1).unwrap_err();
        assert!(matches!(
            err,
            StoreError::RowWidth {
                line: 3,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_columns_roundtrip() {
        let mut columns = Columns::new();
        columns.insert("name".into(), row(["Taro", "Hanako"]));
        columns.insert("age".into(), row([25, 30]));

        let rows = columns_to_rows(&columns).unwrap();
        assert_eq!(rows[0], row(["name", "age"]));
        assert_eq!(rows[1], row(["Taro", "25"]));
        assert_eq!(rows_to_columns(rows).unwrap(), columns);
    }

    #[test]
    fn test_ragged_columns() {
        let mut columns = Columns::new();
        columns.insert("name".into(), row(["Taro", "Hanako"]));
        columns.insert("age".into(), row([25]));
        let err = columns_to_rows(&columns).unwrap_err();
        assert!(matches!(err, StoreError::RaggedColumns { ref column, .. } if column == "age"));
    }
}
