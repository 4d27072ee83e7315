//! JSON records and their conversion to dataset rows

use rowdedup_core::{Dataset, Row, Value};
use serde_json::{Map, Number, Value as Json};
use std::collections::HashSet;

/// A single JSON object read from a dataset file
#[derive(Debug, Clone)]
pub struct Record {
    /// Field values in file order
    pub data: Map<String, Json>,
    /// Source line number
    pub source_line: usize,
}

impl Record {
    /// Create a new record
    pub fn new(data: Map<String, Json>, source_line: usize) -> Self {
        Self { data, source_line }
    }
}

/// Convert a JSON scalar to a cell value.
///
/// Integral numbers that fit in `i64` become `Int`, other numbers `Float`.
/// Arrays and objects are kept as their JSON text.
pub fn json_to_value(json: Json) -> Value {
    match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(b),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => n.as_f64().map_or(Value::Null, Value::Float),
        },
        Json::String(s) => Value::Text(s),
        other => Value::Text(other.to_string()),
    }
}

/// Convert a cell value to JSON. Non-finite floats become `null`.
pub fn value_to_json(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(i) => Json::Number((*i).into()),
        Value::Float(f) => Number::from_f64(*f).map_or(Json::Null, Json::Number),
        Value::Text(s) => Json::String(s.clone()),
    }
}

/// Assemble records into a dataset.
///
/// Columns are the union of record keys in first-seen order; a record
/// without a key gets `Null` in that column. A column holding any float
/// has its ints promoted to floats, so `1` and `1.0` compare equal as
/// they do when the column comes from CSV or Parquet.
pub fn records_to_dataset(records: Vec<Record>) -> rowdedup_core::Result<Dataset> {
    let mut columns: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for record in &records {
        for key in record.data.keys() {
            if seen.insert(key.clone()) {
                columns.push(key.clone());
            }
        }
    }

    let mut rows: Vec<Row> = records
        .into_iter()
        .map(|mut record| {
            columns
                .iter()
                .map(|column| record.data.remove(column).map_or(Value::Null, json_to_value))
                .collect()
        })
        .collect();

    promote_mixed_numeric(&mut rows, columns.len());
    Dataset::from_rows(columns, rows)
}

fn promote_mixed_numeric(rows: &mut [Row], width: usize) {
    for column in 0..width {
        let has_float = rows.iter().any(|row| matches!(row[column], Value::Float(_)));
        if !has_float {
            continue;
        }
        for row in rows.iter_mut() {
            let promoted = match row[column] {
                Value::Int(i) => Value::Float(i as f64),
                _ => continue,
            };
            row[column] = promoted;
        }
    }
}
