//! Conversion between Arrow record batches and dataset rows
//!
//! Shared by the CSV and Parquet readers and writers.

use crate::Result;
use arrow::array::{
    Array, ArrayRef, AsArray, BooleanBuilder, Float64Builder, Int64Builder, StringBuilder,
};
use arrow::datatypes::{
    DataType, Field, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type, Schema,
    UInt16Type, UInt32Type, UInt64Type, UInt8Type,
};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use arrow::util::display::array_value_to_string;
use rowdedup_core::{Dataset, Row, Value};
use std::sync::Arc;

/// Column names of an Arrow schema, in order
pub fn schema_columns(schema: &Schema) -> Vec<String> {
    schema.fields().iter().map(|f| f.name().clone()).collect()
}

/// Append every row of `batch` to `rows`
pub fn append_batch_rows(batch: &RecordBatch, rows: &mut Vec<Row>) -> Result<()> {
    rows.reserve(batch.num_rows());
    for row_idx in 0..batch.num_rows() {
        let row = batch
            .columns()
            .iter()
            .map(|column| array_value(column.as_ref(), row_idx))
            .collect::<Result<Row>>()?;
        rows.push(row);
    }
    Ok(())
}

/// Convert one Arrow cell to a value
fn array_value(array: &dyn Array, row: usize) -> Result<Value> {
    if array.is_null(row) {
        return Ok(Value::Null);
    }

    let value = match array.data_type() {
        DataType::Null => Value::Null,
        DataType::Boolean => Value::Bool(array.as_boolean().value(row)),
        DataType::Int8 => Value::Int(i64::from(array.as_primitive::<Int8Type>().value(row))),
        DataType::Int16 => Value::Int(i64::from(array.as_primitive::<Int16Type>().value(row))),
        DataType::Int32 => Value::Int(i64::from(array.as_primitive::<Int32Type>().value(row))),
        DataType::Int64 => Value::Int(array.as_primitive::<Int64Type>().value(row)),
        DataType::UInt8 => Value::Int(i64::from(array.as_primitive::<UInt8Type>().value(row))),
        DataType::UInt16 => Value::Int(i64::from(array.as_primitive::<UInt16Type>().value(row))),
        DataType::UInt32 => Value::Int(i64::from(array.as_primitive::<UInt32Type>().value(row))),
        DataType::UInt64 => {
            let v = array.as_primitive::<UInt64Type>().value(row);
            i64::try_from(v).map_or(Value::Float(v as f64), Value::Int)
        }
        DataType::Float32 => {
            Value::Float(f64::from(array.as_primitive::<Float32Type>().value(row)))
        }
        DataType::Float64 => Value::Float(array.as_primitive::<Float64Type>().value(row)),
        DataType::Utf8 => Value::Text(array.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Value::Text(array.as_string::<i64>().value(row).to_string()),
        // Dates, decimals, nested types: keep Arrow's display form
        _ => Value::Text(array_value_to_string(array, row)?),
    };
    Ok(value)
}

/// Arrow type for one dataset column.
///
/// A column holding only ints (and nulls) is `Int64`, only floats `Float64`,
/// only bools `Boolean`; anything mixed or all-null is stored as `Utf8`.
fn infer_column_type(rows: &[Row], column: usize) -> DataType {
    let mut has_bool = false;
    let mut has_int = false;
    let mut has_float = false;
    let mut has_text = false;

    for row in rows {
        match &row[column] {
            Value::Null => {}
            Value::Bool(_) => has_bool = true,
            Value::Int(_) => has_int = true,
            Value::Float(_) => has_float = true,
            Value::Text(_) => has_text = true,
        }
    }

    match (has_bool, has_int, has_float, has_text) {
        (true, false, false, false) => DataType::Boolean,
        (false, true, false, false) => DataType::Int64,
        (false, false, true, false) => DataType::Float64,
        _ => DataType::Utf8,
    }
}

/// Arrow schema for a dataset, every field nullable
pub fn dataset_schema(dataset: &Dataset) -> Arc<Schema> {
    let fields: Vec<Field> = dataset
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, name)| Field::new(name, infer_column_type(dataset.rows(), idx), true))
        .collect();
    Arc::new(Schema::new(fields))
}

/// Convert a slice of dataset rows to one record batch with `schema`
pub fn rows_to_batch(rows: &[Row], schema: &Arc<Schema>) -> Result<RecordBatch> {
    let columns: Vec<ArrayRef> = schema
        .fields()
        .iter()
        .enumerate()
        .map(|(idx, field)| build_column(rows, idx, field.data_type()))
        .collect();

    let options = RecordBatchOptions::new().with_row_count(Some(rows.len()));
    Ok(RecordBatch::try_new_with_options(schema.clone(), columns, &options)?)
}

fn build_column(rows: &[Row], column: usize, dtype: &DataType) -> ArrayRef {
    match dtype {
        DataType::Boolean => {
            let mut b = BooleanBuilder::with_capacity(rows.len());
            for row in rows {
                match &row[column] {
                    Value::Bool(v) => b.append_value(*v),
                    _ => b.append_null(),
                }
            }
            Arc::new(b.finish())
        }
        DataType::Int64 => {
            let mut b = Int64Builder::with_capacity(rows.len());
            for row in rows {
                match &row[column] {
                    Value::Int(v) => b.append_value(*v),
                    _ => b.append_null(),
                }
            }
            Arc::new(b.finish())
        }
        DataType::Float64 => {
            let mut b = Float64Builder::with_capacity(rows.len());
            for row in rows {
                match &row[column] {
                    Value::Float(v) => b.append_value(*v),
                    _ => b.append_null(),
                }
            }
            Arc::new(b.finish())
        }
        _ => {
            let mut b = StringBuilder::with_capacity(rows.len(), rows.len() * 32);
            for row in rows {
                match &row[column] {
                    Value::Null => b.append_null(),
                    Value::Text(s) => b.append_value(s),
                    other => b.append_value(other.to_string()),
                }
            }
            Arc::new(b.finish())
        }
    }
}
