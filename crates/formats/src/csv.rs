//! CSV reader and writer built on arrow's CSV support
//!
//! Files must have a header row. Column types are inferred from the data;
//! empty cells are read as missing values.
//!
//! The round trip is lossy: an empty string is written as an empty cell and
//! reads back as `Null`, and text that looks numeric or boolean (`"1"`,
//! `"true"`) reads back as `Int`/`Float`/`Bool`. Rows that differ only in
//! those ways become duplicates after a CSV save. Use JSONL or Parquet to
//! keep them apart.

use crate::columnar::{append_batch_rows, dataset_schema, rows_to_batch, schema_columns};
use crate::{Error, Result};
use arrow::csv::reader::Format;
use arrow::csv::{ReaderBuilder, Writer};
use rowdedup_core::Dataset;
use std::fs::File;
use std::io::Seek;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

const BATCH_SIZE: usize = 8192;

/// Read a CSV file with a header row into a dataset
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let path = path.as_ref();
    let mut file = File::open(path)?;

    let (schema, sampled) = Format::default()
        .with_header(true)
        .infer_schema(&mut file, None)?;
    debug!(
        "Inferred CSV schema from {} records: {:?}",
        sampled,
        schema.fields()
    );
    file.rewind()?;

    let schema = Arc::new(schema);
    let reader = ReaderBuilder::new(schema.clone())
        .with_header(true)
        .with_batch_size(BATCH_SIZE)
        .build(file)?;

    let mut rows = Vec::new();
    for batch in reader {
        append_batch_rows(&batch?, &mut rows)?;
    }

    info!("Read {} rows from {:?}", rows.len(), path);
    Ok(Dataset::from_rows(schema_columns(&schema), rows)?)
}

/// Write a dataset as CSV with a header row
pub fn write_csv<P: AsRef<Path>>(dataset: &Dataset, path: P) -> Result<()> {
    let path = path.as_ref();
    if dataset.width() == 0 {
        return Err(Error::InvalidFile(
            "cannot write a dataset with no columns".to_string(),
        ));
    }
    let file = File::create(path)?;

    let schema = dataset_schema(dataset);
    let batch = rows_to_batch(dataset.rows(), &schema)?;
    let mut writer = Writer::new(file);
    writer.write(&batch)?;

    info!("Wrote {} rows to {:?}", dataset.len(), path);
    Ok(())
}
