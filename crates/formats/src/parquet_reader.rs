//! Parquet reader
//!
//! Reads record batches with optional column projection and collects
//! them into a dataset.

use crate::columnar::{append_batch_rows, schema_columns};
use crate::{Error, Result};
use arrow::record_batch::RecordBatchReader;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ProjectionMask;
use rowdedup_core::Dataset;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

/// Configuration for Parquet reader
#[derive(Debug, Clone)]
pub struct ParquetConfig {
    /// Columns to read (None = all columns)
    pub columns: Option<Vec<String>>,
    /// Batch size for reading
    pub batch_size: usize,
}

impl Default for ParquetConfig {
    fn default() -> Self {
        Self {
            columns: None,
            batch_size: 4096,
        }
    }
}

/// Read a Parquet file into a dataset
pub fn read_parquet<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    read_parquet_with_config(path, &ParquetConfig::default())
}

/// Read a Parquet file into a dataset with custom configuration
pub fn read_parquet_with_config<P: AsRef<Path>>(
    path: P,
    config: &ParquetConfig,
) -> Result<Dataset> {
    let path = path.as_ref();
    debug!("Opening Parquet file: {:?}", path);

    let file = File::open(path)?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file)?.with_batch_size(config.batch_size);

    let total_rows = builder.metadata().file_metadata().num_rows();
    debug!("Parquet file has {} rows", total_rows);

    let builder = match config.columns {
        Some(ref columns) => {
            let schema = builder.schema();
            let indices = columns
                .iter()
                .map(|name| {
                    schema
                        .index_of(name)
                        .map_err(|_| Error::InvalidFile(format!("column '{}' not found", name)))
                })
                .collect::<Result<Vec<usize>>>()?;
            let mask = ProjectionMask::roots(builder.parquet_schema(), indices);
            builder.with_projection(mask)
        }
        None => builder,
    };

    let reader = builder.build()?;
    let columns = schema_columns(&reader.schema());

    let mut rows = Vec::with_capacity(usize::try_from(total_rows).unwrap_or(0));
    for batch in reader {
        append_batch_rows(&batch?, &mut rows)?;
    }

    info!("Read {} rows from {:?}", rows.len(), path);
    Ok(Dataset::from_rows(columns, rows)?)
}
