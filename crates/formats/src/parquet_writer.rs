//! Parquet writer
//!
//! Writes a dataset in batches with a schema inferred from its values.

use crate::columnar::{dataset_schema, rows_to_batch};
use crate::{Error, Result};
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use rowdedup_core::Dataset;
use std::fs::File;
use std::path::Path;
use tracing::info;

const DEFAULT_BATCH_SIZE: usize = 4096;

/// Write a dataset to a Parquet file
pub fn write_parquet<P: AsRef<Path>>(dataset: &Dataset, path: P) -> Result<()> {
    let path = path.as_ref();
    if dataset.width() == 0 {
        return Err(Error::InvalidFile(
            "cannot write a dataset with no columns".to_string(),
        ));
    }
    let file = File::create(path)?;

    let schema = dataset_schema(dataset);
    let props = WriterProperties::builder()
        .set_max_row_group_size(DEFAULT_BATCH_SIZE * 256)
        .build();
    let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;

    for chunk in dataset.rows().chunks(DEFAULT_BATCH_SIZE) {
        writer.write(&rows_to_batch(chunk, &schema)?)?;
    }

    // The footer is only written on close
    writer.close()?;
    info!("Wrote {} rows to {:?}", dataset.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parquet_reader::{read_parquet, read_parquet_with_config, ParquetConfig};
    use rowdedup_core::Value;

    fn sample() -> Dataset {
        let rows = (0..10_000)
            .map(|i: i64| {
                vec![
                    Value::Int(i % 3),
                    if i % 5 == 0 { Value::Null } else { Value::Float(i as f64) },
                    Value::Text(format!("row{}", i % 4)),
                    Value::Bool(i % 2 == 0),
                ]
            })
            .collect();
        Dataset::from_rows(["k", "x", "label", "even"], rows).unwrap()
    }

    #[test]
    fn test_parquet_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.parquet");
        let ds = sample();

        write_parquet(&ds, &path).unwrap();
        let loaded = read_parquet(&path).unwrap();

        assert_eq!(loaded, ds);
    }

    #[test]
    fn test_parquet_projection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.parquet");
        write_parquet(&sample(), &path).unwrap();

        let config = ParquetConfig {
            columns: Some(vec!["label".to_string()]),
            ..ParquetConfig::default()
        };
        let loaded = read_parquet_with_config(&path, &config).unwrap();

        assert_eq!(loaded.columns(), &["label"]);
        assert_eq!(loaded.rows()[5], vec![Value::Text("row1".into())]);
    }

    #[test]
    fn test_parquet_missing_projection_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.parquet");
        write_parquet(&sample(), &path).unwrap();

        let config = ParquetConfig {
            columns: Some(vec!["nope".to_string()]),
            ..ParquetConfig::default()
        };
        assert!(read_parquet_with_config(&path, &config).is_err());
    }

    #[test]
    fn test_parquet_empty_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.parquet");
        let ds = Dataset::new(["a", "b"]).unwrap();

        write_parquet(&ds, &path).unwrap();
        let loaded = read_parquet(&path).unwrap();

        assert_eq!(loaded.columns(), &["a", "b"]);
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_write_parquet_rejects_zero_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.parquet");
        let ds = Dataset::from_rows(Vec::<String>::new(), vec![vec![], vec![]]).unwrap();

        assert!(matches!(
            write_parquet(&ds, &path),
            Err(Error::InvalidFile(_))
        ));
        assert!(!path.exists());
    }
}
