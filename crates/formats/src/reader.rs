//! Format detection and whole-dataset load/save
//!
//! Picks the reader or writer from the file extension.

use crate::csv::{read_csv, write_csv};
use crate::jsonl::{read_jsonl, write_jsonl};
use crate::parquet_reader::read_parquet;
use crate::parquet_writer::write_parquet;
use crate::{Error, Result};
use rowdedup_core::Dataset;
use std::path::Path;
use tracing::info;

/// Supported dataset file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    /// JSON Lines, optionally gzip-compressed
    Jsonl { gzip: bool },
    Csv,
    Parquet,
}

impl DatasetFormat {
    /// Detect the format from a file extension
    ///
    /// Supported formats:
    /// - `.jsonl`, `.json` - JSON Lines format
    /// - `.gz` - Gzip-compressed JSON Lines
    /// - `.csv` - CSV with a header row
    /// - `.parquet` - Apache Parquet format
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| Error::UnsupportedFormat("No file extension found".to_string()))?;

        match extension.to_ascii_lowercase().as_str() {
            "jsonl" | "json" => Ok(DatasetFormat::Jsonl { gzip: false }),
            "gz" => Ok(DatasetFormat::Jsonl { gzip: true }),
            "csv" => Ok(DatasetFormat::Csv),
            "parquet" => Ok(DatasetFormat::Parquet),
            other => Err(Error::UnsupportedFormat(format!(
                "Unsupported file extension: {}",
                other
            ))),
        }
    }
}

/// Load a dataset with automatic format detection
pub fn open_dataset<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let path = path.as_ref();
    let format = DatasetFormat::from_path(path)?;
    info!("Opening dataset: {:?} (format: {:?})", path, format);

    match format {
        DatasetFormat::Jsonl { .. } => read_jsonl(path),
        DatasetFormat::Csv => read_csv(path),
        DatasetFormat::Parquet => read_parquet(path),
    }
}

/// Save a dataset, choosing the format from the extension
pub fn save_dataset<P: AsRef<Path>>(dataset: &Dataset, path: P) -> Result<()> {
    let path = path.as_ref();
    let format = DatasetFormat::from_path(path)?;
    info!("Saving {} rows to {:?} (format: {:?})", dataset.len(), path, format);

    match format {
        DatasetFormat::Jsonl { .. } => write_jsonl(dataset, path),
        DatasetFormat::Csv => write_csv(dataset, path),
        DatasetFormat::Parquet => write_parquet(dataset, path),
    }
}
