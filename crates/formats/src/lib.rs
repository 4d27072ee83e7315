//! File format readers and writers for dataset processing
//!
//! Loads a whole `Dataset` into memory from JSONL, CSV or Parquet and
//! writes it back in any of those formats.

pub mod columnar;
pub mod csv;
pub mod error;
pub mod jsonl;
pub mod parquet_reader;
pub mod parquet_writer;
pub mod reader;
pub mod record;

pub use error::{Error, Result};
pub use reader::{open_dataset, save_dataset, DatasetFormat};
pub use record::Record;
