//! Core deduplication logic for tabular datasets
//!
//! This crate provides the in-memory dataset model and the exact
//! duplicate-row detection and removal built on top of it.

pub mod dataset;
pub mod dedup;
pub mod error;
pub mod exact_dedup;
pub mod hash;
pub mod report;
pub mod value;

pub use dataset::{Dataset, Row};
pub use dedup::{count_duplicates, remove_duplicates, DedupOptions, Keep};
pub use error::{Error, Result};
pub use exact_dedup::{DedupStats, ExactDeduplicator};
pub use report::{run, DedupReport};
pub use value::Value;
