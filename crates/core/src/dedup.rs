//! Deduplication options and whole-row duplicate counting/removal

use crate::exact_dedup::ExactDeduplicator;
use crate::{Dataset, Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Row count at which key hashing switches to rayon
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 50_000;

/// Which occurrence of a repeated key survives removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Keep {
    /// Keep the first occurrence, mark later ones
    #[default]
    First,
    /// Keep the last occurrence, mark earlier ones
    Last,
    /// Mark every occurrence of a repeated key
    None,
}

impl fmt::Display for Keep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Keep::First => "first",
            Keep::Last => "last",
            Keep::None => "none",
        };
        f.write_str(name)
    }
}

impl FromStr for Keep {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(Keep::First),
            "last" => Ok(Keep::Last),
            "none" | "false" => Ok(Keep::None),
            other => Err(Error::InvalidConfig(format!(
                "unknown keep policy '{}', expected first, last or none",
                other
            ))),
        }
    }
}

/// Options controlling what counts as a duplicate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupOptions {
    /// Columns that identify a row (None = all columns)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subset: Option<Vec<String>>,
    /// Occurrence to keep
    pub keep: Keep,
    /// Datasets with at least this many rows hash keys in parallel
    pub parallel_threshold: usize,
}

impl Default for DedupOptions {
    fn default() -> Self {
        Self {
            subset: None,
            keep: Keep::First,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl DedupOptions {
    /// Restrict row identity to the given columns
    pub fn with_subset<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.subset = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_keep(mut self, keep: Keep) -> Self {
        self.keep = keep;
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }
}

/// Count rows identical in every column to an earlier row
pub fn count_duplicates(dataset: &Dataset) -> usize {
    ExactDeduplicator::default().count_all_columns(dataset)
}

/// Remove every row identical to an earlier row, in place.
///
/// Returns the number of rows removed. Survivors keep their relative order.
pub fn remove_duplicates(dataset: &mut Dataset) -> usize {
    ExactDeduplicator::default().remove_all_columns(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;

    fn dataset(rows: Vec<Vec<Value>>) -> Dataset {
        Dataset::from_rows(["num", "label"], rows).unwrap()
    }

    #[test]
    fn test_empty_dataset() {
        let mut ds = dataset(vec![]);
        assert_eq!(count_duplicates(&ds), 0);
        assert_eq!(remove_duplicates(&mut ds), 0);
        assert!(ds.is_empty());
        assert_eq!(count_duplicates(&ds), 0);
    }

    #[test]
    fn test_single_duplicate() {
        let mut ds = dataset(vec![
            vec![1.into(), "a".into()],
            vec![1.into(), "a".into()],
            vec![2.into(), "b".into()],
        ]);

        assert_eq!(count_duplicates(&ds), 1);
        remove_duplicates(&mut ds);
        assert_eq!(
            ds.rows(),
            &[vec![1.into(), "a".into()], vec![2.into(), "b".into()]]
        );
        assert_eq!(count_duplicates(&ds), 0);
    }

    #[test]
    fn test_no_duplicates_is_noop() {
        let rows = vec![
            vec![1.into(), "a".into()],
            vec![2.into(), "b".into()],
            vec![3.into(), "c".into()],
        ];
        let mut ds = dataset(rows.clone());

        assert_eq!(count_duplicates(&ds), 0);
        assert_eq!(remove_duplicates(&mut ds), 0);
        assert_eq!(ds.rows(), rows.as_slice());
        assert_eq!(count_duplicates(&ds), 0);
    }

    #[test]
    fn test_missing_values_are_duplicates() {
        let mut ds = dataset(vec![
            vec![1.into(), Value::Null],
            vec![1.into(), Value::Null],
            vec![1.into(), Value::Null],
        ]);

        assert_eq!(count_duplicates(&ds), 2);
        assert_eq!(remove_duplicates(&mut ds), 2);
        assert_eq!(ds.rows(), &[vec![1.into(), Value::Null]]);
        assert_eq!(count_duplicates(&ds), 0);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut ds = dataset(vec![
            vec![1.into(), "a".into()],
            vec![2.into(), "b".into()],
            vec![1.into(), "a".into()],
        ]);

        remove_duplicates(&mut ds);
        let once = ds.clone();
        assert_eq!(remove_duplicates(&mut ds), 0);
        assert_eq!(ds, once);
    }

    #[test]
    fn test_keep_parse() {
        assert_eq!("first".parse::<Keep>().unwrap(), Keep::First);
        assert_eq!("LAST".parse::<Keep>().unwrap(), Keep::Last);
        assert_eq!("none".parse::<Keep>().unwrap(), Keep::None);
        assert!("middle".parse::<Keep>().is_err());
        assert_eq!(Keep::Last.to_string(), "last");
    }

    #[test]
    fn test_options_serde_defaults() {
        let opts: DedupOptions = serde_json::from_str(r#"{"keep": "last"}"#).unwrap();
        assert_eq!(opts.keep, Keep::Last);
        assert_eq!(opts.subset, None);
        assert_eq!(opts.parallel_threshold, DEFAULT_PARALLEL_THRESHOLD);
    }
}
