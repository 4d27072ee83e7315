//! In-memory tabular dataset
//!
//! A `Dataset` is an ordered list of named columns and an ordered list of
//! rows. Every row is exactly as wide as the column list; the constructors
//! enforce this so the deduplication code never sees a ragged row.

use crate::{Error, Result, Value};
use std::collections::HashSet;

/// One fixed-width tuple of column values
pub type Row = Vec<Value>;

/// Row-oriented dataset owned by the caller
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Dataset {
    /// Create an empty dataset with the given column names
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Result<Self> {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();

        let mut seen = HashSet::with_capacity(columns.len());
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(Error::DuplicateColumn(name.clone()));
            }
        }

        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    /// Create a dataset from column names and rows, checking row widths
    pub fn from_rows<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        rows: Vec<Row>,
    ) -> Result<Self> {
        let mut dataset = Self::new(columns)?;
        for (index, row) in rows.iter().enumerate() {
            dataset.check_width(index, row)?;
        }
        dataset.rows = rows;
        Ok(dataset)
    }

    /// Append a row at the end
    pub fn push_row(&mut self, row: Row) -> Result<()> {
        self.check_width(self.rows.len(), &row)?;
        self.rows.push(row);
        Ok(())
    }

    fn check_width(&self, index: usize, row: &[Value]) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(Error::RaggedRow {
                row: index,
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Map column names to indices, failing on the first unknown name
    pub fn resolve_columns(&self, names: &[String]) -> Result<Vec<usize>> {
        names
            .iter()
            .map(|name| {
                self.column_index(name)
                    .ok_or_else(|| Error::UnknownColumn(name.clone()))
            })
            .collect()
    }

    /// Consume the dataset, returning columns and rows
    pub fn into_parts(self) -> (Vec<String>, Vec<Row>) {
        (self.columns, self.rows)
    }

    /// Drop every row whose mask entry is `true`, keeping the order of the rest.
    ///
    /// The mask must have one entry per row.
    pub(crate) fn drop_masked(&mut self, mask: &[bool]) {
        debug_assert_eq!(mask.len(), self.rows.len());
        let mut index = 0;
        self.rows.retain(|_| {
            let keep = !mask[index];
            index += 1;
            keep
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows() {
        let ds = Dataset::from_rows(
            ["id", "name"],
            vec![
                vec![Value::Int(1), "a".into()],
                vec![Value::Int(2), "b".into()],
            ],
        )
        .unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.width(), 2);
        assert_eq!(ds.column_index("name"), Some(1));
        assert_eq!(ds.row(1).unwrap()[1], Value::from("b"));
    }

    #[test]
    fn test_ragged_row_rejected() {
        let result = Dataset::from_rows(
            ["id", "name"],
            vec![vec![Value::Int(1), "a".into()], vec![Value::Int(2)]],
        );

        match result {
            Err(Error::RaggedRow {
                row,
                expected,
                found,
            }) => {
                assert_eq!(row, 1);
                assert_eq!(expected, 2);
                assert_eq!(found, 1);
            }
            other => panic!("expected RaggedRow, got {:?}", other),
        }
    }

    #[test]
    fn test_push_row_checks_width() {
        let mut ds = Dataset::new(["a"]).unwrap();
        ds.push_row(vec![Value::Null]).unwrap();
        assert!(matches!(
            ds.push_row(vec![Value::Null, Value::Null]),
            Err(Error::RaggedRow { row: 1, .. })
        ));
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn test_duplicate_column_rejected() {
        assert!(matches!(
            Dataset::new(["a", "b", "a"]),
            Err(Error::DuplicateColumn(name)) if name == "a"
        ));
    }

    #[test]
    fn test_resolve_columns() {
        let ds = Dataset::new(["a", "b", "c"]).unwrap();
        assert_eq!(
            ds.resolve_columns(&["c".to_string(), "a".to_string()]).unwrap(),
            vec![2, 0]
        );
        assert!(matches!(
            ds.resolve_columns(&["z".to_string()]),
            Err(Error::UnknownColumn(name)) if name == "z"
        ));
    }

    #[test]
    fn test_drop_masked_preserves_order() {
        let mut ds = Dataset::from_rows(
            ["n"],
            (0..5).map(|i| vec![Value::Int(i)]).collect(),
        )
        .unwrap();

        ds.drop_masked(&[false, true, false, true, false]);

        let kept: Vec<_> = ds.rows().iter().map(|r| r[0].clone()).collect();
        assert_eq!(kept, vec![Value::Int(0), Value::Int(2), Value::Int(4)]);
    }
}
