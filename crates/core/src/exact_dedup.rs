//! Exact duplicate detection over dataset rows
//!
//! Rows are grouped by their key (the projection onto the subset columns).
//! Keys are hashed first, possibly in parallel, and rows sharing a hash are
//! compared value by value, so a hash collision never merges distinct keys.

use crate::dedup::{DedupOptions, Keep};
use crate::hash::{hash_rows, keys_equal};
use crate::{Dataset, Error, Result};
use ahash::AHashMap;
use tracing::{debug, info};

/// Statistics for deduplication operations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DedupStats {
    /// Rows examined by removal passes
    pub total_rows: usize,
    /// Rows marked as duplicates and removed
    pub duplicates_found: usize,
    /// Rows that survived removal
    pub unique_rows: usize,
}

impl DedupStats {
    /// Get the deduplication rate as a percentage
    pub fn dedup_rate(&self) -> f64 {
        if self.total_rows == 0 {
            0.0
        } else {
            (self.duplicates_found as f64 / self.total_rows as f64) * 100.0
        }
    }

    fn absorb(&mut self, other: &DedupStats) {
        self.total_rows += other.total_rows;
        self.duplicates_found += other.duplicates_found;
        self.unique_rows += other.unique_rows;
    }
}

/// Row groups: `groups[i]` is the group id of row `i`, ids are dense
/// and numbered by first appearance.
struct Grouping {
    groups: Vec<usize>,
    group_count: usize,
}

/// Exact deduplicator for in-memory datasets
#[derive(Debug, Clone, Default)]
pub struct ExactDeduplicator {
    options: DedupOptions,
    stats: DedupStats,
}

impl ExactDeduplicator {
    pub fn new(options: DedupOptions) -> Self {
        debug!(
            "Creating ExactDeduplicator with subset {:?} and keep={}",
            options.subset, options.keep
        );
        Self {
            options,
            stats: DedupStats::default(),
        }
    }

    pub fn options(&self) -> &DedupOptions {
        &self.options
    }

    /// Flag each row that is a duplicate under the configured options
    pub fn duplicated(&self, dataset: &Dataset) -> Result<Vec<bool>> {
        let columns = self.key_columns(dataset)?;
        Ok(self.mask(dataset, &columns))
    }

    /// Count rows flagged by [`duplicated`](Self::duplicated)
    pub fn count_duplicates(&self, dataset: &Dataset) -> Result<usize> {
        Ok(self.duplicated(dataset)?.into_iter().filter(|&d| d).count())
    }

    /// Remove every flagged row in place and return the stats of this pass
    pub fn remove_duplicates(&mut self, dataset: &mut Dataset) -> Result<DedupStats> {
        let columns = self.key_columns(dataset)?;
        Ok(self.remove_with_columns(dataset, &columns))
    }

    /// Statistics accumulated over every removal pass
    pub fn stats(&self) -> &DedupStats {
        &self.stats
    }

    /// Reset accumulated statistics
    pub fn clear(&mut self) {
        self.stats = DedupStats::default();
    }

    pub(crate) fn count_all_columns(&self, dataset: &Dataset) -> usize {
        let columns: Vec<usize> = (0..dataset.width()).collect();
        self.mask(dataset, &columns).into_iter().filter(|&d| d).count()
    }

    pub(crate) fn remove_all_columns(&mut self, dataset: &mut Dataset) -> usize {
        let columns: Vec<usize> = (0..dataset.width()).collect();
        self.remove_with_columns(dataset, &columns).duplicates_found
    }

    fn remove_with_columns(&mut self, dataset: &mut Dataset, columns: &[usize]) -> DedupStats {
        let mask = self.mask(dataset, columns);
        let total_rows = dataset.len();
        let duplicates_found = mask.iter().filter(|&&d| d).count();

        if duplicates_found > 0 {
            dataset.drop_masked(&mask);
        }

        let pass = DedupStats {
            total_rows,
            duplicates_found,
            unique_rows: dataset.len(),
        };
        info!(
            "Removed {} of {} rows ({:.1}%)",
            pass.duplicates_found,
            pass.total_rows,
            pass.dedup_rate()
        );
        self.stats.absorb(&pass);
        pass
    }

    /// Resolve the subset to column indices (all columns when unset)
    fn key_columns(&self, dataset: &Dataset) -> Result<Vec<usize>> {
        match &self.options.subset {
            None => Ok((0..dataset.width()).collect()),
            Some(names) if names.is_empty() => Err(Error::InvalidConfig(
                "subset must name at least one column".to_string(),
            )),
            Some(names) => dataset.resolve_columns(names),
        }
    }

    fn mask(&self, dataset: &Dataset, columns: &[usize]) -> Vec<bool> {
        let grouping = self.group_rows(dataset, columns);
        let groups = &grouping.groups;

        match self.options.keep {
            Keep::First => {
                let mut seen = vec![false; grouping.group_count];
                groups
                    .iter()
                    .map(|&g| std::mem::replace(&mut seen[g], true))
                    .collect()
            }
            Keep::Last => {
                let mut last = vec![0usize; grouping.group_count];
                for (row, &g) in groups.iter().enumerate() {
                    last[g] = row;
                }
                groups
                    .iter()
                    .enumerate()
                    .map(|(row, &g)| last[g] != row)
                    .collect()
            }
            Keep::None => {
                let mut counts = vec![0usize; grouping.group_count];
                for &g in groups {
                    counts[g] += 1;
                }
                groups.iter().map(|&g| counts[g] > 1).collect()
            }
        }
    }

    fn group_rows(&self, dataset: &Dataset, columns: &[usize]) -> Grouping {
        let rows = dataset.rows();
        let parallel = rows.len() >= self.options.parallel_threshold;
        debug!(
            "Hashing {} row keys over {} columns (parallel: {})",
            rows.len(),
            columns.len(),
            parallel
        );
        let hashes = hash_rows(rows, columns, parallel);

        // hash -> (representative row, group id) for every distinct key with that hash
        let mut buckets: AHashMap<u64, Vec<(usize, usize)>> = AHashMap::with_capacity(rows.len());
        let mut groups = Vec::with_capacity(rows.len());
        let mut group_count = 0;

        for (index, row) in rows.iter().enumerate() {
            let candidates = buckets.entry(hashes[index]).or_default();
            let existing = candidates
                .iter()
                .find(|(rep, _)| keys_equal(&rows[*rep], row, columns))
                .map(|&(_, group)| group);

            let group = match existing {
                Some(group) => group,
                None => {
                    let group = group_count;
                    group_count += 1;
                    candidates.push((index, group));
                    group
                }
            };
            groups.push(group);
        }

        Grouping {
            groups,
            group_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;

    fn people() -> Dataset {
        Dataset::from_rows(
            ["name", "city", "age"],
            vec![
                vec!["ann".into(), "oslo".into(), 30.into()],
                vec!["bob".into(), "rome".into(), 41.into()],
                vec!["ann".into(), "oslo".into(), 30.into()],
                vec!["ann".into(), "lima".into(), 30.into()],
                vec!["bob".into(), "rome".into(), 41.into()],
            ],
        )
        .unwrap()
    }

    fn names(ds: &Dataset) -> Vec<String> {
        ds.rows()
            .iter()
            .map(|r| format!("{}/{}", r[0], r[1]))
            .collect()
    }

    #[test]
    fn test_keep_first_mask() {
        let dedup = ExactDeduplicator::default();
        assert_eq!(
            dedup.duplicated(&people()).unwrap(),
            vec![false, false, true, false, true]
        );
    }

    #[test]
    fn test_keep_last_mask() {
        let dedup = ExactDeduplicator::new(DedupOptions::default().with_keep(Keep::Last));
        assert_eq!(
            dedup.duplicated(&people()).unwrap(),
            vec![true, true, false, false, false]
        );
    }

    #[test]
    fn test_keep_none_mask() {
        let dedup = ExactDeduplicator::new(DedupOptions::default().with_keep(Keep::None));
        assert_eq!(
            dedup.duplicated(&people()).unwrap(),
            vec![true, true, true, false, true]
        );
    }

    #[test]
    fn test_keep_last_removal_order() {
        let mut ds = people();
        let mut dedup = ExactDeduplicator::new(DedupOptions::default().with_keep(Keep::Last));
        let stats = dedup.remove_duplicates(&mut ds).unwrap();

        assert_eq!(stats.duplicates_found, 2);
        assert_eq!(names(&ds), vec!["ann/oslo", "ann/lima", "bob/rome"]);
        assert_eq!(dedup.count_duplicates(&ds).unwrap(), 0);
    }

    #[test]
    fn test_keep_none_removal() {
        let mut ds = people();
        let mut dedup = ExactDeduplicator::new(DedupOptions::default().with_keep(Keep::None));
        dedup.remove_duplicates(&mut ds).unwrap();

        assert_eq!(names(&ds), vec!["ann/lima"]);
        assert_eq!(dedup.count_duplicates(&ds).unwrap(), 0);
    }

    #[test]
    fn test_subset() {
        let mut ds = people();
        let mut dedup = ExactDeduplicator::new(DedupOptions::default().with_subset(["name"]));

        assert_eq!(dedup.count_duplicates(&ds).unwrap(), 3);
        dedup.remove_duplicates(&mut ds).unwrap();
        assert_eq!(names(&ds), vec!["ann/oslo", "bob/rome"]);
    }

    #[test]
    fn test_unknown_subset_column() {
        let dedup = ExactDeduplicator::new(DedupOptions::default().with_subset(["zip"]));
        assert!(matches!(
            dedup.duplicated(&people()),
            Err(Error::UnknownColumn(name)) if name == "zip"
        ));
    }

    #[test]
    fn test_empty_subset_rejected() {
        let dedup =
            ExactDeduplicator::new(DedupOptions::default().with_subset(Vec::<String>::new()));
        assert!(matches!(
            dedup.duplicated(&people()),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_nan_rows_are_duplicates() {
        let ds = Dataset::from_rows(
            ["x"],
            vec![
                vec![Value::Float(f64::NAN)],
                vec![Value::Float(f64::NAN)],
                vec![Value::Float(1.5)],
            ],
        )
        .unwrap();

        assert_eq!(ExactDeduplicator::default().count_duplicates(&ds).unwrap(), 1);
    }

    #[test]
    fn test_zero_width_rows_all_equal() {
        let ds = Dataset::from_rows(Vec::<String>::new(), vec![vec![], vec![], vec![]]).unwrap();
        assert_eq!(ExactDeduplicator::default().count_duplicates(&ds).unwrap(), 2);
    }

    #[test]
    fn test_parallel_path_matches_sequential() {
        let rows: Vec<Vec<Value>> = (0..2_000)
            .map(|i: i64| vec![Value::Int(i % 97), Value::from(format!("k{}", i % 13))])
            .collect();
        let ds = Dataset::from_rows(["a", "b"], rows).unwrap();

        let sequential =
            ExactDeduplicator::new(DedupOptions::default().with_parallel_threshold(usize::MAX));
        let parallel = ExactDeduplicator::new(DedupOptions::default().with_parallel_threshold(0));

        let mask = sequential.duplicated(&ds).unwrap();
        assert_eq!(mask, parallel.duplicated(&ds).unwrap());
        // 97 and 13 are coprime, so there are 97 * 13 distinct keys
        assert_eq!(mask.iter().filter(|&&d| d).count(), 2_000 - 97 * 13);
    }

    #[test]
    fn test_stats_accumulate_and_clear() {
        let mut ds = people();
        let mut dedup = ExactDeduplicator::default();

        dedup.remove_duplicates(&mut ds).unwrap();
        dedup.remove_duplicates(&mut ds).unwrap();

        let stats = dedup.stats();
        assert_eq!(stats.total_rows, 5 + 3);
        assert_eq!(stats.duplicates_found, 2);
        assert_eq!(stats.unique_rows, 3 + 3);

        dedup.clear();
        assert_eq!(dedup.stats(), &DedupStats::default());
    }

    #[test]
    fn test_dedup_rate_calculation() {
        let stats = DedupStats {
            total_rows: 3,
            duplicates_found: 1,
            unique_rows: 2,
        };
        assert!((stats.dedup_rate() - 33.333333333333336).abs() < 0.0001);
        assert_eq!(DedupStats::default().dedup_rate(), 0.0);
    }
}
