//! Count, remove, recount
//!
//! The reporting sequence run against a caller-owned dataset: print the
//! duplicate count, remove duplicates in place, then print the count again.

use crate::exact_dedup::ExactDeduplicator;
use crate::{Dataset, DedupOptions, Result};
use serde::Serialize;
use std::io::Write;
use tracing::info;

/// Outcome of one reporting run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DedupReport {
    pub duplicates_before: usize,
    pub duplicates_after: usize,
    pub rows_before: usize,
    pub rows_after: usize,
}

impl DedupReport {
    /// Rows dropped by the removal step
    pub fn removed(&self) -> usize {
        self.rows_before - self.rows_after
    }
}

/// Run the sequence, writing both report lines to `out`
pub fn run<W: Write>(
    dataset: &mut Dataset,
    options: &DedupOptions,
    out: &mut W,
) -> Result<DedupReport> {
    let mut deduplicator = ExactDeduplicator::new(options.clone());
    let rows_before = dataset.len();

    let duplicates_before = deduplicator.count_duplicates(dataset)?;
    writeln!(out, "Number of duplicates: {}", duplicates_before)?;

    deduplicator.remove_duplicates(dataset)?;

    let duplicates_after = deduplicator.count_duplicates(dataset)?;
    writeln!(out, "Number of duplicates after removal: {}", duplicates_after)?;

    let report = DedupReport {
        duplicates_before,
        duplicates_after,
        rows_before,
        rows_after: dataset.len(),
    };
    info!(
        "Deduplicated {} rows down to {} ({} removed)",
        report.rows_before,
        report.rows_after,
        report.removed()
    );
    Ok(report)
}
