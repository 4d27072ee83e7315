//! Hashing utilities for row keys

use crate::{Row, Value};
use ahash::RandomState;
use rayon::prelude::*;
use std::hash::{BuildHasher, Hash, Hasher};

// Fixed seeds keep hashes stable across runs and threads.
const SEEDS: [u64; 4] = [
    0x243f_6a88_85a3_08d3,
    0x1319_8a2e_0370_7344,
    0xa409_3822_299f_31d0,
    0x082e_fa98_ec4e_6c89,
];

/// Build the hasher state shared by every row hash in one pass
pub fn key_state() -> RandomState {
    RandomState::with_seeds(SEEDS[0], SEEDS[1], SEEDS[2], SEEDS[3])
}

/// Hash the projection of `row` onto `columns`
pub fn hash_key(state: &RandomState, row: &[Value], columns: &[usize]) -> u64 {
    let mut hasher = state.build_hasher();
    for &column in columns {
        row[column].hash(&mut hasher);
    }
    hasher.finish()
}

/// Compare the projections of two rows onto `columns`
pub fn keys_equal(a: &[Value], b: &[Value], columns: &[usize]) -> bool {
    columns.iter().all(|&c| a[c] == b[c])
}

/// Hash every row key, in parallel when `parallel` is set.
///
/// Output order matches `rows` either way.
pub fn hash_rows(rows: &[Row], columns: &[usize], parallel: bool) -> Vec<u64> {
    let state = key_state();
    if parallel {
        rows.par_iter()
            .map(|row| hash_key(&state, row, columns))
            .collect()
    } else {
        rows.iter()
            .map(|row| hash_key(&state, row, columns))
            .collect()
    }
}
