//! Parallel building blocks for the histogram engine
//!
//! Both operations are order-independent (integer counts, a total order sort),
//! so running them on the rayon pool does not change results.

use rayon::prelude::*;

/// Counts samples per bin, using `locate` to map a value to its bin index.
///
/// `locate` must return an index below `bins`.
pub fn parallel_bin_counts<F>(values: &[f64], bins: usize, locate: F) -> Vec<u64>
where
    F: Fn(f64) -> usize + Sync,
{
    values
        .par_iter()
        .fold(
            || vec![0_u64; bins],
            |mut acc, &x| {
                acc[locate(x)] += 1;
                acc
            },
        )
        .reduce(
            || vec![0_u64; bins],
            |mut a, b| {
                for (lhs, rhs) in a.iter_mut().zip(b) {
                    *lhs += rhs;
                }
                a
            },
        )
}

/// Returns a sorted copy of `values` (ascending, `f64::total_cmp` order).
pub fn parallel_sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.par_sort_unstable_by(f64::total_cmp);
    sorted
}
