//! Equal-width histograms over the finite values of a sample array.

use super::parallel::parallel_bin_counts;
use super::summary::Statistics;
use crate::errors::{HistogramError, Result};

/// Largest accepted bin count
pub const MAX_BINS: i64 = 100_000;

/// Bin edges and counts of an equal-width histogram
///
/// `edges` has `counts.len() + 1` entries and is non-decreasing. Every bin is
/// half-open `[left, right)` except the last, which also includes its right edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    edges: Vec<f64>,
    counts: Vec<u64>,
}

/// One bin rendered as a report row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramRow {
    pub center: f64,
    pub count: u64,
    pub left: f64,
    pub right: f64,
}

/// Histogram and statistics computed for one variable
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramResult {
    pub histogram: Histogram,
    pub statistics: Statistics,
}

impl Histogram {
    /// Bin a clean sample set into `bins` equal-width bins spanning `[min, max]`.
    ///
    /// When every value is equal the edges all collapse to that value and the
    /// first bin absorbs all samples.
    fn from_clean(values: &[f64], bins: usize, min: f64, max: f64) -> Self {
        if min == max {
            let mut counts = vec![0; bins];
            counts[0] = values.len() as u64;
            return Self {
                edges: vec![min; bins + 1],
                counts,
            };
        }

        let edges = linspace(min, max, bins);
        let span = max - min;
        let counts = parallel_bin_counts(values, bins, |x| locate_bin(x, &edges, min, span));

        Self { edges, counts }
    }

    /// Bin edges, `bin_count() + 1` values
    #[must_use]
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Sample count per bin
    #[must_use]
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    #[must_use]
    pub fn bin_count(&self) -> usize {
        self.counts.len()
    }

    /// Sum of all bin counts
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Bins in ascending order
    pub fn rows(&self) -> impl Iterator<Item = HistogramRow> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(w, &count)| HistogramRow {
                center: (w[0] + w[1]) / 2.0,
                count,
                left: w[0],
                right: w[1],
            })
    }
}

/// `bins + 1` evenly spaced points from `start` to `stop`, the last one exactly `stop`.
fn linspace(start: f64, stop: f64, bins: usize) -> Vec<f64> {
    let step = (stop - start) / bins as f64;
    let mut edges: Vec<f64> = (0..=bins).map(|i| i as f64 * step + start).collect();
    edges[bins] = stop;
    edges
}

/// Bin index for a finite `x` within `[min, min + span]`.
///
/// The scaled estimate can land one bin off through rounding, so it is
/// corrected against the stored edges.
fn locate_bin(x: f64, edges: &[f64], min: f64, span: f64) -> usize {
    let bins = edges.len() - 1;
    let mut idx = (((x - min) / span) * bins as f64) as usize;
    if idx >= bins {
        idx = bins - 1;
    }
    if idx > 0 && x < edges[idx] {
        idx -= 1;
    } else if idx + 1 < bins && x >= edges[idx + 1] {
        idx += 1;
    }
    idx
}

/// The finite subsequence of `data`, order preserved.
#[must_use]
pub fn finite_values(data: &[f64]) -> Vec<f64> {
    data.iter().copied().filter(|x| x.is_finite()).collect()
}

fn bin_count(bins: i64) -> Result<usize> {
    if !(1..=MAX_BINS).contains(&bins) {
        return Err(HistogramError::InvalidBinCount { bins });
    }
    usize::try_from(bins).map_err(|_| HistogramError::InvalidBinCount { bins })
}

/// Computes a `bins`-bin histogram and summary statistics over the finite values of `data`.
///
/// Returns `Ok(None)` when `data` holds no finite values; callers should skip
/// the variable rather than treat it as a failure.
///
/// # Errors
///
/// Returns [`HistogramError::InvalidBinCount`] when `bins` is zero, negative
/// or above [`MAX_BINS`].
pub fn compute_histogram(data: &[f64], bins: i64) -> Result<Option<HistogramResult>> {
    let bins = bin_count(bins)?;

    let clean = finite_values(data);
    let Some(statistics) = Statistics::from_clean(&clean) else {
        return Ok(None);
    };

    let histogram = Histogram::from_clean(&clean, bins, statistics.min, statistics.max);
    debug_assert_eq!(histogram.total(), statistics.count as u64);

    Ok(Some(HistogramResult {
        histogram,
        statistics,
    }))
}
