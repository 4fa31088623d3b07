//! Histogram engine: finite-value filtering, equal-width binning and
//! summary statistics over a flattened variable.
//!
//! # Organization
//!
//! - [`histogram`]: bin edges, bin counts and the [`compute_histogram`] entry point
//! - [`summary`]: count, mean, population std, min, max and median
//! - [`parallel`]: rayon-backed bin counting and sorting

pub mod histogram;
pub mod parallel;
pub mod summary;

pub use histogram::{
    compute_histogram, finite_values, Histogram, HistogramResult, HistogramRow, MAX_BINS,
};
pub use summary::Statistics;
