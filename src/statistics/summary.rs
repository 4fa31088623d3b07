//! Summary statistics over a clean (all finite) sample set.

use super::parallel::parallel_sorted;

/// First/second moments and order statistics of a clean sample set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Statistics {
    /// Number of finite samples
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Population standard deviation (divisor `count`)
    pub std: f64,
    /// Smallest sample
    pub min: f64,
    /// Largest sample
    pub max: f64,
    /// Middle value, or the average of the two middle values for even counts
    pub median: f64,
}

impl Statistics {
    /// Compute statistics over `values`, which must be non-empty and finite.
    ///
    /// Returns `None` for an empty slice. Sums are accumulated left to right
    /// so results are reproducible for a given input order.
    #[must_use]
    pub fn from_clean(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let count = values.len();
        let n = count as f64;

        let mut sum = 0.0_f64;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &x in values {
            sum += x;
            min = min.min(x);
            max = max.max(x);
        }
        let mean = sum / n;

        let mut sq_dev = 0.0_f64;
        for &x in values {
            let d = x - mean;
            sq_dev += d * d;
        }
        let std = (sq_dev / n).sqrt();

        let sorted = parallel_sorted(values);
        let mid = count / 2;
        let median = if count % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        Some(Self {
            count,
            mean,
            std,
            min,
            max,
            median,
        })
    }
}
