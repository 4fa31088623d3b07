//! nc_histogram: per-variable histograms for NetCDF files
//!
//! Reads every data variable of a NetCDF file, filters out non-finite samples,
//! bins the rest into a fixed number of equal-width bins and writes the bins
//! together with summary statistics (count, mean, population std, min, max,
//! median) to an annotated text report per variable.
//!
//! ## Module Organization
//!
//! - [`statistics`]: the histogram engine
//! - [`report`]: text report rendering, writing and parsing
//! - [`processing`]: the per-variable loop and run summary
//! - [`data_source`]: the [`DataReader`] input abstraction and an in-memory source
//! - [`netcdf_io`]: NetCDF-backed [`DataReader`]
//! - [`metadata`]: variable info rendering
//! - [`config`]: explicit run configuration
//! - [`parallel`]: Rayon thread pool configuration
//! - [`errors`]: centralized error handling
//!
//! ## Usage
//!
//! ```rust,no_run
//! use nc_histogram::prelude::*;
//!
//! let config = HistogramConfig::new("eos06.nc")
//!     .with_output_dir("histograms")
//!     .with_bins(100);
//! let summary = process_file(&config).unwrap();
//! println!("{} variables processed", summary.processed_count());
//! ```
//!
//! The engine can also be used directly on a flat slice:
//!
//! ```rust
//! use nc_histogram::statistics::compute_histogram;
//!
//! let result = compute_histogram(&[1.0, 2.0, 3.0, 4.0, f64::NAN], 2).unwrap().unwrap();
//! assert_eq!(result.histogram.counts(), &[2, 2]);
//! ```

pub mod cli;
pub mod config;
pub mod data_source;
pub mod errors;
pub mod metadata;
pub mod netcdf_io;
pub mod parallel;
pub mod processing;
pub mod report;
pub mod statistics;

pub use data_source::{DataArrayMetadata, DataReader, MemorySource};
pub use errors::{HistogramError, Result};

pub mod prelude {
    //! Commonly used imports for convenience
    pub use crate::config::{HistogramConfig, DEFAULT_BINS};
    pub use crate::data_source::{DataArrayMetadata, DataReader, MemorySource};
    pub use crate::errors::{HistogramError, Result};
    pub use crate::netcdf_io::NetCDFReader;
    pub use crate::parallel::ParallelConfig;
    pub use crate::processing::{process_file, process_source, RunSummary, SkipReason, VariableOutcome};
    pub use crate::report::{parse_histogram_rows, render_report, write_report, ReportWriter};
    pub use crate::statistics::{compute_histogram, Histogram, HistogramResult, Statistics};
}
