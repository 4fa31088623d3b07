//! Defines command-line interface options using `clap` for nc_histogram.

use crate::config::{HistogramConfig, DEFAULT_BINS};
use clap::Parser;
use std::path::PathBuf;

/// Generate per-variable histograms from NetCDF data
#[derive(Parser, Debug)]
#[command(
    version,
    name = "nc_histogram",
    about = "Generate histograms and summary statistics for NetCDF variables"
)]
pub struct Args {
    /// Path to the input .nc file
    pub input_file: PathBuf,

    /// Output directory (default: same as input file)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of histogram bins
    #[arg(short, long, default_value_t = DEFAULT_BINS, allow_negative_numbers = true)]
    pub bins: i64,

    /// Specific variables to process (default: all data variables)
    #[arg(short, long, num_args = 1..)]
    pub variables: Option<Vec<String>>,

    /// Number of threads to use for binning. Defaults to the rayon default.
    #[arg(short = 't', long)]
    pub threads: Option<usize>,

    /// Keep raw stored values: no _FillValue masking or scale/offset decoding
    #[arg(long, default_value_t = false)]
    pub no_mask: bool,

    /// Enable verbose output.
    #[arg(long, default_value_t = false)]
    pub verbose: bool,
}

impl Args {
    /// Convert parsed arguments into a run configuration
    #[must_use]
    pub fn into_config(self) -> HistogramConfig {
        HistogramConfig {
            input: self.input_file,
            output_dir: self.output,
            bins: self.bins,
            variables: self.variables,
            mask_fill_values: !self.no_mask,
            threads: self.threads,
        }
    }
}
