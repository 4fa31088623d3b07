//! Run configuration
//!
//! Everything a run needs is carried explicitly in [`HistogramConfig`]; the
//! library never consults the working directory or other ambient state.

use crate::errors::{HistogramError, Result};
use crate::statistics::MAX_BINS;
use std::path::{Path, PathBuf};

/// Default number of histogram bins
pub const DEFAULT_BINS: i64 = 50;

/// Configuration for one histogram run over an input file
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramConfig {
    /// Input NetCDF file
    pub input: PathBuf,
    /// Output directory; defaults to the input file's directory
    pub output_dir: Option<PathBuf>,
    /// Number of bins per histogram
    pub bins: i64,
    /// Restrict processing to these variables
    pub variables: Option<Vec<String>>,
    /// Mask `_FillValue`/`missing_value` samples and apply scale/offset
    pub mask_fill_values: bool,
    /// Worker threads for binning; `None` keeps the rayon default
    pub threads: Option<usize>,
}

impl HistogramConfig {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: None,
            bins: DEFAULT_BINS,
            variables: None,
            mask_fill_values: true,
            threads: None,
        }
    }

    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn with_bins(mut self, bins: i64) -> Self {
        self.bins = bins;
        self
    }

    #[must_use]
    pub fn with_variables<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.variables = Some(names.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_fill_value_masking(mut self, enabled: bool) -> Self {
        self.mask_fill_values = enabled;
        self
    }

    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Check settings that would make the whole run meaningless.
    ///
    /// # Errors
    ///
    /// Returns [`HistogramError::InvalidBinCount`] when `bins` is not in `1..=MAX_BINS`.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_BINS).contains(&self.bins) {
            return Err(HistogramError::InvalidBinCount { bins: self.bins });
        }
        if self.threads == Some(0) {
            return Err(HistogramError::ThreadPoolError(
                "thread count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Output directory for reports.
    ///
    /// Falls back to the directory holding the input, or `.` for a bare file name.
    #[must_use]
    pub fn resolve_output_dir(&self) -> PathBuf {
        if let Some(dir) = &self.output_dir {
            return dir.clone();
        }
        match self.input.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Input file name without its extension
    #[must_use]
    pub fn base_name(&self) -> String {
        self.input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Report path for a variable: `<output_dir>/<base>_<var>_histogram.txt`
    #[must_use]
    pub fn output_path_for(&self, var_name: &str) -> PathBuf {
        report_path(&self.resolve_output_dir(), &self.base_name(), var_name)
    }

    /// Whether the explicit variable filter (if any) selects `name`.
    #[must_use]
    pub fn wants_variable(&self, name: &str) -> bool {
        self.variables
            .as_ref()
            .map_or(true, |names| names.iter().any(|n| n == name))
    }
}

fn report_path(dir: &Path, base: &str, var_name: &str) -> PathBuf {
    dir.join(format!("{base}_{var_name}_histogram.txt"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = HistogramConfig::new("data/eos06.nc");
        assert_eq!(config.bins, 50);
        assert!(config.mask_fill_values);
        assert_eq!(config.resolve_output_dir(), PathBuf::from("data"));
        assert_eq!(
            config.output_path_for("sst"),
            PathBuf::from("data/eos06_sst_histogram.txt")
        );
    }

    #[test]
    fn bare_file_name_uses_current_dir() {
        let config = HistogramConfig::new("eos06.nc");
        assert_eq!(config.resolve_output_dir(), PathBuf::from("."));
    }

    #[test]
    fn explicit_output_dir_wins() {
        let config = HistogramConfig::new("data/eos06.nc").with_output_dir("out");
        assert_eq!(config.output_path_for("t"), PathBuf::from("out/eos06_t_histogram.txt"));
    }

    #[test]
    fn variable_filter() {
        let all = HistogramConfig::new("a.nc");
        assert!(all.wants_variable("anything"));

        let some = all.with_variables(["temp", "humidity"]);
        assert!(some.wants_variable("temp"));
        assert!(!some.wants_variable("pressure"));
    }

    #[test]
    fn validation() {
        assert!(HistogramConfig::new("a.nc").validate().is_ok());
        assert!(HistogramConfig::new("a.nc").with_bins(MAX_BINS).validate().is_ok());
        for bins in [0, -1, MAX_BINS + 1, 9_999_999_999_999] {
            assert!(matches!(
                HistogramConfig::new("a.nc").with_bins(bins).validate(),
                Err(HistogramError::InvalidBinCount { .. })
            ));
        }
        assert!(HistogramConfig::new("a.nc").with_threads(0).validate().is_err());
    }
}
