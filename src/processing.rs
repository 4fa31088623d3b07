//! Run orchestration
//!
//! Walks every variable of a source, histograms it and writes its report.
//! Each variable ends in a [`VariableOutcome`]; a failure on one variable is
//! recorded and the loop moves on. Only opening the source and invalid run
//! configuration end a run early.

use crate::config::HistogramConfig;
use crate::data_source::DataReader;
use crate::errors::{HistogramError, Result};
use crate::metadata::{format_shape, render_value, variable_info};
use crate::netcdf_io::NetCDFReader;
use crate::report::write_report;
use crate::statistics::compute_histogram;
use log::{debug, info, warn};
use std::fs;
use std::path::PathBuf;

/// Why a variable produced no report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Excluded by the explicit variable list
    NotSelected,
    /// One or zero dimensions
    CoordinateVariable,
    /// No finite values after filtering
    EmptyData,
}

/// Result of processing a single variable
#[derive(Debug)]
pub enum VariableOutcome {
    Processed {
        output: PathBuf,
        count: usize,
        min: f64,
        max: f64,
    },
    Skipped(SkipReason),
    Failed(HistogramError),
}

/// Outcomes of a whole run, in source order
#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<(String, VariableOutcome)>,
}

impl RunSummary {
    /// Number of variables whose report was written
    #[must_use]
    pub fn processed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, VariableOutcome::Processed { .. }))
            .count()
    }

    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, VariableOutcome::Skipped(_)))
            .count()
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, VariableOutcome::Failed(_)))
            .count()
    }

    /// Outcome recorded for `var_name`
    #[must_use]
    pub fn outcome(&self, var_name: &str) -> Option<&VariableOutcome> {
        self.outcomes
            .iter()
            .find(|(name, _)| name == var_name)
            .map(|(_, o)| o)
    }
}

/// Opens the configured NetCDF input and processes it.
///
/// # Errors
///
/// Returns run-fatal errors only: invalid configuration, a source that cannot
/// be opened, or an output directory that cannot be created.
pub fn process_file(config: &HistogramConfig) -> Result<RunSummary> {
    config.validate()?;
    let reader = NetCDFReader::open(&config.input, config.mask_fill_values)?;
    process_source(&reader, config)
}

/// Histograms every selected variable of `reader` and writes one report per variable.
///
/// # Errors
///
/// Returns run-fatal errors only; per-variable failures are recorded in the summary.
pub fn process_source<R: DataReader>(reader: &R, config: &HistogramConfig) -> Result<RunSummary> {
    config.validate()?;

    let output_dir = config.resolve_output_dir();
    fs::create_dir_all(&output_dir).map_err(|source| HistogramError::IoFailure {
        path: output_dir.clone(),
        source,
    })?;

    let names = reader.list_arrays()?;

    info!("Processing file: {}", reader.source_name());
    info!("Output directory: {}", output_dir.display());
    info!("Available variables: {:?}", names);
    match reader.global_attributes() {
        Ok(globals) => {
            let rendered: Vec<String> = globals
                .iter()
                .map(|(k, v)| format!("{k}: {}", render_value(v)))
                .collect();
            info!("Global attributes: {{{}}}", rendered.join(", "));
        }
        Err(e) => warn!("Could not read global attributes: {e}"),
    }

    let mut summary = RunSummary::default();
    for name in names {
        let outcome = process_variable(reader, config, &name);
        match &outcome {
            VariableOutcome::Processed {
                output,
                count,
                min,
                max,
            } => {
                info!("Histogram saved to: {}", output.display());
                info!("  Valid data points: {count}");
                info!("  Range: [{min:.6}, {max:.6}]");
            }
            VariableOutcome::Skipped(SkipReason::NotSelected) => {
                debug!("Skipping unselected variable: {name}");
            }
            VariableOutcome::Skipped(SkipReason::CoordinateVariable) => {
                info!("Skipping coordinate variable: {name}");
            }
            VariableOutcome::Skipped(SkipReason::EmptyData) => {
                warn!("No valid data found for variable {name}, skipped");
            }
            VariableOutcome::Failed(e) => warn!("Error processing {name}: {e}"),
        }
        summary.outcomes.push((name, outcome));
    }

    debug!(
        "{} processed, {} skipped, {} failed",
        summary.processed_count(),
        summary.skipped_count(),
        summary.failed_count()
    );
    Ok(summary)
}

/// Runs one variable through read, histogram and report, isolating any failure.
pub fn process_variable<R: DataReader>(
    reader: &R,
    config: &HistogramConfig,
    var_name: &str,
) -> VariableOutcome {
    if !config.wants_variable(var_name) {
        return VariableOutcome::Skipped(SkipReason::NotSelected);
    }

    match histogram_variable(reader, config, var_name) {
        Ok(outcome) => outcome,
        Err(e @ HistogramError::IoFailure { .. }) => VariableOutcome::Failed(e),
        Err(HistogramError::EmptyData { .. }) => VariableOutcome::Skipped(SkipReason::EmptyData),
        Err(e) => VariableOutcome::Failed(HistogramError::VariableProcessing {
            var: var_name.to_string(),
            message: e.to_string(),
        }),
    }
}

fn histogram_variable<R: DataReader>(
    reader: &R,
    config: &HistogramConfig,
    var_name: &str,
) -> Result<VariableOutcome> {
    let meta = reader.get_metadata(var_name)?;
    if meta.ndim() <= 1 {
        return Ok(VariableOutcome::Skipped(SkipReason::CoordinateVariable));
    }

    info!("Processing variable: {var_name}");
    info!("  Shape: ({})", format_shape(&meta.shape));
    info!("  Data type: {}", meta.dtype);

    let data = reader.read_flat(var_name)?;
    let result = compute_histogram(&data, config.bins)?.ok_or_else(|| HistogramError::EmptyData {
        var: var_name.to_string(),
    })?;

    let output = config.output_path_for(var_name);
    write_report(&result, &variable_info(&meta), var_name, &output)?;

    Ok(VariableOutcome::Processed {
        output,
        count: result.statistics.count,
        min: result.statistics.min,
        max: result.statistics.max,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::{DataArrayMetadata, MemorySource};
    use serde_json::Map;

    fn meta(name: &str, shape: &[usize]) -> DataArrayMetadata {
        DataArrayMetadata {
            name: name.to_string(),
            shape: shape.to_vec(),
            dtype: "float32".to_string(),
            dimensions: (0..shape.len()).map(|i| format!("d{i}")).collect(),
            attributes: Map::new(),
        }
    }

    fn source() -> MemorySource {
        let mut source = MemorySource::new("mem.nc");
        source.add_array(meta("time", &[4]), vec![0.0, 1.0, 2.0, 3.0]).unwrap();
        source
            .add_array(meta("temp", &[2, 2]), vec![1.0, 2.0, 3.0, 4.0])
            .unwrap();
        source
            .add_array(meta("gaps", &[1, 2]), vec![f64::NAN, f64::INFINITY])
            .unwrap();
        source
    }

    #[test]
    fn processes_and_skips() {
        let dir = tempfile::tempdir().unwrap();
        let config = HistogramConfig::new("mem.nc")
            .with_output_dir(dir.path())
            .with_bins(2);

        let summary = process_source(&source(), &config).unwrap();
        assert_eq!(summary.processed_count(), 1);
        assert_eq!(summary.skipped_count(), 2);
        assert!(matches!(
            summary.outcome("time"),
            Some(VariableOutcome::Skipped(SkipReason::CoordinateVariable))
        ));
        assert!(matches!(
            summary.outcome("gaps"),
            Some(VariableOutcome::Skipped(SkipReason::EmptyData))
        ));
        assert!(dir.path().join("mem_temp_histogram.txt").exists());
        assert!(!dir.path().join("mem_gaps_histogram.txt").exists());
    }

    #[test]
    fn respects_variable_filter() {
        let dir = tempfile::tempdir().unwrap();
        let config = HistogramConfig::new("mem.nc")
            .with_output_dir(dir.path())
            .with_variables(["gaps"]);

        let summary = process_source(&source(), &config).unwrap();
        assert_eq!(summary.processed_count(), 0);
        assert!(matches!(
            summary.outcome("temp"),
            Some(VariableOutcome::Skipped(SkipReason::NotSelected))
        ));
    }

    #[test]
    fn invalid_bins_abort_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let config = HistogramConfig::new("mem.nc")
            .with_output_dir(dir.path())
            .with_bins(0);
        let err = process_source(&source(), &config).unwrap_err();
        assert!(err.is_run_fatal());
    }

    #[test]
    fn failed_write_does_not_stop_the_run() {
        let mut source = MemorySource::new("m.nc");
        source.add_array(meta("a", &[2, 2]), vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        source.add_array(meta("b", &[2, 2]), vec![5.0, 6.0, 7.0, 8.0]).unwrap();

        let dir = tempfile::tempdir().unwrap();
        // a directory squatting on the report path makes the final rename fail
        let blocked = dir.path().join("m_a_histogram.txt");
        fs::create_dir(&blocked).unwrap();

        let config = HistogramConfig::new("m.nc").with_output_dir(dir.path()).with_bins(2);
        let summary = process_source(&source, &config).unwrap();

        match summary.outcome("a") {
            Some(VariableOutcome::Failed(HistogramError::IoFailure { path, .. })) => {
                assert_eq!(path, &blocked);
            }
            other => panic!("expected IoFailure, got {other:?}"),
        }
        assert!(matches!(
            summary.outcome("b"),
            Some(VariableOutcome::Processed { count: 4, .. })
        ));
        assert_eq!(summary.processed_count(), 1);
        assert_eq!(summary.failed_count(), 1);
        assert!(blocked.is_dir());
        assert!(dir.path().join("m_b_histogram.txt").is_file());
    }

    #[test]
    fn unreadable_variable_is_isolated() {
        struct Flaky(MemorySource);

        impl DataReader for Flaky {
            fn source_name(&self) -> String {
                self.0.source_name()
            }
            fn list_arrays(&self) -> Result<Vec<String>> {
                self.0.list_arrays()
            }
            fn global_attributes(&self) -> Result<Map<String, serde_json::Value>> {
                self.0.global_attributes()
            }
            fn get_metadata(&self, array_name: &str) -> Result<DataArrayMetadata> {
                self.0.get_metadata(array_name)
            }
            fn read_flat(&self, array_name: &str) -> Result<Vec<f64>> {
                if array_name == "gaps" {
                    return Err("corrupt data block".into());
                }
                self.0.read_flat(array_name)
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let config = HistogramConfig::new("mem.nc").with_output_dir(dir.path());
        let summary = process_source(&Flaky(source()), &config).unwrap();

        assert_eq!(summary.processed_count(), 1);
        assert_eq!(summary.failed_count(), 1);
        match summary.outcome("gaps") {
            Some(VariableOutcome::Failed(HistogramError::VariableProcessing { var, message })) => {
                assert_eq!(var, "gaps");
                assert!(message.contains("corrupt data block"));
            }
            other => panic!("expected VariableProcessing failure, got {other:?}"),
        }
    }
}
