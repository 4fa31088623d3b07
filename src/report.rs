//! Histogram text reports
//!
//! A report is a `#`-commented header (variable name, timestamp, variable info
//! and statistics) followed by one `bin_center, count, bin_left_edge,
//! bin_right_edge` line per bin. Apart from the timestamp the output is fully
//! determined by its inputs.

use crate::errors::{HistogramError, Result};
use crate::statistics::{HistogramResult, HistogramRow};
use chrono::Local;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Timestamp format of the `Generated on` line
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A fully specified report, rendered through [`fmt::Display`]
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    pub var_name: &'a str,
    pub generated_at: &'a str,
    pub info: &'a [(String, String)],
    pub result: &'a HistogramResult,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Histogram for variable: {}", self.var_name)?;
        writeln!(f, "# Generated on: {}", self.generated_at)?;

        if !self.info.is_empty() {
            writeln!(f, "# Variable info:")?;
            for (key, value) in self.info {
                writeln!(f, "#   {key}: {value}")?;
            }
        }

        let stats = &self.result.statistics;
        writeln!(f, "#")?;
        writeln!(f, "# Statistics:")?;
        writeln!(f, "#   Count: {}", stats.count)?;
        writeln!(f, "#   Mean: {:.6}", stats.mean)?;
        writeln!(f, "#   Std Dev: {:.6}", stats.std)?;
        writeln!(f, "#   Min: {:.6}", stats.min)?;
        writeln!(f, "#   Max: {:.6}", stats.max)?;
        writeln!(f, "#   Median: {:.6}", stats.median)?;
        writeln!(f, "#")?;
        writeln!(f, "# Format: bin_center, count, bin_left_edge, bin_right_edge")?;
        writeln!(f, "#")?;

        for row in self.result.histogram.rows() {
            writeln!(
                f,
                "{:.6}, {}, {:.6}, {:.6}",
                row.center, row.count, row.left, row.right
            )?;
        }
        Ok(())
    }
}

/// Render a report to a string with an explicit timestamp.
#[must_use]
pub fn render_report(
    result: &HistogramResult,
    info: &[(String, String)],
    var_name: &str,
    generated_at: &str,
) -> String {
    Report {
        var_name,
        generated_at,
        info,
        result,
    }
    .to_string()
}

/// Writes histogram reports to a destination file
pub struct ReportWriter<'a> {
    output_path: &'a Path,
}

impl<'a> ReportWriter<'a> {
    pub fn new(output_path: &'a Path) -> Self {
        Self { output_path }
    }

    /// Render and write the report, stamped with the current local time.
    ///
    /// The text is written to a temporary file next to the destination and
    /// renamed over it, so the destination is either fully replaced or untouched.
    ///
    /// # Errors
    ///
    /// Returns [`HistogramError::IoFailure`] if the destination cannot be written.
    pub fn write(
        &self,
        result: &HistogramResult,
        info: &[(String, String)],
        var_name: &str,
    ) -> Result<()> {
        let generated_at = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let text = render_report(result, info, var_name, &generated_at);
        self.persist(text.as_bytes())
    }

    fn persist(&self, bytes: &[u8]) -> Result<()> {
        let io_failure = |source: std::io::Error| HistogramError::IoFailure {
            path: self.output_path.to_path_buf(),
            source,
        };

        let dir = match self.output_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut tmp = report_tempfile(&dir).map_err(io_failure)?;
        // Overwrites keep the mode of the report they replace
        if let Ok(existing) = fs::metadata(self.output_path) {
            tmp.as_file()
                .set_permissions(existing.permissions())
                .map_err(io_failure)?;
        }
        tmp.write_all(bytes).map_err(io_failure)?;
        tmp.flush().map_err(io_failure)?;
        tmp.persist(self.output_path)
            .map_err(|e| io_failure(e.error))?;
        Ok(())
    }
}

/// Temp file created with the mode a plain `File::create` would get (0666 less the umask).
fn report_tempfile(dir: &Path) -> std::io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".nc_histogram");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}

/// Writes a report for `var_name` to `output_path`.
///
/// # Errors
///
/// Returns [`HistogramError::IoFailure`] if the destination cannot be written.
pub fn write_report(
    result: &HistogramResult,
    info: &[(String, String)],
    var_name: &str,
    output_path: &Path,
) -> Result<()> {
    ReportWriter::new(output_path).write(result, info, var_name)
}

/// Parses the data section of a report back into rows.
///
/// Comment and blank lines are skipped.
///
/// # Errors
///
/// Returns [`HistogramError::ReportParse`] for a data line that does not have
/// four comma-separated numeric fields.
pub fn parse_histogram_rows(text: &str) -> Result<Vec<HistogramRow>> {
    let mut rows = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parse_err = |message: String| HistogramError::ReportParse {
            line: idx + 1,
            message,
        };

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let &[center, count, left, right] = fields.as_slice() else {
            return Err(parse_err(format!("expected 4 fields, found {}", fields.len())));
        };

        let float = |s: &str| {
            s.parse::<f64>()
                .map_err(|e| parse_err(format!("invalid number '{s}': {e}")))
        };

        rows.push(HistogramRow {
            center: float(center)?,
            count: count
                .parse::<u64>()
                .map_err(|e| parse_err(format!("invalid count '{count}': {e}")))?,
            left: float(left)?,
            right: float(right)?,
        });
    }

    Ok(rows)
}
