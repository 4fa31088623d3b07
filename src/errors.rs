//! Centralized error handling for nc_histogram
//!
//! Every failure the pipeline can report is a variant of [`HistogramError`].
//! Only a few of them end a run; the rest are caught at the variable boundary
//! by the processing loop and turned into a skip-and-continue outcome.

use std::fmt;
use std::path::PathBuf;

/// Main error type for nc_histogram operations
#[derive(Debug)]
pub enum HistogramError {
    /// The input file could not be opened or parsed
    SourceOpenFailure {
        path: PathBuf,
        source: netcdf::Error,
    },

    /// A variable has no finite values after filtering
    EmptyData { var: String },

    /// The requested bin count is not positive or exceeds the supported maximum
    InvalidBinCount { bins: i64 },

    /// Reading or histogramming one variable failed
    VariableProcessing { var: String, message: String },

    /// A report could not be written to its destination
    IoFailure {
        path: PathBuf,
        source: std::io::Error,
    },

    /// NetCDF library errors outside of opening the source
    NetCDFError(netcdf::Error),

    /// I/O operation errors
    IoError(std::io::Error),

    /// Array shape or dimension error
    ArrayError(ndarray::ShapeError),

    /// Variable not found in the source
    VariableNotFound { var: String },

    /// A report data line could not be parsed back
    ReportParse { line: usize, message: String },

    /// Thread pool configuration error
    ThreadPoolError(String),

    /// Generic error
    Generic(String),
}

impl HistogramError {
    /// Whether this error ends the whole run instead of a single variable.
    #[must_use]
    pub fn is_run_fatal(&self) -> bool {
        matches!(
            self,
            Self::SourceOpenFailure { .. } | Self::InvalidBinCount { .. } | Self::ThreadPoolError(_)
        )
    }
}

impl fmt::Display for HistogramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistogramError::SourceOpenFailure { path, source } => {
                write!(f, "Could not open '{}': {}", path.display(), source)
            }
            HistogramError::EmptyData { var } => {
                write!(f, "No valid data found for variable '{}'", var)
            }
            HistogramError::InvalidBinCount { bins } => {
                write!(
                    f,
                    "Invalid bin count {}: expected an integer from 1 to {}",
                    bins,
                    crate::statistics::MAX_BINS
                )
            }
            HistogramError::VariableProcessing { var, message } => {
                write!(f, "Error processing '{}': {}", var, message)
            }
            HistogramError::IoFailure { path, source } => {
                write!(f, "Could not write '{}': {}", path.display(), source)
            }
            HistogramError::NetCDFError(e) => write!(f, "NetCDF error: {}", e),
            HistogramError::IoError(e) => write!(f, "I/O error: {}", e),
            HistogramError::ArrayError(e) => write!(f, "Array error: {}", e),
            HistogramError::VariableNotFound { var } => {
                write!(f, "Variable '{}' not found in file", var)
            }
            HistogramError::ReportParse { line, message } => {
                write!(f, "Malformed report line {}: {}", line, message)
            }
            HistogramError::ThreadPoolError(msg) => write!(f, "Thread pool error: {}", msg),
            HistogramError::Generic(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for HistogramError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HistogramError::SourceOpenFailure { source, .. } => Some(source),
            HistogramError::IoFailure { source, .. } => Some(source),
            HistogramError::NetCDFError(e) => Some(e),
            HistogramError::IoError(e) => Some(e),
            HistogramError::ArrayError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<netcdf::Error> for HistogramError {
    fn from(error: netcdf::Error) -> Self {
        HistogramError::NetCDFError(error)
    }
}

impl From<std::io::Error> for HistogramError {
    fn from(error: std::io::Error) -> Self {
        HistogramError::IoError(error)
    }
}

impl From<ndarray::ShapeError> for HistogramError {
    fn from(error: ndarray::ShapeError) -> Self {
        HistogramError::ArrayError(error)
    }
}

impl From<String> for HistogramError {
    fn from(error: String) -> Self {
        HistogramError::Generic(error)
    }
}

impl From<&str> for HistogramError {
    fn from(error: &str) -> Self {
        HistogramError::Generic(error.to_string())
    }
}

/// Result type alias for nc_histogram operations
pub type Result<T> = std::result::Result<T, HistogramError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_classification() {
        assert!(HistogramError::InvalidBinCount { bins: 0 }.is_run_fatal());
        assert!(HistogramError::ThreadPoolError("busy".into()).is_run_fatal());
        assert!(!HistogramError::EmptyData { var: "t".into() }.is_run_fatal());
        assert!(!HistogramError::VariableProcessing {
            var: "t".into(),
            message: "bad block".into()
        }
        .is_run_fatal());
    }

    #[test]
    fn io_failure_keeps_source() {
        use std::error::Error;
        let err = HistogramError::IoFailure {
            path: PathBuf::from("/nope/out.txt"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/nope/out.txt"));
        assert!(err.source().is_some());
    }
}
