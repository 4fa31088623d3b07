//! Data source abstraction for array-data inputs
//!
//! The processing loop only needs to enumerate variables, look at their
//! metadata and read their values as a flat sequence. [`DataReader`] captures
//! exactly that, so NetCDF files and in-memory arrays are interchangeable.

use crate::errors::{HistogramError, Result};
use serde_json::{Map, Value as JsonValue};

/// Metadata for array-like data
#[derive(Debug, Clone, Default)]
pub struct DataArrayMetadata {
    pub name: String,
    pub shape: Vec<usize>,
    pub dtype: String,
    pub dimensions: Vec<String>,
    /// Attributes in definition order
    pub attributes: Map<String, JsonValue>,
}

impl DataArrayMetadata {
    /// Number of dimensions
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements
    #[must_use]
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Read access to a set of named arrays
pub trait DataReader {
    /// Human-readable name of the source, used in logs
    fn source_name(&self) -> String;

    /// List all available arrays, in source order
    fn list_arrays(&self) -> Result<Vec<String>>;

    /// Attributes attached to the source as a whole
    fn global_attributes(&self) -> Result<Map<String, JsonValue>>;

    /// Get metadata for a specific array
    fn get_metadata(&self, array_name: &str) -> Result<DataArrayMetadata>;

    /// Read an entire array flattened in row-major order
    fn read_flat(&self, array_name: &str) -> Result<Vec<f64>>;
}

/// A [`DataReader`] over arrays already held in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    name: String,
    global_attributes: Map<String, JsonValue>,
    arrays: Vec<(DataArrayMetadata, Vec<f64>)>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add a global attribute
    #[must_use]
    pub fn with_global_attribute(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.global_attributes.insert(key.into(), value.into());
        self
    }

    /// Add an array; `values` must already be flattened in row-major order.
    ///
    /// # Errors
    ///
    /// Returns an error if the value count does not match the metadata shape.
    pub fn add_array(&mut self, metadata: DataArrayMetadata, values: Vec<f64>) -> Result<()> {
        if metadata.len() != values.len() {
            return Err(HistogramError::Generic(format!(
                "Array '{}' has shape {:?} but {} values were supplied",
                metadata.name,
                metadata.shape,
                values.len()
            )));
        }
        self.arrays.retain(|(m, _)| m.name != metadata.name);
        self.arrays.push((metadata, values));
        Ok(())
    }

    fn find(&self, array_name: &str) -> Result<&(DataArrayMetadata, Vec<f64>)> {
        self.arrays
            .iter()
            .find(|(m, _)| m.name == array_name)
            .ok_or_else(|| HistogramError::VariableNotFound {
                var: array_name.to_string(),
            })
    }
}

impl DataReader for MemorySource {
    fn source_name(&self) -> String {
        self.name.clone()
    }

    fn list_arrays(&self) -> Result<Vec<String>> {
        Ok(self.arrays.iter().map(|(m, _)| m.name.clone()).collect())
    }

    fn global_attributes(&self) -> Result<Map<String, JsonValue>> {
        Ok(self.global_attributes.clone())
    }

    fn get_metadata(&self, array_name: &str) -> Result<DataArrayMetadata> {
        self.find(array_name).map(|(m, _)| m.clone())
    }

    fn read_flat(&self, array_name: &str) -> Result<Vec<f64>> {
        self.find(array_name).map(|(_, v)| v.clone())
    }
}
