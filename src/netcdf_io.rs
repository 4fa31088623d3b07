//! NetCDF input: variable enumeration, metadata and flattened reads
//!
//! Values are read as `f64` and decoded following the CF conventions used by
//! most NetCDF tooling: samples equal to `_FillValue` or `missing_value`, or
//! lying outside `valid_min`/`valid_max` (or the two-element `valid_range`),
//! become NaN and are therefore dropped by the histogram engine. The checks run
//! on the stored values; `scale_factor` and `add_offset` are applied afterwards.

use crate::data_source::{DataArrayMetadata, DataReader};
use crate::errors::{HistogramError, Result};
use log::debug;
use ndarray::ArrayD;
use netcdf::{AttributeValue, File, Variable};
use serde_json::{Map, Value as JsonValue};
use std::path::{Path, PathBuf};

/// A NetCDF file opened for reading
pub struct NetCDFReader {
    file: File,
    path: PathBuf,
    mask_fill_values: bool,
}

impl NetCDFReader {
    /// Open a NetCDF file.
    ///
    /// With `mask_fill_values` disabled the raw stored values are returned.
    ///
    /// # Errors
    ///
    /// Returns [`HistogramError::SourceOpenFailure`] if the file cannot be opened.
    pub fn open(path: &Path, mask_fill_values: bool) -> Result<Self> {
        let file = netcdf::open(path).map_err(|source| HistogramError::SourceOpenFailure {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
            mask_fill_values,
        })
    }

    /// Path the reader was opened from
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn variable(&self, var_name: &str) -> Result<Variable<'_>> {
        self.file
            .variable(var_name)
            .ok_or_else(|| HistogramError::VariableNotFound {
                var: var_name.to_string(),
            })
    }
}

impl DataReader for NetCDFReader {
    fn source_name(&self) -> String {
        self.path.display().to_string()
    }

    fn list_arrays(&self) -> Result<Vec<String>> {
        Ok(self.file.variables().map(|v| v.name().to_string()).collect())
    }

    fn global_attributes(&self) -> Result<Map<String, JsonValue>> {
        let mut attributes = Map::new();
        for attr in self.file.attributes() {
            attributes.insert(attr.name().to_string(), attribute_to_json(attr.value()?));
        }
        Ok(attributes)
    }

    fn get_metadata(&self, array_name: &str) -> Result<DataArrayMetadata> {
        let var = self.variable(array_name)?;

        let mut attributes = Map::new();
        for attr in var.attributes() {
            attributes.insert(attr.name().to_string(), attribute_to_json(attr.value()?));
        }

        Ok(DataArrayMetadata {
            name: array_name.to_string(),
            shape: var.dimensions().iter().map(netcdf::Dimension::len).collect(),
            dtype: numpy_dtype_name(&format!("{:?}", var.vartype())),
            dimensions: var
                .dimensions()
                .iter()
                .map(|d| d.name().to_string())
                .collect(),
            attributes,
        })
    }

    fn read_flat(&self, array_name: &str) -> Result<Vec<f64>> {
        let var = self.variable(array_name)?;

        let shape: Vec<usize> = var
            .dimensions()
            .iter()
            .map(netcdf::Dimension::len)
            .collect();
        let data_vec = var.get_values::<f64, _>(..)?;

        debug!("Loaded '{array_name}' with shape {shape:?}");
        let data = ArrayD::from_shape_vec(shape, data_vec)?;

        let decoder = if self.mask_fill_values {
            CfDecoder::for_variable(&var)
        } else {
            CfDecoder::identity()
        };

        Ok(data.iter().map(|&raw| decoder.decode(raw)).collect())
    }
}

/// Fill-value masking and linear unpacking for one variable
#[derive(Debug, Clone, PartialEq)]
struct CfDecoder {
    missing: Vec<f64>,
    valid_min: Option<f64>,
    valid_max: Option<f64>,
    scale_factor: f64,
    add_offset: f64,
}

impl CfDecoder {
    fn identity() -> Self {
        Self {
            missing: Vec::new(),
            valid_min: None,
            valid_max: None,
            scale_factor: 1.0,
            add_offset: 0.0,
        }
    }

    fn for_variable(var: &Variable<'_>) -> Self {
        let numbers = |name: &str| -> Vec<f64> {
            var.attribute(name)
                .and_then(|attr| attr.value().ok())
                .map(|value| attribute_numbers(&value))
                .unwrap_or_default()
        };

        let mut missing = numbers("_FillValue");
        missing.extend(numbers("missing_value"));

        // valid_min/valid_max take precedence over valid_range
        let range = numbers("valid_range");
        let (range_min, range_max) = match range.as_slice() {
            &[lo, hi] => (Some(lo), Some(hi)),
            _ => (None, None),
        };

        Self {
            missing,
            valid_min: numbers("valid_min").first().copied().or(range_min),
            valid_max: numbers("valid_max").first().copied().or(range_max),
            scale_factor: numbers("scale_factor").first().copied().unwrap_or(1.0),
            add_offset: numbers("add_offset").first().copied().unwrap_or(0.0),
        }
    }

    fn decode(&self, raw: f64) -> f64 {
        if self.missing.iter().any(|&m| m == raw)
            || self.valid_min.is_some_and(|lo| raw < lo)
            || self.valid_max.is_some_and(|hi| raw > hi)
        {
            return f64::NAN;
        }
        raw * self.scale_factor + self.add_offset
    }
}

/// Numeric content of an attribute, empty for strings.
fn attribute_numbers(value: &AttributeValue) -> Vec<f64> {
    match value {
        AttributeValue::Float(v) => vec![f64::from(*v)],
        AttributeValue::Floats(vs) => vs.iter().map(|&v| f64::from(v)).collect(),
        AttributeValue::Double(v) => vec![*v],
        AttributeValue::Doubles(vs) => vs.clone(),
        AttributeValue::Int(v) => vec![f64::from(*v)],
        AttributeValue::Ints(vs) => vs.iter().map(|&v| f64::from(v)).collect(),
        AttributeValue::Short(v) => vec![f64::from(*v)],
        AttributeValue::Shorts(vs) => vs.iter().map(|&v| f64::from(v)).collect(),
        AttributeValue::Uchar(v) => vec![f64::from(*v)],
        AttributeValue::Uchars(vs) => vs.iter().map(|&v| f64::from(v)).collect(),
        AttributeValue::Ushort(v) => vec![f64::from(*v)],
        AttributeValue::Ushorts(vs) => vs.iter().map(|&v| f64::from(v)).collect(),
        AttributeValue::Uint(v) => vec![f64::from(*v)],
        AttributeValue::Uints(vs) => vs.iter().map(|&v| f64::from(v)).collect(),
        _ => Vec::new(),
    }
}

/// Widen an `f32` through its shortest decimal form so `0.1f32` renders as `0.1`.
fn widen_f32(v: f32) -> JsonValue {
    v.to_string()
        .parse::<f64>()
        .map_or(JsonValue::Null, JsonValue::from)
}

fn attribute_to_json(value: AttributeValue) -> JsonValue {
    match value {
        AttributeValue::Str(s) => JsonValue::from(s),
        AttributeValue::Strs(ss) => JsonValue::from(ss),
        AttributeValue::Float(v) => widen_f32(v),
        AttributeValue::Floats(vs) => JsonValue::Array(vs.into_iter().map(widen_f32).collect()),
        AttributeValue::Double(v) => JsonValue::from(v),
        AttributeValue::Doubles(vs) => JsonValue::from(vs),
        AttributeValue::Int(v) => JsonValue::from(v),
        AttributeValue::Ints(vs) => JsonValue::from(vs),
        AttributeValue::Short(v) => JsonValue::from(v),
        AttributeValue::Shorts(vs) => JsonValue::from(vs),
        AttributeValue::Uchar(v) => JsonValue::from(v),
        AttributeValue::Uchars(vs) => JsonValue::from(vs),
        AttributeValue::Ushort(v) => JsonValue::from(v),
        AttributeValue::Ushorts(vs) => JsonValue::from(vs),
        AttributeValue::Uint(v) => JsonValue::from(v),
        AttributeValue::Uints(vs) => JsonValue::from(vs),
        other => JsonValue::String(format!("{other:?}")),
    }
}

/// Maps the debug form of a NetCDF variable type (e.g. `Float(F32)`) to a
/// numpy-style dtype name (`float32`).
#[must_use]
pub fn numpy_dtype_name(vartype_debug: &str) -> String {
    let lower = vartype_debug.to_lowercase();
    const NAMES: [(&str, &str); 10] = [
        ("f32", "float32"),
        ("f64", "float64"),
        ("i8", "int8"),
        ("u8", "uint8"),
        ("i16", "int16"),
        ("u16", "uint16"),
        ("i32", "int32"),
        ("u32", "uint32"),
        ("i64", "int64"),
        ("u64", "uint64"),
    ];
    if let Some((_, name)) = NAMES.iter().find(|(token, _)| lower.contains(token)) {
        return (*name).to_string();
    }
    if lower.contains("string") {
        return "str".to_string();
    }
    if lower.contains("char") {
        return "S1".to_string();
    }
    lower
}
