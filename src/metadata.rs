//! Variable metadata rendering
//!
//! Turns [`DataArrayMetadata`] into the ordered `key: value` lines of a
//! report's "Variable info" block. Attribute semantics are never interpreted,
//! values are only formatted.

use crate::data_source::DataArrayMetadata;
use serde_json::Value as JsonValue;

/// Ordered key/value lines describing a variable.
///
/// Attributes come first in definition order, followed by `shape`, `dtype`
/// and `dimensions`.
#[must_use]
pub fn variable_info(meta: &DataArrayMetadata) -> Vec<(String, String)> {
    let mut info: Vec<(String, String)> = meta
        .attributes
        .iter()
        .map(|(k, v)| (k.clone(), render_value(v)))
        .collect();

    info.push(("shape".to_string(), format_tuple(meta.shape.iter().map(ToString::to_string))));
    info.push(("dtype".to_string(), meta.dtype.clone()));
    info.push((
        "dimensions".to_string(),
        format_tuple(meta.dimensions.iter().map(|d| format!("'{d}'"))),
    ));
    info
}

/// Formats an attribute value for display.
///
/// Strings are written verbatim and arrays as `[a, b, c]`. Numbers use their
/// shortest round-trip form, so `1e20` and `-999.0` print as shown rather than
/// in numpy's `1e+20` / `[  0 500]` style.
#[must_use]
pub fn render_value(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Null => "nan".to_string(),
        JsonValue::Array(items) => {
            let parts: Vec<String> = items.iter().map(render_value).collect();
            format!("[{}]", parts.join(", "))
        }
        JsonValue::Object(_) => value.to_string(),
    }
}

/// `(a, b)` with a trailing comma for 1-tuples.
fn format_tuple<I: Iterator<Item = String>>(items: I) -> String {
    let parts: Vec<String> = items.collect();
    match parts.len() {
        1 => format!("({},)", parts[0]),
        _ => format!("({})", parts.join(", ")),
    }
}

/// Shape as `4 × 3 × 2`, used in progress output.
#[must_use]
pub fn format_shape(shape: &[usize]) -> String {
    if shape.is_empty() {
        return "scalar".to_string();
    }
    shape
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" × ")
}
