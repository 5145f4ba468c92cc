//! Row values and path resolution.
//!
//! Rows are open records: any JSON-shaped value. Columns address their cell
//! through a path that is walked one key at a time.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A row of grid data. No schema is enforced beyond the paths columns use.
pub type Row = Value;

/// Path from a row to a cell value.
///
/// Either a dotted string (`"vehicle.number"`) or an explicit list of keys
/// (`["vehicle", "number"]`). Numeric keys index into arrays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnPath {
    Dotted(String),
    Keys(Vec<String>),
}

impl ColumnPath {
    /// Iterate over the path segments.
    pub fn segments(&self) -> Vec<&str> {
        match self {
            Self::Dotted(path) => path.split('.').collect(),
            Self::Keys(keys) => keys.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for ColumnPath {
    fn from(path: &str) -> Self {
        Self::Dotted(path.to_string())
    }
}

impl From<String> for ColumnPath {
    fn from(path: String) -> Self {
        Self::Dotted(path)
    }
}

impl From<Vec<String>> for ColumnPath {
    fn from(keys: Vec<String>) -> Self {
        Self::Keys(keys)
    }
}

impl From<&[&str]> for ColumnPath {
    fn from(keys: &[&str]) -> Self {
        Self::Keys(keys.iter().map(|k| k.to_string()).collect())
    }
}

impl fmt::Display for ColumnPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dotted(path) => f.write_str(path),
            Self::Keys(keys) => f.write_str(&keys.join(".")),
        }
    }
}

/// Walk `row` along `path`.
///
/// Returns `None` as soon as an intermediate key is missing or the current
/// value cannot be indexed.
pub fn resolve<'a>(row: &'a Row, path: &ColumnPath) -> Option<&'a Value> {
    path.segments()
        .into_iter()
        .try_fold(row, |current, key| match current {
            Value::Object(map) => map.get(key),
            Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
}

/// Whether a resolved value can be compared directly (string, number, bool).
///
/// Missing values, `null`, objects and arrays are not.
pub fn is_primitive(value: Option<&Value>) -> bool {
    matches!(
        value,
        Some(Value::String(_) | Value::Number(_) | Value::Bool(_))
    )
}

/// Plain string form of a raw value.
///
/// `null` becomes the empty string, arrays join their items with commas and
/// objects are written as compact JSON.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(value_text).collect::<Vec<_>>().join(","),
        Value::Object(_) => value.to_string(),
    }
}

/// String form of an optional raw value; missing values become empty.
pub fn optional_text(value: Option<&Value>) -> String {
    value.map(value_text).unwrap_or_default()
}
