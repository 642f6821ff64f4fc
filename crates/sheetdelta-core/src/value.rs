//! Scalar cell values and their canonical text form.
//!
//! Every comparison made by the differs is an exact comparison of the
//! strings produced here, so the rules below are fixed:
//!
//! | value | text |
//! |---|---|
//! | absent | `""` |
//! | `Text(s)` | `s`, untouched |
//! | `Int(i)` | decimal digits |
//! | `Float(f)` | `"10"` for integral values below 1e15, otherwise shortest round-trip (`"3.14"`) |
//! | `Bool(b)` | `"True"` / `"False"` |
//! | `DateTime(s)` / `Error(s)` | `s` as rendered by the loader |

use std::fmt;

use serde::{Deserialize, Serialize};

/// Largest magnitude printed without a fractional part.
///
/// Above this, `f64` can no longer represent every integer exactly and the
/// shortest round-trip form is used instead.
const INTEGRAL_FLOAT_LIMIT: f64 = 1e15;

/// A raw scalar as handed over by a snapshot loader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    /// Text content
    Text(String),
    /// Integer number
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Boolean
    Bool(bool),
    /// Date, time or duration, already rendered by the loader
    DateTime(String),
    /// Spreadsheet error value (e.g. `#DIV/0!`), already rendered by the loader
    Error(String),
}

impl CellValue {
    /// Canonical text form of this value
    pub fn normalized(&self) -> String {
        match self {
            CellValue::Text(s) | CellValue::DateTime(s) | CellValue::Error(s) => s.clone(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Float(f) => format_float(*f),
            CellValue::Bool(true) => "True".to_string(),
            CellValue::Bool(false) => "False".to_string(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalized())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

/// Normalize a possibly absent value.
///
/// Absence and the empty string collapse to the same `""`.
pub fn normalize(value: Option<&CellValue>) -> String {
    value.map(CellValue::normalized).unwrap_or_default()
}

fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < INTEGRAL_FLOAT_LIMIT {
        // `{:.0}` would print "-0" for negative zero
        if f == 0.0 {
            return "0".to_string();
        }
        format!("{:.0}", f)
    } else {
        f.to_string()
    }
}
