//! FILENAME: core/report-engine/src/value.rs
//! Field values - what a registry accessor reads out of a report row.
//!
//! Rows are heterogeneous (pursuits, land comps, ...), so the engine only
//! ever sees the loosely typed `FieldValue`. The coercions here are the
//! single place that decides how text compares to numbers, how blanks
//! behave and how a value is turned into a group key.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A value extracted from a report row (or supplied by a filter).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Boolean(bool),
}

impl FieldValue {
    /// True for values that carry no data: empty, empty text, or NaN.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Empty => true,
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Number(n) => n.is_nan(),
            FieldValue::Boolean(_) => false,
        }
    }

    /// Numeric coercion. Empty and blank text are 0, booleans are 0/1,
    /// text that does not parse is NaN.
    pub fn to_number(&self) -> f64 {
        match self {
            FieldValue::Empty => 0.0,
            FieldValue::Number(n) => *n,
            FieldValue::Boolean(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            FieldValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse::<f64>().unwrap_or(f64::NAN)
                }
            }
        }
    }

    /// The number this value contributes to an aggregate, if any.
    pub fn as_aggregate_input(&self) -> Option<f64> {
        if self.is_blank() {
            return None;
        }
        let n = self.to_number();
        if n.is_nan() {
            None
        } else {
            Some(n)
        }
    }

    /// String coercion used for equality filters and group keys.
    pub fn to_display_string(&self) -> String {
        match self {
            FieldValue::Empty => String::new(),
            FieldValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{:.0}", n)
                } else {
                    format!("{}", n)
                }
            }
            FieldValue::Text(s) => s.clone(),
            FieldValue::Boolean(b) => b.to_string(),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<Option<f64>> for FieldValue {
    fn from(n: Option<f64>) -> Self {
        n.map(FieldValue::Number).unwrap_or(FieldValue::Empty)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Boolean(b)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<Option<&str>> for FieldValue {
    fn from(s: Option<&str>) -> Self {
        s.map(FieldValue::from).unwrap_or(FieldValue::Empty)
    }
}

impl From<Option<String>> for FieldValue {
    fn from(s: Option<String>) -> Self {
        s.map(FieldValue::Text).unwrap_or(FieldValue::Empty)
    }
}

/// Locale-like text ordering: case-insensitive first, then ordinal so the
/// result is total and deterministic.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Compares two non-blank values: numerically when both are numbers,
/// otherwise by their string form.
pub fn compare_values(a: &FieldValue, b: &FieldValue) -> Ordering {
    match (a, b) {
        (FieldValue::Number(x), FieldValue::Number(y)) => {
            x.partial_cmp(y).unwrap_or(Ordering::Equal)
        }
        _ => locale_compare(&a.to_display_string(), &b.to_display_string()),
    }
}
