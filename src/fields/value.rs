//! Tagged field values
//!
//! Every field carries one of five value kinds. The typed setters on
//! `Timer` and `Tracker` are thin wrappers that pick the kind implied by
//! their parameter type; the generic field API accepts any of them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single field value with its kind tag.
///
/// `Display` renders the canonical string representation returned by
/// `get_field`.
///
/// Untagged deserialization tries variants in declaration order, so
/// `Double` sits before `Float`: persisted floats always parse as f64 and
/// must land in the lossless variant. `Float` is only produced by the
/// typed f32 setters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Str(String),
    Int(i64),
    Double(f64),
    Float(f32),
    Bool(bool),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Str(v) => f.write_str(v),
            FieldValue::Int(v) => write!(f, "{v}"),
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Double(v) => write!(f, "{v}"),
            FieldValue::Bool(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Str(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Str(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<f32> for FieldValue {
    fn from(v: f32) -> Self {
        FieldValue::Float(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Double(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}
