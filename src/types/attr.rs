//! Scalar attribute values carried by records and variables.

use serde::{Deserialize, Serialize};

/// A numeric attribute value.
/// This is an alias of the Number type from serde_json, which is an enum that can represent
/// integers and floating point numbers.
/// The number type is an enum over i64, u64 and f64, with the additional constraint that floating
/// point numbers must be finite (not positive or negative infinity or NaN).
pub type DValue = serde_json::Number;

/// A scalar attribute value attached to a record or a variable.
///
/// Attributes are free-form descriptive metadata. They are carried through
/// aggregation unchanged, so only the representation matters here.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// A textual attribute
    String(String),

    /// A numeric attribute
    Number(DValue),
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::String(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::String(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Number(value.into())
    }
}

impl From<u64> for AttrValue {
    fn from(value: u64) -> Self {
        AttrValue::Number(value.into())
    }
}
