//! Typed event parameter values — input-side validation for event params.

use serde_json::Value;
use std::fmt;

use crate::error::{TracelinkError, TracelinkResult};

/// Maximum length, in characters, for parameter keys and string values.
///
/// The core does not truncate or reject longer inputs; the limit is part of
/// the caller's contract with the tracking backend, exposed here for callers
/// that choose to enforce it before building events.
pub const MAX_PARAM_LEN: usize = 50;

/// Largest magnitude at which every whole `f64` is an exact integer (2^53).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A validated event parameter value: string, number, or boolean.
///
/// Built through the typed factories or [`ParamValue::from_dynamic`];
/// immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Number(f64),
    Bool(bool),
}

impl ParamValue {
    pub fn from_string(value: impl Into<String>) -> Self {
        ParamValue::Str(value.into())
    }

    /// Integer and float inputs alike are stored in the numeric slot.
    pub fn from_number(value: f64) -> Self {
        ParamValue::Number(value)
    }

    pub fn from_boolean(value: bool) -> Self {
        ParamValue::Bool(value)
    }

    /// Validate an untyped JSON value at the outermost boundary.
    ///
    /// Accepts strings, numbers (normalized to `f64`), and booleans; any
    /// other shape fails with [`TracelinkError::InvalidParamType`] carrying
    /// the rejected value's textual form. This is the only dynamic entry
    /// point; inside the model everything is already typed.
    pub fn from_dynamic(value: &Value) -> TracelinkResult<Self> {
        match value {
            Value::String(s) => Ok(ParamValue::Str(s.clone())),
            Value::Number(n) => n
                .as_f64()
                .map(ParamValue::Number)
                .ok_or_else(|| TracelinkError::InvalidParamType(n.to_string())),
            Value::Bool(b) => Ok(ParamValue::Bool(*b)),
            other => Err(TracelinkError::InvalidParamType(other.to_string())),
        }
    }

    /// Unwrap to the raw JSON primitive used on the wire. The wrapper exists
    /// for input-side validation only; transport carries plain values.
    pub fn to_transport_value(&self) -> Value {
        match self {
            ParamValue::Str(s) => Value::String(s.clone()),
            ParamValue::Number(n) => number_value(*n),
            ParamValue::Bool(b) => Value::Bool(*b),
        }
    }
}

impl fmt::Display for ParamValue {
    /// Canonical text of the wrapped value. Never fails: a non-finite number
    /// (which has no JSON form) renders as the empty absent marker.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Str(s) => f.write_str(s),
            ParamValue::Number(n) => match number_value(*n) {
                Value::Null => Ok(()),
                value => write!(f, "{value}"),
            },
            ParamValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Whole numbers re-materialize as JSON integers so their canonical text
/// (`1`, not `1.0`) survives the trip through the `f64` slot. Non-finite
/// numbers have no JSON form and map to `Null`, which object serialization
/// omits.
pub(crate) fn number_value(n: f64) -> Value {
    if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}
