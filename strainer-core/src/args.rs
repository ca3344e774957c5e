//! Argument extraction and result conversion.
//!
//! [`FromArg`] turns one positional template argument into a typed
//! parameter; [`IntoFilterResult`] turns whatever an operation returns back
//! into a template value.

use crate::{
    error::{BoxError, CallError},
    value::value_kind,
};
use serde_json::{Map, Number, Value};

/// Extract a typed parameter from a positional argument.
///
/// `value` is `None` when the argument was omitted, which only happens for
/// optional parameters since the arity is checked first.
///
/// Integer parameters (`i64`, `u64`) also accept floats without a fractional
/// part, so `2.0` extracts as `2` while `2.5` is a type mismatch.
pub trait FromArg: Sized {
    /// Whether the parameter may be omitted.
    const OPTIONAL: bool = false;

    /// Convert the argument at 1-based `position`.
    fn from_arg(value: Option<&Value>, position: usize) -> Result<Self, CallError>;
}

fn mismatch(value: Option<&Value>, position: usize, expected: &'static str) -> CallError {
    CallError::argument_type(position, expected, value.map_or("nothing", value_kind))
}

impl FromArg for Value {
    fn from_arg(value: Option<&Value>, _position: usize) -> Result<Self, CallError> {
        Ok(value.cloned().unwrap_or(Value::Null))
    }
}

impl FromArg for String {
    fn from_arg(value: Option<&Value>, position: usize) -> Result<Self, CallError> {
        match value {
            Some(Value::String(s)) => Ok(s.clone()),
            other => Err(mismatch(other, position, "string")),
        }
    }
}

impl FromArg for bool {
    fn from_arg(value: Option<&Value>, position: usize) -> Result<Self, CallError> {
        match value {
            Some(Value::Bool(b)) => Ok(*b),
            other => Err(mismatch(other, position, "boolean")),
        }
    }
}

// A float argument holding a whole number within `range`.
fn integral(value: &Value, range: std::ops::Range<f64>) -> Option<f64> {
    value
        .as_f64()
        .filter(|n| value.is_f64() && n.fract() == 0.0 && range.contains(n))
}

impl FromArg for i64 {
    fn from_arg(value: Option<&Value>, position: usize) -> Result<Self, CallError> {
        value
            .and_then(|v| {
                v.as_i64()
                    .or_else(|| integral(v, i64::MIN as f64..i64::MAX as f64).map(|n| n as i64))
            })
            .ok_or_else(|| mismatch(value, position, "integer"))
    }
}

impl FromArg for u64 {
    fn from_arg(value: Option<&Value>, position: usize) -> Result<Self, CallError> {
        value
            .and_then(|v| {
                v.as_u64()
                    .or_else(|| integral(v, 0.0..u64::MAX as f64).map(|n| n as u64))
            })
            .ok_or_else(|| mismatch(value, position, "unsigned integer"))
    }
}

impl FromArg for f64 {
    fn from_arg(value: Option<&Value>, position: usize) -> Result<Self, CallError> {
        value
            .and_then(Value::as_f64)
            .ok_or_else(|| mismatch(value, position, "number"))
    }
}

impl FromArg for Vec<Value> {
    fn from_arg(value: Option<&Value>, position: usize) -> Result<Self, CallError> {
        match value {
            Some(Value::Array(items)) => Ok(items.clone()),
            other => Err(mismatch(other, position, "array")),
        }
    }
}

impl FromArg for Map<String, Value> {
    fn from_arg(value: Option<&Value>, position: usize) -> Result<Self, CallError> {
        match value {
            Some(Value::Object(map)) => Ok(map.clone()),
            other => Err(mismatch(other, position, "object")),
        }
    }
}

impl<T: FromArg> FromArg for Option<T> {
    const OPTIONAL: bool = true;

    fn from_arg(value: Option<&Value>, position: usize) -> Result<Self, CallError> {
        match value {
            None | Some(Value::Null) => Ok(None),
            Some(v) => T::from_arg(Some(v), position).map(Some),
        }
    }
}

/// Convert an operation's return value into a template value.
///
/// # Default Implementations
///
/// - Plain values (`String`, numbers, `bool`, `Value`, ...) → `Ok(value)`
/// - `f32`/`f64` that are NaN or infinite → [`CallError::Failed`], since a
///   template value cannot hold them
/// - `()` → `Ok(Value::Null)`
/// - `Option<T>` → the inner value or `Value::Null`
/// - `Result<T, E>` → delegates to `T`; an error that is a [`CallError`]
///   stays one, anything else becomes [`CallError::Failed`]
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be returned from a filter",
    label = "missing `IntoFilterResult` implementation",
    note = "Return a `Value`, a primitive, `Option<T>` or `Result<T, E>`."
)]
pub trait IntoFilterResult {
    /// Convert into the call outcome.
    fn into_filter_result(self) -> Result<Value, CallError>;
}

macro_rules! impl_into_filter_result {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl IntoFilterResult for $ty {
                fn into_filter_result(self) -> Result<Value, CallError> {
                    Ok(Value::from(self))
                }
            }
        )+
    };
}

impl_into_filter_result!(
    Value,
    String,
    &'static str,
    bool,
    i32,
    i64,
    u32,
    u64,
    usize,
    Vec<Value>,
    Map<String, Value>,
);

impl IntoFilterResult for f64 {
    fn into_filter_result(self) -> Result<Value, CallError> {
        Number::from_f64(self)
            .map(Value::Number)
            .ok_or_else(|| {
                CallError::Failed(format!("filter returned non-finite number {self}").into())
            })
    }
}

impl IntoFilterResult for f32 {
    fn into_filter_result(self) -> Result<Value, CallError> {
        f64::from(self).into_filter_result()
    }
}

impl IntoFilterResult for () {
    fn into_filter_result(self) -> Result<Value, CallError> {
        Ok(Value::Null)
    }
}

impl<T: IntoFilterResult> IntoFilterResult for Option<T> {
    fn into_filter_result(self) -> Result<Value, CallError> {
        match self {
            Some(inner) => inner.into_filter_result(),
            None => Ok(Value::Null),
        }
    }
}

impl<T, E> IntoFilterResult for Result<T, E>
where
    T: IntoFilterResult,
    E: Into<BoxError>,
{
    fn into_filter_result(self) -> Result<Value, CallError> {
        match self {
            Ok(inner) => inner.into_filter_result(),
            Err(err) => Err(CallError::from(err.into())),
        }
    }
}
