use crate::common::Value;
use std::fmt::{Display, Formatter};

/// A numeric operand, as used by [`FieldValue::Increment`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Number {
    Integer(i64),
    Double(f64),
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Integer(value)
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Number::Integer(value as i64)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Double(value)
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Double(d) => write!(f, "{}", d),
        }
    }
}

/// Write-time commands that stand in for a value.
///
/// A sentinel is placed in the data of a `set` or `update` like any other
/// value. The codec turns it into the transport's native command, which the
/// store resolves while applying the write.
///
/// | Sentinel | Effect on the target field |
/// |---|---|
/// | `Delete` | removes the field (merge sets and updates only) |
/// | `ServerTimestamp` | the store's commit time |
/// | `Increment(n)` | adds `n` to the current number |
/// | `ArrayUnion(v)` | appends the elements of `v` not already present |
/// | `ArrayRemove(v)` | removes every element equal to one in `v` |
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldValue {
    Delete,
    ServerTimestamp,
    Increment(Number),
    ArrayUnion(Vec<Value>),
    ArrayRemove(Vec<Value>),
}

impl FieldValue {
    pub fn name(&self) -> &'static str {
        match self {
            FieldValue::Delete => "delete",
            FieldValue::ServerTimestamp => "serverTimestamp",
            FieldValue::Increment(_) => "increment",
            FieldValue::ArrayUnion(_) => "arrayUnion",
            FieldValue::ArrayRemove(_) => "arrayRemove",
        }
    }
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Increment(n) => write!(f, "{}({})", self.name(), n),
            _ => write!(f, "{}()", self.name()),
        }
    }
}

/// Removes the field it is assigned to.
pub fn delete_field() -> Value {
    Value::Sentinel(FieldValue::Delete)
}

/// Resolves to the store's commit time.
pub fn server_timestamp() -> Value {
    Value::Sentinel(FieldValue::ServerTimestamp)
}

/// Adds `by` to the field's current numeric value.
pub fn increment<N: Into<Number>>(by: N) -> Value {
    Value::Sentinel(FieldValue::Increment(by.into()))
}

/// Appends each element not already present in the field's array.
pub fn array_union<T: Into<Value>>(elements: Vec<T>) -> Value {
    Value::Sentinel(FieldValue::ArrayUnion(
        elements.into_iter().map(Into::into).collect(),
    ))
}

/// Removes every occurrence of each element from the field's array.
pub fn array_remove<T: Into<Value>>(elements: Vec<T>) -> Value {
    Value::Sentinel(FieldValue::ArrayRemove(
        elements.into_iter().map(Into::into).collect(),
    ))
}
