use crate::collection::RawRef;
use crate::common::{FieldValue, GeoPoint, Object};
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::{Display, Formatter};

/// Compare two floats for equality, treating NaN as equal to itself so that
/// values survive a codec round trip unchanged.
#[inline]
fn num_eq_float(a: f64, b: f64) -> bool {
    if a.is_nan() && b.is_nan() {
        true
    } else {
        a == b
    }
}

/// A value in the application's data domain.
///
/// This is what models convert to (see [`crate::common::Convertible`]) and
/// what callers put in update data. The codec maps it to the transport's wire
/// domain and back; every variant except [`Value::Sentinel`] survives that
/// round trip unchanged.
///
/// # Variants
/// - `Null`, `Bool`, `Integer`, `Double`, `String`, `Bytes`: scalars
/// - `Timestamp`: a UTC instant with nanosecond precision
/// - `GeoPoint`: a latitude/longitude pair
/// - `Reference`: a pointer to another document
/// - `Array`, `Object`: containers
/// - `Sentinel`: a write-time command such as "delete this field"
///
/// # Usage
/// ```rust
/// use typestore::common::Value;
/// use typestore::obj;
///
/// let v: Value = 42.into();
/// assert_eq!(v.as_i64(), Some(42));
///
/// let profile = obj! { name: "Tati", tags: ["admin", "ops"] };
/// assert_eq!(profile.get("name"), Some(&Value::from("Tati")));
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
    Timestamp(DateTime<Utc>),
    GeoPoint(GeoPoint),
    Reference(RawRef),
    Array(Vec<Value>),
    Object(Object),
    Sentinel(FieldValue),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => num_eq_float(*a, *b),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Value::GeoPoint(a), Value::GeoPoint(b)) => a == b,
            (Value::Reference(a), Value::Reference(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Sentinel(a), Value::Sentinel(b)) => a == b,
            _ => false,
        }
    }
}

impl Value {
    /// A short name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Double(_) => "double",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Timestamp(_) => "timestamp",
            Value::GeoPoint(_) => "geo point",
            Value::Reference(_) => "reference",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Sentinel(_) => "sentinel",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_sentinel(&self) -> bool {
        matches!(self, Value::Sentinel(_))
    }

    /// Returns `true` if this value or anything nested in it is a sentinel.
    pub fn contains_sentinel(&self) -> bool {
        match self {
            Value::Sentinel(_) => true,
            Value::Array(items) => items.iter().any(Value::contains_sentinel),
            Value::Object(obj) => obj.values().any(Value::contains_sentinel),
            _ => false,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a float; integers are widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(d) => Some(*d),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::Timestamp(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_geo_point(&self) -> Option<&GeoPoint> {
        match self {
            Value::GeoPoint(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&RawRef> {
        match self {
            Value::Reference(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_sentinel(&self) -> Option<&FieldValue> {
        match self {
            Value::Sentinel(s) => Some(s),
            _ => None,
        }
    }

    pub(crate) fn write_json(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Double(d) => write!(f, "{}", d),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Value::Timestamp(t) => {
                write!(f, "\"{}\"", t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Value::GeoPoint(p) => write!(f, "{}", p),
            Value::Reference(r) => write!(f, "ref({})", r),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    item.write_json(f)?;
                }
                write!(f, "]")
            }
            Value::Object(obj) => write!(f, "{}", obj),
            Value::Sentinel(s) => write!(f, "{}", s),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.write_json(f)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Value::Integer(value as i64)
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Double(value as f64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::String(value.clone())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Timestamp(value)
    }
}

impl From<GeoPoint> for Value {
    fn from(value: GeoPoint) -> Self {
        Value::GeoPoint(value)
    }
}

impl From<RawRef> for Value {
    fn from(value: RawRef) -> Self {
        Value::Reference(value)
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Value::Object(value)
    }
}

impl From<FieldValue> for Value {
    fn from(value: FieldValue) -> Self {
        Value::Sentinel(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::Array(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

/// A macro to create a [`Value`] from an expression.
///
/// ```rust
/// use typestore::common::Value;
/// use typestore::val;
///
/// assert_eq!(val!(42), Value::Integer(42));
/// assert_eq!(val!("hello"), Value::String("hello".to_string()));
/// ```
#[macro_export]
macro_rules! val {
    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}
