use crate::collection::Ref;
use crate::common::{FieldValue, GeoPoint, Object, Value};
use crate::errors::{ErrorKind, StoreError, StoreResult};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};

/// Conversion between a Rust type and the application [`Value`] domain.
///
/// Every model stored through a [`crate::collection::Collection`] implements
/// this trait, usually via `#[derive(Convertible)]` from `typestore_derive`.
/// A struct with named fields converts to a [`Value::Object`]; an enum
/// converts to `{ variant, value }`.
pub trait Convertible: Sized {
    fn to_value(&self) -> StoreResult<Value>;
    fn from_value(value: &Value) -> StoreResult<Self>;
}

fn mapping_error(value: &Value, expected: &str) -> StoreError {
    log::error!("Value {} is not {}", value, expected);
    StoreError::new(
        &format!("Value of type {} is not {}", value.type_name(), expected),
        ErrorKind::ObjectMappingError,
    )
}

impl Convertible for bool {
    fn to_value(&self) -> StoreResult<Value> {
        Ok(Value::Bool(*self))
    }

    fn from_value(value: &Value) -> StoreResult<Self> {
        value.as_bool().ok_or_else(|| mapping_error(value, "a bool"))
    }
}

// Integers narrower than i64 always fit; reading back checks the range.
macro_rules! impl_convertible_for_integer {
    ($($t:ty),*) => {
        $(
            impl Convertible for $t {
                fn to_value(&self) -> StoreResult<Value> {
                    Ok(Value::Integer(*self as i64))
                }

                fn from_value(value: &Value) -> StoreResult<Self> {
                    match value {
                        Value::Integer(i) => <$t>::try_from(*i).map_err(|_| {
                            log::error!("Integer {} is out of range for {}", i, stringify!($t));
                            StoreError::new(
                                &format!("Integer {} is out of range for {}", i, stringify!($t)),
                                ErrorKind::ObjectMappingError,
                            )
                        }),
                        _ => Err(mapping_error(value, concat!("a ", stringify!($t)))),
                    }
                }
            }
        )*
    };
}

impl_convertible_for_integer!(i8, i16, i32, i64, u8, u16, u32);

// Integers wider than i64 are stored as i64 and rejected when they do not fit.
macro_rules! impl_convertible_for_wide_integer {
    ($($t:ty),*) => {
        $(
            impl Convertible for $t {
                fn to_value(&self) -> StoreResult<Value> {
                    match i64::try_from(*self) {
                        Ok(i) => Ok(Value::Integer(i)),
                        Err(_) => {
                            log::error!("{} {} does not fit in a 64-bit signed integer", stringify!($t), self);
                            Err(StoreError::new(
                                &format!("{} {} does not fit in a 64-bit signed integer", stringify!($t), self),
                                ErrorKind::EncodingError,
                            ))
                        }
                    }
                }

                fn from_value(value: &Value) -> StoreResult<Self> {
                    match value {
                        Value::Integer(i) => <$t>::try_from(*i).map_err(|_| {
                            log::error!("Integer {} is out of range for {}", i, stringify!($t));
                            StoreError::new(
                                &format!("Integer {} is out of range for {}", i, stringify!($t)),
                                ErrorKind::ObjectMappingError,
                            )
                        }),
                        _ => Err(mapping_error(value, concat!("a ", stringify!($t)))),
                    }
                }
            }
        )*
    };
}

impl_convertible_for_wide_integer!(u64, usize, isize, i128, u128);

impl Convertible for f32 {
    fn to_value(&self) -> StoreResult<Value> {
        Ok(Value::Double(*self as f64))
    }

    /// Reads a double rounded to the nearest `f32`. Finite values outside
    /// the `f32` range are an `ObjectMappingError`; NaN and infinities pass.
    fn from_value(value: &Value) -> StoreResult<Self> {
        let d = value
            .as_f64()
            .ok_or_else(|| mapping_error(value, "an f32"))?;
        if d.is_finite() && d.abs() > f32::MAX as f64 {
            log::error!("Double {} is out of range for f32", d);
            return Err(StoreError::new(
                &format!("Double {} is out of range for f32", d),
                ErrorKind::ObjectMappingError,
            ));
        }
        Ok(d as f32)
    }
}

impl Convertible for f64 {
    fn to_value(&self) -> StoreResult<Value> {
        Ok(Value::Double(*self))
    }

    fn from_value(value: &Value) -> StoreResult<Self> {
        value.as_f64().ok_or_else(|| mapping_error(value, "an f64"))
    }
}

impl Convertible for char {
    fn to_value(&self) -> StoreResult<Value> {
        Ok(Value::String(self.to_string()))
    }

    fn from_value(value: &Value) -> StoreResult<Self> {
        let s = value.as_str().ok_or_else(|| mapping_error(value, "a char"))?;
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(mapping_error(value, "a single character")),
        }
    }
}

impl Convertible for String {
    fn to_value(&self) -> StoreResult<Value> {
        Ok(Value::String(self.clone()))
    }

    fn from_value(value: &Value) -> StoreResult<Self> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| mapping_error(value, "a string"))
    }
}

/// A byte buffer stored as [`Value::Bytes`] rather than an array of integers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bytes(pub Vec<u8>);

impl From<Vec<u8>> for Bytes {
    fn from(value: Vec<u8>) -> Self {
        Bytes(value)
    }
}

impl From<Bytes> for Value {
    fn from(value: Bytes) -> Self {
        Value::Bytes(value.0)
    }
}

impl Convertible for Bytes {
    fn to_value(&self) -> StoreResult<Value> {
        Ok(Value::Bytes(self.0.clone()))
    }

    fn from_value(value: &Value) -> StoreResult<Self> {
        value
            .as_bytes()
            .map(|b| Bytes(b.to_vec()))
            .ok_or_else(|| mapping_error(value, "bytes"))
    }
}

impl<T: Convertible> Convertible for Option<T> {
    fn to_value(&self) -> StoreResult<Value> {
        match self {
            Some(v) => v.to_value(),
            None => Ok(Value::Null),
        }
    }

    fn from_value(value: &Value) -> StoreResult<Self> {
        match value {
            Value::Null => Ok(None),
            _ => Ok(Some(T::from_value(value)?)),
        }
    }
}

impl<T: Convertible> Convertible for Box<T> {
    fn to_value(&self) -> StoreResult<Value> {
        self.as_ref().to_value()
    }

    fn from_value(value: &Value) -> StoreResult<Self> {
        Ok(Box::new(T::from_value(value)?))
    }
}

impl<T: Convertible> Convertible for Vec<T> {
    fn to_value(&self) -> StoreResult<Value> {
        let mut arr = Vec::with_capacity(self.len());
        for item in self {
            arr.push(item.to_value()?);
        }
        Ok(Value::Array(arr))
    }

    fn from_value(value: &Value) -> StoreResult<Self> {
        match value {
            Value::Array(arr) => arr.iter().map(T::from_value).collect(),
            _ => Err(mapping_error(value, "an array")),
        }
    }
}

impl<T: Convertible> Convertible for BTreeMap<String, T> {
    fn to_value(&self) -> StoreResult<Value> {
        let mut obj = Object::new();
        for (key, value) in self {
            obj.put(key.as_str(), value.to_value()?)?;
        }
        Ok(Value::Object(obj))
    }

    fn from_value(value: &Value) -> StoreResult<Self> {
        match value {
            Value::Object(obj) => obj
                .iter()
                .map(|(k, v)| Ok((k.clone(), T::from_value(v)?)))
                .collect(),
            _ => Err(mapping_error(value, "an object")),
        }
    }
}

impl<T: Convertible> Convertible for HashMap<String, T> {
    fn to_value(&self) -> StoreResult<Value> {
        let mut obj = Object::new();
        for (key, value) in self {
            obj.put(key.as_str(), value.to_value()?)?;
        }
        Ok(Value::Object(obj))
    }

    fn from_value(value: &Value) -> StoreResult<Self> {
        match value {
            Value::Object(obj) => obj
                .iter()
                .map(|(k, v)| Ok((k.clone(), T::from_value(v)?)))
                .collect(),
            _ => Err(mapping_error(value, "an object")),
        }
    }
}

impl Convertible for Object {
    fn to_value(&self) -> StoreResult<Value> {
        Ok(Value::Object(self.clone()))
    }

    fn from_value(value: &Value) -> StoreResult<Self> {
        value
            .as_object()
            .cloned()
            .ok_or_else(|| mapping_error(value, "an object"))
    }
}

impl Convertible for Value {
    fn to_value(&self) -> StoreResult<Value> {
        Ok(self.clone())
    }

    fn from_value(value: &Value) -> StoreResult<Self> {
        Ok(value.clone())
    }
}

impl Convertible for DateTime<Utc> {
    fn to_value(&self) -> StoreResult<Value> {
        Ok(Value::Timestamp(*self))
    }

    fn from_value(value: &Value) -> StoreResult<Self> {
        value
            .as_timestamp()
            .copied()
            .ok_or_else(|| mapping_error(value, "a timestamp"))
    }
}

impl Convertible for GeoPoint {
    fn to_value(&self) -> StoreResult<Value> {
        Ok(Value::GeoPoint(*self))
    }

    fn from_value(value: &Value) -> StoreResult<Self> {
        value
            .as_geo_point()
            .copied()
            .ok_or_else(|| mapping_error(value, "a geo point"))
    }
}

impl Convertible for FieldValue {
    fn to_value(&self) -> StoreResult<Value> {
        Ok(Value::Sentinel(self.clone()))
    }

    fn from_value(value: &Value) -> StoreResult<Self> {
        value
            .as_sentinel()
            .cloned()
            .ok_or_else(|| mapping_error(value, "a sentinel"))
    }
}

impl<T> Convertible for Ref<T> {
    fn to_value(&self) -> StoreResult<Value> {
        Ok(Value::Reference(self.as_raw()))
    }

    fn from_value(value: &Value) -> StoreResult<Self> {
        value
            .as_reference()
            .map(|raw| raw.typed::<T>())
            .ok_or_else(|| mapping_error(value, "a reference"))
    }
}

/// Converts a value to `T`, as used by derived implementations.
pub fn from_value<T: Convertible>(value: &Value) -> StoreResult<T> {
    T::from_value(value)
}

/// Converts `data` to a value.
pub fn to_value<T: Convertible>(data: &T) -> StoreResult<Value> {
    data.to_value()
}

/// Converts `data` to an [`Object`], failing if it does not convert to one.
pub fn to_object<T: Convertible>(data: &T) -> StoreResult<Object> {
    match data.to_value()? {
        Value::Object(obj) => Ok(obj),
        other => {
            log::error!("Model converted to {} instead of an object", other.type_name());
            Err(StoreError::new(
                &format!(
                    "Model converted to {} instead of an object",
                    other.type_name()
                ),
                ErrorKind::ObjectMappingError,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::Collection;
    use crate::obj;
    use chrono::TimeZone;

    #[test]
    fn test_integer_round_trip() {
        assert_eq!(i32::from_value(&42i32.to_value().unwrap()).unwrap(), 42);
        assert_eq!(u8::from_value(&Value::Integer(255)).unwrap(), 255);
    }

    #[test]
    fn test_integer_out_of_range_on_read() {
        let err = u8::from_value(&Value::Integer(256)).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ObjectMappingError);
    }

    #[test]
    fn test_wide_integer_out_of_range_on_write() {
        let err = u64::MAX.to_value().unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::EncodingError);
        assert_eq!(7u64.to_value().unwrap(), Value::Integer(7));
        assert_eq!(i128::from_value(&Value::Integer(-3)).unwrap(), -3);
    }

    #[test]
    fn test_float_reads_integer() {
        assert_eq!(f64::from_value(&Value::Integer(2)).unwrap(), 2.0);
    }

    #[test]
    fn test_f32_range_on_read() {
        assert_eq!(f32::from_value(&Value::Double(1.5)).unwrap(), 1.5);
        assert!(f32::from_value(&Value::Double(f64::NAN)).unwrap().is_nan());
        assert_eq!(
            f32::from_value(&Value::Double(f64::INFINITY)).unwrap(),
            f32::INFINITY
        );
        let err = f32::from_value(&Value::Double(1e300)).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ObjectMappingError);
        assert!(f32::from_value(&Value::Double(-1e300)).is_err());
    }

    #[test]
    fn test_char() {
        assert_eq!(char::from_value(&'x'.to_value().unwrap()).unwrap(), 'x');
        assert!(char::from_value(&Value::from("xy")).is_err());
    }

    #[test]
    fn test_option() {
        assert_eq!(Option::<String>::from_value(&Value::Null).unwrap(), None);
        assert_eq!(
            Option::<String>::from_value(&Value::from("a")).unwrap(),
            Some("a".to_string())
        );
        assert_eq!(None::<i32>.to_value().unwrap(), Value::Null);
    }

    #[test]
    fn test_vec_and_bytes() {
        let v = vec![1i64, 2, 3];
        assert_eq!(Vec::<i64>::from_value(&v.to_value().unwrap()).unwrap(), v);

        let bytes = Bytes(vec![0xde, 0xad]);
        assert_eq!(bytes.to_value().unwrap(), Value::Bytes(vec![0xde, 0xad]));
        assert_eq!(Bytes::from_value(&Value::Bytes(vec![1])).unwrap(), Bytes(vec![1]));
    }

    #[test]
    fn test_maps() {
        let mut map = BTreeMap::new();
        map.insert("a".to_string(), 1i32);
        let value = map.to_value().unwrap();
        assert_eq!(value, Value::Object(obj! { a: 1 }));
        assert_eq!(BTreeMap::<String, i32>::from_value(&value).unwrap(), map);

        let hash: HashMap<String, i32> = HashMap::from_value(&value).unwrap();
        assert_eq!(hash.get("a"), Some(&1));
    }

    #[test]
    fn test_timestamp_and_geo_point() {
        let ts = Utc.with_ymd_and_hms(2020, 5, 6, 7, 8, 9).unwrap();
        assert_eq!(DateTime::<Utc>::from_value(&ts.to_value().unwrap()).unwrap(), ts);

        let point = GeoPoint::new(1.0, 2.0).unwrap();
        assert_eq!(GeoPoint::from_value(&point.to_value().unwrap()).unwrap(), point);
    }

    #[test]
    fn test_reference() {
        let users: Collection<Object> = Collection::new("users").unwrap();
        let r = users.doc("u1");
        let value = r.to_value().unwrap();
        assert_eq!(Ref::<Object>::from_value(&value).unwrap(), r);
    }

    #[test]
    fn test_mismatch_is_mapping_error() {
        let err = String::from_value(&Value::Integer(1)).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ObjectMappingError);
    }

    #[test]
    fn test_to_object_rejects_scalars() {
        assert!(to_object(&obj! { a: 1 }).is_ok());
        let err = to_object(&5i32).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ObjectMappingError);
    }
}
