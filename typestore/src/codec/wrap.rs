use crate::collection::RawRef;
use crate::common::{GeoPoint, Object, Value};
use crate::errors::{ErrorKind, StoreError, StoreResult};
use crate::transport::{WireMap, WireTimestamp, WireValue};
use chrono::DateTime;

/// Converts a stored wire value back to the application domain.
///
/// This is the inverse of [`unwrap_data`](crate::codec::unwrap_data) for
/// every value a transport can store. Pointers come back as untyped
/// [`RawRef`]s; a model field declared as `Ref<T>` types them on read.
///
/// # Errors
///
/// Returns an `EncodingError` for a transform, which can never be stored,
/// and for a timestamp or geo point outside the representable range.
pub fn wrap_data(value: &WireValue) -> StoreResult<Value> {
    match value {
        WireValue::Null => Ok(Value::Null),
        WireValue::Boolean(b) => Ok(Value::Bool(*b)),
        WireValue::Integer(i) => Ok(Value::Integer(*i)),
        WireValue::Double(d) => Ok(Value::Double(*d)),
        WireValue::String(s) => Ok(Value::String(s.clone())),
        WireValue::Bytes(b) => Ok(Value::Bytes(b.clone())),
        WireValue::Timestamp(ts) => wrap_timestamp(ts),
        WireValue::GeoPoint {
            latitude,
            longitude,
        } => match GeoPoint::new(*latitude, *longitude) {
            Ok(point) => Ok(Value::GeoPoint(point)),
            Err(e) => {
                log::error!("Stored geo point is out of range: {}", e);
                Err(StoreError::new_with_cause(
                    "Stored geo point is out of range",
                    ErrorKind::EncodingError,
                    e,
                ))
            }
        },
        WireValue::Reference(pointer) => {
            Ok(Value::Reference(RawRef::new(pointer.collection(), pointer.id())))
        }
        WireValue::Array(items) => items
            .iter()
            .map(wrap_data)
            .collect::<StoreResult<Vec<_>>>()
            .map(Value::Array),
        WireValue::Map(map) => wrap_object(map).map(Value::Object),
        WireValue::Transform(transform) => {
            log::error!("Cannot read a field transform as data: {:?}", transform);
            Err(StoreError::new(
                "Cannot read a field transform as data",
                ErrorKind::EncodingError,
            ))
        }
    }
}

/// Converts a stored document or nested map to an [`Object`].
pub fn wrap_object(map: &WireMap) -> StoreResult<Object> {
    let mut obj = Object::new();
    for (key, value) in map {
        obj.put(key.as_str(), wrap_data(value)?)?;
    }
    Ok(obj)
}

fn wrap_timestamp(ts: &WireTimestamp) -> StoreResult<Value> {
    match DateTime::from_timestamp(ts.seconds, ts.nanos) {
        Some(dt) => Ok(Value::Timestamp(dt)),
        None => {
            log::error!("Stored timestamp {}.{} is out of range", ts.seconds, ts.nanos);
            Err(StoreError::new(
                &format!("Stored timestamp {}.{} is out of range", ts.seconds, ts.nanos),
                ErrorKind::EncodingError,
            ))
        }
    }
}
