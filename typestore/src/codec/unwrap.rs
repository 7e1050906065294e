use crate::common::{FieldValue, Number, Object, Value};
use crate::errors::{ErrorKind, StoreError, StoreResult};
use crate::transport::{Transport, WireMap, WireTimestamp, WireTransform, WireValue};

/// Which sentinels a conversion accepts at field positions.
///
/// Sentinels are never accepted inside arrays, whatever the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentinelPolicy {
    /// No sentinel may appear.
    Forbidden,
    /// Every sentinel except [`FieldValue::Delete`], as in a replacing set
    /// or a nested object inside an updated field.
    NoDelete,
    /// Every sentinel, as in a merge set or the top-level fields of an
    /// update.
    All,
}

/// Converts an application value to its wire form.
///
/// Scalars map one to one, arrays element-wise and objects key-wise.
/// References become native pointers built by `transport`, and sentinels
/// become wire transforms.
///
/// # Errors
///
/// Returns an `EncodingError` for a sentinel inside an array or a sentinel
/// operand, and whatever `transport` reports for a reference it cannot
/// point to.
pub fn unwrap_data(value: &Value, transport: &Transport) -> StoreResult<WireValue> {
    unwrap_value(value, transport, SentinelPolicy::All)
}

/// Converts an application value to its wire form under `policy`.
pub fn unwrap_value(
    value: &Value,
    transport: &Transport,
    policy: SentinelPolicy,
) -> StoreResult<WireValue> {
    match value {
        Value::Null => Ok(WireValue::Null),
        Value::Bool(b) => Ok(WireValue::Boolean(*b)),
        Value::Integer(i) => Ok(WireValue::Integer(*i)),
        Value::Double(d) => Ok(WireValue::Double(*d)),
        Value::String(s) => Ok(WireValue::String(s.clone())),
        Value::Bytes(b) => Ok(WireValue::Bytes(b.clone())),
        Value::Timestamp(ts) => Ok(WireValue::Timestamp(WireTimestamp {
            seconds: ts.timestamp(),
            nanos: ts.timestamp_subsec_nanos(),
        })),
        Value::GeoPoint(point) => Ok(WireValue::GeoPoint {
            latitude: point.latitude(),
            longitude: point.longitude(),
        }),
        Value::Reference(raw) => {
            let pointer = transport.pointer(raw.collection_path(), raw.id())?;
            Ok(WireValue::Reference(pointer))
        }
        Value::Array(items) => {
            let mut array = Vec::with_capacity(items.len());
            for item in items {
                array.push(unwrap_array_element(item, transport)?);
            }
            Ok(WireValue::Array(array))
        }
        Value::Object(obj) => Ok(WireValue::Map(unwrap_object(obj, transport, policy)?)),
        Value::Sentinel(sentinel) => unwrap_sentinel(sentinel, transport, policy),
    }
}

/// Converts every field of `obj` under `policy`.
pub fn unwrap_object(
    obj: &Object,
    transport: &Transport,
    policy: SentinelPolicy,
) -> StoreResult<WireMap> {
    let mut map = WireMap::new();
    for (key, value) in obj.iter() {
        map.insert(key.clone(), unwrap_value(value, transport, policy)?);
    }
    Ok(map)
}

fn unwrap_array_element(item: &Value, transport: &Transport) -> StoreResult<WireValue> {
    if let Value::Sentinel(sentinel) = item {
        log::error!("{} cannot be used inside an array", sentinel);
        return Err(StoreError::new(
            &format!("{} cannot be used inside an array", sentinel),
            ErrorKind::EncodingError,
        ));
    }
    unwrap_value(item, transport, SentinelPolicy::Forbidden)
}

fn unwrap_sentinel(
    sentinel: &FieldValue,
    transport: &Transport,
    policy: SentinelPolicy,
) -> StoreResult<WireValue> {
    match (policy, sentinel) {
        (SentinelPolicy::Forbidden, _) => {
            log::error!("{} is not allowed here", sentinel);
            return Err(StoreError::new(
                &format!("{} is not allowed here", sentinel),
                ErrorKind::EncodingError,
            ));
        }
        (SentinelPolicy::NoDelete, FieldValue::Delete) => {
            log::error!("delete() cannot be used inside a value that replaces its field");
            return Err(StoreError::new(
                "delete() cannot be used inside a value that replaces its field",
                ErrorKind::EncodingError,
            ));
        }
        _ => {}
    }

    let transform = match sentinel {
        FieldValue::Delete => WireTransform::Delete,
        FieldValue::ServerTimestamp => WireTransform::ServerTimestamp,
        FieldValue::Increment(Number::Integer(i)) => {
            WireTransform::Increment(Box::new(WireValue::Integer(*i)))
        }
        FieldValue::Increment(Number::Double(d)) => {
            WireTransform::Increment(Box::new(WireValue::Double(*d)))
        }
        FieldValue::ArrayUnion(elements) => {
            WireTransform::ArrayUnion(unwrap_operands(elements, transport)?)
        }
        FieldValue::ArrayRemove(elements) => {
            WireTransform::ArrayRemove(unwrap_operands(elements, transport)?)
        }
    };
    Ok(WireValue::Transform(transform))
}

fn unwrap_operands(elements: &[Value], transport: &Transport) -> StoreResult<Vec<WireValue>> {
    elements
        .iter()
        .map(|element| unwrap_array_element(element, transport))
        .collect()
}
