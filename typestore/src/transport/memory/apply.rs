use crate::common::FIELD_SEPARATOR;
use crate::errors::{ErrorKind, StoreError, StoreResult};
use crate::transport::{SetMode, UpdatePayload, WireMap, WireTimestamp, WireTransform, WireValue};

/// Computes the document stored after a set.
pub(crate) fn apply_set(
    existing: Option<&WireMap>,
    data: &WireMap,
    mode: SetMode,
    now: WireTimestamp,
) -> StoreResult<WireMap> {
    match mode {
        SetMode::Replace => {
            if data.values().any(WireValue::contains_delete) {
                log::error!("delete() cannot be used in a set without merge");
                return Err(StoreError::new(
                    "delete() cannot be used in a set without merge",
                    ErrorKind::TransportError,
                ));
            }
            resolve_map(data, None, now)
        }
        SetMode::Merge => {
            let mut target = existing.cloned().unwrap_or_default();
            merge_into(&mut target, data, now)?;
            Ok(target)
        }
    }
}

/// Computes the document stored after an update. The document must exist.
pub(crate) fn apply_update(
    path: &str,
    existing: Option<&WireMap>,
    payload: &UpdatePayload,
    now: WireTimestamp,
) -> StoreResult<WireMap> {
    let Some(existing) = existing else {
        log::error!("No document to update: {}", path);
        return Err(StoreError::new(
            &format!("No document to update: {}", path),
            ErrorKind::NotFound,
        ));
    };

    let mut target = existing.clone();
    match payload {
        UpdatePayload::FieldPaths(fields) => {
            for (dotted, value) in fields {
                let segments: Vec<&str> = dotted.split(FIELD_SEPARATOR).collect();
                if segments.iter().any(|s| s.is_empty()) {
                    log::error!("Invalid field path {} in update of {}", dotted, path);
                    return Err(StoreError::new(
                        &format!("Invalid field path {} in update of {}", dotted, path),
                        ErrorKind::TransportError,
                    ));
                }
                set_path(&mut target, &segments, value, now)?;
            }
        }
        UpdatePayload::Nested(fields) => {
            for (key, value) in fields {
                match resolve(value, target.get(key), now)? {
                    Some(resolved) => {
                        target.insert(key.clone(), resolved);
                    }
                    None => {
                        target.remove(key);
                    }
                }
            }
        }
    }
    Ok(target)
}

/// Resolves `value` against the field's current value. `None` means the
/// field is to be removed.
fn resolve(
    value: &WireValue,
    current: Option<&WireValue>,
    now: WireTimestamp,
) -> StoreResult<Option<WireValue>> {
    match value {
        WireValue::Transform(transform) => apply_transform(transform, current, now),
        WireValue::Map(map) => {
            let current = current.and_then(WireValue::as_map);
            Ok(Some(WireValue::Map(resolve_map(map, current, now)?)))
        }
        other => Ok(Some(other.clone())),
    }
}

fn resolve_map(
    data: &WireMap,
    current: Option<&WireMap>,
    now: WireTimestamp,
) -> StoreResult<WireMap> {
    let mut result = WireMap::new();
    for (key, value) in data {
        let current_value = current.and_then(|c| c.get(key));
        if let Some(resolved) = resolve(value, current_value, now)? {
            result.insert(key.clone(), resolved);
        }
    }
    Ok(result)
}

fn merge_into(target: &mut WireMap, data: &WireMap, now: WireTimestamp) -> StoreResult<()> {
    for (key, value) in data {
        match (target.get_mut(key), value) {
            (Some(WireValue::Map(existing)), WireValue::Map(incoming)) => {
                merge_into(existing, incoming, now)?;
            }
            _ => match resolve(value, target.get(key), now)? {
                Some(resolved) => {
                    target.insert(key.clone(), resolved);
                }
                None => {
                    target.remove(key);
                }
            },
        }
    }
    Ok(())
}

fn set_path(
    target: &mut WireMap,
    segments: &[&str],
    value: &WireValue,
    now: WireTimestamp,
) -> StoreResult<()> {
    let Some((key, rest)) = segments.split_first() else {
        return Ok(());
    };

    if rest.is_empty() {
        match resolve(value, target.get(*key), now)? {
            Some(resolved) => {
                target.insert(key.to_string(), resolved);
            }
            None => {
                target.remove(*key);
            }
        }
        return Ok(());
    }

    // a delete never creates the objects on its way
    if matches!(value, WireValue::Transform(WireTransform::Delete)) {
        if let Some(WireValue::Map(nested)) = target.get_mut(*key) {
            set_path(nested, rest, value, now)?;
        }
        return Ok(());
    }

    let entry = target
        .entry(key.to_string())
        .or_insert_with(|| WireValue::Map(WireMap::new()));
    if !matches!(entry, WireValue::Map(_)) {
        *entry = WireValue::Map(WireMap::new());
    }
    if let WireValue::Map(nested) = entry {
        set_path(nested, rest, value, now)?;
    }
    Ok(())
}

fn apply_transform(
    transform: &WireTransform,
    current: Option<&WireValue>,
    now: WireTimestamp,
) -> StoreResult<Option<WireValue>> {
    match transform {
        WireTransform::Delete => Ok(None),
        WireTransform::ServerTimestamp => Ok(Some(WireValue::Timestamp(now))),
        WireTransform::Increment(operand) => {
            let result = match (current, operand.as_ref()) {
                (Some(WireValue::Integer(a)), WireValue::Integer(b)) => {
                    WireValue::Integer(a.saturating_add(*b))
                }
                (Some(WireValue::Integer(a)), WireValue::Double(b)) => {
                    WireValue::Double(*a as f64 + b)
                }
                (Some(WireValue::Double(a)), WireValue::Integer(b)) => {
                    WireValue::Double(a + *b as f64)
                }
                (Some(WireValue::Double(a)), WireValue::Double(b)) => WireValue::Double(a + b),
                (_, operand @ (WireValue::Integer(_) | WireValue::Double(_))) => operand.clone(),
                (_, other) => {
                    log::error!("increment() operand {:?} is not a number", other);
                    return Err(StoreError::new(
                        "increment() operand is not a number",
                        ErrorKind::TransportError,
                    ));
                }
            };
            Ok(Some(result))
        }
        WireTransform::ArrayUnion(elements) => {
            let mut array = match current {
                Some(WireValue::Array(existing)) => existing.clone(),
                _ => Vec::with_capacity(elements.len()),
            };
            for element in elements {
                if !array.contains(element) {
                    array.push(element.clone());
                }
            }
            Ok(Some(WireValue::Array(array)))
        }
        WireTransform::ArrayRemove(elements) => {
            let mut array = match current {
                Some(WireValue::Array(existing)) => existing.clone(),
                _ => Vec::new(),
            };
            array.retain(|item| !elements.contains(item));
            Ok(Some(WireValue::Array(array)))
        }
    }
}
