use crate::codec::{unwrap_object, unwrap_value, SentinelPolicy};
use crate::common::{Object, Value};
use crate::errors::{ErrorKind, StoreError, StoreResult};
use crate::transport::{Transport, UpdatePayload, WireMap, WireValue};
use crate::update::FieldUpdate;
use indexmap::IndexMap;

/// The data of a partial update.
///
/// `Fields` is the list form: entries apply in order, and the last entry
/// for a dotted path wins. `Object` is the nested form: each top-level key
/// replaces that field wholesale.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateData {
    Fields(Vec<FieldUpdate>),
    Object(Object),
}

impl UpdateData {
    pub fn len(&self) -> usize {
        match self {
            UpdateData::Fields(entries) => entries.len(),
            UpdateData::Object(obj) => obj.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Converts the update to the payload a transport stages.
    ///
    /// An empty update still produces a payload; the write is staged all
    /// the same. Every updated field is replaced by its new value, so
    /// `delete_field()` is only accepted as the whole value of a field, never
    /// inside a nested object.
    pub fn normalize(&self, transport: &Transport) -> StoreResult<UpdatePayload> {
        match self {
            UpdateData::Fields(entries) => {
                let mut fields = IndexMap::with_capacity(entries.len());
                for entry in entries {
                    let key = entry.path().dotted();
                    if !entry.path().is_valid() {
                        log::error!("Invalid field path '{}' in update", key);
                        return Err(StoreError::new(
                            &format!("Invalid field path '{}' in update", key),
                            ErrorKind::EncodingError,
                        ));
                    }
                    let value = unwrap_field_value(entry.value(), transport)?;
                    // re-inserting keeps the first position, so drop the old entry
                    fields.shift_remove(&key);
                    fields.insert(key, value);
                }
                Ok(UpdatePayload::FieldPaths(fields))
            }
            UpdateData::Object(obj) => {
                let mut fields = WireMap::new();
                for (key, value) in obj.iter() {
                    fields.insert(key.clone(), unwrap_field_value(value, transport)?);
                }
                Ok(UpdatePayload::Nested(fields))
            }
        }
    }
}

fn unwrap_field_value(value: &Value, transport: &Transport) -> StoreResult<WireValue> {
    match value {
        Value::Object(obj) => Ok(WireValue::Map(unwrap_object(
            obj,
            transport,
            SentinelPolicy::NoDelete,
        )?)),
        other => unwrap_value(other, transport, SentinelPolicy::All),
    }
}

impl From<Object> for UpdateData {
    fn from(obj: Object) -> Self {
        UpdateData::Object(obj)
    }
}

impl From<Vec<FieldUpdate>> for UpdateData {
    fn from(entries: Vec<FieldUpdate>) -> Self {
        UpdateData::Fields(entries)
    }
}

impl From<FieldUpdate> for UpdateData {
    fn from(entry: FieldUpdate) -> Self {
        UpdateData::Fields(vec![entry])
    }
}
