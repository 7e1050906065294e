use crate::common::document_path;
use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// A stored document, or a nested map inside one, in wire form.
pub type WireMap = BTreeMap<String, WireValue>;

/// A transport's native pointer to one document.
///
/// Pointers are handed out by [`crate::transport::TransportProvider::pointer`],
/// which is where a transport gets to reject ids it cannot store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocPointer {
    collection: String,
    id: String,
}

impl DocPointer {
    pub fn new(collection: impl Into<String>, id: impl Into<String>) -> Self {
        DocPointer {
            collection: collection.into(),
            id: id.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn path(&self) -> String {
        document_path(&self.collection, &self.id)
    }
}

impl Display for DocPointer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// An instant as whole seconds since the Unix epoch plus nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WireTimestamp {
    pub seconds: i64,
    pub nanos: u32,
}

/// A write-time command the transport resolves while applying a write.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WireTransform {
    Delete,
    ServerTimestamp,
    /// The operand is always a `WireValue::Integer` or `WireValue::Double`.
    Increment(Box<WireValue>),
    ArrayUnion(Vec<WireValue>),
    ArrayRemove(Vec<WireValue>),
}

/// A value in the transport's wire domain.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WireValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    Timestamp(WireTimestamp),
    String(String),
    Bytes(Vec<u8>),
    Reference(DocPointer),
    GeoPoint { latitude: f64, longitude: f64 },
    Array(Vec<WireValue>),
    Map(WireMap),
    Transform(WireTransform),
}

impl WireValue {
    pub fn as_map(&self) -> Option<&WireMap> {
        match self {
            WireValue::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn is_transform(&self) -> bool {
        matches!(self, WireValue::Transform(_))
    }

    /// Returns `true` if this value or anything nested in it is
    /// [`WireTransform::Delete`].
    pub fn contains_delete(&self) -> bool {
        match self {
            WireValue::Transform(WireTransform::Delete) => true,
            WireValue::Map(m) => m.values().any(WireValue::contains_delete),
            _ => false,
        }
    }
}

/// Whether a set replaces the stored document or merges into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetMode {
    #[default]
    Replace,
    Merge,
}

/// The data of a staged update.
///
/// `FieldPaths` keys are dotted paths: `meta.updatedAt` addresses the field
/// `updatedAt` nested in `meta`. `Nested` keys are literal top-level fields,
/// each replaced wholesale by its new value.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdatePayload {
    FieldPaths(IndexMap<String, WireValue>),
    Nested(WireMap),
}

impl UpdatePayload {
    pub fn len(&self) -> usize {
        match self {
            UpdatePayload::FieldPaths(m) => m.len(),
            UpdatePayload::Nested(m) => m.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
