use crate::collection::Collection;
use crate::common::{document_path, validate_collection_path};
use crate::errors::StoreResult;
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// A type-erased pointer to one document: a collection path plus an id.
///
/// `RawRef` is what a [`crate::common::Value::Reference`] holds, since a
/// value nested inside another document does not carry the model type of
/// the document it points to. Use [`RawRef::typed`] to get a [`Ref`] back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawRef {
    collection: String,
    id: String,
}

impl RawRef {
    /// Creates a reference without validating either part.
    pub fn new(collection: impl Into<String>, id: impl Into<String>) -> Self {
        RawRef {
            collection: collection.into(),
            id: id.into(),
        }
    }

    pub fn collection_path(&self) -> &str {
        &self.collection
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The full document path, `{collection}/{id}`.
    pub fn path(&self) -> String {
        document_path(&self.collection, &self.id)
    }

    /// Attaches a model type to this reference.
    pub fn typed<T>(&self) -> Ref<T> {
        Ref::from_raw(self.clone())
    }
}

impl Display for RawRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// A typed reference to one document of a [`Collection<T>`].
///
/// A reference never holds data and never talks to the store. Two references
/// are equal when their collection paths and ids are equal; the model type
/// plays no part in the comparison.
pub struct Ref<T> {
    raw: RawRef,
    _model: PhantomData<fn() -> T>,
}

impl<T> Ref<T> {
    pub(crate) fn from_raw(raw: RawRef) -> Self {
        Ref {
            raw,
            _model: PhantomData,
        }
    }

    pub fn id(&self) -> &str {
        self.raw.id()
    }

    pub fn collection_path(&self) -> &str {
        self.raw.collection_path()
    }

    /// The full document path, `{collection}/{id}`.
    pub fn path(&self) -> String {
        self.raw.path()
    }

    /// The collection this reference belongs to.
    pub fn collection(&self) -> StoreResult<Collection<T>> {
        Collection::new(self.raw.collection_path())
    }

    pub fn as_raw(&self) -> RawRef {
        self.raw.clone()
    }

    /// Checks that the collection part of this reference is a well-formed
    /// collection path. The id is passed through untouched.
    pub(crate) fn validate(&self) -> StoreResult<()> {
        validate_collection_path(self.raw.collection_path())
    }
}

impl<T> Clone for Ref<T> {
    fn clone(&self) -> Self {
        Ref::from_raw(self.raw.clone())
    }
}

impl<T> PartialEq for Ref<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for Ref<T> {}

impl<T> Hash for Ref<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<T> Debug for Ref<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ref({})", self.raw.path())
    }
}

impl<T> Display for Ref<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw.path())
    }
}

impl<T> From<Ref<T>> for RawRef {
    fn from(value: Ref<T>) -> Self {
        value.raw
    }
}

impl<T> From<&Ref<T>> for crate::common::Value {
    fn from(value: &Ref<T>) -> Self {
        crate::common::Value::Reference(value.as_raw())
    }
}

impl<T> From<Ref<T>> for crate::common::Value {
    fn from(value: Ref<T>) -> Self {
        crate::common::Value::Reference(value.raw)
    }
}
