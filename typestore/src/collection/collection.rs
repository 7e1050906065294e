use crate::collection::{RawRef, Ref};
use crate::common::{document_path, random_id, validate_collection_path, PATH_SEPARATOR};
use crate::errors::StoreResult;
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;
use std::sync::Arc;

/// A named group of documents that all share the model type `T`.
///
/// A collection is just a validated path tagged with the model type. It is
/// cheap to clone, holds no connection and can be created once and reused.
///
/// # Examples
///
/// ```rust
/// use typestore::collection::Collection;
/// use typestore::common::Object;
///
/// let users: Collection<Object> = Collection::new("users").unwrap();
/// let tati = users.doc("tati");
/// assert_eq!(tati.path(), "users/tati");
///
/// let posts: Collection<Object> = Collection::subcollection(&tati, "posts").unwrap();
/// assert_eq!(posts.path(), "users/tati/posts");
/// ```
pub struct Collection<T> {
    path: Arc<str>,
    _model: PhantomData<fn() -> T>,
}

impl<T> Collection<T> {
    /// Creates a collection handle for `path`.
    ///
    /// Returns a `ResolutionError` if the path is empty, contains an empty
    /// segment or names a document rather than a collection.
    pub fn new(path: &str) -> StoreResult<Self> {
        validate_collection_path(path)?;
        Ok(Collection {
            path: Arc::from(path),
            _model: PhantomData,
        })
    }

    /// Creates the collection `name` nested under the document `parent`.
    pub fn subcollection<P>(parent: &Ref<P>, name: &str) -> StoreResult<Self> {
        let path = format!("{}{}{}", parent.path(), PATH_SEPARATOR, name);
        Collection::new(&path)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns a reference to the document `id` of this collection.
    ///
    /// The id is not validated here; a transport may still reject it when
    /// the reference is used.
    pub fn doc(&self, id: &str) -> Ref<T> {
        Ref::from_raw(RawRef::new(&*self.path, id))
    }

    /// Returns a reference to a new document with a random id.
    pub fn new_doc(&self) -> Ref<T> {
        self.doc(&Self::random_id())
    }

    /// Generates a 20-character alphanumeric document id.
    pub fn random_id() -> String {
        random_id()
    }

    /// The full path of the document `id` of this collection.
    pub fn document_path(&self, id: &str) -> String {
        document_path(&self.path, id)
    }
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Collection {
            path: self.path.clone(),
            _model: PhantomData,
        }
    }
}

impl<T> PartialEq for Collection<T> {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl<T> Eq for Collection<T> {}

impl<T> Debug for Collection<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Collection({})", self.path)
    }
}
