use crate::batch::WriteBatch;
use crate::codec::wrap_object;
use crate::collection::{Collection, Document, Ref};
use crate::common::{Convertible, Value};
use crate::errors::{ErrorKind, StoreError, StoreResult};
use crate::store_builder::StoreBuilder;
use crate::store_config::StoreConfig;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// An open connection to a document store.
///
/// `Store` is the entry point of the library: it hands out typed
/// [`Collection`]s, creates [`WriteBatch`]es and reads single documents back.
/// It is cheap to clone, and every clone shares the same transport and
/// configuration.
///
/// # Examples
///
/// ```rust
/// use typestore::common::Object;
/// use typestore::obj;
/// use typestore::store::Store;
///
/// let store = Store::builder().open().unwrap();
/// let users = store.collection::<Object>("users").unwrap();
///
/// let mut batch = store.batch().unwrap();
/// let doc = batch.set(&users.doc("tati"), obj! { name: "Tati" }).unwrap();
/// batch.commit().unwrap();
///
/// let stored = store.get(doc.reference()).unwrap().unwrap();
/// assert_eq!(stored.data(), doc.data());
/// ```
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl Store {
    pub fn builder() -> StoreBuilder {
        StoreBuilder::new()
    }

    pub(crate) fn new(config: StoreConfig) -> Self {
        Store {
            inner: Arc::new(StoreInner {
                config,
                closed: AtomicBool::from(false),
            }),
        }
    }

    pub fn config(&self) -> StoreConfig {
        self.inner.config.clone()
    }

    /// Returns the collection at `path` with model type `T`.
    pub fn collection<T>(&self, path: &str) -> StoreResult<Collection<T>> {
        Collection::new(path)
    }

    /// Creates an empty, open batch.
    pub fn batch(&self) -> StoreResult<WriteBatch> {
        self.ensure_open()?;
        let config = &self.inner.config;
        WriteBatch::new(config.transport(), config.max_batch_operations())
    }

    /// Reads the current data of a document.
    ///
    /// Returns `None` if the document does not exist, and an
    /// `ObjectMappingError` if the stored data does not fit `T`.
    pub fn get<T: Convertible>(&self, reference: &Ref<T>) -> StoreResult<Option<Document<T>>> {
        self.ensure_open()?;
        reference.validate()?;

        let transport = self.inner.config.transport();
        let pointer = transport.pointer(reference.collection_path(), reference.id())?;
        match transport.get(&pointer)? {
            Some(map) => {
                let value = Value::Object(wrap_object(&map)?);
                let data = T::from_value(&value)?;
                Ok(Some(Document::new(reference.clone(), data)))
            }
            None => Ok(None),
        }
    }

    /// Closes the store and its transport. Closing twice is a no-op.
    pub fn close(&self) -> StoreResult<()> {
        if self.inner.closed.swap(true, Ordering::Relaxed) {
            return Ok(());
        }
        log::debug!("Closing store");
        self.inner.config.transport().close()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Relaxed)
    }

    fn ensure_open(&self) -> StoreResult<()> {
        if self.is_closed() {
            log::error!("Store is closed");
            return Err(StoreError::new("Store is closed", ErrorKind::InvalidOperation));
        }
        Ok(())
    }
}

struct StoreInner {
    config: StoreConfig,
    closed: AtomicBool,
}
