use crate::errors::StoreResult;
use crate::transport::{DocPointer, SetMode, UpdatePayload, WireMap};
use std::ops::Deref;
use std::sync::Arc;

/// A transport's native atomic batch.
///
/// Operations are staged in memory and applied by [`WriteBatchHandle::commit`]
/// as one all-or-nothing unit. `commit` consumes the handle, so a handle can
/// be committed at most once.
pub trait WriteBatchHandle: Send {
    fn stage_set(&mut self, pointer: DocPointer, data: WireMap, mode: SetMode) -> StoreResult<()>;

    fn stage_update(&mut self, pointer: DocPointer, data: UpdatePayload) -> StoreResult<()>;

    fn stage_delete(&mut self, pointer: DocPointer) -> StoreResult<()>;

    /// Applies every staged operation, or none of them.
    fn commit(self: Box<Self>) -> StoreResult<()>;
}

/// The connection to an underlying document store.
///
/// Implementors provide a factory for atomic batches, a way to build native
/// document pointers, and a plain read used by [`crate::store::Store::get`].
pub trait TransportProvider: Send + Sync {
    /// A short name for log lines and error messages.
    fn name(&self) -> &str;

    /// Creates a fresh, empty atomic batch.
    fn batch(&self) -> StoreResult<Box<dyn WriteBatchHandle>>;

    /// Builds the native pointer for the document `id` of `collection`.
    fn pointer(&self, collection: &str, id: &str) -> StoreResult<DocPointer>;

    /// Reads the current data of a document, or `None` if it does not exist.
    fn get(&self, pointer: &DocPointer) -> StoreResult<Option<WireMap>>;

    fn close(&self) -> StoreResult<()> {
        Ok(())
    }
}

/// A cheap-clone handle to a [`TransportProvider`].
#[derive(Clone)]
pub struct Transport {
    inner: Arc<dyn TransportProvider>,
}

impl Transport {
    pub fn new<T: TransportProvider + 'static>(inner: T) -> Self {
        Transport {
            inner: Arc::new(inner),
        }
    }
}

impl Deref for Transport {
    type Target = Arc<dyn TransportProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
