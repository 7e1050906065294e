use crate::batch::{IntoTarget, SetOptions};
use crate::codec::{unwrap_object, SentinelPolicy};
use crate::collection::Document;
use crate::common::{to_object, Convertible};
use crate::errors::{ErrorKind, StoreError, StoreResult};
use crate::transport::{Transport, WriteBatchHandle};
use crate::update::UpdateData;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Lifecycle of a [`WriteBatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    /// Accepting operations.
    Open,
    /// Commit issued, waiting for the transport.
    Committing,
    /// Every staged operation was applied.
    Committed,
    /// The transport rejected the commit; nothing was applied.
    Failed,
}

impl Display for BatchState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchState::Open => write!(f, "open"),
            BatchState::Committing => write!(f, "committing"),
            BatchState::Committed => write!(f, "committed"),
            BatchState::Failed => write!(f, "failed"),
        }
    }
}

/// An atomic group of writes.
///
/// `set`, `update` and `clear` only stage work on the transport's native
/// batch; nothing is written until [`commit`](WriteBatch::commit), which
/// applies every staged operation or none of them. A batch is single use:
/// once committed, or once its commit failed, it refuses further calls with
/// `InvalidOperation`.
///
/// A staging call that fails (bad target, value that cannot be encoded,
/// id the transport rejects) stages nothing and leaves the batch open.
///
/// A batch dropped while still open discards its staged operations.
///
/// # Examples
///
/// ```rust
/// use typestore::batch::SetOptions;
/// use typestore::common::{Object, server_timestamp};
/// use typestore::obj;
/// use typestore::store::Store;
/// use typestore::update::field;
///
/// let store = Store::builder().open().unwrap();
/// let users = store.collection::<Object>("users").unwrap();
///
/// let mut batch = store.batch().unwrap();
/// let tati = batch.set((&users, "tati"), obj! { name: "Tati" }).unwrap();
/// batch.set_with_options(&users.doc("ed"), obj! { name: "Ed" }, SetOptions::merge()).unwrap();
/// batch.update(tati.reference(), vec![field(["meta", "updatedAt"], server_timestamp())]).unwrap();
/// batch.commit().unwrap();
///
/// assert!(store.get(tati.reference()).unwrap().is_some());
/// ```
pub struct WriteBatch {
    id: Uuid,
    state: BatchState,
    handle: Option<Box<dyn WriteBatchHandle>>,
    transport: Transport,
    staged: usize,
    max_operations: usize,
}

impl WriteBatch {
    pub(crate) fn new(transport: Transport, max_operations: usize) -> StoreResult<Self> {
        let handle = transport.batch()?;
        let id = Uuid::new_v4();
        log::debug!("Created write batch {} on transport {}", id, transport.name());
        Ok(WriteBatch {
            id,
            state: BatchState::Open,
            handle: Some(handle),
            transport,
            staged: 0,
            max_operations,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Number of operations staged so far.
    pub fn len(&self) -> usize {
        self.staged
    }

    pub fn is_empty(&self) -> bool {
        self.staged == 0
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    /// Stages a write that replaces the whole document.
    ///
    /// Returns the document as written: the resolved reference and `data`
    /// itself. This is a local echo; the write lands only when the batch
    /// commits.
    pub fn set<'a, T, D>(&mut self, target: D, data: T) -> StoreResult<Document<T>>
    where
        T: Convertible + 'a,
        D: IntoTarget<'a, Model = T>,
    {
        self.set_with_options(target, data, SetOptions::default())
    }

    /// Stages a write of the whole document, merged into the stored one
    /// when `options.merge` is set.
    ///
    /// `delete_field()` is only accepted in a merge.
    pub fn set_with_options<'a, T, D>(
        &mut self,
        target: D,
        data: T,
        options: SetOptions,
    ) -> StoreResult<Document<T>>
    where
        T: Convertible + 'a,
        D: IntoTarget<'a, Model = T>,
    {
        self.ensure_can_stage()?;
        let reference = target.into_target().resolve()?;
        let pointer = self
            .transport
            .pointer(reference.collection_path(), reference.id())?;

        let policy = if options.merge {
            SentinelPolicy::All
        } else {
            SentinelPolicy::NoDelete
        };
        let wire = unwrap_object(&to_object(&data)?, &self.transport, policy)?;

        self.handle()?.stage_set(pointer, wire, options.mode())?;
        self.staged += 1;
        log::debug!(
            "Batch {} staged set on {} (merge: {})",
            self.id,
            reference,
            options.merge
        );
        Ok(Document::new(reference, data))
    }

    /// Stages a partial update of an existing document.
    ///
    /// `data` is either a list of [`FieldUpdate`](crate::update::FieldUpdate)s
    /// or an [`Object`](crate::common::Object) whose top-level keys replace
    /// the stored fields. An empty update is staged like any other. The
    /// commit fails if the document does not exist.
    pub fn update<'a, D>(&mut self, target: D, data: impl Into<UpdateData>) -> StoreResult<()>
    where
        D: IntoTarget<'a>,
        D::Model: 'a,
    {
        self.ensure_can_stage()?;
        let reference = target.into_target().resolve()?;
        let pointer = self
            .transport
            .pointer(reference.collection_path(), reference.id())?;
        let payload = data.into().normalize(&self.transport)?;
        let fields = payload.len();

        self.handle()?.stage_update(pointer, payload)?;
        self.staged += 1;
        log::debug!(
            "Batch {} staged update of {} fields on {}",
            self.id,
            fields,
            reference
        );
        Ok(())
    }

    /// Stages the deletion of a document. Deleting a document that does not
    /// exist is not an error.
    pub fn clear<'a, D>(&mut self, target: D) -> StoreResult<()>
    where
        D: IntoTarget<'a>,
        D::Model: 'a,
    {
        self.ensure_can_stage()?;
        let reference = target.into_target().resolve()?;
        let pointer = self
            .transport
            .pointer(reference.collection_path(), reference.id())?;

        self.handle()?.stage_delete(pointer)?;
        self.staged += 1;
        log::debug!("Batch {} staged delete of {}", self.id, reference);
        Ok(())
    }

    /// Applies every staged operation as one atomic write.
    ///
    /// On success the batch is `Committed`. If the transport rejects the
    /// commit the batch is `Failed` and the returned `CommitFailed` error
    /// carries the transport's error as its cause. Either way the batch
    /// cannot be used again.
    pub fn commit(&mut self) -> StoreResult<()> {
        self.ensure_open("commit")?;
        let handle = match self.handle.take() {
            Some(handle) => handle,
            None => {
                log::error!("Batch {} has no transport handle", self.id);
                return Err(StoreError::new(
                    "Batch has no transport handle",
                    ErrorKind::InternalError,
                ));
            }
        };

        self.state = BatchState::Committing;
        log::debug!("Committing batch {} with {} operations", self.id, self.staged);

        match handle.commit() {
            Ok(()) => {
                self.state = BatchState::Committed;
                log::debug!("Committed batch {}", self.id);
                Ok(())
            }
            Err(e) => {
                self.state = BatchState::Failed;
                log::error!("Commit of batch {} failed: {}", self.id, e);
                Err(StoreError::new_with_cause(
                    &format!("Batch commit failed: {}", e.message()),
                    ErrorKind::CommitFailed,
                    e,
                ))
            }
        }
    }

    fn ensure_open(&self, operation: &str) -> StoreResult<()> {
        if self.state != BatchState::Open {
            log::error!(
                "Cannot {} on batch {}, it is already {}",
                operation,
                self.id,
                self.state
            );
            return Err(StoreError::new(
                &format!("Cannot {} on a batch that is already {}", operation, self.state),
                ErrorKind::InvalidOperation,
            ));
        }
        Ok(())
    }

    fn ensure_can_stage(&self) -> StoreResult<()> {
        self.ensure_open("stage an operation")?;
        if self.staged >= self.max_operations {
            log::error!(
                "Batch {} already holds the maximum of {} operations",
                self.id,
                self.max_operations
            );
            return Err(StoreError::new(
                &format!(
                    "A batch cannot hold more than {} operations",
                    self.max_operations
                ),
                ErrorKind::InvalidOperation,
            ));
        }
        Ok(())
    }

    fn handle(&mut self) -> StoreResult<&mut Box<dyn WriteBatchHandle>> {
        match self.handle.as_mut() {
            Some(handle) => Ok(handle),
            None => {
                log::error!("Batch {} has no transport handle", self.id);
                Err(StoreError::new(
                    "Batch has no transport handle",
                    ErrorKind::InternalError,
                ))
            }
        }
    }
}

impl Drop for WriteBatch {
    fn drop(&mut self) {
        if self.state == BatchState::Open && self.staged > 0 {
            log::warn!(
                "Batch {} dropped with {} uncommitted operations",
                self.id,
                self.staged
            );
        }
    }
}
