use crate::common::{atomic, Atomic, ReadExecutor, WriteExecutor, PATH_SEPARATOR};
use crate::errors::{ErrorKind, StoreError, StoreResult};
use crate::transport::memory::apply::{apply_set, apply_update};
use crate::transport::memory::{InMemoryTransportConfig, InMemoryWriteBatch, StagedWrite};
use crate::transport::{DocPointer, TransportProvider, WireMap, WireTimestamp, WriteBatchHandle};
use chrono::Utc;
use im::OrdMap;
use std::sync::Arc;

type CollectionTable = OrdMap<String, WireMap>;
type DocumentTable = OrdMap<String, CollectionTable>;

/// A transport that keeps every document in process memory.
///
/// Commits are atomic: all staged operations are applied to a snapshot of
/// the table under one write lock, and the snapshot only replaces the table
/// when every operation succeeded.
///
/// # Examples
///
/// ```rust
/// use typestore::transport::memory::{InMemoryTransport, InMemoryTransportConfig};
/// use typestore::transport::TransportProvider;
///
/// let transport = InMemoryTransport::new(InMemoryTransportConfig::new());
/// let pointer = transport.pointer("users", "tati").unwrap();
/// assert!(transport.get(&pointer).unwrap().is_none());
/// ```
#[derive(Clone)]
pub struct InMemoryTransport {
    inner: Arc<InMemoryTransportInner>,
}

impl InMemoryTransport {
    pub fn new(config: InMemoryTransportConfig) -> InMemoryTransport {
        InMemoryTransport {
            inner: Arc::new(InMemoryTransportInner::new(config)),
        }
    }

    pub fn config(&self) -> InMemoryTransportConfig {
        self.inner.config.clone()
    }

    /// Number of documents currently stored in `collection`.
    pub fn document_count(&self, collection: &str) -> usize {
        self.inner
            .documents
            .read_with(|table| table.get(collection).map_or(0, |c| c.len()))
    }

    pub(crate) fn apply(&self, writes: Vec<StagedWrite>) -> StoreResult<()> {
        self.inner.apply(writes)
    }
}

impl Default for InMemoryTransport {
    fn default() -> Self {
        InMemoryTransport::new(InMemoryTransportConfig::new())
    }
}

impl TransportProvider for InMemoryTransport {
    fn name(&self) -> &str {
        "memory"
    }

    fn batch(&self) -> StoreResult<Box<dyn WriteBatchHandle>> {
        Ok(Box::new(InMemoryWriteBatch::new(self.clone())))
    }

    fn pointer(&self, collection: &str, id: &str) -> StoreResult<DocPointer> {
        if id.is_empty() {
            log::error!("Document id in {} cannot be empty", collection);
            return Err(StoreError::new(
                &format!("Document id in {} cannot be empty", collection),
                ErrorKind::InvalidId,
            ));
        }
        if id.contains(PATH_SEPARATOR) {
            log::error!("Document id {} cannot contain '{}'", id, PATH_SEPARATOR);
            return Err(StoreError::new(
                &format!("Document id {} cannot contain '{}'", id, PATH_SEPARATOR),
                ErrorKind::InvalidId,
            ));
        }
        Ok(DocPointer::new(collection, id))
    }

    fn get(&self, pointer: &DocPointer) -> StoreResult<Option<WireMap>> {
        Ok(self.inner.documents.read_with(|table| {
            table
                .get(pointer.collection())
                .and_then(|c| c.get(pointer.id()))
                .cloned()
        }))
    }
}

struct InMemoryTransportInner {
    config: InMemoryTransportConfig,
    documents: Atomic<DocumentTable>,
}

impl InMemoryTransportInner {
    fn new(config: InMemoryTransportConfig) -> Self {
        InMemoryTransportInner {
            config,
            documents: atomic(OrdMap::new()),
        }
    }

    fn apply(&self, writes: Vec<StagedWrite>) -> StoreResult<()> {
        if let Some(error) = self.config.take_injected_failure() {
            log::error!("Commit rejected by injected failure: {}", error);
            return Err(error);
        }

        if self.config.is_read_only() {
            log::error!("Transport is read-only, commit of {} writes rejected", writes.len());
            return Err(StoreError::new(
                "Transport is read-only",
                ErrorKind::PermissionDenied,
            ));
        }

        let now = commit_time();
        self.documents.write_with(|table| {
            // work on a snapshot so a failing write leaves the table untouched
            let mut scratch = table.clone();
            for write in &writes {
                apply_write(&mut scratch, write, now)?;
            }
            *table = scratch;
            Ok(())
        })
    }
}

fn apply_write(table: &mut DocumentTable, write: &StagedWrite, now: WireTimestamp) -> StoreResult<()> {
    let pointer = write.pointer();
    let mut collection = table
        .get(pointer.collection())
        .cloned()
        .unwrap_or_default();
    let existing = collection.get(pointer.id());

    match write {
        StagedWrite::Set { data, mode, .. } => {
            let updated = apply_set(existing, data, *mode, now)?;
            collection.insert(pointer.id().to_string(), updated);
        }
        StagedWrite::Update { data, .. } => {
            let updated = apply_update(&pointer.path(), existing, data, now)?;
            collection.insert(pointer.id().to_string(), updated);
        }
        StagedWrite::Delete { .. } => {
            collection.remove(pointer.id());
        }
    }

    if collection.is_empty() {
        table.remove(pointer.collection());
    } else {
        table.insert(pointer.collection().to_string(), collection);
    }
    Ok(())
}

fn commit_time() -> WireTimestamp {
    let now = Utc::now();
    WireTimestamp {
        seconds: now.timestamp(),
        nanos: now.timestamp_subsec_nanos(),
    }
}
