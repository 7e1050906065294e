//! Configuration of a [`Store`](crate::store::Store).

use crate::common::{atomic, Atomic, ReadExecutor, WriteExecutor, DEFAULT_MAX_BATCH_OPERATIONS};
use crate::errors::{ErrorKind, StoreError, StoreResult};
use crate::transport::memory::InMemoryTransport;
use crate::transport::Transport;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Settings shared by a store and every batch it creates.
///
/// The configuration can be changed until the store is opened; after that
/// every setter fails with `InvalidOperation`.
#[derive(Clone)]
pub struct StoreConfig {
    inner: Arc<StoreConfigInner>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreConfig {
    /// Creates a configuration using an in-memory transport and a batch
    /// limit of 500 operations.
    pub fn new() -> Self {
        StoreConfig {
            inner: Arc::new(StoreConfigInner::new()),
        }
    }

    pub fn transport(&self) -> Transport {
        self.inner.transport.read_with(|t| t.clone())
    }

    pub fn set_transport(&self, transport: Transport) -> StoreResult<()> {
        self.inner.ensure_not_configured("Transport")?;
        self.inner.transport.write_with(|t| *t = transport);
        Ok(())
    }

    /// Maximum number of operations one batch may stage.
    pub fn max_batch_operations(&self) -> usize {
        self.inner.max_batch_operations.load(Ordering::Relaxed)
    }

    pub fn set_max_batch_operations(&self, max: usize) -> StoreResult<()> {
        self.inner.ensure_not_configured("Batch operation limit")?;
        if max == 0 {
            log::error!("Batch operation limit must be at least 1");
            return Err(StoreError::new(
                "Batch operation limit must be at least 1",
                ErrorKind::ValidationError,
            ));
        }
        self.inner.max_batch_operations.store(max, Ordering::Relaxed);
        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        self.inner.configured.load(Ordering::Relaxed)
    }

    /// Freezes the configuration. Called once when the store opens.
    pub(crate) fn freeze(&self) -> StoreResult<()> {
        if self.inner.configured.swap(true, Ordering::Relaxed) {
            log::error!("Store configuration is already in use");
            return Err(StoreError::new(
                "Store configuration is already in use",
                ErrorKind::InvalidOperation,
            ));
        }
        Ok(())
    }
}

struct StoreConfigInner {
    configured: AtomicBool,
    transport: Atomic<Transport>,
    max_batch_operations: AtomicUsize,
}

impl StoreConfigInner {
    fn new() -> Self {
        StoreConfigInner {
            configured: AtomicBool::from(false),
            transport: atomic(Transport::new(InMemoryTransport::default())),
            max_batch_operations: AtomicUsize::from(DEFAULT_MAX_BATCH_OPERATIONS),
        }
    }

    fn ensure_not_configured(&self, setting: &str) -> StoreResult<()> {
        if self.configured.load(Ordering::Relaxed) {
            log::error!("{} cannot be changed after the store is opened", setting);
            return Err(StoreError::new(
                &format!("{} cannot be changed after the store is opened", setting),
                ErrorKind::InvalidOperation,
            ));
        }
        Ok(())
    }
}
