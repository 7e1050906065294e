use crate::common::{atomic, Atomic, WriteExecutor};
use crate::errors::StoreError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Configuration of an [`crate::transport::memory::InMemoryTransport`].
///
/// The configuration is shared: a clone handed to a transport observes later
/// changes, which lets a test flip a running transport to read-only or make
/// its next commit fail.
#[derive(Default, Clone)]
pub struct InMemoryTransportConfig {
    inner: Arc<InMemoryTransportConfigInner>,
}

impl InMemoryTransportConfig {
    pub fn new() -> InMemoryTransportConfig {
        InMemoryTransportConfig {
            inner: Arc::new(InMemoryTransportConfigInner::new()),
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.inner.read_only.load(Ordering::Relaxed)
    }

    /// When set, every commit is rejected with `PermissionDenied`.
    pub fn set_read_only(&self, read_only: bool) {
        self.inner.read_only.store(read_only, Ordering::Relaxed)
    }

    /// Makes the next commit fail with `error` without applying anything.
    pub fn fail_next_commit(&self, error: StoreError) {
        self.inner
            .injected_failure
            .write_with(|it| *it = Some(error))
    }

    pub(crate) fn take_injected_failure(&self) -> Option<StoreError> {
        self.inner.injected_failure.write_with(|it| it.take())
    }
}

#[derive(Default)]
struct InMemoryTransportConfigInner {
    read_only: AtomicBool,
    injected_failure: Atomic<Option<StoreError>>,
}

impl InMemoryTransportConfigInner {
    fn new() -> InMemoryTransportConfigInner {
        InMemoryTransportConfigInner {
            read_only: AtomicBool::new(false),
            injected_failure: atomic(None),
        }
    }
}
