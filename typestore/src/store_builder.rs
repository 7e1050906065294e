use crate::errors::{StoreError, StoreResult};
use crate::store::Store;
use crate::store_config::StoreConfig;
use crate::transport::{Transport, TransportProvider};

/// Fluent builder for a [`Store`].
///
/// A setter that fails keeps the first error; [`open`](StoreBuilder::open)
/// returns it instead of opening the store.
///
/// # Examples
///
/// ```rust
/// use typestore::store::Store;
/// use typestore::transport::memory::InMemoryTransport;
///
/// let store = Store::builder()
///     .transport(InMemoryTransport::default())
///     .max_batch_operations(100)
///     .open()
///     .unwrap();
/// assert_eq!(store.config().max_batch_operations(), 100);
///
/// assert!(Store::builder().max_batch_operations(0).open().is_err());
/// ```
#[derive(Default)]
pub struct StoreBuilder {
    error: Option<StoreError>,
    config: StoreConfig,
}

impl StoreBuilder {
    pub fn new() -> Self {
        StoreBuilder {
            error: None,
            config: StoreConfig::new(),
        }
    }

    /// Uses `transport` instead of the default in-memory transport.
    pub fn transport<T: TransportProvider + 'static>(self, transport: T) -> Self {
        self.shared_transport(Transport::new(transport))
    }

    /// Uses an existing [`Transport`] handle, shared with its other owners.
    pub fn shared_transport(mut self, transport: Transport) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_transport(transport) {
                self.error = Some(e);
            }
        }
        self
    }

    pub fn max_batch_operations(mut self, max: usize) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_max_batch_operations(max) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Opens the store, freezing its configuration.
    pub fn open(self) -> StoreResult<Store> {
        if let Some(error) = self.error {
            return Err(error);
        }
        self.config.freeze()?;
        let store = Store::new(self.config);
        log::debug!(
            "Opened store on transport {}",
            store.config().transport().name()
        );
        Ok(store)
    }
}
