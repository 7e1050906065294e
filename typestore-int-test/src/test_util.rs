use std::panic::{catch_unwind, AssertUnwindSafe};
use typestore::errors::StoreResult;
use typestore::store::Store;
use typestore::transport::memory::{InMemoryTransport, InMemoryTransportConfig};
use typestore::transport::Transport;

/// Runs `test` between `before` and `after`.
///
/// `after` runs even when `test` fails or panics. The test fails if any of
/// the three steps returns an error.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> StoreResult<()>,
    B: Fn() -> StoreResult<TestContext>,
    A: Fn(TestContext) -> StoreResult<()>,
{
    let ctx = match before() {
        Ok(ctx) => ctx,
        Err(e) => panic!("Before run failed: {:?}", e),
    };

    let result = catch_unwind(AssertUnwindSafe(|| test(ctx.clone())));
    let after_result = after(ctx);

    match result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => panic!("Test failed: {:?}", e),
        Err(panic) => std::panic::resume_unwind(panic),
    }
    if let Err(e) = after_result {
        panic!("After run failed: {:?}", e);
    }
}

/// A store over a fresh in-memory transport, plus direct access to that
/// transport for assertions and fault injection.
#[derive(Clone)]
pub struct TestContext {
    store: Store,
    memory: InMemoryTransport,
    prefix: String,
}

impl TestContext {
    pub fn store(&self) -> Store {
        self.store.clone()
    }

    pub fn memory(&self) -> InMemoryTransport {
        self.memory.clone()
    }

    /// A collection path unique to this context.
    pub fn collection_path(&self, name: &str) -> String {
        format!("{}_{}", name, self.prefix)
    }
}

pub fn create_test_context() -> StoreResult<TestContext> {
    create_test_context_with(InMemoryTransportConfig::new(), None)
}

/// Like [`create_test_context`] with a batch limit of `max` operations.
pub fn create_limited_test_context(max: usize) -> StoreResult<TestContext> {
    create_test_context_with(InMemoryTransportConfig::new(), Some(max))
}

pub fn create_test_context_with(
    config: InMemoryTransportConfig,
    max_batch_operations: Option<usize>,
) -> StoreResult<TestContext> {
    let memory = InMemoryTransport::new(config);
    let mut builder = Store::builder().shared_transport(Transport::new(memory.clone()));
    if let Some(max) = max_batch_operations {
        builder = builder.max_batch_operations(max);
    }

    Ok(TestContext {
        store: builder.open()?,
        memory,
        prefix: uuid::Uuid::new_v4().simple().to_string(),
    })
}

pub fn cleanup(ctx: TestContext) -> StoreResult<()> {
    ctx.store().close()
}
