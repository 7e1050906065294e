mod apply;
mod batch;
mod config;
mod transport;

pub(crate) use batch::StagedWrite;
pub use batch::InMemoryWriteBatch;
pub use config::*;
pub use transport::*;
