//! The batched-write coordinator.
//!
//! A [`WriteBatch`] collects `set`, `update` and `clear` operations against
//! [`Target`]s and commits them through the transport as one atomic unit.

mod set_options;
mod target;
mod write_batch;

pub use set_options::*;
pub use target::*;
pub use write_batch::*;
