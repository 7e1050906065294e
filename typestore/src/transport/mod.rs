//! The boundary to the underlying document store.
//!
//! A store is reached through a [`TransportProvider`], wrapped in the
//! cheap-clone [`Transport`] handle. The provider hands out atomic
//! [`WriteBatchHandle`]s, builds native [`DocPointer`]s and serves plain
//! reads. Everything that crosses this boundary is in the wire domain
//! ([`WireValue`], [`WireMap`], [`UpdatePayload`]).
//!
//! The [`memory`] module provides a complete in-process transport.

pub mod memory;
#[allow(clippy::module_inception)]
mod transport;
mod wire;

pub use transport::*;
pub use wire::*;
