//! Conversion between the application domain ([`Value`](crate::common::Value))
//! and the transport's wire domain ([`WireValue`](crate::transport::WireValue)).
//!
//! Unwrapping needs the [`Transport`](crate::transport::Transport) because
//! references become native pointers. Wrapping does not: pointers come back
//! as untyped references.

mod unwrap;
mod wrap;

pub use unwrap::*;
pub use wrap::*;
