//! Shared building blocks: the application value domain and its helpers.
//!
//! - [`Value`] is the application-side value every model converts to.
//! - [`Object`] is the string-keyed map behind nested values and documents;
//!   build one with [`obj!`](crate::obj).
//! - [`FieldValue`] is the closed set of write-time sentinels
//!   ([`delete_field`], [`server_timestamp`], [`increment`], [`array_union`],
//!   [`array_remove`]).
//! - [`Convertible`] maps Rust types to and from [`Value`].

mod constants;
mod convertible;
mod field_value;
mod geo_point;
mod object;
mod util;
mod value;

pub use constants::*;
pub use convertible::*;
pub use field_value::*;
pub use geo_point::*;
pub use object::*;
pub use util::*;
pub use value::*;
