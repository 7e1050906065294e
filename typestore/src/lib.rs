//! # typestore - Typed Document Store Access
//!
//! typestore is a typed access layer over hierarchical document databases.
//! Its core is the batched-write coordinator: a [`WriteBatch`](batch::WriteBatch)
//! collects full-document writes, partial field updates and deletions, then
//! applies all of them as one atomic unit.
//!
//! ## Key Features
//!
//! - **Typed references**: [`Collection<T>`](collection::Collection) and
//!   [`Ref<T>`](collection::Ref) tie documents to their model type
//! - **Atomic batches**: every staged operation lands, or none does
//! - **Merge or replace**: a set either replaces the document or merges into it
//! - **Field-path updates**: update nested fields by dotted path
//! - **Sentinels**: delete a field, stamp the server time, increment a
//!   number or edit an array without reading the document first
//! - **Pluggable transports**: any store implementing
//!   [`TransportProvider`](transport::TransportProvider); an in-memory one
//!   is included
//!
//! ## Quick Start
//!
//! ```rust
//! use typestore::batch::SetOptions;
//! use typestore::common::{server_timestamp, Object};
//! use typestore::obj;
//! use typestore::store::Store;
//! use typestore::update::field;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Store::builder().open()?;
//! let users = store.collection::<Object>("users")?;
//!
//! let mut batch = store.batch()?;
//! let tati = batch.set(&users.doc("tati"), obj! { name: "Tati", foo: true })?;
//! batch.set_with_options((&users, "ed"), obj! { name: "Ed Tsech" }, SetOptions::merge())?;
//! batch.update(tati.reference(), vec![field(["meta", "updatedAt"], server_timestamp())])?;
//! batch.commit()?;
//!
//! let stored = store.get(tati.reference())?.expect("document exists");
//! assert!(stored.data().get_path(&["meta", "updatedAt"]).is_some());
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`batch`] - The batched-write coordinator
//! - [`codec`] - Conversion between application values and wire values
//! - [`collection`] - Collections, references and documents
//! - [`common`] - The value domain, sentinels and [`Convertible`](common::Convertible)
//! - [`errors`] - Error types and result definitions
//! - [`store`] - The store handle
//! - [`store_builder`] - Store builder
//! - [`store_config`] - Store configuration
//! - [`transport`] - The transport boundary and the in-memory transport
//! - [`update`] - Field paths and partial updates

pub mod batch;
pub mod codec;
pub mod collection;
pub mod common;
pub mod errors;
pub mod store;
pub mod store_builder;
pub mod store_config;
pub mod transport;
pub mod update;
