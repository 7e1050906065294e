//! Collections, references and documents.
//!
//! A [`Collection<T>`] names a group of documents of model type `T`. A
//! [`Ref<T>`] points at one document of it without fetching anything, and a
//! [`Document<T>`] pairs a reference with materialized data.
//!
//! ```rust
//! use typestore::collection::{Collection, Document};
//! use typestore::common::Object;
//! use typestore::obj;
//!
//! let users: Collection<Object> = Collection::new("users").unwrap();
//! let doc = Document::new(users.doc("tati"), obj! { name: "Tati" });
//! assert_eq!(doc.reference().path(), "users/tati");
//! ```

#[allow(clippy::module_inception)]
mod collection;
mod document;
mod reference;

pub use collection::*;
pub use document::*;
pub use reference::*;
