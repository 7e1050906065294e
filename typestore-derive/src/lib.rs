#![recursion_limit = "128"]
//! # typestore Derive Macros
//!
//! Provides `#[derive(Convertible)]`, which implements
//! `typestore::common::Convertible` for application models.
//!
//! - **Structs with named fields** convert to an object keyed by field name.
//! - **Enums** convert to `{ variant, value }`, where `value` is an object
//!   for struct variants, an array for tuple variants and null for unit
//!   variants.
//!
//! ## Attributes
//!
//! - `#[converter(ignored = "a, b")]` on the type: skip those fields. They
//!   are not written, and read back as `Default::default()`.
//! - `#[converter(rename = "key")]` on a field: store it under `key`.
//!
//! A field missing from stored data is read from `null`, so `Option` fields
//! come back as `None`.
//!
//! # Examples
//!
//! ```rust,ignore
//! use typestore_derive::Convertible;
//!
//! #[derive(Convertible)]
//! #[converter(ignored = "cache")]
//! pub struct User {
//!     pub name: String,
//!     #[converter(rename = "emailAddress")]
//!     pub email: Option<String>,
//!     pub cache: Vec<u8>,
//! }
//!
//! #[derive(Convertible)]
//! pub enum Status {
//!     Active,
//!     Suspended { reason: String },
//! }
//! ```

extern crate proc_macro;
mod convertible;

use crate::convertible::{generate_convertible_for_enum, generate_convertible_for_struct};
use proc_macro::TokenStream;
use syn::{Data, DeriveInput};

/// Derives `typestore::common::Convertible` for a struct or an enum.
#[proc_macro_derive(Convertible, attributes(converter))]
pub fn derive_convert(input: TokenStream) -> TokenStream {
    let ast = syn::parse_macro_input!(input as DeriveInput);

    let result = match ast.data {
        Data::Struct(ref data) => generate_convertible_for_struct(&ast, data),
        Data::Enum(ref data) => generate_convertible_for_enum(&ast, data),
        Data::Union(_) => Err(syn::Error::new_spanned(
            &ast,
            "Cannot derive Convertible for unions",
        )),
    };

    match result {
        Ok(token_stream) => token_stream,
        Err(e) => {
            let error = syn::Error::new(
                e.span(),
                format!("Failed to derive Convertible for '{}': {}", ast.ident, e),
            );
            error.to_compile_error().into()
        }
    }
}
