//! Partial updates: field paths and the two update forms.

mod field_path;
mod update_data;

pub use field_path::*;
pub use update_data::*;
