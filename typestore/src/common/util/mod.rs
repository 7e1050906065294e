mod path_utils;
mod type_utils;

pub use path_utils::*;
pub use type_utils::*;
