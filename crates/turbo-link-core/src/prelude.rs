//! Prelude module with commonly used types and helpers.
//!
//! Import with `use turbo_link_core::prelude::*;`.

pub use crate::error::{CoreError, ErrorKind, Result};
pub use crate::path::{PathExt, path_element};
pub use crate::validate::{require_non_empty_array, require_non_empty_string};
