//! Core abstractions shared by the FTP and mail connectors.
//!
//! This crate holds the error taxonomy every connector reports through, the
//! field validation helpers, the remote path utility and the logging bootstrap.

#![cfg_attr(not(debug_assertions), forbid(missing_docs))]

pub mod error;
pub mod logging;
pub mod path;
pub mod prelude;
pub mod validate;

pub use error::*;
pub use path::*;
pub use validate::*;
