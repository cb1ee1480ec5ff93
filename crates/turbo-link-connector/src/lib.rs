//! Remote file-transfer connectors.
//!
//! [`RemoteSession`] owns one FTP control connection from a successful login
//! until it is closed or dropped. Payloads move through a [`StreamBridge`] so
//! uploads and in-memory reads never touch the local disk.

#![cfg_attr(not(debug_assertions), forbid(missing_docs))]

pub mod connectors;
pub mod prelude;
pub mod stream;

pub use connectors::*;
pub use stream::StreamBridge;
pub use turbo_link_config::TransferMode;
