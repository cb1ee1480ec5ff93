//! Prelude module for connector implementations.
//!
//! Import with `use turbo_link_connector::prelude::*;` to get commonly used connector types.

pub use crate::connectors::ftp::RemoteSession;
pub use crate::connectors::suppa::{SuppaFtpConnector, SuppaFtpHandle};
pub use crate::connectors::transport::{FtpConnector, FtpHandle};
pub use crate::stream::StreamBridge;
pub use turbo_link_config::TransferMode;
pub use turbo_link_core::prelude::*;
