//! Everything needed to open sessions and send mail.
//!
//! Import with `use turbo_link::prelude::*;`.

pub use crate::Connectors;
pub use turbo_link_config::{ConnectorConfig, FtpConnection, GraphMailConfig, TransferMode};
pub use turbo_link_connector::prelude::*;
pub use turbo_link_mail::prelude::*;
