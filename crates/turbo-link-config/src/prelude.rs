//! Prelude module for configuration management.
//!
//! Import with `use turbo_link_config::prelude::*;` to get commonly used config types.

pub use crate::{ConnectorConfig, PROJECT_DIRS};

// Error handling
pub use crate::error::{ConfigError, Result};

// Sections
pub use crate::ftp::{FtpConnection, TransferMode};
pub use crate::logging::{LogFileNameFormat, LogLevel, LoggingConfig};
pub use crate::mail::GraphMailConfig;

// Configuration macros
pub use crate::{config_accessors, config_enum, config_struct};
