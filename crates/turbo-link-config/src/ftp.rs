//! FTP session settings.

use crate::error::{ConfigError, Result};
use crate::{config_enum, config_struct};
use std::time::Duration;

/// Port used when none (or zero) is configured.
pub const DEFAULT_FTP_PORT: u16 = 21;

/// Connect timeout used when none is configured.
pub const DEFAULT_FTP_TIMEOUT_SECS: u32 = 90;

config_enum! {
    /// Data representation used for FTP transfers.
    pub enum TransferMode {
        /// Image type, bytes are moved untouched
        Binary,
        /// ASCII type, the server may translate line endings
        Text,
    }
    default = Binary
}

config_struct! {
    /// FTP connection configuration.
    pub struct FtpConnection {
        /// FTP server hostname, without scheme or trailing slash
        pub host: String = String::new(),
        /// FTP server port, 0 means the default port
        pub port: u16 = DEFAULT_FTP_PORT,
        /// Username for authentication
        pub username: String = String::new(),
        /// Password (consider using environment variables)
        pub password: Option<String> = None,
        /// Connect timeout in seconds
        pub timeout_secs: u32 = DEFAULT_FTP_TIMEOUT_SECS,
        /// Transfer mode for reads and downloads
        pub transfer_mode: TransferMode = TransferMode::default(),
    }
}

impl FtpConnection {
    /// Port to dial, mapping 0 to the default FTP port.
    pub fn effective_port(&self) -> u16 {
        if self.port == 0 {
            DEFAULT_FTP_PORT
        } else {
            self.port
        }
    }

    /// Connect timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.timeout_secs))
    }

    /// Validates the FTP section.
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(ConfigError::invalid_config(
                "ftp.host",
                "FTP host cannot be empty",
                None,
            ));
        }

        if self.host.contains("://") || self.host.ends_with('/') {
            return Err(ConfigError::invalid_config(
                "ftp.host",
                "FTP host must not carry a scheme or trailing slash",
                None,
            ));
        }

        if self.username.is_empty() {
            return Err(ConfigError::invalid_config(
                "ftp.username",
                "FTP username cannot be empty",
                None,
            ));
        }

        Ok(())
    }
}
