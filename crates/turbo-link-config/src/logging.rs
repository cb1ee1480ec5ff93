//! Logging settings.

use crate::{config_enum, config_struct};

config_enum! {
    /// Default verbosity when `RUST_LOG` is not set.
    pub enum LogLevel {
        /// Trace level logging
        Trace,
        /// Debug level logging
        Debug,
        /// Info level logging
        Info,
        /// Warning level logging
        Warn,
        /// Error level logging
        Error,
    }
    default = Info
}

config_enum! {
    /// How the rolling log file is named.
    pub enum LogFileNameFormat {
        /// `turbo-link-2024-05-01.log`
        Date,
        /// Unix timestamp suffix
        Timestamp,
        /// Date and time suffix
        DateTime,
        /// Fixed `turbo-link.log`
        None,
    }
    default = DateTime
}

config_struct! {
    /// Logging settings consumed by `turbo_link_core::logging::tracing`.
    pub struct LoggingConfig {
        /// log level used when no `RUST_LOG` filter is present
        pub log_level: LogLevel = LogLevel::default(),
        /// naming scheme for the rolling log file
        pub log_file: LogFileNameFormat = LogFileNameFormat::default(),
        /// whether to log to stdout in addition to file
        pub log_to_stdout: bool = false,
    }
}

impl LogLevel {
    /// Returns the directive understood by an `EnvFilter`.
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
