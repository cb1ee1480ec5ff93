//! Connector configuration system.
//!
//! Settings for FTP sessions, the Graph mail provider and logging are kept in one
//! TOML document. Values are layered: built-in defaults, then the file, then
//! `TURBO_LINK_*` environment variables (sections separated by `__`).

#![cfg_attr(not(debug_assertions), forbid(missing_docs))]

pub mod error;
pub mod ftp;
pub mod logging;
pub mod macros;
pub mod mail;
pub mod prelude;

use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

pub use error::*;
pub use ftp::*;
pub use logging::*;
pub use mail::*;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "TURBO_LINK";

/// File name used inside the platform configuration directory.
pub const CONFIG_FILE_NAME: &str = "connector.toml";

/// Project directories for turbo-link, if the platform exposes a home directory.
pub static PROJECT_DIRS: LazyLock<Option<ProjectDirs>> =
    LazyLock::new(|| ProjectDirs::from("org", "turboframework", "turbo-link"));

config_struct! {
    /// Complete connector configuration.
    pub struct ConnectorConfig {
        /// Logging settings
        pub logging: LoggingConfig = LoggingConfig::default(),
        /// FTP session settings
        pub ftp: FtpConnection = FtpConnection::default(),
        /// Graph mail provider settings
        pub mail: GraphMailConfig = GraphMailConfig::default(),
    }
}

config_accessors!(ConnectorConfig,
    logging: LoggingConfig,
    ftp: FtpConnection,
    mail: GraphMailConfig
);

impl ConnectorConfig {
    /// Loads configuration from a TOML file, applying environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if `path` is not an existing file, and
    /// [`ConfigError::Source`] if the layered sources cannot be merged or deserialized.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ConfigError::not_found(path));
        }

        let settings = config::Config::builder()
            .set_default("logging", LoggingConfig::default())?
            .set_default("ftp", FtpConnection::default())?
            .set_default("mail", GraphMailConfig::default())?
            .add_source(config::File::new(
                &path.to_string_lossy(),
                config::FileFormat::Toml,
            ))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Loads `connector.toml` from `config_dir`, or from the platform configuration
    /// directory when `None`. A default file is written first if none exists.
    pub fn from_dir(config_dir: Option<&Path>) -> Result<Self> {
        let config_dir = match config_dir {
            Some(dir) => dir.to_path_buf(),
            None => Self::default_dir()?,
        };

        std::fs::create_dir_all(&config_dir).map_err(|e| {
            ConfigError::io_error(
                "create config directory",
                format!("Failed to create config directory: {}", e),
                Some(e),
            )
        })?;

        let config_file = config_dir.join(CONFIG_FILE_NAME);
        if !config_file.exists() {
            Self::default().save(&config_file)?;
        }

        Self::load(&config_file)
    }

    /// Platform configuration directory.
    pub fn default_dir() -> Result<PathBuf> {
        PROJECT_DIRS
            .as_ref()
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Saves configuration to `path` as pretty TOML.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            ConfigError::serialization_error(
                "TOML",
                format!("Failed to serialize connector config: {}", e),
                Some(Box::new(e)),
            )
        })?;

        std::fs::write(path, content).map_err(|e| {
            ConfigError::io_error(
                "write connector config",
                format!("Failed to write {}: {}", path.display(), e),
                Some(e),
            )
        })?;

        Ok(())
    }
}
