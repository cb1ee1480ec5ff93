//! Resource-safe connectors for FTP sessions and HTTP mail APIs.
//!
//! The member crates can be used on their own; this crate re-exports them and
//! adds [`Connectors`], the startup sequence an application runs once: locate the
//! configuration, start logging, then hand out sessions and transports built from
//! the loaded settings.

#![cfg_attr(not(debug_assertions), forbid(missing_docs))]

pub mod prelude;

pub use turbo_link_config;
pub use turbo_link_connector;
pub use turbo_link_core;
pub use turbo_link_mail;

use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use turbo_link_config::ConnectorConfig;
use turbo_link_connector::RemoteSession;
use turbo_link_core::Result;
use turbo_link_mail::GraphMailTransport;

/// Loaded configuration plus the logging guards that keep file output flowing.
pub struct Connectors {
    config: ConnectorConfig,
    config_dir: PathBuf,
    _guards: Vec<WorkerGuard>,
}

impl Connectors {
    /// Loads `connector.toml` from `config_dir` (or the platform directory), writing
    /// defaults first if it is absent, and installs the global tracing subscriber
    /// with its files under `<config_dir>/logs`.
    ///
    /// # Errors
    ///
    /// [`CoreError::Config`](turbo_link_core::CoreError::Config) if the configuration cannot be located or parsed,
    /// [`CoreError::Io`](turbo_link_core::CoreError::Io) if the log directory cannot be created and
    /// [`CoreError::Logging`](turbo_link_core::CoreError::Logging) if a subscriber is already installed.
    pub fn bootstrap(config_dir: Option<&Path>) -> Result<Self> {
        let config_dir = match config_dir {
            Some(dir) => dir.to_path_buf(),
            None => ConnectorConfig::default_dir()?,
        };
        let config = ConnectorConfig::from_dir(Some(&config_dir))?;

        let log_dir = config_dir.join("logs");
        std::fs::create_dir_all(&log_dir)?;
        let guards = turbo_link_core::logging::tracing(&log_dir, config.logging())?;

        info!("Using configuration directory: {}", config_dir.display());

        Ok(Self {
            config,
            config_dir,
            _guards: guards,
        })
    }

    /// The loaded configuration.
    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    /// Directory the configuration was loaded from.
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Opens an FTP session for the `[ftp]` section.
    pub fn open_ftp(&self) -> Result<RemoteSession> {
        RemoteSession::from_config(self.config.ftp())
    }

    /// Builds the Graph mail transport for the `[mail]` section.
    ///
    /// # Errors
    ///
    /// [`CoreError::Config`](turbo_link_core::CoreError::Config) if the credential triple is incomplete or an endpoint
    /// is unusable.
    pub fn graph_mail(&self) -> Result<GraphMailTransport> {
        self.config.mail().validate()?;
        GraphMailTransport::new(self.config.mail())
    }
}
