//! Error taxonomy shared by every connector.

use thiserror::Error;
use turbo_link_config::ConfigError;

/// Failure kinds shared by every connector.
///
/// None of these are retried internally; each one ends the operation that raised it.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Transport-level connect failed (host, port, timeout or reachability)
    #[error("Connection failed: {message}")]
    Connection {
        /// Target and transport error
        message: String,
    },

    /// Login was rejected by the remote endpoint
    #[error("Authentication failed: {reason}")]
    Auth {
        /// User and server response
        reason: String,
    },

    /// The remote listing call reported failure
    #[error("Could not get directory list for {path}: {reason}")]
    List {
        /// Directory that was listed
        path: String,
        /// Server response
        reason: String,
    },

    /// An in-memory stream bridge could not be created
    #[error("Stream error: {operation} - {reason}")]
    Stream {
        /// Stream use that failed
        operation: String,
        /// Allocation error
        reason: String,
    },

    /// The session handle was already released
    #[error("Connection is not active, {operation} refused")]
    NotConnected {
        /// Operation that was refused
        operation: String,
    },

    /// The remote read or write reported failure
    #[error("Transfer failed for {path}: {reason}")]
    Transfer {
        /// Remote file path
        path: String,
        /// Server response
        reason: String,
    },

    /// Outbound message state violated the validation pipeline
    #[error("{message}")]
    Validation {
        /// First failed check
        message: String,
    },

    /// Token exchange or provider send failed
    #[error("Transport error: {message}")]
    Transport {
        /// Provider or network error text
        message: String,
    },

    /// Provider configuration or bootstrap resource is unusable
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Local IO failure outside a transfer
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A global tracing subscriber was already installed
    #[error(transparent)]
    Logging(#[from] tracing_subscriber::util::TryInitError),
}

/// Taxonomy member of a [`CoreError`], for callers that branch on the kind only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum ErrorKind {
    Connection,
    Auth,
    List,
    Stream,
    NotConnected,
    Transfer,
    Validation,
    Transport,
    Config,
    Io,
    Logging,
}

impl CoreError {
    /// Builds a validation error from a human readable message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Builds a transport error carrying the underlying provider text.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Builds a not-connected error naming the refused operation.
    pub fn not_connected(operation: impl Into<String>) -> Self {
        Self::NotConnected {
            operation: operation.into(),
        }
    }

    /// Returns the taxonomy member of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Connection { .. } => ErrorKind::Connection,
            CoreError::Auth { .. } => ErrorKind::Auth,
            CoreError::List { .. } => ErrorKind::List,
            CoreError::Stream { .. } => ErrorKind::Stream,
            CoreError::NotConnected { .. } => ErrorKind::NotConnected,
            CoreError::Transfer { .. } => ErrorKind::Transfer,
            CoreError::Validation { .. } => ErrorKind::Validation,
            CoreError::Transport { .. } => ErrorKind::Transport,
            CoreError::Config(_) => ErrorKind::Config,
            CoreError::Io(_) => ErrorKind::Io,
            CoreError::Logging(_) => ErrorKind::Logging,
        }
    }
}

/// Result type alias for operations that can fail with a [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;
