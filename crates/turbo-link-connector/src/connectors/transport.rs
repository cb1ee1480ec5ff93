//! Contract of the remote file-transfer transport a [`RemoteSession`] drives.
//!
//! [`RemoteSession`]: crate::RemoteSession

use std::io::{Read, Write};
use std::time::Duration;
use turbo_link_config::TransferMode;

/// Error reported by a transport call, surfaced verbatim in session errors.
pub type BackendError = Box<dyn std::error::Error + Send + Sync>;

/// Result of a transport call.
pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Opens transport-level connections.
pub trait FtpConnector {
    /// Handle produced by a successful connect.
    type Handle: FtpHandle;

    /// Dials `host:port`, giving up after `timeout`.
    fn connect(&self, host: &str, port: u16, timeout: Duration) -> BackendResult<Self::Handle>;
}

/// One live control connection.
pub trait FtpHandle {
    /// Authenticates the connection.
    fn login(&mut self, user: &str, password: &str) -> BackendResult<()>;

    /// Lists the entries directly inside `path`, as reported by the server.
    fn name_list(&mut self, path: &str) -> BackendResult<Vec<String>>;

    /// Stores everything `reader` yields at `path`.
    fn put_stream(&mut self, path: &str, reader: &mut dyn Read, mode: TransferMode)
    -> BackendResult<()>;

    /// Retrieves `path` starting at `offset` into `writer`.
    fn get_stream(
        &mut self,
        path: &str,
        writer: &mut dyn Write,
        mode: TransferMode,
        offset: u64,
    ) -> BackendResult<()>;

    /// Ends the connection. Never fails from the caller's point of view.
    fn close(&mut self);
}
