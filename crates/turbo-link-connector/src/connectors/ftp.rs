//! Single-owner FTP sessions.

use super::suppa::{SuppaFtpConnector, SuppaFtpHandle};
use super::transport::{FtpConnector, FtpHandle};
use crate::stream::StreamBridge;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};
use turbo_link_config::{DEFAULT_FTP_PORT, DEFAULT_FTP_TIMEOUT_SECS, FtpConnection, TransferMode};
use turbo_link_core::{CoreError, PathExt, Result, path_element};

/// Connect timeout used when the caller passes none.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(DEFAULT_FTP_TIMEOUT_SECS as u64);

/// A synchronous FTP session that owns exactly one control connection.
///
/// A session only exists once connect and login have both succeeded. The
/// connection is released by [`RemoteSession::close`] or, failing that, when the
/// session is dropped; both paths are idempotent.
///
/// Sessions are single owner: every operation takes `&mut self`, so the borrow
/// checker serializes access and there is no internal locking.
///
/// # Examples
///
/// ```ignore
/// use turbo_link_connector::RemoteSession;
///
/// let mut session = RemoteSession::open("deploy", "secret", "files.example.com", None, None)?;
/// session.write_file("/inbox/report.csv", b"id,total\n1,20\n")?;
/// let names = session.list_directory("/inbox")?;
/// session.close();
/// ```
pub struct RemoteSession<H: FtpHandle = SuppaFtpHandle> {
    host: String,
    port: u16,
    username: String,
    /// `Some` while live, `None` once closed
    handle: Option<H>,
    transfer_mode: TransferMode,
    last_error: String,
}

impl RemoteSession<SuppaFtpHandle> {
    /// Connects to `host` and logs in as `user` over plain FTP.
    ///
    /// A `port` of `None` or `0` means port 21, a `timeout` of `None` means 90 seconds.
    ///
    /// # Errors
    ///
    /// * [`CoreError::Connection`] if the server cannot be reached
    /// * [`CoreError::Auth`] if the login is rejected; the connection is closed first
    pub fn open(
        user: &str,
        password: &str,
        host: &str,
        port: Option<u16>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        Self::open_with(&SuppaFtpConnector, user, password, host, port, timeout)
    }

    /// Opens a session from an [`FtpConnection`] configuration section.
    pub fn from_config(config: &FtpConnection) -> Result<Self> {
        Self::from_config_with(&SuppaFtpConnector, config)
    }
}

impl<H: FtpHandle> RemoteSession<H> {
    /// Connects and authenticates through an arbitrary [`FtpConnector`].
    #[tracing::instrument(skip(connector, password))]
    pub fn open_with<C>(
        connector: &C,
        user: &str,
        password: &str,
        host: &str,
        port: Option<u16>,
        timeout: Option<Duration>,
    ) -> Result<Self>
    where
        C: FtpConnector<Handle = H>,
    {
        let port = match port {
            Some(port) if port != 0 => port,
            _ => DEFAULT_FTP_PORT,
        };
        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);

        let mut handle =
            connector
                .connect(host, port, timeout)
                .map_err(|e| CoreError::Connection {
                    message: format!(
                        "Ftp connection error to {}:{}, verify host / port parameters and connection is available: {}",
                        host, port, e
                    ),
                })?;

        if let Err(e) = handle.login(user, password) {
            handle.close();
            warn!(error = %e, "ftp login rejected, connection closed");
            return Err(CoreError::Auth {
                reason: format!("Ftp login error for {}, verify user credentials: {}", user, e),
            });
        }

        info!("ftp session opened");

        Ok(Self {
            host: host.to_string(),
            port,
            username: user.to_string(),
            handle: Some(handle),
            transfer_mode: TransferMode::default(),
            last_error: String::new(),
        })
    }

    /// Opens a session through `connector` using a configuration section.
    pub fn from_config_with<C>(connector: &C, config: &FtpConnection) -> Result<Self>
    where
        C: FtpConnector<Handle = H>,
    {
        config.validate()?;

        let mut session = Self::open_with(
            connector,
            &config.username,
            config.password.as_deref().unwrap_or_default(),
            &config.host,
            Some(config.effective_port()),
            Some(config.timeout()),
        )?;
        session.set_transfer_mode(config.transfer_mode);
        Ok(session)
    }

    /// Whether the session still holds its connection.
    pub fn is_live(&self) -> bool {
        self.handle.is_some()
    }

    /// Message of the most recent failure, empty if nothing failed yet.
    pub fn last_error(&self) -> &str {
        &self.last_error
    }

    /// Transfer mode used by [`read_file`](Self::read_file) and
    /// [`download_file`](Self::download_file).
    pub fn transfer_mode(&self) -> TransferMode {
        self.transfer_mode
    }

    /// Changes the transfer mode for subsequent reads and downloads.
    pub fn set_transfer_mode(&mut self, mode: TransferMode) {
        self.transfer_mode = mode;
    }

    /// Host this session is connected to.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port this session dialed.
    pub fn port(&self) -> u16 {
        self.port
    }

    fn record(&mut self, message: String) {
        warn!(host = %self.host, "{}", message);
        self.last_error = message;
    }

    fn fail(&mut self, err: CoreError) -> CoreError {
        self.record(err.to_string());
        err
    }

    fn live_handle(&mut self, operation: &str) -> Result<&mut H> {
        match self.handle.as_mut() {
            Some(handle) => Ok(handle),
            None => {
                // `self.handle` stays borrowed, so record through the other fields
                let err = CoreError::not_connected(operation);
                warn!(host = %self.host, "{}", err);
                self.last_error = err.to_string();
                Err(err)
            }
        }
    }

    /// Lists the names of the entries directly inside `path`, without their
    /// directory prefix. Sub directories are not descended into.
    ///
    /// # Errors
    ///
    /// [`CoreError::List`] if the server refuses the listing,
    /// [`CoreError::NotConnected`] after [`close`](Self::close).
    #[tracing::instrument(skip(self), fields(host = %self.host))]
    pub fn list_directory(&mut self, path: &str) -> Result<Vec<String>> {
        let listing = self.live_handle("list directory")?.name_list(path);

        match listing {
            Ok(entries) => {
                debug!(count = entries.len(), "listed remote directory");
                Ok(entries
                    .iter()
                    .map(|entry| path_element(entry).to_string())
                    .collect())
            }
            Err(e) => Err(self.fail(CoreError::List {
                path: path.to_string(),
                reason: e.to_string(),
            })),
        }
    }

    /// Lists the server root, `/`.
    pub fn list_root(&mut self) -> Result<Vec<String>> {
        self.list_directory("/")
    }

    /// Stores `data` at `remote_path` straight from memory, always in binary mode.
    ///
    /// Returns whether the server accepted the upload; the reason for a `false`
    /// is kept in [`last_error`](Self::last_error).
    ///
    /// # Errors
    ///
    /// [`CoreError::Stream`] if the in-memory stream cannot be created,
    /// [`CoreError::NotConnected`] after [`close`](Self::close).
    #[tracing::instrument(skip(self, data), fields(host = %self.host, len = data.len()))]
    pub fn write_file(&mut self, remote_path: &str, data: &[u8]) -> Result<bool> {
        let mut stream = StreamBridge::from_bytes(data).map_err(|e| self.fail(e))?;

        let stored = self.live_handle("write file")?.put_stream(
            remote_path,
            &mut stream,
            TransferMode::Binary,
        );

        match stored {
            Ok(()) => {
                debug!("remote file written");
                Ok(true)
            }
            Err(e) => {
                self.record(format!("Could not write to file {}: {}", remote_path, e));
                Ok(false)
            }
        }
    }

    /// Reads a whole remote file into memory without touching the disk.
    ///
    /// Large files are held entirely in memory; use
    /// [`download_file`](Self::download_file) for those.
    ///
    /// # Errors
    ///
    /// * [`CoreError::Stream`] if the in-memory stream cannot be created
    /// * [`CoreError::NotConnected`] after [`close`](Self::close)
    /// * [`CoreError::Transfer`] if the server reports a failed read
    #[tracing::instrument(skip(self), fields(host = %self.host))]
    pub fn read_file(&mut self, remote_path: &str) -> Result<Vec<u8>> {
        let mut stream = StreamBridge::new_empty().map_err(|e| self.fail(e))?;
        let mode = self.transfer_mode;

        let fetched = self
            .live_handle("read file")?
            .get_stream(remote_path, &mut stream, mode, 0);

        if let Err(e) = fetched {
            return Err(self.fail(CoreError::Transfer {
                path: remote_path.to_string(),
                reason: e.to_string(),
            }));
        }

        stream.rewind();
        stream.read_to_vec().map_err(|e| self.fail(e))
    }

    /// Copies a remote file to `local_path`, replacing any existing file.
    ///
    /// Unlike [`read_file`](Self::read_file) a failed transfer is reported as
    /// `Ok(false)` rather than an error, and so is a local file that cannot be
    /// created. A partially written local file is left in place.
    ///
    /// # Errors
    ///
    /// Only [`CoreError::NotConnected`] after [`close`](Self::close).
    #[tracing::instrument(skip(self, local_path), fields(host = %self.host, local = %local_path.as_ref().to_slash_lossy()))]
    pub fn download_file(&mut self, remote_path: &str, local_path: impl AsRef<Path>) -> Result<bool> {
        let local_path = local_path.as_ref();
        let mode = self.transfer_mode;
        self.live_handle("download file")?;

        let file = match File::create(local_path) {
            Ok(file) => file,
            Err(e) => {
                self.record(format!(
                    "Could not create local file {}: {}",
                    local_path.to_slash_lossy(),
                    e
                ));
                return Ok(false);
            }
        };
        let mut writer = BufWriter::new(file);

        let fetched = self
            .live_handle("download file")?
            .get_stream(remote_path, &mut writer, mode, 0);
        let flushed = writer.flush();

        match (fetched, flushed) {
            (Ok(()), Ok(())) => Ok(true),
            (Err(e), _) => {
                self.record(format!("Error downloading FTP file {}: {}", remote_path, e));
                Ok(false)
            }
            (Ok(()), Err(e)) => {
                self.record(format!(
                    "Error writing {}: {}",
                    local_path.to_slash_lossy(),
                    e
                ));
                Ok(false)
            }
        }
    }

    /// Releases the connection. Calling it again, or dropping the session
    /// afterwards, does nothing.
    pub fn close(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.close();
            info!(host = %self.host, user = %self.username, "ftp session closed");
        }
    }
}

impl<H: FtpHandle> Drop for RemoteSession<H> {
    fn drop(&mut self) {
        self.close();
    }
}
