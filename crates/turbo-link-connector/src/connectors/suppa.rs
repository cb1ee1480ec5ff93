//! `suppaftp` implementation of the FTP transport.

use super::transport::{BackendResult, FtpConnector, FtpHandle};
use std::io::{Read, Write};
use std::net::ToSocketAddrs;
use std::time::Duration;
use suppaftp::types::{FileType, FormatControl};
use suppaftp::{FtpError, FtpStream};
use tracing::debug;
use turbo_link_config::TransferMode;

fn file_type(mode: TransferMode) -> FileType {
    match mode {
        TransferMode::Binary => FileType::Binary,
        TransferMode::Text => FileType::Ascii(FormatControl::Default),
    }
}

/// Plain FTP connector backed by `suppaftp`'s blocking client.
#[derive(Debug, Default, Clone, Copy)]
pub struct SuppaFtpConnector;

impl FtpConnector for SuppaFtpConnector {
    type Handle = SuppaFtpHandle;

    fn connect(&self, host: &str, port: u16, timeout: Duration) -> BackendResult<SuppaFtpHandle> {
        let mut last_error: Option<std::io::Error> = None;

        // Try every resolved address in order, like a plain TCP connect would.
        for addr in (host, port).to_socket_addrs()? {
            debug!(%addr, "dialing ftp server");
            match FtpStream::connect_timeout(addr, timeout) {
                Ok(stream) => return Ok(SuppaFtpHandle { stream }),
                Err(FtpError::ConnectionError(e)) => last_error = Some(e),
                Err(e) => return Err(e.into()),
            }
        }

        Err(match last_error {
            Some(e) => e.into(),
            None => format!("{} did not resolve to any address", host).into(),
        })
    }
}

/// Live `suppaftp` control connection.
pub struct SuppaFtpHandle {
    stream: FtpStream,
}

impl FtpHandle for SuppaFtpHandle {
    fn login(&mut self, user: &str, password: &str) -> BackendResult<()> {
        Ok(self.stream.login(user, password)?)
    }

    fn name_list(&mut self, path: &str) -> BackendResult<Vec<String>> {
        Ok(self.stream.nlst(Some(path))?)
    }

    fn put_stream(
        &mut self,
        path: &str,
        mut reader: &mut dyn Read,
        mode: TransferMode,
    ) -> BackendResult<()> {
        self.stream.transfer_type(file_type(mode))?;
        let written = self.stream.put_file(path, &mut reader)?;
        debug!(path, written, "stored remote file");
        Ok(())
    }

    fn get_stream(
        &mut self,
        path: &str,
        writer: &mut dyn Write,
        mode: TransferMode,
        offset: u64,
    ) -> BackendResult<()> {
        self.stream.transfer_type(file_type(mode))?;
        if offset > 0 {
            self.stream.resume_transfer(usize::try_from(offset)?)?;
        }
        let copied = self.stream.retr(path, |data| {
            std::io::copy(data, &mut *writer).map_err(FtpError::ConnectionError)
        })?;
        debug!(path, copied, "retrieved remote file");
        Ok(())
    }

    fn close(&mut self) {
        if let Err(e) = self.stream.quit() {
            debug!(error = %e, "ftp quit failed, dropping connection anyway");
        }
    }
}
