//! In-memory FTP server used by the session tests.

use super::transport::{BackendResult, FtpConnector, FtpHandle};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::io::{Read, Write};
use std::rc::Rc;
use std::time::Duration;
use turbo_link_config::TransferMode;

#[derive(Default)]
struct ServerState {
    users: HashMap<String, String>,
    files: BTreeMap<String, Vec<u8>>,
    unreachable: bool,
    refuse_uploads: bool,
    open_handles: usize,
    last_dial: Option<(String, u16, Duration)>,
    put_modes: Vec<TransferMode>,
    get_modes: Vec<TransferMode>,
}

fn normalize(path: &str) -> String {
    path.trim_matches('/').to_string()
}

/// Cheap to clone; every clone and every handle share the same state.
#[derive(Clone, Default)]
pub struct MemoryFtpServer {
    state: Rc<RefCell<ServerState>>,
}

impl MemoryFtpServer {
    pub fn with_user(user: &str, password: &str) -> Self {
        let server = Self::default();
        server
            .state
            .borrow_mut()
            .users
            .insert(user.to_string(), password.to_string());
        server
    }

    pub fn put(&self, path: &str, data: &[u8]) {
        self.state
            .borrow_mut()
            .files
            .insert(normalize(path), data.to_vec());
    }

    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        self.state.borrow().files.get(&normalize(path)).cloned()
    }

    pub fn set_unreachable(&self) {
        self.state.borrow_mut().unreachable = true;
    }

    pub fn refuse_uploads(&self) {
        self.state.borrow_mut().refuse_uploads = true;
    }

    pub fn open_handles(&self) -> usize {
        self.state.borrow().open_handles
    }

    pub fn last_dial(&self) -> Option<(String, u16, Duration)> {
        self.state.borrow().last_dial.clone()
    }

    pub fn put_modes(&self) -> Vec<TransferMode> {
        self.state.borrow().put_modes.clone()
    }

    pub fn get_modes(&self) -> Vec<TransferMode> {
        self.state.borrow().get_modes.clone()
    }
}

impl FtpConnector for MemoryFtpServer {
    type Handle = MemoryFtpHandle;

    fn connect(&self, host: &str, port: u16, timeout: Duration) -> BackendResult<MemoryFtpHandle> {
        let mut state = self.state.borrow_mut();
        state.last_dial = Some((host.to_string(), port, timeout));
        if state.unreachable {
            return Err("connection refused".into());
        }
        state.open_handles += 1;
        Ok(MemoryFtpHandle {
            state: self.state.clone(),
            authenticated: false,
            closed: false,
        })
    }
}

pub struct MemoryFtpHandle {
    state: Rc<RefCell<ServerState>>,
    authenticated: bool,
    closed: bool,
}

impl MemoryFtpHandle {
    fn require_login(&self) -> BackendResult<()> {
        if self.closed || !self.authenticated {
            return Err("530 Not logged in".into());
        }
        Ok(())
    }
}

impl FtpHandle for MemoryFtpHandle {
    fn login(&mut self, user: &str, password: &str) -> BackendResult<()> {
        let state = self.state.borrow();
        match state.users.get(user) {
            Some(expected) if expected == password => {
                self.authenticated = true;
                Ok(())
            }
            _ => Err("530 Login incorrect".into()),
        }
    }

    fn name_list(&mut self, path: &str) -> BackendResult<Vec<String>> {
        self.require_login()?;
        let dir = normalize(path);
        let state = self.state.borrow();

        let mut entries: Vec<String> = Vec::new();
        for key in state.files.keys() {
            let rest = if dir.is_empty() {
                Some(key.as_str())
            } else {
                key.strip_prefix(&dir).and_then(|r| r.strip_prefix('/'))
            };
            if let Some(rest) = rest {
                let entry = rest.split('/').next().unwrap_or_default();
                // servers report entries prefixed with the listed directory
                let reported = format!("/{}/{}", dir, entry).replace("//", "/");
                if !entries.contains(&reported) {
                    entries.push(reported);
                }
            }
        }

        if entries.is_empty() && !dir.is_empty() {
            return Err(format!("550 {}: No such file or directory", path).into());
        }
        Ok(entries)
    }

    fn put_stream(
        &mut self,
        path: &str,
        reader: &mut dyn Read,
        mode: TransferMode,
    ) -> BackendResult<()> {
        self.require_login()?;
        let mut state = self.state.borrow_mut();
        state.put_modes.push(mode);
        if state.refuse_uploads {
            return Err("553 Could not create file".into());
        }
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        state.files.insert(normalize(path), data);
        Ok(())
    }

    fn get_stream(
        &mut self,
        path: &str,
        writer: &mut dyn Write,
        mode: TransferMode,
        offset: u64,
    ) -> BackendResult<()> {
        self.require_login()?;
        let mut state = self.state.borrow_mut();
        state.get_modes.push(mode);
        let data = state
            .files
            .get(&normalize(path))
            .ok_or_else(|| format!("550 {}: No such file", path))?;
        let start = usize::try_from(offset)?.min(data.len());
        writer.write_all(&data[start..])?;
        Ok(())
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.state.borrow_mut().open_handles -= 1;
        }
    }
}
