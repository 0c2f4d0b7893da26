//! Ephemeral `mongod` process harness
//!
//! One [`Mongod`] owns at most one running server. Starting wipes and
//! recreates the data directory, then spawns the executable bound to that
//! directory and the configured port. Stopping is best-effort and never fails;
//! it also runs on drop, so the process and directory are released on every
//! exit path.
//!
//! `start` returns as soon as the process is spawned. Use
//! [`Mongod::wait_until_ready`] or a retrying connect before the first query.

use crate::config::HarnessConfig;
use docquery_common::{ConnectionString, DocQueryError, Result};
use std::fs;
use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Poll interval while waiting for exit or readiness
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Lifecycle of a harness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessState {
    Uninitialized,
    Starting,
    Running,
    Terminating,
    Terminated,
}

/// A running server process
#[derive(Debug)]
pub struct ServerHandle {
    child: Child,
    port: u16,
    data_dir: PathBuf,
}

impl ServerHandle {
    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Kill, wait up to `timeout` for exit, then release the handle.
    fn terminate(mut self, timeout: Duration) {
        let pid = self.child.id();
        if let Err(e) = self.child.kill() {
            // InvalidInput: already exited and reaped
            if e.kind() != io::ErrorKind::InvalidInput {
                warn!(pid, error = %e, "failed to signal server process");
            }
        }

        let deadline = Instant::now() + timeout;
        loop {
            match self.child.try_wait() {
                Ok(Some(status)) => {
                    debug!(pid, %status, "server process exited");
                    break;
                }
                Ok(None) if Instant::now() >= deadline => {
                    warn!(pid, ?timeout, "server process did not exit in time");
                    break;
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    warn!(pid, error = %e, "failed to wait for server process");
                    break;
                }
            }
        }
    }
}

/// Ephemeral server harness
#[derive(Debug)]
pub struct Mongod {
    config: HarnessConfig,
    state: HarnessState,
    handle: Option<ServerHandle>,
}

impl Mongod {
    /// Harness that has not started anything yet
    pub fn new(config: HarnessConfig) -> Self {
        Self {
            config,
            state: HarnessState::Uninitialized,
            handle: None,
        }
    }

    /// Create a harness and start the server
    pub fn start(config: HarnessConfig) -> Result<Self> {
        let mut mongod = Self::new(config);
        mongod.launch()?;
        Ok(mongod)
    }

    /// Start the server process.
    ///
    /// # Errors
    ///
    /// Returns `Launch` if a server is already running, the executable cannot
    /// be found, the data directory cannot be recreated, or spawning fails.
    pub fn launch(&mut self) -> Result<&ServerHandle> {
        if let Some(handle) = &self.handle {
            return Err(DocQueryError::Launch(format!(
                "server already running (pid {}, port {})",
                handle.pid(),
                handle.port()
            )));
        }

        self.state = HarnessState::Starting;
        match self.spawn() {
            Ok(handle) => {
                info!(
                    pid = handle.pid(),
                    port = handle.port(),
                    data_dir = %handle.data_dir().display(),
                    "started ephemeral server"
                );
                self.state = HarnessState::Running;
                Ok(&*self.handle.insert(handle))
            }
            Err(e) => {
                self.state = HarnessState::Uninitialized;
                Err(e)
            }
        }
    }

    fn spawn(&self) -> Result<ServerHandle> {
        let executable = self.config.executable_path()?;
        let data_dir = self.config.resolved_data_dir();
        recreate_dir(&data_dir).map_err(|e| {
            DocQueryError::Launch(format!(
                "cannot recreate data directory {}: {}",
                data_dir.display(),
                e
            ))
        })?;

        let child = Command::new(&executable)
            .arg("--port")
            .arg(self.config.port.to_string())
            .arg("--dbpath")
            .arg(&data_dir)
            .args(&self.config.extra_args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                DocQueryError::Launch(format!("failed to spawn {}: {}", executable.display(), e))
            })?;

        Ok(ServerHandle {
            child,
            port: self.config.port,
            data_dir,
        })
    }

    /// Stop the server and remove its data directory.
    ///
    /// Never fails: errors are logged and swallowed. Safe to call repeatedly,
    /// after a failed start, or on a harness that never started.
    pub fn stop(&mut self) {
        let Some(handle) = self.handle.take() else {
            if self.state != HarnessState::Uninitialized {
                self.state = HarnessState::Terminated;
            }
            return;
        };

        self.state = HarnessState::Terminating;
        let data_dir = handle.data_dir.clone();
        let pid = handle.pid();
        handle.terminate(self.config.stop_timeout);

        if let Err(e) = fs::remove_dir_all(&data_dir) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(dir = %data_dir.display(), error = %e, "failed to remove data directory");
            }
        }

        info!(pid, "stopped ephemeral server");
        self.state = HarnessState::Terminated;
    }

    /// Block until the server accepts TCP connections on the configured host.
    ///
    /// # Errors
    ///
    /// `Launch` if nothing is running, the process exited, or the host does
    /// not resolve; `Timeout` if the port did not open within `timeout`.
    pub fn wait_until_ready(&mut self, timeout: Duration) -> Result<()> {
        let Some(handle) = self.handle.as_mut() else {
            return Err(DocQueryError::Launch("server is not running".to_string()));
        };

        let host = self.config.host.as_str();
        let addrs: Vec<SocketAddr> = (host, handle.port)
            .to_socket_addrs()
            .map_err(|e| DocQueryError::Launch(format!("cannot resolve host '{}': {}", host, e)))?
            .collect();
        if addrs.is_empty() {
            return Err(DocQueryError::Launch(format!(
                "host '{}' resolved to no addresses",
                host
            )));
        }

        let deadline = Instant::now() + timeout;
        loop {
            match handle.child.try_wait() {
                Ok(Some(status)) => {
                    return Err(DocQueryError::Launch(format!(
                        "server exited prematurely with status: {}",
                        status
                    )))
                }
                Ok(None) => {}
                Err(e) => {
                    return Err(DocQueryError::Launch(format!(
                        "failed to check process status: {}",
                        e
                    )))
                }
            }

            if addrs
                .iter()
                .any(|addr| TcpStream::connect_timeout(addr, POLL_INTERVAL * 10).is_ok())
            {
                debug!(host, port = handle.port, "server is accepting connections");
                return Ok(());
            }

            if Instant::now() >= deadline {
                return Err(DocQueryError::Timeout(format!(
                    "server on {}:{} not ready after {:?}",
                    host, handle.port, timeout
                )));
            }
            thread::sleep(POLL_INTERVAL * 5);
        }
    }

    pub fn state(&self) -> HarnessState {
        self.state
    }

    pub fn handle(&self) -> Option<&ServerHandle> {
        self.handle.as_ref()
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Connection string for the configured host, port and database
    pub fn connection_string(&self) -> ConnectionString {
        self.config.connection_string()
    }
}

impl Drop for Mongod {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Remove `dir` if present, then create it empty.
fn recreate_dir(dir: &Path) -> io::Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    fs::create_dir_all(dir)
}
