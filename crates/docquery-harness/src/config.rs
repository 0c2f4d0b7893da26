//! Harness configuration
//!
//! Loaded from the environment with fallbacks for every value:
//!
//! | variable | default |
//! |---|---|
//! | `MONGOD_PATH` | none; starting fails until it is set |
//! | `DOCQUERY_TEST_PORT` | `27701` |
//! | `DOCQUERY_HOST` | `localhost` |
//! | `DOCQUERY_DATABASE` | `NormTests` |
//! | `DOCQUERY_DATA_DIR` | `<tmp>/docquery-mongod-<port>` |
//! | `DOCQUERY_MONGOD_ARGS` | `--smallfiles` |

use docquery_common::uri::{DEFAULT_DATABASE, DEFAULT_HOST, DEFAULT_PORT};
use docquery_common::{ConnectionString, DocQueryError, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Executable name looked up in the configured directory
pub const DEFAULT_EXECUTABLE: &str = "mongod";

/// How long `stop` waits for the process to exit
pub const DEFAULT_STOP_TIMEOUT: Duration = Duration::from_millis(200);

/// Ephemeral server configuration
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Directory containing the server executable
    pub mongod_dir: Option<PathBuf>,
    /// Executable file name
    pub executable: String,
    /// Port the server binds to
    pub port: u16,
    /// Host clients connect to
    pub host: String,
    /// Database used by tests
    pub database: String,
    /// Data directory; wiped on every start
    pub data_dir: Option<PathBuf>,
    /// Low-footprint flags appended after `--port` and `--dbpath`
    pub extra_args: Vec<String>,
    /// Bounded wait for exit during `stop`
    pub stop_timeout: Duration,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            mongod_dir: None,
            executable: DEFAULT_EXECUTABLE.to_string(),
            port: DEFAULT_PORT,
            host: DEFAULT_HOST.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            data_dir: None,
            extra_args: vec!["--smallfiles".to_string()],
            stop_timeout: DEFAULT_STOP_TIMEOUT,
        }
    }
}

impl HarnessConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(dir) = lookup("MONGOD_PATH").filter(|v| !v.is_empty()) {
            config.mongod_dir = Some(PathBuf::from(dir));
        }
        if let Some(port) = lookup("DOCQUERY_TEST_PORT").filter(|v| !v.is_empty()) {
            config.port = port.parse().map_err(|_| {
                DocQueryError::Validation(format!("DOCQUERY_TEST_PORT is not a port: '{}'", port))
            })?;
        }
        if let Some(host) = lookup("DOCQUERY_HOST").filter(|v| !v.is_empty()) {
            config.host = host;
        }
        if let Some(database) = lookup("DOCQUERY_DATABASE").filter(|v| !v.is_empty()) {
            config.database = database;
        }
        if let Some(dir) = lookup("DOCQUERY_DATA_DIR").filter(|v| !v.is_empty()) {
            config.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(args) = lookup("DOCQUERY_MONGOD_ARGS") {
            config.extra_args = args.split_whitespace().map(str::to_string).collect();
        }

        Ok(config)
    }

    /// Set the directory containing the executable
    pub fn mongod_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.mongod_dir = Some(dir.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    pub fn extra_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Data directory for this configuration; defaults to one per port
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            env::temp_dir().join(format!("docquery-mongod-{}", self.port))
        })
    }

    /// Locate the server executable inside `mongod_dir`.
    ///
    /// # Errors
    ///
    /// `Launch` if no directory is configured, the executable name is empty,
    /// or the file does not exist.
    pub fn executable_path(&self) -> Result<PathBuf> {
        let Some(dir) = &self.mongod_dir else {
            return Err(DocQueryError::Launch(
                "MONGOD_PATH is not configured".to_string(),
            ));
        };
        if self.executable.is_empty() {
            return Err(DocQueryError::Launch(
                "server executable name is not configured".to_string(),
            ));
        }

        let candidate = dir.join(&self.executable);
        if candidate.is_file() {
            Ok(candidate)
        } else {
            Err(DocQueryError::Launch(format!(
                "server executable not found at {}",
                candidate.display()
            )))
        }
    }

    /// Connection string for the configured host, port and database
    pub fn connection_string(&self) -> ConnectionString {
        ConnectionString::new(self.host.clone(), self.port).database(self.database.clone())
    }
}
