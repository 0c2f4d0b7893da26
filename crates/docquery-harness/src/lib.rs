//! Ephemeral `mongod` for integration tests
//!
//! Starts a throwaway server on a fixed port with a freshly wiped data
//! directory, and tears it down again (process and directory) on `stop` or
//! drop.
//!
//! ```no_run
//! use docquery_harness::{HarnessConfig, Mongod};
//! use std::time::Duration;
//!
//! let mut mongod = Mongod::start(HarnessConfig::from_env()?)?;
//! mongod.wait_until_ready(Duration::from_secs(10))?;
//! let uri = mongod.connection_string().to_uri();
//! // ... run queries against `uri` ...
//! mongod.stop();
//! # Ok::<(), docquery_harness::DocQueryError>(())
//! ```

pub mod config;
pub mod mongod;

pub use config::HarnessConfig;
pub use docquery_common::{DocQueryError, Result};
pub use mongod::{HarnessState, Mongod, ServerHandle};
