//! MongoDB connection management with pool configuration and health checking

use crate::collection::EntityCollection;
use crate::entity::Entity;
use crate::Result;
use bson::doc;
use docquery_common::{ConnectionString, DocQueryError};
use mongodb::{options::ClientOptions, Client, Database};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Connection pool configuration
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Minimum number of connections in the pool (default: 0)
    pub min_pool_size: Option<u32>,
    /// Maximum number of connections in the pool (default: 10)
    pub max_pool_size: Option<u32>,
    /// Connection timeout (default: 10s)
    pub connect_timeout: Option<Duration>,
    /// Server selection timeout (default: 30s)
    pub server_selection_timeout: Option<Duration>,
    /// Application name for server logs
    pub app_name: Option<String>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            min_pool_size: None,
            max_pool_size: Some(10),
            connect_timeout: Some(Duration::from_secs(10)),
            server_selection_timeout: Some(Duration::from_secs(30)),
            app_name: Some("docquery".to_string()),
        }
    }
}

impl PoolConfig {
    /// Short timeouts for a local, freshly started server
    pub fn ephemeral() -> Self {
        Self {
            connect_timeout: Some(Duration::from_secs(1)),
            server_selection_timeout: Some(Duration::from_millis(500)),
            ..Default::default()
        }
    }
}

/// Retry schedule for [`Connection::connect_with_retry`]
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub attempts: u32,
    /// Delay after the first failure; doubles on each retry
    pub initial_backoff: Duration,
    /// Upper bound on a single delay
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 10,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Delay before attempt `attempt + 1` (0-based failure count)
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

/// MongoDB connection manager with pooling support
pub struct Connection {
    database: Database,
}

impl Connection {
    /// Create a new MongoDB connection with default pool settings
    pub async fn new(connection_string: &ConnectionString) -> Result<Self> {
        Self::with_config(connection_string, PoolConfig::default()).await
    }

    /// Create a new MongoDB connection with custom pool configuration
    pub async fn with_config(
        connection_string: &ConnectionString,
        config: PoolConfig,
    ) -> Result<Self> {
        let mut client_options = ClientOptions::parse(connection_string.to_uri()).await?;

        if let Some(min) = config.min_pool_size {
            client_options.min_pool_size = Some(min);
        }
        if let Some(max) = config.max_pool_size {
            client_options.max_pool_size = Some(max);
        }
        if let Some(connect) = config.connect_timeout {
            client_options.connect_timeout = Some(connect);
        }
        if let Some(server_sel) = config.server_selection_timeout {
            client_options.server_selection_timeout = Some(server_sel);
        }
        if let Some(app) = config.app_name {
            client_options.app_name = Some(app);
        }

        let client = Client::with_options(client_options)?;
        let database = client.database(connection_string.database_name());

        Ok(Self { database })
    }

    /// Connect and ping, retrying retryable failures with exponential backoff.
    ///
    /// Intended for the window right after an ephemeral server was spawned,
    /// when it is not accepting connections yet.
    pub async fn connect_with_retry(
        connection_string: &ConnectionString,
        config: PoolConfig,
        policy: &RetryPolicy,
    ) -> Result<Self> {
        let attempts = policy.attempts.max(1);
        let mut attempt = 0;
        loop {
            let result = match Self::with_config(connection_string, config.clone()).await {
                Ok(conn) => conn.ping().await.map(|_| conn),
                Err(e) => Err(e),
            };

            match result {
                Ok(conn) => {
                    info!(uri = %connection_string, attempts = attempt + 1, "connected");
                    return Ok(conn);
                }
                Err(e) if e.is_retryable() && attempt + 1 < attempts => {
                    let delay = policy.backoff(attempt);
                    debug!(error = %e, ?delay, "connection attempt failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    warn!(error = %e, attempts = attempt + 1, "giving up on connection");
                    return Err(e);
                }
            }
        }
    }

    /// Get a reference to the database
    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Get the database name
    pub fn database_name(&self) -> &str {
        self.database.name()
    }

    /// Typed collection for an entity
    pub fn collection<T: Entity>(&self) -> Result<EntityCollection<T>> {
        EntityCollection::new(&self.database)
    }

    /// Check if the connection is healthy by pinging the server
    pub async fn ping(&self) -> Result<()> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| match DocQueryError::from(e) {
                DocQueryError::MongoDB(msg) => {
                    DocQueryError::Connection(format!("Ping failed: {}", msg))
                }
                other => other,
            })?;
        Ok(())
    }

    /// Drop the current database and every collection in it
    pub async fn drop_database(&self) -> Result<()> {
        self.database.drop().await?;
        Ok(())
    }
}
