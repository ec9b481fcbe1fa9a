// SQLite Connection Pool Setup

use crate::error::map_sqlx_error;
use registrar_core::error::{AppError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Bounds of the shared connection pool
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 5,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// Create the SQLite connection pool every repository leases from
///
/// Foreign keys are left unenforced on purpose: course deletion semantics
/// belong to the course service's delete policy.
pub async fn create_pool(database_url: &str, config: &PoolConfig) -> Result<SqlitePool> {
    let mut options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| AppError::Config(format!("Invalid database URL '{}': {}", database_url, e)))?
        .busy_timeout(Duration::from_secs(5))
        .foreign_keys(false)
        .create_if_missing(true);

    if !is_in_memory(database_url) {
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    debug!(
        database_url,
        max_connections = config.max_connections,
        "Opening SQLite pool"
    );

    // min_connections keeps a shared in-memory database alive between calls
    SqlitePoolOptions::new()
        .max_connections(config.max_connections.max(1))
        .min_connections(1)
        .acquire_timeout(config.acquire_timeout)
        .connect_with(options)
        .await
        .map_err(map_sqlx_error)
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}
