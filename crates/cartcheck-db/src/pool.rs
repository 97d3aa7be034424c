//! # Catalog Database
//!
//! Opening the SQLite catalog: connection settings, the pool, and schema
//! setup.
//!
//! ## Opening Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Database::new(config)                             │
//! │                                                                         │
//! │  DbConfig ──► connect_options()   file (mode=rwc) or sqlite::memory:   │
//! │          │                        WAL, NORMAL sync, busy timeout       │
//! │          │                                                              │
//! │          └──► pool_options()      max/min connections, acquire and     │
//! │                                   idle timeouts                        │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │               SqlitePool ──► migrations ──► schema status logged        │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │  db.catalog() ──► CatalogRepository (shares the pool)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each validation reads stock once. WAL keeps those reads from waiting on
//! a stock update in flight, and the busy timeout covers the rare
//! writer-writer overlap (seeding while orders are placed).

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::catalog::CatalogRepository;

/// Path marker for an in-memory database.
const IN_MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Where the catalog lives and how many connections may read it.
///
/// ```rust,ignore
/// let config = DbConfig::new("./catalog.db")
///     .max_connections(8)
///     .acquire_timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// SQLite file; created on first open.
    pub database_path: PathBuf,

    /// Pool ceiling. Default: 5
    pub max_connections: u32,

    /// Connections kept open while idle. An in-memory catalog lives only as
    /// long as one of them does.
    pub min_connections: u32,

    /// How long a validation waits for a free connection. Default: 30s
    pub acquire_timeout: Duration,

    /// How long a statement waits on a locked database file. Default: 5s
    pub busy_timeout: Duration,

    /// Idle connections above `min_connections` close after this. Default: 10m
    pub idle_timeout: Duration,
}

impl DbConfig {
    /// Configuration for a catalog file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(30),
            busy_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(600),
        }
    }

    /// A private, empty catalog per `Database::new` (tests).
    pub fn in_memory() -> Self {
        DbConfig {
            // A second connection would open a different empty database
            max_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            ..DbConfig::new(IN_MEMORY_PATH)
        }
    }

    /// Sets the pool ceiling.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets how long to wait for a free connection.
    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    /// Checks if this config points at an in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY_PATH
    }

    fn connect_url(&self) -> String {
        if self.is_in_memory() {
            "sqlite::memory:".to_string()
        } else {
            format!("sqlite://{}?mode=rwc", self.database_path.display())
        }
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = SqliteConnectOptions::from_str(&self.connect_url())
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(self.busy_timeout)
            .foreign_keys(true)
            .create_if_missing(true);

        Ok(options)
    }

    fn pool_options(&self) -> SqlitePoolOptions {
        SqlitePoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(Some(self.idle_timeout))
    }
}

// =============================================================================
// Database
// =============================================================================

/// Handle to an open, migrated catalog. Clones share one pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the catalog and brings its schema up to date.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(path = %config.database_path.display(), "Opening catalog database");

        let options = config.connect_options()?;
        debug!(
            max_connections = config.max_connections,
            acquire_timeout_ms = config.acquire_timeout.as_millis() as u64,
            "Connecting pool"
        );

        let pool = config
            .pool_options()
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        migrations::run_migrations(&pool).await?;
        let (total, applied) = migrations::migration_status(&pool).await?;
        info!(total, applied, "Catalog schema ready");

        Ok(Database { pool })
    }

    /// The catalog repository over this pool.
    pub fn catalog(&self) -> CatalogRepository {
        CatalogRepository::new(self.pool.clone())
    }

    /// Closes every pooled connection. Repositories fail afterwards.
    pub async fn close(&self) {
        info!("Closing catalog database");
        self.pool.close().await;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database_is_migrated() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let (total, applied) = migrations::migration_status(&db.pool).await.unwrap();
        assert_eq!(total, applied);
        assert_eq!(db.catalog().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_in_memory_databases_are_isolated() {
        let first = Database::new(DbConfig::in_memory()).await.unwrap();
        let second = Database::new(DbConfig::in_memory()).await.unwrap();

        first
            .catalog()
            .insert(&cartcheck_core::ProductLineItem::new(
                "a",
                "Apples",
                cartcheck_core::Money::from_cents(120),
                5,
            ))
            .await
            .unwrap();

        assert_eq!(first.catalog().count().await.unwrap(), 1);
        assert_eq!(second.catalog().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_closed_database_rejects_queries() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        assert!(db.catalog().count().await.is_err());
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/tmp/catalog.db")
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(2));

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.acquire_timeout, Duration::from_secs(2));
        assert!(!config.is_in_memory());

        let memory = DbConfig::in_memory();
        assert!(memory.is_in_memory());
        assert_eq!(memory.max_connections, 1);
        assert_eq!(memory.min_connections, 1);
    }

    #[test]
    fn test_connect_url() {
        assert_eq!(DbConfig::in_memory().connect_url(), "sqlite::memory:");
        assert_eq!(
            DbConfig::new("./catalog.db").connect_url(),
            "sqlite://./catalog.db?mode=rwc"
        );
    }
}
