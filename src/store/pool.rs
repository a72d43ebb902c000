//! SQLite connection pool and embedded migrations.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};

use super::{ConfigurationRepository, EmployeeRepository, SeveranceRecordRepository};

/// Migrations embedded from `./migrations` at compile time.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Database pool settings.
///
/// # Examples
///
/// ```
/// use payroll_engine::store::DbConfig;
///
/// let config = DbConfig::new("./data/payroll.db").max_connections(8);
/// assert_eq!(config.max_connections, 8);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,
    /// Maximum connections in the pool.
    pub max_connections: u32,
    /// Connections kept alive.
    pub min_connections: u32,
    /// How long a caller waits for a connection.
    pub acquire_timeout: Duration,
    /// Idle time before a connection is closed.
    pub idle_timeout: Duration,
    /// Whether to run migrations on connect.
    pub run_migrations: bool,
}

impl DbConfig {
    /// Creates settings for the database file at `path`, created if missing.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the acquire timeout.
    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    /// Settings for an isolated in-memory database (tests).
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            // In-memory databases live on a single connection
            max_connections: 1,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }
}

/// Handle over the connection pool with repository accessors.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool (WAL, foreign keys on) and runs migrations if enabled.
    pub async fn new(config: DbConfig) -> EngineResult<Self> {
        info!(path = %config.database_path.display(), "Opening payroll database");

        if let Some(parent) = config.database_path.parent() {
            if !parent.as_os_str().is_empty() && config.database_path != PathBuf::from(":memory:") {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let url = format!("sqlite://{}?mode=rwc", config.database_path.display());
        let options = SqliteConnectOptions::from_str(&url)
            .map_err(|e| EngineError::persistence(format!("invalid database path: {}", e)))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .create_if_missing(true);

        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(options)
            .await?;

        info!(max_connections = config.max_connections, "Database pool created");

        let db = Database { pool };
        if config.run_migrations {
            db.run_migrations().await?;
        }
        Ok(db)
    }

    /// Applies pending migrations.
    pub async fn run_migrations(&self) -> EngineResult<()> {
        info!("Running database migrations");
        MIGRATOR.run(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    /// The underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Configuration repository.
    pub fn configurations(&self) -> ConfigurationRepository {
        ConfigurationRepository::new(self.pool.clone())
    }

    /// Employee repository.
    pub fn employees(&self) -> EmployeeRepository {
        EmployeeRepository::new(self.pool.clone())
    }

    /// Severance audit repository.
    pub fn severance_records(&self) -> SeveranceRecordRepository {
        SeveranceRecordRepository::new(self.pool.clone())
    }

    /// True when the database answers a trivial query.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    /// Closes the pool; repository calls fail afterwards.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }
}
