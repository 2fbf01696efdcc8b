//! # Database Pool Management
//!
//! Connection pool creation, configuration and model registration.
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Opening the Document Store                         │
//! │                                                                         │
//! │  DbConfig::from_env() / DbConfig::new(path)                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config, registry).await                                 │
//! │       │                                                                 │
//! │       ├── SqlitePool (WAL, foreign keys)                               │
//! │       ├── migrations (tables + UNIQUE indexes)                         │
//! │       └── registry.register::<Cart>() / ::<Category>()                 │
//! │             (reuses existing registrations)                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.carts() / db.categories() ← repositories bound to their model      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use storefront_core::{Cart, Category, ModelRegistry, RegisteredModel};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::cart::CartRepository;
use crate::repository::category::CategoryRepository;

/// Environment variable overriding the database path.
pub const DB_PATH_ENV: &str = "STOREFRONT_DB_PATH";

/// Database path used when [`DB_PATH_ENV`] is unset.
pub const DEFAULT_DB_PATH: &str = "./storefront.db";

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/path/to/storefront.db")
///     .max_connections(5)
///     .min_connections(1);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes
    pub idle_timeout: Duration,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    /// Reads the path from `STOREFRONT_DB_PATH`, falling back to
    /// `./storefront.db`.
    pub fn from_env() -> Self {
        let path = std::env::var(DB_PATH_ENV).unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());
        DbConfig::new(path)
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1, // In-memory requires single connection
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing repository access.
///
/// Cheap to clone: the pool and the registrations are shared.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    registry: Arc<ModelRegistry>,
    carts: Arc<RegisteredModel>,
    categories: Arc<RegisteredModel>,
}

impl Database {
    /// Opens the pool, runs migrations (if enabled) and registers the Cart
    /// and Category models against `registry`.
    ///
    /// Registration is idempotent: opening a second `Database` with the
    /// same registry reuses the first registrations.
    pub async fn new(config: DbConfig, registry: Arc<ModelRegistry>) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing database connection"
        );

        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());

        let connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .create_if_missing(true);

        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        let carts = registry.register::<Cart>();
        let categories = registry.register::<Category>();

        let db = Database {
            pool,
            registry,
            carts,
            categories,
        };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Runs database migrations. Idempotent.
    pub async fn run_migrations(&self) -> DbResult<()> {
        info!("Running database migrations");
        migrations::run_migrations(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// The registry this database registered its models in.
    pub fn registry(&self) -> &Arc<ModelRegistry> {
        &self.registry
    }

    /// Returns the cart repository.
    pub fn carts(&self) -> CartRepository {
        CartRepository::new(self.pool.clone(), Arc::clone(&self.carts))
    }

    /// Returns the category repository.
    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.pool.clone(), Arc::clone(&self.categories))
    }

    /// Closes the database connection pool.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Checks if the database can execute queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
