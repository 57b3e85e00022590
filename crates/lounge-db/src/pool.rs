//! # Database Pool Management
//!
//! Opens the SQLite file that holds the lounge state.
//!
//! ## Who Writes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Tauri command ──┐                                                     │
//! │                   ├──► StateRepository::save_json ──► SqlitePool        │
//! │   1s ticker ──────┘        (whole blob, UPSERT)                         │
//! │                                                                         │
//! │   Both writers can reach the file in the same instant. `busy_timeout`   │
//! │   makes the second one wait instead of failing with SQLITE_BUSY.        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! File databases run in WAL mode with `synchronous = NORMAL`: a power cut
//! can lose the last save but leaves the file readable. In-memory databases
//! (tests) keep the memory journal and a single connection, since every
//! connection to `:memory:` opens its own empty database.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::state::StateRepository;

const IN_MEMORY: &str = ":memory:";

/// Where and how to open the database.
///
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("/var/lib/lounge/lounge.db")).await?;
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// SQLite file, or `:memory:`.
    pub path: PathBuf,

    /// Pool size. The app has at most two concurrent writers.
    /// Default: 2
    pub max_connections: u32,

    /// How long a writer waits for the file lock.
    /// Default: 5 seconds
    pub busy_timeout: Duration,

    /// How long to wait for a free connection.
    /// Default: 10 seconds
    pub acquire_timeout: Duration,

    /// Apply embedded migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// A file database, created on first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            path: path.into(),
            max_connections: 2,
            busy_timeout: Duration::from_secs(5),
            acquire_timeout: Duration::from_secs(10),
            run_migrations: true,
        }
    }

    /// A private in-memory database, for tests.
    pub fn in_memory() -> Self {
        DbConfig {
            max_connections: 1,
            ..DbConfig::new(IN_MEMORY)
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Skips migrations, e.g. to inspect a database as it is.
    pub fn without_migrations(mut self) -> Self {
        self.run_migrations = false;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str() == IN_MEMORY
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = if self.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
                .journal_mode(SqliteJournalMode::Memory)
        } else {
            SqliteConnectOptions::new()
                .filename(&self.path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
        };
        Ok(options.busy_timeout(self.busy_timeout))
    }
}

/// Handle to the lounge database. Clones share the pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    path: PathBuf,
}

impl Database {
    /// Opens the pool and, unless disabled, applies migrations.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(path = %config.path.display(), "Opening lounge database");

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout);
        if config.is_in_memory() {
            // Dropping the only connection would drop the database with it.
            pool_options = pool_options.idle_timeout(None).max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(config.connect_options()?)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;
        debug!(max_connections = config.max_connections, "Pool ready");

        let db = Database {
            pool,
            path: config.path,
        };
        if config.run_migrations {
            migrations::run_migrations(&db.pool).await?;
        }
        Ok(db)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// The file this handle was opened on (`:memory:` for tests).
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The whole-state repository.
    ///
    /// ## Usage in Tauri Commands
    /// ```rust,ignore
    /// let (theme, snapshot) = lounge.mutate(|s| Ok::<_, ApiError>(s.toggle_theme()))?;
    /// db.inner().state().save_json(&snapshot.json).await?;
    /// ```
    pub fn state(&self) -> StateRepository {
        StateRepository::new(self.pool.clone())
    }

    /// Closes every connection. Later queries fail.
    pub async fn close(&self) {
        info!("Closing lounge database");
        self.pool.close().await;
    }

    /// True when a trivial query succeeds.
    pub async fn health_check(&self) -> bool {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}
