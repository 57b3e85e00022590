//! # Database Error Types
//!
//! ```text
//! sqlx::Error ──────────┐
//! MigrateError ─────────┼──► DbError ──► ApiError (desktop, serialized)
//! serde_json::Error ────┘
//! ```
//!
//! Missing state is not an error: `load_state` falls back to defaults.

use thiserror::Error;

/// SQLite primary result code for a locked database file.
const SQLITE_BUSY: &str = "5";

#[derive(Debug, Error)]
pub enum DbError {
    /// The file could not be opened or created (permissions, missing
    /// directory, full disk).
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// An embedded migration failed or was edited after being applied.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Another writer held the file longer than `busy_timeout`, or no
    /// pooled connection came free in time.
    #[error("Database is busy")]
    Busy,

    /// The state could not be encoded to JSON.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => DbError::Busy,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool is closed".to_string()),
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(SQLITE_BUSY) => {
                DbError::Busy
            }
            sqlx::Error::Database(db_err) => DbError::QueryFailed(db_err.message().to_string()),
            sqlx::Error::Io(e) => DbError::ConnectionFailed(e.to_string()),
            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

impl From<serde_json::Error> for DbError {
    fn from(err: serde_json::Error) -> Self {
        DbError::Serialization(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_errors_map_to_busy_and_connection() {
        assert!(matches!(DbError::from(sqlx::Error::PoolTimedOut), DbError::Busy));
        assert!(matches!(
            DbError::from(sqlx::Error::PoolClosed),
            DbError::ConnectionFailed(_)
        ));
    }

    #[test]
    fn test_json_error_maps_to_serialization() {
        let json_err = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        let err: DbError = json_err.into();
        assert!(matches!(err, DbError::Serialization(_)));
        assert!(err.to_string().starts_with("Serialization failed"));
    }
}
