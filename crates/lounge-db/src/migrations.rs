//! # Database Migrations
//!
//! The schema is one table, `app_state`, created by
//! `migrations/sqlite/001_app_state.sql`. Migrations are compiled into the
//! binary and applied on every connect; sqlx records what already ran in
//! `_sqlx_migrations`.
//!
//! New schema changes go in a new `NNN_description.sql` file. Applied files
//! are checksummed, so an edited migration fails on the next start.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// How far the database schema is behind the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationStatus {
    pub embedded: usize,
    pub applied: usize,
}

impl MigrationStatus {
    pub fn is_current(&self) -> bool {
        self.applied >= self.embedded
    }
}

/// Applies pending migrations. Safe to call on every start.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    MIGRATOR.run(pool).await?;
    info!(embedded = MIGRATOR.migrations.len(), "Schema up to date");
    Ok(())
}

/// Compares embedded and applied migrations. A database that never ran
/// migrations reports zero applied.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<MigrationStatus> {
    let applied = match sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await
    {
        Ok(count) => usize::try_from(count).unwrap_or(0),
        Err(e) => {
            debug!(error = %e, "No migration table yet");
            0
        }
    };

    Ok(MigrationStatus {
        embedded: MIGRATOR.migrations.len(),
        applied,
    })
}
