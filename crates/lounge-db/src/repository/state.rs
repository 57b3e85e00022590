//! # State Repository
//!
//! Stores the whole application state as one JSON document.
//!
//! ## Save / Load
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  SAVE (every mutation, every changed tick)                             │
//! │    AppState ──to_json()──► INSERT … ON CONFLICT(key) DO UPDATE         │
//! │                            last writer wins, no version check          │
//! │                                                                         │
//! │  LOAD (startup)                                                        │
//! │    SELECT value ──► AppState::from_json()                              │
//! │                        │  missing / malformed fields → defaults        │
//! │                        ▼                                                │
//! │                     reconcile()  → busy iff session                    │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                     warn! per fallback, per repaired device            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::DbResult;
use lounge_core::{AppState, FallbackReason, FieldFallback, LoadedState, STATE_KEY};

/// Repository for the `app_state` table.
#[derive(Debug, Clone)]
pub struct StateRepository {
    pool: SqlitePool,
}

impl StateRepository {
    /// Creates a new StateRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StateRepository { pool }
    }

    /// Reads the raw value stored under `key`.
    pub async fn load_raw(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM app_state WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(value)
    }

    /// Writes `value` under `key`, replacing any previous value.
    pub async fn save_raw(&self, key: &str, value: &str) -> DbResult<()> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO app_state (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        debug!(key = %key, bytes = value.len(), "State saved");
        Ok(())
    }

    /// Removes the value under `key`. Returns true if a row was deleted.
    pub async fn delete(&self, key: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM app_state WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// When the state blob was last written (RFC 3339).
    pub async fn last_saved_at(&self) -> DbResult<Option<String>> {
        let at: Option<String> =
            sqlx::query_scalar("SELECT updated_at FROM app_state WHERE key = ?1")
                .bind(STATE_KEY)
                .fetch_optional(&self.pool)
                .await?;
        Ok(at)
    }

    /// Saves an already-encoded state snapshot.
    ///
    /// Commands encode under the state lock and call this after releasing it.
    pub async fn save_json(&self, json: &str) -> DbResult<()> {
        self.save_raw(STATE_KEY, json).await
    }

    pub async fn save_state(&self, state: &AppState) -> DbResult<()> {
        let json = state.to_json()?;
        self.save_json(&json).await
    }

    /// Loads, decodes and reconciles the persisted state.
    ///
    /// A fresh database yields the default state. A blob that is not JSON
    /// is reported as a fallback of the whole `state` and also yields the
    /// default; it is overwritten by the next save.
    pub async fn load_state(&self) -> DbResult<LoadedState> {
        let Some(json) = self.load_raw(STATE_KEY).await? else {
            info!("No saved state, starting fresh");
            return Ok(LoadedState {
                state: AppState::default(),
                fallbacks: Vec::new(),
            });
        };

        let mut loaded = match AppState::from_json(&json) {
            Ok(loaded) => loaded,
            Err(e) => {
                warn!(error = %e, "Saved state is not valid JSON, using defaults");
                LoadedState {
                    state: AppState::default(),
                    fallbacks: vec![FieldFallback {
                        field: "state",
                        reason: FallbackReason::Malformed(e.to_string()),
                    }],
                }
            }
        };

        for fallback in &loaded.fallbacks {
            match &fallback.reason {
                FallbackReason::Missing => {
                    debug!(field = fallback.field, "Saved state field missing, using default")
                }
                FallbackReason::Malformed(reason) => {
                    warn!(
                        field = fallback.field,
                        reason = %reason,
                        "Saved state field malformed, using default"
                    )
                }
            }
        }

        let repaired = loaded.state.reconcile();
        if !repaired.is_clean() {
            warn!(
                dropped_sessions = ?repaired.dropped_sessions,
                marked_busy = ?repaired.marked_busy,
                freed = ?repaired.freed,
                "Reconciled device status with sessions"
            );
        }

        info!(
            devices = loaded.state.devices.len(),
            sessions = loaded.state.sessions.len(),
            reports = loaded.state.reports.len(),
            "State loaded"
        );

        Ok(loaded)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
