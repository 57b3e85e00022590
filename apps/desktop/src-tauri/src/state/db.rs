//! # Database State
//!
//! Shared by the commands and the ticker. A save writes a snapshot taken
//! under the lounge lock, after that lock is released. Snapshots can reach
//! `save` out of order; the revision check keeps the newest one stored.
//!
//! ```rust,ignore
//! #[tauri::command]
//! async fn toggle_theme(
//!     lounge: State<'_, LoungeState>,
//!     db: State<'_, DbState>,
//! ) -> Result<Theme, ApiError> {
//!     let (theme, json) = lounge.mutate(|s| Ok(s.toggle_theme()))?;
//!     db.save(&json).await?;
//!     Ok(theme)
//! }
//! ```

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use lounge_db::{Database, DbResult};

use super::lounge::Snapshot;

#[derive(Debug, Clone)]
pub struct DbState {
    db: Database,
    /// Revision of the last snapshot written. Held across the write, so
    /// saves reach SQLite one at a time.
    written: Arc<Mutex<u64>>,
}

impl DbState {
    pub fn new(db: Database) -> Self {
        DbState {
            db,
            written: Arc::new(Mutex::new(0)),
        }
    }

    pub fn inner(&self) -> &Database {
        &self.db
    }

    /// Replaces the stored state with `snapshot`, unless a later revision
    /// was already written. Returns whether it was written.
    pub async fn save(&self, snapshot: &Snapshot) -> DbResult<bool> {
        let mut written = self.written.lock().await;
        if snapshot.revision <= *written {
            debug!(
                revision = snapshot.revision,
                written = *written,
                "Skipping stale state snapshot"
            );
            return Ok(false);
        }
        self.db.state().save_json(&snapshot.json).await?;
        *written = snapshot.revision;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use lounge_core::{AppState, CoreError, GameType, StartSession, TimeMode};
    use lounge_db::DbConfig;

    use crate::state::LoungeState;

    fn start(state: &mut AppState, device_id: u32, time_mode: TimeMode, minutes: Option<u32>) {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 14, 18, 0, 0).unwrap();
        state
            .start_session(
                StartSession {
                    device_id,
                    game_type: GameType::Double,
                    time_mode,
                    player_name: None,
                    initial_minutes: minutes,
                },
                t0,
            )
            .unwrap();
    }

    #[tokio::test]
    async fn test_older_snapshot_does_not_overwrite_newer() {
        let db = DbState::new(Database::new(DbConfig::in_memory()).await.unwrap());
        let mut initial = AppState::default();
        start(&mut initial, 1, TimeMode::Timed, Some(30));
        start(&mut initial, 2, TimeMode::Open, None);
        let lounge = LoungeState::new(initial);
        let expired = Utc.with_ymd_and_hms(2026, 3, 14, 18, 30, 0).unwrap();

        // Ticker flags device 1, then a command bills device 2.
        let tick_snapshot = lounge
            .with_state_mut(|s| {
                s.check_timeouts(expired);
                lounge.snapshot_of(s)
            })
            .unwrap()
            .unwrap();
        let (_, end_snapshot) = lounge
            .mutate(|s| s.end_session(2, expired + Duration::minutes(5)))
            .unwrap();

        // The command's save lands first.
        assert!(db.save(&end_snapshot).await.unwrap());
        assert!(!db.save(&tick_snapshot).await.unwrap());

        let stored = db.inner().state().load_state().await.unwrap().state;
        assert_eq!(stored.reports.len(), 1);
        assert!(stored.sessions.get(2).is_none());
        assert!(stored.sessions.get(1).unwrap().time_up_notified);
    }

    #[tokio::test]
    async fn test_saves_in_order_are_all_written() {
        let db = DbState::new(Database::new(DbConfig::in_memory()).await.unwrap());
        let lounge = LoungeState::new(AppState::default());

        let (_, first) = lounge
            .mutate(|s| Ok::<_, CoreError>(s.toggle_theme()))
            .unwrap();
        let (_, second) = lounge
            .mutate(|s| s.add_device())
            .unwrap();

        assert!(db.save(&first).await.unwrap());
        assert!(db.save(&second).await.unwrap());
        let stored = db.inner().state().load_state().await.unwrap().state;
        assert_eq!(stored.devices.len(), 5);
    }
}
