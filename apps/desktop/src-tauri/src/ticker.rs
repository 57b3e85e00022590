//! # Session Ticker
//!
//! One background task drives every running session.
//!
//! ## Each Tick
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  interval.tick()                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  lock ─► AppState::tick(now, grace) ─► clocks(now) ─► snapshot ─► unlock│
//! │       │                                                                 │
//! │       ├── changed? ──► db.save(snapshot)                                │
//! │       ├── emit "session-time-up"   (one per newly expired session)     │
//! │       ├── emit "session-ended"     (one per report)                    │
//! │       └── emit "session-clocks"    (every tick)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failed save or emit is logged and the loop keeps going; the next
//! changed tick writes the whole state again.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tauri::async_runtime::JoinHandle;
use tauri::{AppHandle, Emitter};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use lounge_core::{DeviceId, Report, SessionClock};

use crate::error::ApiError;
use crate::state::{DbState, LoungeConfig, LoungeState, Snapshot};

pub const TIME_UP_EVENT: &str = "session-time-up";
pub const ENDED_EVENT: &str = "session-ended";
pub const CLOCKS_EVENT: &str = "session-clocks";

/// Payload of `session-time-up`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeUpEvent {
    pub device_id: DeviceId,
    pub device_name: String,
    /// Notification text in the configured labels.
    pub message: String,
}

/// Everything one pass produced, ready to persist and emit.
#[derive(Debug, Default)]
pub struct TickPass {
    pub time_up: Vec<TimeUpEvent>,
    pub ended: Vec<Report>,
    pub clocks: Vec<SessionClock>,
    /// Encoded state, present only when the pass changed it.
    pub snapshot: Option<Snapshot>,
}

/// Runs one tick against the shared state.
pub fn run_tick(
    lounge: &LoungeState,
    now: DateTime<Utc>,
    grace: Option<Duration>,
) -> Result<TickPass, ApiError> {
    lounge.with_state_mut(|state| -> Result<TickPass, ApiError> {
        let outcome = state.tick(now, grace);

        let time_up = outcome
            .timed_up
            .iter()
            .map(|&device_id| {
                let device_name = state
                    .devices
                    .get(device_id)
                    .map(|d| d.name.clone())
                    .unwrap_or_else(|| device_id.to_string());
                TimeUpEvent {
                    device_id,
                    message: state
                        .labels
                        .translate("session_time_ended_for", &[device_name.as_str()]),
                    device_name,
                }
            })
            .collect();

        let snapshot = if outcome.changed() {
            Some(lounge.snapshot_of(state)?)
        } else {
            None
        };

        Ok(TickPass {
            time_up,
            ended: outcome.ended,
            clocks: state.clocks(now),
            snapshot,
        })
    })?
}

/// Starts the ticker on Tauri's async runtime.
pub fn spawn(
    app: AppHandle,
    lounge: LoungeState,
    db: DbState,
    config: &LoungeConfig,
) -> JoinHandle<()> {
    let period = config.tick_interval();
    let grace = config.time_up_grace();
    info!(?period, grace_secs = ?grace.map(|g| g.num_seconds()), "Starting session ticker");

    tauri::async_runtime::spawn(async move {
        let mut interval = time::interval(period);
        // A stalled tick must not replay as a burst
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;

            let pass = match run_tick(&lounge, Utc::now(), grace) {
                Ok(pass) => pass,
                Err(e) => {
                    warn!(error = %e, "Tick failed");
                    continue;
                }
            };

            if let Some(snapshot) = &pass.snapshot {
                if let Err(e) = db.save(snapshot).await {
                    warn!(error = %e, "Failed to save state after tick");
                }
            }

            for event in &pass.time_up {
                info!(device_id = event.device_id, "Session time is up");
                if let Err(e) = app.emit(TIME_UP_EVENT, event) {
                    warn!(error = %e, "Failed to emit {}", TIME_UP_EVENT);
                }
            }

            for report in &pass.ended {
                info!(
                    device_id = report.device_id,
                    minutes = report.duration_minutes,
                    cost = %report.cost,
                    "Session ended by ticker"
                );
                if let Err(e) = app.emit(ENDED_EVENT, report) {
                    warn!(error = %e, "Failed to emit {}", ENDED_EVENT);
                }
            }

            if !pass.clocks.is_empty() {
                debug!(sessions = pass.clocks.len(), "Tick");
            }
            if let Err(e) = app.emit(CLOCKS_EVENT, &pass.clocks) {
                warn!(error = %e, "Failed to emit {}", CLOCKS_EVENT);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use lounge_core::{AppState, GameType, SessionStatus, StartSession, TimeMode};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 18, 0, 0).unwrap()
    }

    fn with_timed_session(minutes: u32) -> LoungeState {
        let mut state = AppState::default();
        state
            .start_session(
                StartSession {
                    device_id: 2,
                    game_type: GameType::Double,
                    time_mode: TimeMode::Timed,
                    player_name: None,
                    initial_minutes: Some(minutes),
                },
                t0(),
            )
            .unwrap();
        LoungeState::new(state)
    }

    #[test]
    fn test_idle_tick_does_not_save() {
        let lounge = with_timed_session(30);
        let pass = run_tick(&lounge, t0() + Duration::minutes(10), None).unwrap();

        assert!(pass.snapshot.is_none());
        assert!(pass.time_up.is_empty());
        assert_eq!(pass.clocks.len(), 1);
        assert_eq!(pass.clocks[0].text, "00:20:00");
    }

    #[test]
    fn test_time_up_fires_once() {
        let lounge = with_timed_session(30);
        let at = t0() + Duration::minutes(30);

        let pass = run_tick(&lounge, at, None).unwrap();
        assert_eq!(
            pass.time_up,
            vec![TimeUpEvent {
                device_id: 2,
                device_name: "PS-2".to_string(),
                message: "Session time ended for PS-2".to_string(),
            }]
        );
        let saved = AppState::from_json(&pass.snapshot.unwrap().json).unwrap();
        assert!(saved.state.sessions.get(2).unwrap().time_up_notified);

        let again = run_tick(&lounge, at + Duration::seconds(1), None).unwrap();
        assert!(again.time_up.is_empty());
        assert!(again.snapshot.is_none());
    }

    #[test]
    fn test_requested_end_is_billed_on_next_tick() {
        let lounge = with_timed_session(60);
        lounge.mutate(|s| s.request_end(2)).unwrap();
        assert_eq!(
            lounge
                .with_state(|s| s.sessions.get(2).map(|x| x.status))
                .unwrap(),
            Some(SessionStatus::Ending)
        );

        let pass = run_tick(&lounge, t0() + Duration::minutes(45), None).unwrap();
        assert_eq!(pass.ended.len(), 1);
        assert_eq!(pass.ended[0].duration_minutes, 45);
        assert!(pass.clocks.is_empty());
        assert!(pass.snapshot.is_some());
    }

    #[test]
    fn test_grace_period_auto_ends() {
        let lounge = with_timed_session(30);
        let grace = Some(Duration::minutes(2));
        let expired = t0() + Duration::minutes(30);

        run_tick(&lounge, expired, grace).unwrap();
        let early = run_tick(&lounge, expired + Duration::seconds(119), grace).unwrap();
        assert!(early.ended.is_empty());

        let late = run_tick(&lounge, expired + Duration::minutes(2), grace).unwrap();
        assert_eq!(late.ended.len(), 1);
        assert_eq!(late.ended[0].device_id, 2);
    }
}
