//! # Session Table
//!
//! Active sessions keyed by device id. At most one session per device.
//!
//! ## Time-up Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  tick(now) ──► check_timeouts(now)                                     │
//! │                   │                                                     │
//! │                   ├── status == active                                  │
//! │                   ├── time_mode == timed                                │
//! │                   ├── end_time <= now                                   │
//! │                   └── !time_up_notified                                 │
//! │                          │                                              │
//! │                          ▼                                              │
//! │                time_up_notified = true                                  │
//! │                show_time_up_modal = true      ──► "session-time-up"     │
//! │                time_up_at = now                                         │
//! │                                                                         │
//! │  extend / switch_to_open clear the flag; the session never ends here.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::{DeviceId, Session, SessionStatus, TimeMode};

// =============================================================================
// Session Table
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SessionTable(BTreeMap<DeviceId, Session>);

impl SessionTable {
    pub fn new() -> Self {
        SessionTable::default()
    }

    pub fn get(&self, device_id: DeviceId) -> Option<&Session> {
        self.0.get(&device_id)
    }

    pub fn get_mut(&mut self, device_id: DeviceId) -> Option<&mut Session> {
        self.0.get_mut(&device_id)
    }

    /// Looks up a session or fails with `SessionNotFound`.
    pub fn require(&self, device_id: DeviceId) -> CoreResult<&Session> {
        self.get(device_id).ok_or(CoreError::SessionNotFound(device_id))
    }

    pub fn require_mut(&mut self, device_id: DeviceId) -> CoreResult<&mut Session> {
        self.get_mut(device_id)
            .ok_or(CoreError::SessionNotFound(device_id))
    }

    pub fn contains(&self, device_id: DeviceId) -> bool {
        self.0.contains_key(&device_id)
    }

    pub fn insert(&mut self, session: Session) -> Option<Session> {
        self.0.insert(session.device_id, session)
    }

    pub fn remove(&mut self, device_id: DeviceId) -> Option<Session> {
        self.0.remove(&device_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Session> {
        self.0.values()
    }

    pub fn device_ids(&self) -> Vec<DeviceId> {
        self.0.keys().copied().collect()
    }

    pub(crate) fn retain(&mut self, mut keep: impl FnMut(&Session) -> bool) {
        self.0.retain(|_, session| keep(session));
    }

    /// Flags every timed session that has just run out.
    ///
    /// Returns the device ids flagged by this call. A session is flagged at
    /// most once until an extension or a mode switch clears the flag.
    pub fn check_timeouts(&mut self, now: DateTime<Utc>) -> Vec<DeviceId> {
        let mut timed_up = Vec::new();
        for session in self.0.values_mut() {
            if session.status == SessionStatus::Active
                && !session.time_up_notified
                && session.is_expired(now)
            {
                session.time_up_notified = true;
                session.show_time_up_modal = true;
                session.time_up_at = Some(now);
                timed_up.push(session.device_id);
            }
        }
        timed_up
    }

    /// Devices whose session was asked to end.
    pub fn ending(&self) -> Vec<DeviceId> {
        self.iter()
            .filter(|s| s.status == SessionStatus::Ending)
            .map(|s| s.device_id)
            .collect()
    }

    /// Devices whose time-up prompt has been showing for at least `grace`.
    pub fn past_grace(&self, now: DateTime<Utc>, grace: Duration) -> Vec<DeviceId> {
        self.iter()
            .filter(|s| s.status == SessionStatus::Active && s.show_time_up_modal)
            .filter(|s| s.time_up_at.is_some_and(|at| now - at >= grace))
            .map(|s| s.device_id)
            .collect()
    }

    /// Display clocks for every session, in device order.
    pub fn clocks(&self, now: DateTime<Utc>) -> Vec<SessionClock> {
        self.iter().map(|s| SessionClock::of(s, now)).collect()
    }
}

// =============================================================================
// In-place Session Mutations
// =============================================================================

impl Session {
    /// Pushes a timed session's end back by `minutes` and re-arms its timeout.
    pub fn extend(&mut self, minutes: u32) -> CoreResult<()> {
        let end = match (self.time_mode, self.end_time) {
            (TimeMode::Timed, Some(end)) => end,
            _ => return Err(CoreError::SessionNotTimed(self.device_id)),
        };
        self.end_time = Some(end + Duration::minutes(i64::from(minutes)));
        self.clear_time_up();
        Ok(())
    }

    /// Converts to an open session; billing continues from the original start.
    pub fn switch_to_open(&mut self) {
        self.time_mode = TimeMode::Open;
        self.end_time = None;
        self.clear_time_up();
    }

    pub fn open_extend_prompt(&mut self) {
        self.show_extend_modal = true;
        self.show_time_up_modal = false;
    }

    fn clear_time_up(&mut self) {
        self.time_up_notified = false;
        self.show_time_up_modal = false;
        self.show_extend_modal = false;
        self.time_up_at = None;
    }
}

// =============================================================================
// Session Clock
// =============================================================================

/// What a device card displays for its running session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SessionClock {
    pub device_id: DeviceId,
    /// `HH:MM:SS`. Remaining time for timed sessions, elapsed for open ones.
    pub text: String,
    pub seconds: i64,
    pub timed: bool,
    pub expired: bool,
}

impl SessionClock {
    pub fn of(session: &Session, now: DateTime<Utc>) -> Self {
        let span = session
            .remaining(now)
            .unwrap_or_else(|| session.elapsed(now));
        let seconds = span.num_seconds();
        SessionClock {
            device_id: session.device_id,
            text: format_hms(seconds),
            seconds,
            timed: session.is_timed(),
            expired: session.is_expired(now),
        }
    }
}

/// Formats seconds as `HH:MM:SS`. Hours are not wrapped at 24.
pub fn format_hms(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}

// =============================================================================
// Unit Tests
// =============================================================================
