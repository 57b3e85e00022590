//! # Domain Types
//!
//! Core domain types used throughout Lounge POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Device      │   │     Session     │   │     Report      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (u32)       │◄──│  device_id      │──►│  device_id      │       │
//! │  │  name           │   │  start_time     │   │  duration_min   │       │
//! │  │  status         │   │  time_mode      │   │  cost (Money)   │       │
//! │  └─────────────────┘   │  end_time?      │   │  date           │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  DeviceStatus   │   │    GameType     │   │    TimeMode     │       │
//! │  │  Available      │   │  Single         │   │  Open           │       │
//! │  │  Busy           │   │  Double         │   │  Timed          │       │
//! │  │  Maintenance    │   │  Quad           │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field names serialize in camelCase; the persisted blob and the frontend
//! share one shape.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

/// Identity of a rental station.
pub type DeviceId = u32;

// =============================================================================
// Device
// =============================================================================

/// Status of a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    /// Free to start a session.
    #[default]
    Available,
    /// Has a session entry.
    Busy,
    /// Taken out of service by an admin.
    Maintenance,
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceStatus::Available => write!(f, "available"),
            DeviceStatus::Busy => write!(f, "busy"),
            DeviceStatus::Maintenance => write!(f, "maintenance"),
        }
    }
}

/// A rentable station (e.g. a console).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    pub status: DeviceStatus,
}

impl Device {
    /// Creates an available device named `PS-{id}`.
    pub fn new(id: DeviceId) -> Self {
        Device {
            id,
            name: format!("PS-{}", id),
            status: DeviceStatus::Available,
        }
    }

    #[inline]
    pub fn is_busy(&self) -> bool {
        self.status == DeviceStatus::Busy
    }
}

// =============================================================================
// Game Type / Time Mode
// =============================================================================

/// Pricing category. Each maps to an hourly rate in the price table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum GameType {
    Single,
    Double,
    Quad,
}

impl GameType {
    pub const ALL: [GameType; 3] = [GameType::Single, GameType::Double, GameType::Quad];

    /// Label key for this game type (`"double"` etc.).
    pub fn label_key(&self) -> &'static str {
        match self {
            GameType::Single => "single",
            GameType::Double => "double",
            GameType::Quad => "quad",
        }
    }
}

/// How a session is timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TimeMode {
    /// Open-ended; billed on elapsed time.
    #[default]
    Open,
    /// Fixed-duration countdown to `end_time`.
    Timed,
}

// =============================================================================
// Session
// =============================================================================

/// Lifecycle state of a session.
///
/// ```text
///   start ──► Active ──request_end──► Ending ──tick──► (removed)
///               │                                        ▲
///               └──────────────── end ───────────────────┘
/// ```
/// `Ended` only appears in stale persisted data; `reconcile` drops it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Active,
    Ending,
    Ended,
}

/// A rental occupying one device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub device_id: DeviceId,

    #[ts(as = "String")]
    pub start_time: DateTime<Utc>,

    pub game_type: GameType,

    pub time_mode: TimeMode,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub player_name: Option<String>,

    /// Minutes booked at start (timed sessions only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub initial_minutes: Option<u32>,

    /// When the countdown reaches zero (timed sessions only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>", optional)]
    pub end_time: Option<DateTime<Utc>>,

    pub status: SessionStatus,

    /// Set once when a timed session passes `end_time`.
    #[serde(default)]
    pub time_up_notified: bool,

    #[serde(default)]
    pub show_extend_modal: bool,

    #[serde(default)]
    pub show_time_up_modal: bool,

    /// When the time-up prompt was raised.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>", optional)]
    pub time_up_at: Option<DateTime<Utc>>,
}

impl Session {
    #[inline]
    pub fn is_timed(&self) -> bool {
        self.time_mode == TimeMode::Timed
    }

    /// Time since start, never negative.
    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        (now - self.start_time).max(Duration::zero())
    }

    /// Whole minutes billed if the session ended at `now`.
    pub fn billable_minutes(&self, now: DateTime<Utc>) -> i64 {
        self.elapsed(now).num_minutes()
    }

    /// Countdown left, or `None` for open sessions.
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        match (self.time_mode, self.end_time) {
            (TimeMode::Timed, Some(end)) => Some((end - now).max(Duration::zero())),
            _ => None,
        }
    }

    /// True when a timed session has reached its end time.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(
            (self.time_mode, self.end_time),
            (TimeMode::Timed, Some(end)) if end <= now
        )
    }
}

// =============================================================================
// Report
// =============================================================================

/// A billed record of a completed session. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// `"{end_millis}-{device_id}"`.
    pub id: String,
    pub device_id: DeviceId,
    #[ts(as = "String")]
    pub start_time: DateTime<Utc>,
    #[ts(as = "String")]
    pub end_time: DateTime<Utc>,
    pub duration_minutes: i64,
    pub game_type: GameType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub player_name: Option<String>,
    pub cost: Money,
    /// Calendar date (UTC) of `start_time`.
    #[ts(as = "String")]
    pub date: NaiveDate,
}

impl Report {
    /// Builds the report id used for a session ending at `end_time`.
    pub fn make_id(end_time: DateTime<Utc>, device_id: DeviceId) -> String {
        format!("{}-{}", end_time.timestamp_millis(), device_id)
    }
}

// =============================================================================
// Theme / Credentials / Admin Access
// =============================================================================

/// UI colour scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Light,
    #[default]
    Dark,
    BlueOrange,
}

impl Theme {
    /// light → dark → blue_orange → light
    pub fn next(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::BlueOrange,
            Theme::BlueOrange => Theme::Light,
        }
    }
}

/// Plaintext login and admin passwords. Not a security boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub login_user: String,
    pub login_pass: String,
    pub admin_pass: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Credentials {
            login_user: "admin".to_string(),
            login_pass: "1234".to_string(),
            admin_pass: "admin".to_string(),
        }
    }
}

/// What an admin password unlocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum AdminAccess {
    /// Prices, devices, reports, labels.
    Full,
    /// Everything in `Full` plus the credential manager.
    WithCredentialManager,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, h, m, s).unwrap()
    }

    fn timed_session(end: DateTime<Utc>) -> Session {
        Session {
            device_id: 1,
            start_time: at(10, 0, 0),
            game_type: GameType::Double,
            time_mode: TimeMode::Timed,
            player_name: None,
            initial_minutes: Some(60),
            end_time: Some(end),
            status: SessionStatus::Active,
            time_up_notified: false,
            show_extend_modal: false,
            show_time_up_modal: false,
            time_up_at: None,
        }
    }

    #[test]
    fn test_device_new_uses_ps_prefix() {
        let device = Device::new(7);
        assert_eq!(device.name, "PS-7");
        assert_eq!(device.status, DeviceStatus::Available);
        assert!(!device.is_busy());
    }

    #[test]
    fn test_theme_cycle() {
        assert_eq!(Theme::default(), Theme::Dark);
        assert_eq!(Theme::Light.next(), Theme::Dark);
        assert_eq!(Theme::Dark.next(), Theme::BlueOrange);
        assert_eq!(Theme::BlueOrange.next(), Theme::Light);
    }

    #[test]
    fn test_session_expiry_and_remaining() {
        let session = timed_session(at(11, 0, 0));
        assert!(!session.is_expired(at(10, 59, 59)));
        assert!(session.is_expired(at(11, 0, 0)));
        assert_eq!(session.remaining(at(10, 30, 0)), Some(Duration::minutes(30)));
        assert_eq!(session.remaining(at(12, 0, 0)), Some(Duration::zero()));
    }

    #[test]
    fn test_billable_minutes_floor() {
        let session = timed_session(at(11, 0, 0));
        assert_eq!(session.billable_minutes(at(11, 30, 59)), 90);
        // Clock skew never bills negative time
        assert_eq!(session.billable_minutes(at(9, 0, 0)), 0);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Theme::BlueOrange).unwrap();
        assert_eq!(json, "\"blue_orange\"");
        let json = serde_json::to_string(&DeviceStatus::Maintenance).unwrap();
        assert_eq!(json, "\"maintenance\"");
        let value = serde_json::to_value(timed_session(at(11, 0, 0))).unwrap();
        assert!(value.get("deviceId").is_some());
        assert!(value.get("timeUpNotified").is_some());
        assert!(value.get("playerName").is_none());
    }

    #[test]
    fn test_omitted_fields_are_optional_in_bindings() {
        let session = Session::decl();
        assert!(session.contains("playerName?:"));
        assert!(session.contains("initialMinutes?:"));
        assert!(session.contains("endTime?:"));
        assert!(session.contains("timeUpAt?:"));
        assert!(Report::decl().contains("playerName?:"));
    }

    #[test]
    fn test_report_id_format() {
        let end = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(Report::make_id(end, 3), "1700000000123-3");
    }
}
