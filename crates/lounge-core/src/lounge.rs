//! # Lounge Operations
//!
//! Every mutation of [`AppState`]. Each method is one single-writer step:
//! the caller holds the state lock, passes `now`, and persists afterwards.
//!
//! ## Operation Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Frontend Action        Operation                  State Change         │
//! │  ───────────────        ─────────                  ────────────         │
//! │  Start Session ───────► start_session() ─────────► sessions[id] = new   │
//! │                                                    device.status = busy │
//! │  End Session ─────────► end_session() ───────────► reports.push(r)      │
//! │                                                    sessions.remove(id)  │
//! │                                                    device = available   │
//! │  (1s timer) ──────────► tick() ──────────────────► flag timeouts,       │
//! │                                                    end ending sessions  │
//! │  Extend ──────────────► extend_session() ────────► end_time += minutes  │
//! │  Switch to Open ──────► switch_to_open() ────────► end_time = None      │
//! │  Add Device ──────────► add_device() ────────────► devices.push(new)    │
//! │  Delete Device ───────► delete_device() ─────────► devices.remove(id)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::billing::{bill_session, Bill, PriceTable};
use crate::error::{CoreError, CoreResult};
use crate::labels::Labels;
use crate::sessions::SessionClock;
use crate::state::AppState;
use crate::types::{
    Credentials, Device, DeviceId, DeviceStatus, GameType, Report, Session, SessionStatus, Theme,
    TimeMode,
};
use crate::validation::{normalize_player_name, validate_session_minutes};

// =============================================================================
// Requests / Outcomes
// =============================================================================

/// Everything the start-session form submits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StartSession {
    pub device_id: DeviceId,
    pub game_type: GameType,
    pub time_mode: TimeMode,
    #[serde(default)]
    pub player_name: Option<String>,
    /// Required when `time_mode` is timed; ignored otherwise.
    #[serde(default)]
    pub initial_minutes: Option<u32>,
}

/// What one timer pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TickOutcome {
    /// Devices whose timed session ran out during this pass.
    pub timed_up: Vec<DeviceId>,
    /// Sessions ended by request or after the grace period.
    pub ended: Vec<Report>,
}

impl TickOutcome {
    /// True when the pass changed persisted state.
    pub fn changed(&self) -> bool {
        !self.timed_up.is_empty() || !self.ended.is_empty()
    }
}

// =============================================================================
// Session Lifecycle
// =============================================================================

impl AppState {
    /// Starts a session on an available device and marks it busy.
    pub fn start_session(
        &mut self,
        request: StartSession,
        now: DateTime<Utc>,
    ) -> CoreResult<&Session> {
        let device_id = request.device_id;
        let device = self.devices.require(device_id)?;
        if device.status != DeviceStatus::Available {
            return Err(CoreError::DeviceNotAvailable {
                id: device_id,
                status: device.status,
            });
        }
        if self.sessions.contains(device_id) {
            return Err(CoreError::DeviceBusy(device_id));
        }

        let player_name = normalize_player_name(request.player_name.as_deref())?;
        let (initial_minutes, end_time) = match request.time_mode {
            TimeMode::Timed => {
                let minutes = request.initial_minutes.unwrap_or(0);
                validate_session_minutes("initialMinutes", minutes)?;
                (Some(minutes), Some(now + Duration::minutes(i64::from(minutes))))
            }
            TimeMode::Open => (None, None),
        };

        self.sessions.insert(Session {
            device_id,
            start_time: now,
            game_type: request.game_type,
            time_mode: request.time_mode,
            player_name,
            initial_minutes,
            end_time,
            status: SessionStatus::Active,
            time_up_notified: false,
            show_extend_modal: false,
            show_time_up_modal: false,
            time_up_at: None,
        });
        self.devices.set_status(device_id, DeviceStatus::Busy)?;

        self.sessions.require(device_id)
    }

    /// Ends a session: bills it, appends the report, frees the device.
    pub fn end_session(&mut self, device_id: DeviceId, now: DateTime<Utc>) -> CoreResult<Report> {
        let session = self.sessions.require(device_id)?;
        let bill = bill_session(session, &self.prices, now);

        let report = Report {
            id: Report::make_id(now, device_id),
            device_id,
            start_time: session.start_time,
            end_time: now,
            duration_minutes: bill.duration_minutes,
            game_type: session.game_type,
            player_name: session.player_name.clone(),
            cost: bill.cost,
            date: session.start_time.date_naive(),
        };

        self.sessions.remove(device_id);
        // The device may have been deleted under a stale session
        if self.devices.contains(device_id) {
            self.devices.set_status(device_id, DeviceStatus::Available)?;
        }
        self.reports.push(report.clone());
        self.last_ended = Some(report.clone());

        Ok(report)
    }

    /// Duration and cost `end_session` would produce at `now`.
    pub fn preview_end(&self, device_id: DeviceId, now: DateTime<Utc>) -> CoreResult<Bill> {
        let session = self.sessions.require(device_id)?;
        Ok(bill_session(session, &self.prices, now))
    }

    /// Marks a session `ending`; the next [`tick`](AppState::tick) ends it.
    pub fn request_end(&mut self, device_id: DeviceId) -> CoreResult<()> {
        self.sessions.require_mut(device_id)?.status = SessionStatus::Ending;
        Ok(())
    }

    pub fn extend_session(&mut self, device_id: DeviceId, minutes: u32) -> CoreResult<()> {
        validate_session_minutes("minutes", minutes)?;
        self.sessions.require_mut(device_id)?.extend(minutes)
    }

    pub fn switch_to_open(&mut self, device_id: DeviceId) -> CoreResult<()> {
        self.sessions.require_mut(device_id)?.switch_to_open();
        Ok(())
    }

    pub fn open_extend_prompt(&mut self, device_id: DeviceId) -> CoreResult<()> {
        let session = self.sessions.require_mut(device_id)?;
        if !session.is_timed() {
            return Err(CoreError::SessionNotTimed(device_id));
        }
        session.open_extend_prompt();
        Ok(())
    }

    pub fn close_extend_prompt(&mut self, device_id: DeviceId) -> CoreResult<()> {
        self.sessions.require_mut(device_id)?.show_extend_modal = false;
        Ok(())
    }

    /// Hides the time-up prompt. The session stays notified.
    pub fn dismiss_time_up_prompt(&mut self, device_id: DeviceId) -> CoreResult<()> {
        self.sessions.require_mut(device_id)?.show_time_up_modal = false;
        Ok(())
    }

    pub fn check_timeouts(&mut self, now: DateTime<Utc>) -> Vec<DeviceId> {
        self.sessions.check_timeouts(now)
    }

    /// One timer pass.
    ///
    /// ## Order
    /// 1. End every session marked `ending`
    /// 2. With a grace period, end sessions whose time-up prompt has been
    ///    showing that long
    /// 3. Flag newly expired timed sessions
    pub fn tick(&mut self, now: DateTime<Utc>, grace: Option<Duration>) -> TickOutcome {
        let mut to_end = self.sessions.ending();
        if let Some(grace) = grace {
            to_end.extend(self.sessions.past_grace(now, grace));
        }

        let mut outcome = TickOutcome::default();
        for device_id in to_end {
            // Ids come from the table just above
            if let Ok(report) = self.end_session(device_id, now) {
                outcome.ended.push(report);
            }
        }
        outcome.timed_up = self.check_timeouts(now);
        outcome
    }

    pub fn clocks(&self, now: DateTime<Utc>) -> Vec<SessionClock> {
        self.sessions.clocks(now)
    }

    pub fn clear_last_ended(&mut self) {
        self.last_ended = None;
    }
}

// =============================================================================
// Devices
// =============================================================================

impl AppState {
    pub fn add_device(&mut self) -> CoreResult<Device> {
        self.devices.add().cloned()
    }

    /// Removes a device that is neither busy nor holding a session.
    pub fn delete_device(&mut self, id: DeviceId) -> CoreResult<Device> {
        if self.sessions.contains(id) {
            return Err(CoreError::DeviceBusy(id));
        }
        self.devices.remove(id)
    }

    /// Admin status selector: available ⇄ maintenance.
    ///
    /// Busy is owned by the session lifecycle and cannot be set or cleared
    /// by hand.
    pub fn set_device_status(&mut self, id: DeviceId, status: DeviceStatus) -> CoreResult<()> {
        let from = self.devices.require(id)?.status;
        let locked = from == DeviceStatus::Busy || self.sessions.contains(id);
        if status == DeviceStatus::Busy || locked {
            if from == status {
                return Ok(());
            }
            return Err(CoreError::InvalidStatusChange { id, from, to: status });
        }
        self.devices.set_status(id, status)?;
        Ok(())
    }
}

// =============================================================================
// Reports / Settings / Auth
// =============================================================================

impl AppState {
    pub fn delete_reports(&mut self) -> usize {
        self.reports.delete_all()
    }

    pub fn update_prices(&mut self, prices: PriceTable) -> CoreResult<()> {
        prices.validate()?;
        self.prices = prices;
        Ok(())
    }

    pub fn update_labels(&mut self, labels: BTreeMap<String, String>) -> CoreResult<()> {
        self.labels = Labels::from_map(labels)?;
        Ok(())
    }

    pub fn update_credentials(&mut self, credentials: Credentials) -> CoreResult<()> {
        credentials.validate()?;
        self.credentials = credentials;
        Ok(())
    }

    /// light → dark → blue_orange → light. Returns the new theme.
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.next();
        self.theme
    }

    pub fn login(&mut self, user: &str, pass: &str) -> bool {
        if self.credentials.check_login(user, pass) {
            self.is_authenticated = true;
            true
        } else {
            false
        }
    }

    pub fn logout(&mut self) {
        self.is_authenticated = false;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 7, 4, 19, 0, 0).unwrap()
    }

    fn open(device_id: DeviceId, game_type: GameType) -> StartSession {
        StartSession {
            device_id,
            game_type,
            time_mode: TimeMode::Open,
            player_name: None,
            initial_minutes: None,
        }
    }

    fn timed(device_id: DeviceId, minutes: u32) -> StartSession {
        StartSession {
            time_mode: TimeMode::Timed,
            initial_minutes: Some(minutes),
            ..open(device_id, GameType::Double)
        }
    }

    fn assert_busy_invariant(state: &AppState) {
        for device in state.devices.iter() {
            assert_eq!(
                device.is_busy(),
                state.sessions.contains(device.id),
                "device {} breaks the busy invariant",
                device.id
            );
        }
    }

    #[test]
    fn test_ninety_minutes_double_costs_seven_fifty() {
        let mut state = AppState::default();
        state
            .update_prices(PriceTable::from_rates([(GameType::Double, Money::from_cents(500))]))
            .unwrap();
        state.start_session(open(1, GameType::Double), t0()).unwrap();

        let report = state.end_session(1, t0() + Duration::minutes(90)).unwrap();
        assert_eq!(report.duration_minutes, 90);
        assert_eq!(report.cost, Money::from_cents(750));
        assert_eq!(report.date, t0().date_naive());
        assert_eq!(report.id, Report::make_id(t0() + Duration::minutes(90), 1));
    }

    #[test]
    fn test_end_produces_one_report_and_frees_device() {
        let mut state = AppState::default();
        let mut request = open(2, GameType::Quad);
        request.player_name = Some("  Omar ".to_string());
        state.start_session(request, t0()).unwrap();
        assert!(state.devices.get(2).unwrap().is_busy());
        assert_busy_invariant(&state);

        let report = state
            .end_session(2, t0() + Duration::minutes(30) + Duration::seconds(59))
            .unwrap();
        assert_eq!(report.duration_minutes, 30);
        assert_eq!(report.player_name.as_deref(), Some("Omar"));
        assert_eq!(state.reports.len(), 1);
        assert!(!state.sessions.contains(2));
        assert_eq!(state.devices.get(2).unwrap().status, DeviceStatus::Available);
        assert_eq!(state.last_ended.as_ref(), Some(&report));
        assert_busy_invariant(&state);

        state.clear_last_ended();
        assert!(state.last_ended.is_none());
    }

    #[test]
    fn test_start_requires_available_device() {
        let mut state = AppState::default();
        state.set_device_status(3, DeviceStatus::Maintenance).unwrap();
        assert!(matches!(
            state.start_session(open(3, GameType::Single), t0()),
            Err(CoreError::DeviceNotAvailable { id: 3, status: DeviceStatus::Maintenance })
        ));

        state.start_session(open(1, GameType::Single), t0()).unwrap();
        assert!(matches!(
            state.start_session(open(1, GameType::Single), t0()),
            Err(CoreError::DeviceNotAvailable { id: 1, status: DeviceStatus::Busy })
        ));

        assert!(matches!(
            state.start_session(open(99, GameType::Single), t0()),
            Err(CoreError::DeviceNotFound(99))
        ));
    }

    #[test]
    fn test_timed_start_requires_minutes() {
        let mut state = AppState::default();
        let mut request = timed(1, 0);
        assert!(matches!(
            state.start_session(request.clone(), t0()),
            Err(CoreError::Validation(_))
        ));
        request.initial_minutes = None;
        assert!(state.start_session(request, t0()).is_err());
        // Nothing changed on failure
        assert!(state.sessions.is_empty());
        assert!(!state.devices.get(1).unwrap().is_busy());

        let session = state.start_session(timed(1, 45), t0()).unwrap();
        assert_eq!(session.end_time, Some(t0() + Duration::minutes(45)));
        assert_eq!(session.initial_minutes, Some(45));
    }

    #[test]
    fn test_open_start_ignores_minutes() {
        let mut state = AppState::default();
        let mut request = open(1, GameType::Double);
        request.initial_minutes = Some(30);
        let session = state.start_session(request, t0()).unwrap();
        assert_eq!(session.initial_minutes, None);
        assert_eq!(session.end_time, None);
    }

    #[test]
    fn test_tick_flags_timeout_once_and_never_ends() {
        let mut state = AppState::default();
        state.start_session(timed(1, 30), t0()).unwrap();

        let outcome = state.tick(t0() + Duration::minutes(30), None);
        assert_eq!(outcome.timed_up, vec![1]);
        assert!(outcome.ended.is_empty());
        assert!(outcome.changed());

        let outcome = state.tick(t0() + Duration::hours(2), None);
        assert!(!outcome.changed());
        assert!(state.sessions.contains(1));
    }

    #[test]
    fn test_tick_ends_requested_sessions() {
        let mut state = AppState::default();
        state.start_session(open(1, GameType::Double), t0()).unwrap();
        state.start_session(open(2, GameType::Double), t0()).unwrap();
        state.request_end(2).unwrap();

        let outcome = state.tick(t0() + Duration::minutes(60), None);
        assert_eq!(outcome.ended.len(), 1);
        assert_eq!(outcome.ended[0].device_id, 2);
        assert_eq!(outcome.ended[0].cost, Money::from_cents(500));
        assert!(state.sessions.contains(1));
        assert!(!state.sessions.contains(2));
        assert_busy_invariant(&state);
    }

    #[test]
    fn test_tick_grace_auto_ends() {
        let mut state = AppState::default();
        state.start_session(timed(1, 30), t0()).unwrap();
        let grace = Some(Duration::seconds(5));

        let flagged = t0() + Duration::minutes(30);
        assert_eq!(state.tick(flagged, grace).timed_up, vec![1]);
        assert!(state.tick(flagged + Duration::seconds(4), grace).ended.is_empty());

        let outcome = state.tick(flagged + Duration::seconds(5), grace);
        assert_eq!(outcome.ended.len(), 1);
        assert_eq!(outcome.ended[0].duration_minutes, 30);
        assert!(state.sessions.is_empty());
    }

    #[test]
    fn test_extend_and_switch() {
        let mut state = AppState::default();
        state.start_session(timed(1, 30), t0()).unwrap();
        state.start_session(open(2, GameType::Quad), t0()).unwrap();

        assert!(matches!(state.extend_session(2, 15), Err(CoreError::SessionNotTimed(2))));
        assert!(matches!(state.extend_session(1, 0), Err(CoreError::Validation(_))));

        state.tick(t0() + Duration::minutes(30), None);
        state.open_extend_prompt(1).unwrap();
        let session = state.sessions.get(1).unwrap();
        assert!(session.show_extend_modal);
        assert!(!session.show_time_up_modal);

        state.extend_session(1, 15).unwrap();
        assert!(!state.sessions.get(1).unwrap().time_up_notified);
        assert_eq!(state.tick(t0() + Duration::minutes(45), None).timed_up, vec![1]);

        state.switch_to_open(1).unwrap();
        assert!(state.tick(t0() + Duration::hours(3), None).timed_up.is_empty());
        assert!(matches!(state.switch_to_open(4), Err(CoreError::SessionNotFound(4))));
    }

    #[test]
    fn test_preview_does_not_mutate() {
        let mut state = AppState::default();
        state.start_session(open(1, GameType::Double), t0()).unwrap();
        let before = state.clone();

        let bill = state.preview_end(1, t0() + Duration::minutes(90)).unwrap();
        assert_eq!(bill.cost, Money::from_cents(750));
        assert_eq!(state, before);
    }

    #[test]
    fn test_delete_busy_device_rejected() {
        let mut state = AppState::default();
        state.start_session(open(2, GameType::Double), t0()).unwrap();
        assert!(matches!(state.delete_device(2), Err(CoreError::DeviceBusy(2))));
        assert!(state.delete_device(3).is_ok());

        let added = state.add_device().unwrap();
        assert_eq!(added.id, 5);
    }

    #[test]
    fn test_manual_status_rules() {
        let mut state = AppState::default();
        assert!(matches!(
            state.set_device_status(1, DeviceStatus::Busy),
            Err(CoreError::InvalidStatusChange { .. })
        ));

        state.start_session(open(2, GameType::Double), t0()).unwrap();
        assert!(matches!(
            state.set_device_status(2, DeviceStatus::Maintenance),
            Err(CoreError::InvalidStatusChange { .. })
        ));
        assert!(state.set_device_status(2, DeviceStatus::Busy).is_ok());

        state.set_device_status(1, DeviceStatus::Maintenance).unwrap();
        state.set_device_status(1, DeviceStatus::Available).unwrap();
        assert_busy_invariant(&state);
    }

    #[test]
    fn test_settings_and_auth() {
        let mut state = AppState::default();
        assert_eq!(state.toggle_theme(), Theme::BlueOrange);

        assert!(!state.login("admin", "wrong"));
        assert!(!state.is_authenticated);
        assert!(state.login("admin", "1234"));
        assert!(state.is_authenticated);
        state.logout();
        assert!(!state.is_authenticated);

        let bad = Credentials {
            login_user: String::new(),
            ..Credentials::default()
        };
        assert!(state.update_credentials(bad).is_err());
        assert_eq!(state.credentials, Credentials::default());

        let mut labels = BTreeMap::new();
        labels.insert("dashboard".to_string(), "لوحة التحكم".to_string());
        state.update_labels(labels).unwrap();
        assert_eq!(state.labels.translate("dashboard", &[]), "لوحة التحكم");

        let bad_prices = PriceTable::from_rates([(GameType::Single, Money::from_cents(-100))]);
        assert!(state.update_prices(bad_prices).is_err());
        assert_eq!(state.prices, PriceTable::default());
    }
}
