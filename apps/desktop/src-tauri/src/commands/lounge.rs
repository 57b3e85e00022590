//! # Lounge Commands
//!
//! The snapshot the main screen renders from, and the theme switch.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tauri::State;
use tracing::{debug, info};

use lounge_core::{
    AdminAccess, AppState, DeviceRegistry, Labels, PriceTable, Report, SessionClock,
    SessionTable, Theme,
};

use crate::error::ApiError;
use crate::state::{DbState, LoungeState};

/// Everything the main screen needs, minus reports and credentials.
///
/// Reports come from the report commands; credentials only from the
/// credential manager.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoungeSnapshot {
    pub theme: Theme,
    pub is_authenticated: bool,
    pub devices: DeviceRegistry,
    pub sessions: SessionTable,
    pub prices: PriceTable,
    pub labels: Labels,
    pub clocks: Vec<SessionClock>,
    pub report_count: usize,
    /// The session just ended, for the receipt prompt.
    pub last_ended: Option<Report>,
    pub admin_access: Option<AdminAccess>,
}

impl LoungeSnapshot {
    pub fn capture(
        state: &AppState,
        now: DateTime<Utc>,
        admin_access: Option<AdminAccess>,
    ) -> Self {
        LoungeSnapshot {
            theme: state.theme,
            is_authenticated: state.is_authenticated,
            devices: state.devices.clone(),
            sessions: state.sessions.clone(),
            prices: state.prices.clone(),
            labels: state.labels.clone(),
            clocks: state.clocks(now),
            report_count: state.reports.len(),
            last_ended: state.last_ended.clone(),
            admin_access,
        }
    }
}

/// Gets the whole-screen snapshot.
#[tauri::command]
pub fn get_state(lounge: State<'_, LoungeState>) -> Result<LoungeSnapshot, ApiError> {
    debug!("get_state command");
    let admin = lounge.admin_access()?;
    lounge.with_state(|s| LoungeSnapshot::capture(s, Utc::now(), admin))
}

/// Cycles light → dark → blue/orange and saves.
#[tauri::command]
pub async fn toggle_theme(
    lounge: State<'_, LoungeState>,
    db: State<'_, DbState>,
) -> Result<Theme, ApiError> {
    let (theme, json) = lounge.mutate(|s| Ok::<_, ApiError>(s.toggle_theme()))?;
    db.save(&json).await?;

    info!(?theme, "Theme changed");
    Ok(theme)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use lounge_core::{GameType, StartSession, TimeMode};

    #[test]
    fn test_snapshot_hides_credentials_and_reports() {
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 21, 0, 0).unwrap();
        let mut state = AppState::default();
        state
            .start_session(
                StartSession {
                    device_id: 1,
                    game_type: GameType::Single,
                    time_mode: TimeMode::Open,
                    player_name: None,
                    initial_minutes: None,
                },
                now - Duration::minutes(5),
            )
            .unwrap();

        let snapshot = LoungeSnapshot::capture(&state, now, None);
        assert_eq!(snapshot.clocks[0].text, "00:05:00");
        assert_eq!(snapshot.report_count, 0);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json.get("credentials").is_none());
        assert!(json.get("reports").is_none());
        assert_eq!(json["isAuthenticated"], false);
    }
}
