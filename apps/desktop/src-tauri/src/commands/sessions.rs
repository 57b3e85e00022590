//! # Session Commands
//!
//! Tauri commands for the session lifecycle.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session Lifecycle                                    │
//! │                                                                         │
//! │  ┌──────────┐ start_session ┌──────────┐ request_end_session ┌────────┐ │
//! │  │ Device   │──────────────►│  Active  │────────────────────►│ Ending │ │
//! │  │ available│               │          │                     │        │ │
//! │  └──────────┘               └──────────┘                     └────────┘ │
//! │       ▲                       │  │   ▲                           │      │
//! │       │             extend ───┘  │   └── switch_to_open          │      │
//! │       │                          │                               │      │
//! │       │              end_session │              next tick        │      │
//! │       └──────────────────────────┴───────────────────────────────┘      │
//! │                     report appended, device available                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use tauri::State;
use tracing::{debug, info};

use lounge_core::{Bill, DeviceId, Report, Session, SessionClock, StartSession};

use crate::error::ApiError;
use crate::state::{DbState, LoungeState};

/// Starts a session on an available device.
///
/// ## Errors
/// - `DEVICE_NOT_AVAILABLE` when the device is under maintenance
/// - `DEVICE_BUSY` when a session already runs on it
/// - `VALIDATION_ERROR` for a missing or out-of-range duration, or a long name
#[tauri::command]
pub async fn start_session(
    lounge: State<'_, LoungeState>,
    db: State<'_, DbState>,
    request: StartSession,
) -> Result<Session, ApiError> {
    let device_id = request.device_id;
    debug!(
        device_id,
        game_type = ?request.game_type,
        time_mode = ?request.time_mode,
        "start_session command"
    );

    let (session, json) = lounge.mutate(|s| s.start_session(request, Utc::now()).cloned())?;
    db.save(&json).await?;

    info!(
        device_id,
        game_type = ?session.game_type,
        minutes = ?session.initial_minutes,
        "Session started"
    );
    Ok(session)
}

/// Ends a session now and returns its report.
#[tauri::command]
pub async fn end_session(
    lounge: State<'_, LoungeState>,
    db: State<'_, DbState>,
    device_id: DeviceId,
) -> Result<Report, ApiError> {
    debug!(device_id, "end_session command");

    let (report, json) = lounge.mutate(|s| s.end_session(device_id, Utc::now()))?;
    db.save(&json).await?;

    info!(
        device_id,
        minutes = report.duration_minutes,
        cost = %report.cost,
        "Session ended"
    );
    Ok(report)
}

/// Marks a session ending; the ticker bills it on its next pass.
#[tauri::command]
pub async fn request_end_session(
    lounge: State<'_, LoungeState>,
    db: State<'_, DbState>,
    device_id: DeviceId,
) -> Result<(), ApiError> {
    debug!(device_id, "request_end_session command");

    let ((), json) = lounge.mutate(|s| s.request_end(device_id))?;
    db.save(&json).await?;
    Ok(())
}

/// Duration and cost if the session ended now. Changes nothing.
#[tauri::command]
pub fn preview_end_session(
    lounge: State<'_, LoungeState>,
    device_id: DeviceId,
) -> Result<Bill, ApiError> {
    debug!(device_id, "preview_end_session command");
    lounge
        .with_state(|s| s.preview_end(device_id, Utc::now()))?
        .map_err(ApiError::from)
}

/// Adds minutes to a timed session and clears its time-up state.
#[tauri::command]
pub async fn extend_session(
    lounge: State<'_, LoungeState>,
    db: State<'_, DbState>,
    device_id: DeviceId,
    minutes: u32,
) -> Result<Session, ApiError> {
    debug!(device_id, minutes, "extend_session command");

    let (session, json) = lounge.mutate(|s| {
        s.extend_session(device_id, minutes)?;
        s.sessions.require(device_id).cloned()
    })?;
    db.save(&json).await?;

    info!(device_id, minutes, "Session extended");
    Ok(session)
}

/// Turns a timed session into an open one.
#[tauri::command]
pub async fn switch_to_open(
    lounge: State<'_, LoungeState>,
    db: State<'_, DbState>,
    device_id: DeviceId,
) -> Result<(), ApiError> {
    debug!(device_id, "switch_to_open command");

    let ((), json) = lounge.mutate(|s| s.switch_to_open(device_id))?;
    db.save(&json).await?;

    info!(device_id, "Session switched to open time");
    Ok(())
}

#[tauri::command]
pub async fn open_extend_prompt(
    lounge: State<'_, LoungeState>,
    db: State<'_, DbState>,
    device_id: DeviceId,
) -> Result<(), ApiError> {
    debug!(device_id, "open_extend_prompt command");
    let ((), json) = lounge.mutate(|s| s.open_extend_prompt(device_id))?;
    db.save(&json).await?;
    Ok(())
}

#[tauri::command]
pub async fn close_extend_prompt(
    lounge: State<'_, LoungeState>,
    db: State<'_, DbState>,
    device_id: DeviceId,
) -> Result<(), ApiError> {
    debug!(device_id, "close_extend_prompt command");
    let ((), json) = lounge.mutate(|s| s.close_extend_prompt(device_id))?;
    db.save(&json).await?;
    Ok(())
}

/// Hides the time-up prompt. The session keeps running, already notified.
#[tauri::command]
pub async fn dismiss_time_up_prompt(
    lounge: State<'_, LoungeState>,
    db: State<'_, DbState>,
    device_id: DeviceId,
) -> Result<(), ApiError> {
    debug!(device_id, "dismiss_time_up_prompt command");
    let ((), json) = lounge.mutate(|s| s.dismiss_time_up_prompt(device_id))?;
    db.save(&json).await?;
    Ok(())
}

/// Closes the receipt prompt. The last-ended report is not persisted.
#[tauri::command]
pub fn clear_last_ended(lounge: State<'_, LoungeState>) -> Result<(), ApiError> {
    debug!("clear_last_ended command");
    lounge.with_state_mut(|s| s.clear_last_ended())
}

/// Clock text for every running session. The ticker also pushes these.
#[tauri::command]
pub fn get_clocks(lounge: State<'_, LoungeState>) -> Result<Vec<SessionClock>, ApiError> {
    lounge.with_state(|s| s.clocks(Utc::now()))
}
