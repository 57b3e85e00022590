//! # Auth Commands
//!
//! Operator login and the admin panel unlock.
//!
//! ## Unlock Levels
//! ```text
//! verify_admin_password(pw)
//!      │
//!      ├── pw == credentials.adminPass ───► Full
//!      ├── pw == config recovery_password ► WithCredentialManager
//!      └── otherwise ─────────────────────► null (panel stays locked)
//! ```
//!
//! The unlock lives in process memory only. Restarting the app, `logout`
//! or `lock_admin` locks the panel again.

use tauri::State;
use tracing::{debug, info, warn};

use lounge_core::AdminAccess;

use crate::error::ApiError;
use crate::state::{DbState, LoungeConfig, LoungeState};

/// Checks the operator credentials. Wrong credentials answer `false`.
#[tauri::command]
pub async fn login(
    lounge: State<'_, LoungeState>,
    db: State<'_, DbState>,
    username: String,
    password: String,
) -> Result<bool, ApiError> {
    debug!(username = %username, "login command");

    let (ok, json) = lounge.mutate(|s| Ok::<_, ApiError>(s.login(&username, &password)))?;
    if !ok {
        warn!(username = %username, "Login rejected");
        return Ok(false);
    }

    db.save(&json).await?;
    info!(username = %username, "Logged in");
    Ok(true)
}

/// Clears the persisted login flag and locks the admin panel.
#[tauri::command]
pub async fn logout(
    lounge: State<'_, LoungeState>,
    db: State<'_, DbState>,
) -> Result<(), ApiError> {
    debug!("logout command");

    let ((), json) = lounge.mutate(|s| {
        s.logout();
        Ok::<_, ApiError>(())
    })?;
    lounge.set_admin_access(None)?;
    db.save(&json).await?;

    info!("Logged out");
    Ok(())
}

/// Unlocks the admin panel.
///
/// ## Returns
/// The granted level, or `None` for a wrong password.
#[tauri::command]
pub fn verify_admin_password(
    lounge: State<'_, LoungeState>,
    config: State<'_, LoungeConfig>,
    password: String,
) -> Result<Option<AdminAccess>, ApiError> {
    debug!("verify_admin_password command");

    let access = lounge.with_state(|s| {
        s.credentials
            .verify_admin(&password, config.recovery_password())
    })?;

    match access {
        Some(level) => {
            info!(?level, "Admin panel unlocked");
            lounge.set_admin_access(Some(level))?;
        }
        None => warn!("Admin password rejected"),
    }
    Ok(access)
}

/// Locks the admin panel without logging out.
#[tauri::command]
pub fn lock_admin(lounge: State<'_, LoungeState>) -> Result<(), ApiError> {
    debug!("lock_admin command");
    lounge.set_admin_access(None)
}
