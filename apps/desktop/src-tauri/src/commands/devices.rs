//! # Device Commands
//!
//! Admin-panel device management. All three need the panel unlocked.

use tauri::State;
use tracing::{debug, info};

use lounge_core::{AdminAccess, Device, DeviceId, DeviceStatus};

use crate::error::ApiError;
use crate::state::{DbState, LoungeState};

/// Adds the next `PS-n` device, available.
#[tauri::command]
pub async fn add_device(
    lounge: State<'_, LoungeState>,
    db: State<'_, DbState>,
) -> Result<Device, ApiError> {
    debug!("add_device command");
    lounge.require_admin(AdminAccess::Full)?;

    let (device, json) = lounge.mutate(|s| s.add_device())?;
    db.save(&json).await?;

    info!(device_id = device.id, name = %device.name, "Device added");
    Ok(device)
}

/// Removes a device. Fails with `DEVICE_BUSY` while a session runs on it.
#[tauri::command]
pub async fn delete_device(
    lounge: State<'_, LoungeState>,
    db: State<'_, DbState>,
    device_id: DeviceId,
) -> Result<Device, ApiError> {
    debug!(device_id, "delete_device command");
    lounge.require_admin(AdminAccess::Full)?;

    let (device, json) = lounge.mutate(|s| s.delete_device(device_id))?;
    db.save(&json).await?;

    info!(device_id, name = %device.name, "Device deleted");
    Ok(device)
}

/// Switches a device between available and maintenance.
///
/// `busy` is never set by hand; it follows the session table.
#[tauri::command]
pub async fn set_device_status(
    lounge: State<'_, LoungeState>,
    db: State<'_, DbState>,
    device_id: DeviceId,
    status: DeviceStatus,
) -> Result<(), ApiError> {
    debug!(device_id, %status, "set_device_status command");
    lounge.require_admin(AdminAccess::Full)?;

    let ((), json) = lounge.mutate(|s| s.set_device_status(device_id, status))?;
    db.save(&json).await?;

    info!(device_id, %status, "Device status changed");
    Ok(())
}
