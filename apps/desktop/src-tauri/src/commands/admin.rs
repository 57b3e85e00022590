//! # Admin Commands
//!
//! Settings behind the admin panel: hourly prices, display labels and the
//! login credentials.
//!
//! | Command              | Needs                     |
//! |----------------------|---------------------------|
//! | `update_prices`      | `Full`                    |
//! | `update_labels`      | `Full`                    |
//! | `get_credentials`    | `WithCredentialManager`   |
//! | `update_credentials` | `WithCredentialManager`   |

use std::collections::BTreeMap;

use tauri::State;
use tracing::{debug, info};

use lounge_core::{AdminAccess, Credentials, Labels, PriceTable};

use crate::error::ApiError;
use crate::state::{DbState, LoungeState};

/// Replaces the hourly rates. Running sessions are billed at the new
/// rates when they end.
#[tauri::command]
pub async fn update_prices(
    lounge: State<'_, LoungeState>,
    db: State<'_, DbState>,
    prices: PriceTable,
) -> Result<PriceTable, ApiError> {
    debug!("update_prices command");
    lounge.require_admin(AdminAccess::Full)?;

    let (prices, json) = lounge.mutate(|s| {
        s.update_prices(prices)?;
        Ok::<_, ApiError>(s.prices.clone())
    })?;
    db.save(&json).await?;

    info!(
        rates = ?prices.iter().map(|(game, rate)| (game, rate.cents())).collect::<Vec<_>>(),
        "Prices updated"
    );
    Ok(prices)
}

/// Replaces the label table. Keys missing from `labels` fall back to the
/// key itself when displayed.
#[tauri::command]
pub async fn update_labels(
    lounge: State<'_, LoungeState>,
    db: State<'_, DbState>,
    labels: BTreeMap<String, String>,
) -> Result<Labels, ApiError> {
    debug!(count = labels.len(), "update_labels command");
    lounge.require_admin(AdminAccess::Full)?;

    let (labels, json) = lounge.mutate(|s| {
        s.update_labels(labels)?;
        Ok::<_, ApiError>(s.labels.clone())
    })?;
    db.save(&json).await?;

    info!(count = labels.len(), "Labels updated");
    Ok(labels)
}

#[tauri::command]
pub fn get_credentials(lounge: State<'_, LoungeState>) -> Result<Credentials, ApiError> {
    debug!("get_credentials command");
    lounge.require_admin(AdminAccess::WithCredentialManager)?;
    lounge.with_state(|s| s.credentials.clone())
}

/// Replaces the login and admin passwords.
#[tauri::command]
pub async fn update_credentials(
    lounge: State<'_, LoungeState>,
    db: State<'_, DbState>,
    credentials: Credentials,
) -> Result<(), ApiError> {
    debug!("update_credentials command");
    lounge.require_admin(AdminAccess::WithCredentialManager)?;

    let ((), json) = lounge.mutate(|s| s.update_credentials(credentials))?;
    db.save(&json).await?;

    info!("Credentials updated");
    Ok(())
}
