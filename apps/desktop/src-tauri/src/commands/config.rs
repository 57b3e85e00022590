//! # Config Commands
//!
//! Read-only view of `lounge.toml` after env overrides.

use tauri::State;
use tracing::debug;

use crate::state::LoungeConfig;

/// Used by:
/// - App startup (extension presets, default minutes)
/// - Report screen (currency symbol, lounge name)
///
/// The recovery password is never serialized.
#[tauri::command]
pub fn get_config(config: State<'_, LoungeConfig>) -> LoungeConfig {
    debug!("get_config command");
    (*config).clone()
}
