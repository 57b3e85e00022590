//! # Tauri Commands Module
//!
//! All commands exposed to the SolidJS frontend.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── lounge.rs    ◄─── Whole-screen snapshot, theme
//! ├── auth.rs      ◄─── Login, admin unlock
//! ├── devices.rs   ◄─── Add / delete / status
//! ├── sessions.rs  ◄─── Session lifecycle and prompts
//! ├── reports.rs   ◄─── Daily report, exports
//! ├── admin.rs     ◄─── Prices, labels, credentials
//! └── config.rs    ◄─── Configuration retrieval
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Tauri Command Flow                                   │
//! │                                                                         │
//! │  SolidJS Frontend                                                       │
//! │  ─────────────────                                                      │
//! │  const report = await invoke('end_session', { deviceId: 3 });           │
//! │         │                                                               │
//! │         │ (IPC via WebView)                                             │
//! │         ▼                                                               │
//! │  Rust Backend                                                           │
//! │  ────────────                                                           │
//! │  #[tauri::command]                                                      │
//! │  async fn end_session(                                                  │
//! │      lounge: State<'_, LoungeState>,  ◄── Injected by Tauri            │
//! │      db: State<'_, DbState>,          ◄── Injected by Tauri            │
//! │      device_id: DeviceId,             ◄── From invoke params           │
//! │  ) -> Result<Report, ApiError>                                          │
//! │         │                                                               │
//! │         │ lock → mutate → snapshot → unlock → save                      │
//! │         ▼                                                               │
//! │  SolidJS receives: Report                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every persisted mutation goes through [`LoungeState::mutate`] and is
//! saved before the command returns.
//!
//! [`LoungeState::mutate`]: crate::state::LoungeState::mutate

pub mod admin;
pub mod auth;
pub mod config;
pub mod devices;
pub mod lounge;
pub mod reports;
pub mod sessions;
