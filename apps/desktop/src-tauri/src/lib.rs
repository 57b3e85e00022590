//! # Lounge Desktop Library
//!
//! Core library for the Lounge POS desktop application.
//! This is the main entry point that configures and runs the Tauri app.
//!
//! ## Module Organization
//! ```text
//! lounge_desktop_lib/
//! ├── lib.rs          ◄─── You are here (Tauri setup & run)
//! ├── ticker.rs       ◄─── 1s session ticker and its events
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   ├── lounge.rs   ◄─── Shared AppState + admin unlock
//! │   └── config.rs   ◄─── lounge.toml / LOUNGE_* configuration
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── lounge.rs   ◄─── Snapshot, theme
//! │   ├── auth.rs     ◄─── Login, admin unlock
//! │   ├── devices.rs  ◄─── Device management
//! │   ├── sessions.rs ◄─── Session lifecycle
//! │   ├── reports.rs  ◄─── Daily report, exports
//! │   ├── admin.rs    ◄─── Prices, labels, credentials
//! │   └── config.rs   ◄─── Configuration retrieval
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Events
//! | Event             | Payload            | When                         |
//! |-------------------|--------------------|------------------------------|
//! | `session-time-up` | `TimeUpEvent`      | a timed session runs out     |
//! | `session-ended`   | `Report`           | the ticker ended a session   |
//! | `session-clocks`  | `SessionClock[]`   | every tick                   |

pub mod commands;
pub mod error;
pub mod state;
pub mod ticker;

use tauri::Manager;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use lounge_db::{Database, DbConfig, DbError};
use state::{DbState, LoungeConfig, LoungeState};

/// Runs the Tauri application.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter                                │
/// │     • Default: info,lounge=debug,sqlx=warn; RUST_LOG overrides          │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • defaults → lounge.toml → LOUNGE_* env                             │
/// │                                                                         │
/// │  3. Connect to Database ──────────────────────────────────────────────► │
/// │     • SQLite with WAL mode                                              │
/// │     • Run pending migrations                                            │
/// │                                                                         │
/// │  4. Load State ───────────────────────────────────────────────────────► │
/// │     • per-field fallback to defaults                                    │
/// │     • busy flags reconciled with sessions                               │
/// │                                                                         │
/// │  5. Manage State & Start Ticker ──────────────────────────────────────► │
/// │     • DbState, LoungeState, LoungeConfig                                │
/// │     • Ticker shares LoungeState with the commands                       │
/// │                                                                         │
/// │  6. Build & Run Tauri App ────────────────────────────────────────────► │
/// │     • Register all commands                                             │
/// │     • Launch window                                                     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run() {
    init_tracing();

    info!("Starting Lounge POS Desktop Application");

    let config = LoungeConfig::load_or_default(None);

    tauri::Builder::default()
        .setup(move |app| {
            let db_path = config.database_path()?;
            info!(?db_path, "Database path determined");

            // Initialize database and load state (blocking in setup)
            let (db, loaded) = tauri::async_runtime::block_on(async {
                let db = Database::new(DbConfig::new(db_path)).await?;
                let loaded = db.state().load_state().await?;
                Ok::<_, DbError>((db, loaded))
            })?;

            if loaded.malformed().next().is_some() {
                warn!("Some saved settings were unreadable and were reset to defaults");
            }

            let db_state = DbState::new(db);
            let lounge_state = LoungeState::new(loaded.state);

            ticker::spawn(
                app.handle().clone(),
                lounge_state.clone(),
                db_state.clone(),
                &config,
            );

            app.manage(db_state);
            app.manage(lounge_state);
            app.manage(config.clone());

            info!("State initialized");
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Lounge commands
            commands::lounge::get_state,
            commands::lounge::toggle_theme,
            // Auth commands
            commands::auth::login,
            commands::auth::logout,
            commands::auth::verify_admin_password,
            commands::auth::lock_admin,
            // Device commands
            commands::devices::add_device,
            commands::devices::delete_device,
            commands::devices::set_device_status,
            // Session commands
            commands::sessions::start_session,
            commands::sessions::end_session,
            commands::sessions::request_end_session,
            commands::sessions::preview_end_session,
            commands::sessions::extend_session,
            commands::sessions::switch_to_open,
            commands::sessions::open_extend_prompt,
            commands::sessions::close_extend_prompt,
            commands::sessions::dismiss_time_up_prompt,
            commands::sessions::clear_last_ended,
            commands::sessions::get_clocks,
            // Report commands
            commands::reports::get_reports,
            commands::reports::export_report_html,
            commands::reports::export_report_text,
            commands::reports::delete_all_reports,
            // Admin commands
            commands::admin::update_prices,
            commands::admin::update_labels,
            commands::admin::get_credentials,
            commands::admin::update_credentials,
            // Config commands
            commands::config::get_config,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=lounge=trace` - Show trace for lounge crates only
/// - Default: `info,lounge=debug,sqlx=warn`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,lounge=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
