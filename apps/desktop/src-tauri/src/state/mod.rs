//! # State Module
//!
//! Manages application state for the Tauri desktop app.
//!
//! Each concern is its own managed type, so a command declares exactly
//! the state it touches.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      Tauri Runtime                              │   │
//! │  │  app.manage(db_state);                                          │   │
//! │  │  app.manage(lounge_state);                                      │   │
//! │  │  app.manage(config);                                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │          ┌──────────────────┼──────────────────┐                       │
//! │          ▼                  ▼                  ▼                        │
//! │  ┌──────────────┐  ┌──────────────────┐  ┌──────────────────┐          │
//! │  │   DbState    │  │   LoungeState    │  │   LoungeConfig   │          │
//! │  │              │  │                  │  │                  │          │
//! │  │  Database    │  │  Arc<Mutex<      │  │  lounge.toml     │          │
//! │  │  (SQLite     │  │    AppState>>    │  │  + LOUNGE_* env  │          │
//! │  │   pool)      │  │  admin unlock    │  │                  │          │
//! │  └──────────────┘  └──────────────────┘  └──────────────────┘          │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • DbState: Database has internal connection pool (thread-safe)        │
//! │  • LoungeState: one Mutex shared by commands and the ticker            │
//! │  • LoungeConfig: Read-only after initialization                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;
mod lounge;

pub use config::{ConfigError, LoungeConfig};
pub use db::DbState;
pub use lounge::{LoungeState, Snapshot};
