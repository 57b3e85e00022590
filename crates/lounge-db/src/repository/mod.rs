//! # Repository Module
//!
//! Database repository implementations for Lounge POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Tauri Command / Ticker                                                │
//! │       │                                                                 │
//! │       │  db.state().save_json(&json)                                   │
//! │       ▼                                                                 │
//! │  StateRepository                                                       │
//! │  ├── load_state(&self)          ← decode + reconcile + log fallbacks   │
//! │  ├── save_state(&self, state)                                          │
//! │  ├── load_raw / save_raw        ← any key                              │
//! │  └── delete(&self, key)                                                │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite: app_state(key, value, updated_at)                             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`state::StateRepository`] - Whole-state blob load/save

pub mod state;
