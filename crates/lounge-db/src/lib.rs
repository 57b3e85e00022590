//! # lounge-db: Database Layer for Lounge POS
//!
//! This crate persists the lounge's whole state in SQLite, using sqlx for
//! async access.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Lounge POS Data Flow                             │
//! │                                                                         │
//! │  Tauri Command (end_session) / 1s Ticker                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     lounge-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐ │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │ │   │
//! │  │   │   (pool.rs)   │◄───│  (state.rs)    │    │  (embedded)  │ │   │
//! │  │   │  SqlitePool   │    │ StateRepository│    │ 001_app_state│ │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘ │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   <data dir>/lounge.db   app_state["gamingLoungeState"]         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `pool` opens the file and applies the embedded `migrations`.
//! `repository::state` reads and writes the single `app_state` row, and
//! `error` maps sqlx failures into [`DbError`].
//!
//! ```rust,ignore
//! use lounge_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/lounge.db")).await?;
//!
//! let mut loaded = db.state().load_state().await?;
//! loaded.state.toggle_theme();
//! db.state().save_state(&loaded.state).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use migrations::MigrationStatus;
pub use pool::{Database, DbConfig};
pub use repository::state::StateRepository;
