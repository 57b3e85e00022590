//! # lounge-core: Pure Business Logic for Lounge POS
//!
//! This crate is the **heart** of Lounge POS. It holds the device, session
//! and billing rules as plain functions over [`AppState`], with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Lounge POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (WebView)                           │   │
//! │  │    Dashboard ──► Device Cards ──► Reports ──► Admin Panel      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Tauri IPC + events                     │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    Tauri Commands + 1s Ticker                   │   │
//! │  │    start_session, end_session, extend_session, etc.            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ lounge-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌──────────┐      │   │
//! │  │   │ registry │  │ sessions │  │ billing  │  │ reports  │      │   │
//! │  │   │ Devices  │  │ Timeouts │  │ Prices   │  │ Exports  │      │   │
//! │  │   └──────────┘  └──────────┘  └──────────┘  └──────────┘      │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK READS • `now` IS PASSED IN   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    lounge-db (Database Layer)                   │   │
//! │  │             SQLite whole-state blob, migrations                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Device, Session, Report, etc.)
//! - [`money`] - Money type with integer arithmetic
//! - [`billing`] - Price table and the session cost formula
//! - [`registry`] - Device list
//! - [`sessions`] - Session table, timeouts, display clocks
//! - [`reports`] - Report log and printable exports
//! - [`labels`] - Editable display text
//! - [`state`] - The persisted record and its lenient codec
//! - [`lounge`] - Every state mutation
//! - [`error`] - Domain error types
//! - [`validation`] - Field rules
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use lounge_core::{AppState, GameType, Money, StartSession, TimeMode};
//!
//! let mut state = AppState::default();
//! let start = Utc.with_ymd_and_hms(2026, 1, 1, 18, 0, 0).unwrap();
//!
//! state.start_session(StartSession {
//!     device_id: 1,
//!     game_type: GameType::Double,
//!     time_mode: TimeMode::Open,
//!     player_name: None,
//!     initial_minutes: None,
//! }, start).unwrap();
//!
//! let report = state.end_session(1, start + Duration::minutes(90)).unwrap();
//! assert_eq!(report.cost, Money::from_cents(750)); // 1.5h × 5.00
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod auth;
pub mod billing;
pub mod error;
pub mod labels;
pub mod lounge;
pub mod money;
pub mod registry;
pub mod reports;
pub mod sessions;
pub mod state;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use billing::{Bill, PriceTable};
pub use error::{CoreError, CoreResult, ValidationError};
pub use labels::Labels;
pub use lounge::{StartSession, TickOutcome};
pub use money::Money;
pub use registry::DeviceRegistry;
pub use reports::{ExportOptions, PagedReport, ReportLog};
pub use sessions::{SessionClock, SessionTable};
pub use state::{AppState, FallbackReason, FieldFallback, LoadedState, Reconciled};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Storage key of the whole-state blob.
pub const STATE_KEY: &str = "gamingLoungeState";

/// Stations in a fresh install.
pub const DEFAULT_DEVICE_COUNT: DeviceId = 4;

/// Longest session or extension, in minutes (24 hours).
pub const MAX_SESSION_MINUTES: u32 = 24 * 60;

/// Highest hourly rate accepted by the price editor (1,000,000.00).
pub const MAX_HOURLY_RATE_CENTS: i64 = 100_000_000;

pub const MAX_PLAYER_NAME_LEN: usize = 60;

pub const MAX_CREDENTIAL_LEN: usize = 64;

/// Rows per page of the paginated report export.
pub const DEFAULT_ROWS_PER_PAGE: usize = 25;
