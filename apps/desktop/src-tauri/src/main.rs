//! # Lounge Desktop Application Entry Point
//!
//! ## Application Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Lounge POS Desktop                               │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      Tauri WebView                               │  │
//! │  │  ┌────────────────────────────────────────────────────────────┐  │  │
//! │  │  │                    SolidJS Frontend                        │  │  │
//! │  │  │  • Device Grid          • Start / Extend Modals            │  │  │
//! │  │  │  • Daily Report         • Admin Panel                      │  │  │
//! │  │  └────────────────────────────────────────────────────────────┘  │  │
//! │  │            invoke('command')   ▲  listen('session-clocks')      │  │
//! │  └──────────────────────────────┼─┼─────────────────────────────────┘  │
//! │                                 ▼ │                                     │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                    Rust Backend (this crate)                     │  │
//! │  │                                                                  │  │
//! │  │  lib.rs ─────► logging, config, database, state, ticker         │  │
//! │  │  commands/ ──► start_session, end_session, export_report_html   │  │
//! │  │  ticker.rs ──► 1s tick, time-up and clock events                │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                 │                                       │
//! │                                 ▼                                       │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                         SQLite Database                          │  │
//! │  │  lounge.db (local file, WAL mode, one state row)                 │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

// Prevents an additional console window on Windows in release
#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]

fn main() {
    // The actual setup is in lib.rs for better testability
    lounge_desktop_lib::run();
}
