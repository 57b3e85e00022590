//! # Seed Data Generator
//!
//! Writes a demo lounge state for development.
//!
//! ## Usage
//! ```bash
//! # Six devices, one open session (default)
//! cargo run -p lounge-db --bin seed
//!
//! # More stations
//! cargo run -p lounge-db --bin seed -- --devices 10
//!
//! # Specify database path
//! cargo run -p lounge-db --bin seed -- --db ./data/lounge.db
//!
//! # Replace an existing state
//! cargo run -p lounge-db --bin seed -- --force
//! ```
//!
//! ## Generated State
//! - Devices `PS-1` … `PS-N`, all available
//! - One open double session on device 3, started 30 minutes ago
//! - Default prices, labels and credentials

use chrono::{Duration, Utc};
use lounge_core::{AppState, DeviceRegistry, GameType, StartSession, TimeMode};
use lounge_db::{Database, DbConfig};
use std::env;

const DEFAULT_DEVICES: u32 = 6;
const DEMO_DEVICE: u32 = 3;
const DEMO_PLAYER: &str = "أحمد";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut device_count = DEFAULT_DEVICES;
    let mut db_path = "./lounge_dev.db".to_string();
    let mut force = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--devices" | "-n" => {
                if i + 1 < args.len() {
                    device_count = args[i + 1].parse().unwrap_or(DEFAULT_DEVICES);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--force" | "-f" => force = true,
            "--help" | "-h" => {
                println!("Lounge POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -n, --devices <N>  Number of devices (default: 6)");
                println!("  -d, --db <PATH>    Database file path (default: ./lounge_dev.db)");
                println!("  -f, --force        Overwrite an existing state");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Lounge POS Seed Data Generator");
    println!("=================================");
    println!("Database: {}", db_path);
    println!("Devices:  {}", device_count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    if !force && db.state().last_saved_at().await?.is_some() {
        println!("⚠ Database already has a saved state");
        println!("  Skipping seed to keep it. Pass --force to replace it.");
        return Ok(());
    }

    let state = demo_state(device_count)?;
    db.state().save_state(&state).await?;

    println!();
    for device in state.devices.iter() {
        println!("  {:<6} {}", device.name, device.status);
    }
    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds the demo state: `device_count` stations and one running session.
fn demo_state(device_count: u32) -> Result<AppState, lounge_core::CoreError> {
    let mut state = AppState {
        devices: DeviceRegistry::empty(),
        ..AppState::default()
    };
    for _ in 0..device_count.max(1) {
        state.add_device()?;
    }

    if state.devices.contains(DEMO_DEVICE) {
        state.start_session(
            StartSession {
                device_id: DEMO_DEVICE,
                game_type: GameType::Double,
                time_mode: TimeMode::Open,
                player_name: Some(DEMO_PLAYER.to_string()),
                initial_minutes: None,
            },
            Utc::now() - Duration::minutes(30),
        )?;
    }

    Ok(state)
}
