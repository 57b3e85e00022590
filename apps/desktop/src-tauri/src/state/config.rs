//! # Configuration State
//!
//! Lounge configuration loaded once at startup.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     LOUNGE_DB_PATH=/tmp/dev.db                                         │
//! │     LOUNGE_TIME_UP_GRACE_SECS=120                                      │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/lounge-pos/lounge.toml (Linux)                           │
//! │     ~/Library/Application Support/com.lounge.pos/lounge.toml (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # lounge.toml
//! lounge_name = "Level Up Lounge"
//! currency_symbol = "EGP "
//! utc_offset_minutes = 120
//! time_up_grace_secs = 300
//! extension_presets = [15, 30, 60]
//! recovery_password = "names"
//! ```
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use lounge_core::validation::{validate_credential, validate_session_minutes};
use lounge_core::{ExportOptions, ValidationError, DEFAULT_ROWS_PER_PAGE};

const CONFIG_FILE: &str = "lounge.toml";
const DB_FILE: &str = "lounge.db";
const MAX_UTC_OFFSET_MINUTES: i32 = 18 * 60;

/// Why the configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ValidationError),

    #[error("Could not determine the app data directory")]
    NoDataDir,
}

/// Application configuration.
///
/// Every key is optional in the file; missing keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoungeConfig {
    /// SQLite file. `None` means `<data dir>/lounge.db`.
    pub database_path: Option<PathBuf>,

    /// Shown as the title of exported reports.
    pub lounge_name: String,

    /// Prefix for amounts in exports.
    pub currency_symbol: String,

    /// Offset used to print session times in exports.
    pub utc_offset_minutes: i32,

    /// Ticker period.
    pub tick_interval_ms: u64,

    /// Ends a session automatically this long after its time-up prompt
    /// appeared. `None` waits for the operator.
    pub time_up_grace_secs: Option<u64>,

    /// Minutes offered by the extend dialog.
    pub extension_presets: Vec<u32>,

    /// Pre-filled minutes in the start-session form.
    pub default_timed_minutes: u32,

    /// Rows per page of the paginated report.
    pub rows_per_page: usize,

    /// Second admin password that also opens the credential manager.
    #[serde(skip_serializing)]
    pub recovery_password: Option<String>,
}

impl Default for LoungeConfig {
    fn default() -> Self {
        LoungeConfig {
            database_path: None,
            lounge_name: "Game Lounge".to_string(),
            currency_symbol: "$".to_string(),
            utc_offset_minutes: 0,
            tick_interval_ms: 1000,
            time_up_grace_secs: None,
            extension_presets: vec![15, 30, 45, 60],
            default_timed_minutes: 60,
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            recovery_password: None,
        }
    }
}

impl LoungeConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`lounge.toml`)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = match config_path.or_else(Self::default_config_path) {
            Some(path) if path.exists() => Self::from_file(&path)?,
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load lounge config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Reads one TOML file on top of the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        info!(?path, "Loading lounge config from file");
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Checks every bound the core enforces on the same values.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.lounge_name.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "lounge_name".to_string(),
            });
        }
        if self.tick_interval_ms == 0 {
            return Err(ValidationError::MustBePositive {
                field: "tick_interval_ms".to_string(),
            });
        }
        if self.rows_per_page == 0 {
            return Err(ValidationError::MustBePositive {
                field: "rows_per_page".to_string(),
            });
        }
        if self.utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
            return Err(ValidationError::OutOfRange {
                field: "utc_offset_minutes".to_string(),
                min: -i64::from(MAX_UTC_OFFSET_MINUTES),
                max: i64::from(MAX_UTC_OFFSET_MINUTES),
            });
        }
        validate_session_minutes("default_timed_minutes", self.default_timed_minutes)?;
        for &minutes in &self.extension_presets {
            validate_session_minutes("extension_presets", minutes)?;
        }
        if let Some(recovery) = &self.recovery_password {
            validate_credential("recovery_password", recovery)?;
        }
        Ok(())
    }

    /// Applies `LOUNGE_*` overrides. Unparseable values are logged and ignored.
    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(path) = var("LOUNGE_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database_path = Some(PathBuf::from(path));
        }

        if let Some(name) = var("LOUNGE_NAME") {
            self.lounge_name = name;
        }

        if let Some(symbol) = var("LOUNGE_CURRENCY_SYMBOL") {
            self.currency_symbol = symbol;
        }

        if let Some(offset) = var("LOUNGE_UTC_OFFSET_MINUTES") {
            match offset.parse() {
                Ok(minutes) => self.utc_offset_minutes = minutes,
                Err(_) => warn!(value = %offset, "Ignoring LOUNGE_UTC_OFFSET_MINUTES"),
            }
        }

        if let Some(interval) = var("LOUNGE_TICK_INTERVAL_MS") {
            match interval.parse() {
                Ok(ms) => self.tick_interval_ms = ms,
                Err(_) => warn!(value = %interval, "Ignoring LOUNGE_TICK_INTERVAL_MS"),
            }
        }

        if let Some(grace) = var("LOUNGE_TIME_UP_GRACE_SECS") {
            if grace.is_empty() {
                self.time_up_grace_secs = None;
            } else {
                match grace.parse() {
                    Ok(secs) => {
                        debug!(secs, "Overriding time-up grace from environment");
                        self.time_up_grace_secs = Some(secs);
                    }
                    Err(_) => warn!(value = %grace, "Ignoring LOUNGE_TIME_UP_GRACE_SECS"),
                }
            }
        }

        if let Some(rows) = var("LOUNGE_ROWS_PER_PAGE") {
            match rows.parse() {
                Ok(n) => self.rows_per_page = n,
                Err(_) => warn!(value = %rows, "Ignoring LOUNGE_ROWS_PER_PAGE"),
            }
        }

        if let Some(password) = var("LOUNGE_RECOVERY_PASSWORD") {
            self.recovery_password = Some(password).filter(|p| !p.is_empty());
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Resolves the SQLite file, creating the data directory if needed.
    ///
    /// ## Platform-Specific Paths
    /// - **macOS**: `~/Library/Application Support/com.lounge.pos/lounge.db`
    /// - **Windows**: `%APPDATA%\lounge\pos\data\lounge.db`
    /// - **Linux**: `~/.local/share/lounge-pos/lounge.db`
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.database_path {
            return Ok(path.clone());
        }

        let dirs = project_dirs().ok_or(ConfigError::NoDataDir)?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        Ok(data_dir.join(DB_FILE))
    }

    /// Auto-end delay after the time-up prompt, if configured.
    pub fn time_up_grace(&self) -> Option<chrono::Duration> {
        self.time_up_grace_secs
            .and_then(|secs| i64::try_from(secs).ok())
            .map(chrono::Duration::seconds)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Export settings derived from this configuration.
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            currency_symbol: self.currency_symbol.clone(),
            rows_per_page: self.rows_per_page,
            title: self.lounge_name.clone(),
            ..ExportOptions::default()
        }
        .with_offset_minutes(self.utc_offset_minutes)
    }

    pub fn recovery_password(&self) -> Option<&str> {
        self.recovery_password.as_deref()
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "lounge", "pos")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = LoungeConfig::default();
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
        assert_eq!(config.time_up_grace(), None);
        assert_eq!(config.extension_presets, vec![15, 30, 45, 60]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "lounge_name = \"Level Up\"").unwrap();
        writeln!(file, "time_up_grace_secs = 300").unwrap();

        let config = LoungeConfig::from_file(file.path()).unwrap();
        assert_eq!(config.lounge_name, "Level Up");
        assert_eq!(config.time_up_grace(), Some(chrono::Duration::minutes(5)));
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.rows_per_page, DEFAULT_ROWS_PER_PAGE);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoungeConfig::load(Some(dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.lounge_name, "Game Lounge");
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "tick_interval_ms = \"fast\"").unwrap();
        assert!(matches!(
            LoungeConfig::load(Some(file.path().to_path_buf())),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = LoungeConfig {
            currency_symbol: "€".to_string(),
            ..LoungeConfig::default()
        };
        config.apply_env_overrides(env(&[
            ("LOUNGE_DB_PATH", "/tmp/lounge-dev.db"),
            ("LOUNGE_CURRENCY_SYMBOL", "EGP "),
            ("LOUNGE_TIME_UP_GRACE_SECS", "90"),
            ("LOUNGE_TICK_INTERVAL_MS", "not-a-number"),
            ("LOUNGE_RECOVERY_PASSWORD", "names"),
        ]));

        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/lounge-dev.db")));
        assert_eq!(config.currency_symbol, "EGP ");
        assert_eq!(config.time_up_grace_secs, Some(90));
        assert_eq!(config.tick_interval_ms, 1000);
        assert_eq!(config.recovery_password(), Some("names"));
    }

    #[test]
    fn test_empty_env_clears_optional_values() {
        let mut config = LoungeConfig {
            time_up_grace_secs: Some(60),
            recovery_password: Some("names".to_string()),
            ..LoungeConfig::default()
        };
        config.apply_env_overrides(env(&[
            ("LOUNGE_TIME_UP_GRACE_SECS", ""),
            ("LOUNGE_RECOVERY_PASSWORD", ""),
        ]));
        assert_eq!(config.time_up_grace_secs, None);
        assert_eq!(config.recovery_password(), None);
    }

    #[test]
    fn test_validation() {
        let mut config = LoungeConfig::default();

        config.tick_interval_ms = 0;
        assert!(config.validate().is_err());
        config.tick_interval_ms = 500;

        config.extension_presets = vec![30, 0];
        assert!(config.validate().is_err());
        config.extension_presets = vec![30];

        config.utc_offset_minutes = 24 * 60;
        assert!(config.validate().is_err());
        config.utc_offset_minutes = -300;

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_explicit_database_path() {
        let config = LoungeConfig {
            database_path: Some(PathBuf::from("/data/lounge.db")),
            ..LoungeConfig::default()
        };
        assert_eq!(config.database_path().unwrap(), PathBuf::from("/data/lounge.db"));
    }

    #[test]
    fn test_export_options() {
        let config = LoungeConfig {
            lounge_name: "Level Up".to_string(),
            currency_symbol: "€".to_string(),
            utc_offset_minutes: 180,
            rows_per_page: 10,
            ..LoungeConfig::default()
        };
        let options = config.export_options();
        assert_eq!(options.title, "Level Up");
        assert_eq!(options.currency_symbol, "€");
        assert_eq!(options.rows_per_page, 10);
        assert_eq!(options.offset.local_minus_utc(), 180 * 60);
    }

    #[test]
    fn test_recovery_password_not_serialized() {
        let config = LoungeConfig {
            recovery_password: Some("names".to_string()),
            ..LoungeConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("names"));
    }
}
