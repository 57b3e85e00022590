//! # Validation Module
//!
//! Input validation utilities for Lounge POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend                                                     │
//! │  ├── Input constraints (min=15, step=15 on duration)                   │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Tauri Command (Rust)                                         │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: field rules before any state is touched              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: AppState operations                                          │
//! │  └── Device/session rules (busy, available, timed)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use lounge_core::validation::{normalize_player_name, validate_session_minutes};
//!
//! assert_eq!(normalize_player_name(Some("  Rami ")).unwrap(), Some("Rami".to_string()));
//! assert!(validate_session_minutes("initialMinutes", 0).is_err());
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_CREDENTIAL_LEN, MAX_HOURLY_RATE_CENTS, MAX_PLAYER_NAME_LEN, MAX_SESSION_MINUTES};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Trims an optional player name; blank becomes `None`.
///
/// ## Rules
/// - Optional; whitespace-only counts as absent
/// - At most 60 characters after trimming
pub fn normalize_player_name(name: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };

    if name.chars().count() > MAX_PLAYER_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "playerName".to_string(),
            max: MAX_PLAYER_NAME_LEN,
        });
    }

    Ok(Some(name.to_string()))
}

/// Validates one credential field (user name or password).
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 64 characters
pub fn validate_credential(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_CREDENTIAL_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_CREDENTIAL_LEN,
        });
    }

    Ok(())
}

/// Validates a label key. Values may be anything, including empty.
pub fn validate_label_key(key: &str) -> ValidationResult<()> {
    if key.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "label key".to_string(),
        });
    }
    Ok(())
}

/// Parses a report date in `YYYY-MM-DD` form.
///
/// ## Example
/// ```rust
/// use lounge_core::validation::parse_report_date;
///
/// assert!(parse_report_date("2026-03-14").is_ok());
/// assert!(parse_report_date("14/03/2026").is_err());
/// ```
pub fn parse_report_date(date: &str) -> ValidationResult<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|e| {
        ValidationError::InvalidFormat {
            field: "date".to_string(),
            reason: e.to_string(),
        }
    })
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a session length or extension in minutes.
///
/// ## Rules
/// - Must be positive
/// - At most 24 hours
pub fn validate_session_minutes(field: &str, minutes: u32) -> ValidationResult<()> {
    if minutes == 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    if minutes > MAX_SESSION_MINUTES {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: MAX_SESSION_MINUTES as i64,
        });
    }

    Ok(())
}

/// Validates an hourly rate.
///
/// ## Rules
/// - Zero is allowed (free play)
/// - At most 1,000,000.00 per hour
pub fn validate_hourly_rate(field: &str, rate: Money) -> ValidationResult<()> {
    if rate.is_negative() || rate.cents() > MAX_HOURLY_RATE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_HOURLY_RATE_CENTS,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_name_blank_is_none() {
        assert_eq!(normalize_player_name(None).unwrap(), None);
        assert_eq!(normalize_player_name(Some("")).unwrap(), None);
        assert_eq!(normalize_player_name(Some("   ")).unwrap(), None);
    }

    #[test]
    fn test_player_name_length_counts_chars() {
        // Arabic names are multi-byte; the limit is on characters
        let name = "أ".repeat(MAX_PLAYER_NAME_LEN);
        assert!(normalize_player_name(Some(&name)).is_ok());

        let too_long = "x".repeat(MAX_PLAYER_NAME_LEN + 1);
        assert!(matches!(
            normalize_player_name(Some(&too_long)),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_credentials() {
        assert!(validate_credential("loginUser", "admin").is_ok());
        assert!(matches!(
            validate_credential("loginUser", "  "),
            Err(ValidationError::Required { .. })
        ));
        assert!(validate_credential("adminPass", &"p".repeat(65)).is_err());
    }

    #[test]
    fn test_session_minutes() {
        assert!(validate_session_minutes("minutes", 15).is_ok());
        assert!(validate_session_minutes("minutes", MAX_SESSION_MINUTES).is_ok());
        assert!(matches!(
            validate_session_minutes("minutes", 0),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            validate_session_minutes("minutes", MAX_SESSION_MINUTES + 1),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_hourly_rate() {
        assert!(validate_hourly_rate("double", Money::zero()).is_ok());
        assert!(validate_hourly_rate("double", Money::from_cents(MAX_HOURLY_RATE_CENTS)).is_ok());
        assert!(validate_hourly_rate("double", Money::from_cents(-1)).is_err());
        let too_high = Money::from_cents(MAX_HOURLY_RATE_CENTS + 1);
        assert!(validate_hourly_rate("double", too_high).is_err());
    }

    #[test]
    fn test_label_key() {
        assert!(validate_label_key("dashboard").is_ok());
        assert!(validate_label_key(" ").is_err());
    }
}
