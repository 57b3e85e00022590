//! # Billing
//!
//! Hourly price table and the single cost formula of the lounge:
//!
//! ```text
//! duration_minutes = floor((end − start) / 60s)
//! cost             = duration_minutes / 60 × rate[game_type]   (half-up to the cent)
//! ```
//!
//! Billing happens only at session end (or for an end preview). A game
//! type missing from the table bills at zero.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{GameType, Session};
use crate::validation::validate_hourly_rate;

// =============================================================================
// Price Table
// =============================================================================

/// Hourly rate per game type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceTable(BTreeMap<GameType, Money>);

impl Default for PriceTable {
    fn default() -> Self {
        PriceTable::from_rates([
            (GameType::Single, Money::from_cents(300)),
            (GameType::Double, Money::from_cents(500)),
            (GameType::Quad, Money::from_cents(800)),
        ])
    }
}

impl PriceTable {
    pub fn from_rates(rates: impl IntoIterator<Item = (GameType, Money)>) -> Self {
        PriceTable(rates.into_iter().collect())
    }

    /// Rate for a game type; zero when the table has no entry.
    pub fn rate_for(&self, game_type: GameType) -> Money {
        self.0.get(&game_type).copied().unwrap_or_default()
    }

    pub fn set_rate(&mut self, game_type: GameType, rate: Money) {
        self.0.insert(game_type, rate);
    }

    pub fn iter(&self) -> impl Iterator<Item = (GameType, Money)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    /// Checks every rate against the allowed range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (game_type, rate) in self.iter() {
            validate_hourly_rate(game_type.label_key(), rate)?;
        }
        Ok(())
    }
}

// =============================================================================
// Bill
// =============================================================================

/// Duration and cost of a session ending at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub duration_minutes: i64,
    pub rate: Money,
    pub cost: Money,
}

/// Bills `session` as if it ended at `end`.
///
/// ## Example
/// ```rust
/// use chrono::{Duration, TimeZone, Utc};
/// use lounge_core::billing::{bill_session, PriceTable};
/// use lounge_core::{GameType, Money, Session, SessionStatus, TimeMode};
///
/// let start = Utc.with_ymd_and_hms(2026, 1, 1, 18, 0, 0).unwrap();
/// let session = Session {
///     device_id: 1,
///     start_time: start,
///     game_type: GameType::Double,
///     time_mode: TimeMode::Open,
///     player_name: None,
///     initial_minutes: None,
///     end_time: None,
///     status: SessionStatus::Active,
///     time_up_notified: false,
///     show_extend_modal: false,
///     show_time_up_modal: false,
///     time_up_at: None,
/// };
///
/// let bill = bill_session(&session, &PriceTable::default(), start + Duration::minutes(90));
/// assert_eq!(bill.duration_minutes, 90);
/// assert_eq!(bill.cost, Money::from_cents(750));
/// ```
pub fn bill_session(session: &Session, prices: &PriceTable, end: DateTime<Utc>) -> Bill {
    let duration_minutes = session.billable_minutes(end);
    let rate = prices.rate_for(session.game_type);
    Bill {
        duration_minutes,
        rate,
        cost: rate.for_minutes(duration_minutes),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SessionStatus, TimeMode};
    use chrono::{Duration, TimeZone};

    fn session(game_type: GameType, start: DateTime<Utc>) -> Session {
        Session {
            device_id: 2,
            start_time: start,
            game_type,
            time_mode: TimeMode::Open,
            player_name: Some("Sam".to_string()),
            initial_minutes: None,
            end_time: None,
            status: SessionStatus::Active,
            time_up_notified: false,
            show_extend_modal: false,
            show_time_up_modal: false,
            time_up_at: None,
        }
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, 20, 0, 0).unwrap()
    }

    #[test]
    fn test_missing_rate_bills_zero() {
        let prices = PriceTable::from_rates([(GameType::Double, Money::from_cents(500))]);
        assert_eq!(prices.rate_for(GameType::Quad), Money::zero());

        let end = start() + Duration::hours(2);
        let bill = bill_session(&session(GameType::Quad, start()), &prices, end);
        assert_eq!(bill.duration_minutes, 120);
        assert!(bill.cost.is_zero());
    }

    #[test]
    fn test_partial_minutes_are_not_billed() {
        let prices = PriceTable::default();
        let end = start() + Duration::minutes(44) + Duration::seconds(59);
        let bill = bill_session(&session(GameType::Quad, start()), &prices, end);
        assert_eq!(bill.duration_minutes, 44);
        // 44/60 × 8.00 = 5.8666… → 5.87
        assert_eq!(bill.cost.cents(), 587);
    }

    #[test]
    fn test_default_table_covers_all_game_types() {
        let prices = PriceTable::default();
        for game_type in GameType::ALL {
            assert!(!prices.rate_for(game_type).is_zero());
        }
        assert!(prices.validate().is_ok());
    }

    #[test]
    fn test_negative_rate_rejected() {
        let prices = PriceTable::from_rates([(GameType::Single, Money::from_cents(-1))]);
        assert!(prices.validate().is_err());
    }

    #[test]
    fn test_serializes_as_map() {
        let prices = PriceTable::from_rates([(GameType::Double, Money::from_cents(500))]);
        let json = serde_json::to_string(&prices).unwrap();
        assert_eq!(json, r#"{"double":5.0}"#);
        let back: PriceTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, prices);
    }
}
