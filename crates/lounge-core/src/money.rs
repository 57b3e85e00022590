//! # Money Module
//!
//! Provides the `Money` type for hourly rates and session costs.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Billing a session as a float:                                          │
//! │    (7 / 60) × 5.00 = 0.58333333…  → must round somewhere               │
//! │                                                                         │
//! │  Summing a day of float costs drifts away from the printed total.      │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    (7 × 500 + 30) / 60 = 58 cents                                      │
//! │    Rounded once, when the cost is computed; sums are exact after that  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Inside the program a value is whole cents. In the state blob and over
//! IPC it is a plain number of major units (`5`, `7.5`), the shape the
//! stored price table and report costs have always had. Reading rounds
//! half-up to the cent.
//!
//! ## Usage
//! ```rust
//! use lounge_core::money::Money;
//!
//! let rate = Money::from_major_minor(5, 0); // 5.00 per hour
//! let cost = rate.for_minutes(90);          // 7.50
//! assert_eq!(cost.cents(), 750);
//! ```

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Where Money is Used
/// ```text
/// PriceTable[game_type] ──► Money::for_minutes(duration) ──► Report.cost
///                                                                │
///                                     ReportLog::total_for(date) ◄┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TS)]
#[ts(export)]
pub struct Money(#[ts(type = "number")] i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use lounge_core::money::Money;
    ///
    /// let rate = Money::from_cents(550); // 5.50
    /// assert_eq!(rate.cents(), 550);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts, only the major unit should be negative.
    /// `from_major_minor(-5, 50)` = -5.50, not -4.50
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Treats `self` as an hourly rate and bills `minutes` of play.
    ///
    /// ## Rounding
    /// `minutes / 60 × rate`, rounded half-up to the cent. The intermediate
    /// product is computed in i128 so long sessions at large rates cannot
    /// overflow.
    ///
    /// ## Example
    /// ```rust
    /// use lounge_core::money::Money;
    ///
    /// let rate = Money::from_cents(500);
    /// assert_eq!(rate.for_minutes(90).cents(), 750);
    /// assert_eq!(rate.for_minutes(7).cents(), 58); // 58.33… → 58
    /// assert_eq!(rate.for_minutes(0).cents(), 0);
    /// ```
    pub fn for_minutes(&self, minutes: i64) -> Money {
        let scaled = self.0 as i128 * minutes as i128;
        let cents = if scaled >= 0 {
            (scaled + 30) / 60
        } else {
            (scaled - 30) / 60
        };
        Money::from_cents(cents as i64)
    }

    /// Major units as a float, for the wire.
    pub fn to_major_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Parses major units, rounding half-up to the cent.
    ///
    /// The value is first snapped to six decimals so binary noise such as
    /// `0.285 * 100 = 28.4999…` still rounds to 29. Returns `None` for
    /// NaN, infinities and values outside the i64 cent range.
    pub fn from_major_f64(value: f64) -> Option<Money> {
        if !value.is_finite() {
            return None;
        }
        let micro = (value * 1_000_000.0).round();
        let cents = (micro / 10_000.0).round();
        if cents.abs() >= i64::MAX as f64 {
            return None;
        }
        Some(Money(cents as i64))
    }

    /// Formats with a currency symbol, e.g. `"$7.50"`.
    pub fn format_with(&self, symbol: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}{}.{:02}", sign, symbol, self.major().abs(), self.minor())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal form (`"7.50"`); the currency symbol is a display concern.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_major_f64())
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an amount in major currency units")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        v.checked_mul(100)
            .map(Money)
            .ok_or_else(|| E::custom(format!("amount {} is out of range", v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        i64::try_from(v)
            .map_err(|_| E::custom(format!("amount {} is out of range", v)))
            .and_then(|v| self.visit_i64(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        Money::from_major_f64(v).ok_or_else(|| E::custom(format!("amount {} is not valid", v)))
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(750).to_string(), "7.50");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::from_cents(750).format_with("$"), "$7.50");
        assert_eq!(Money::from_cents(-550).format_with("$"), "-$5.50");
    }

    #[test]
    fn test_for_minutes_ninety_at_five() {
        let rate = Money::from_major_minor(5, 0);
        assert_eq!(rate.for_minutes(90), Money::from_cents(750));
    }

    #[test]
    fn test_for_minutes_rounds_half_up() {
        // 1 minute at 0.30/h = 0.5 cents → 1 cent
        assert_eq!(Money::from_cents(30).for_minutes(1).cents(), 1);
        // 1 minute at 0.29/h = 0.483 cents → 0
        assert_eq!(Money::from_cents(29).for_minutes(1).cents(), 0);
        // 59 minutes at 8.00/h = 786.67 → 787
        assert_eq!(Money::from_cents(800).for_minutes(59).cents(), 787);
    }

    #[test]
    fn test_for_minutes_large_values_do_not_overflow() {
        let rate = Money::from_cents(100_000_000);
        let cost = rate.for_minutes(60 * 24 * 365);
        assert_eq!(cost.cents(), 100_000_000 * 24 * 365);
    }

    #[test]
    fn test_json_uses_major_units() {
        assert_eq!(serde_json::to_string(&Money::from_cents(750)).unwrap(), "7.5");
        assert_eq!(serde_json::to_string(&Money::from_cents(500)).unwrap(), "5.0");

        let whole: Money = serde_json::from_str("5").unwrap();
        assert_eq!(whole.cents(), 500);
        let fraction: Money = serde_json::from_str("5.5").unwrap();
        assert_eq!(fraction.cents(), 550);
        let noisy: Money = serde_json::from_str("0.285").unwrap();
        assert_eq!(noisy.cents(), 29);
        let tiny: Money = serde_json::from_str("0.004").unwrap();
        assert_eq!(tiny.cents(), 0);
    }

    #[test]
    fn test_json_rejects_non_numbers() {
        assert!(serde_json::from_str::<Money>(r#""5.00""#).is_err());
        assert!(serde_json::from_str::<Money>("1e300").is_err());
    }

    #[test]
    fn test_sum() {
        let costs = vec![Money::from_cents(750), Money::from_cents(250)];
        let total: Money = costs.iter().sum();
        assert_eq!(total.cents(), 1000);
        let empty: Vec<Money> = Vec::new();
        assert!(empty.into_iter().sum::<Money>().is_zero());
    }
}
