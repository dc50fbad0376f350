//! Money type for Rupiah amounts.
//!
//! Amounts are whole Rupiah (the smallest unit in practical use), stored as
//! unsigned integers so a price can never be negative.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul};

/// Default conversion rate used for USD estimates (IDR per USD).
pub const DEFAULT_USD_RATE: u64 = 15_000;

/// A Rupiah amount.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    /// Create a new amount.
    pub const fn new(amount: u64) -> Self {
        Self(amount)
    }

    /// The zero amount.
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Raw amount in Rupiah.
    pub const fn amount(&self) -> u64 {
        self.0
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Multiply by a quantity, saturating at the maximum amount.
    pub fn saturating_mul(&self, quantity: u32) -> Money {
        Money(self.0.saturating_mul(u64::from(quantity)))
    }

    /// Add another amount, saturating at the maximum amount.
    pub fn saturating_add(&self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    /// Format as a display string (e.g., "Rp 600.000").
    pub fn display(&self) -> String {
        format!("Rp {}", self.display_amount())
    }

    /// Format without the currency prefix (e.g., "600.000").
    pub fn display_amount(&self) -> String {
        group_thousands(self.0)
    }

    /// Format a USD estimate at `rate` Rupiah per dollar (e.g., "$40.00").
    ///
    /// A zero rate is treated as 1.
    pub fn usd_estimate(&self, rate: u64) -> String {
        let rate = u128::from(rate.max(1));
        let cents = (u128::from(self.0) * 100 + rate / 2) / rate;
        format!("${}.{:02}", cents / 100, cents % 100)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        self.saturating_add(other)
    }
}

impl Mul<u32> for Money {
    type Output = Money;

    fn mul(self, quantity: u32) -> Money {
        self.saturating_mul(quantity)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), Add::add)
    }
}

impl From<u64> for Money {
    fn from(amount: u64) -> Self {
        Money(amount)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Group digits in threes with '.' as the Indonesian locale does.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_display() {
        assert_eq!(Money::new(0).display(), "Rp 0");
        assert_eq!(Money::new(999).display(), "Rp 999");
        assert_eq!(Money::new(600_000).display(), "Rp 600.000");
        assert_eq!(Money::new(1_250_000).display(), "Rp 1.250.000");
    }

    #[test]
    fn test_money_display_amount() {
        assert_eq!(Money::new(1000).display_amount(), "1.000");
        assert_eq!(Money::new(100_000).display_amount(), "100.000");
    }

    #[test]
    fn test_usd_estimate() {
        assert_eq!(Money::new(600_000).usd_estimate(DEFAULT_USD_RATE), "$40.00");
        assert_eq!(Money::new(150_000).usd_estimate(DEFAULT_USD_RATE), "$10.00");
        // 100000 / 15000 = 6.666..
        assert_eq!(Money::new(100_000).usd_estimate(DEFAULT_USD_RATE), "$6.67");
        assert_eq!(Money::new(5).usd_estimate(0), "$5.00");
    }

    #[test]
    fn test_money_arithmetic_saturates() {
        let max = Money::new(u64::MAX);
        assert_eq!(max * 2, max);
        assert_eq!(max + Money::new(1), max);
        assert_eq!(Money::new(300) * 3, Money::new(900));
    }

    #[test]
    fn test_money_sum() {
        let total: Money = [Money::new(100), Money::new(250)].into_iter().sum();
        assert_eq!(total, Money::new(350));
    }

    #[test]
    fn test_money_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Money::new(600_000)).unwrap(), "600000");
        let m: Money = serde_json::from_str("750000").unwrap();
        assert_eq!(m, Money::new(750_000));
    }
}
