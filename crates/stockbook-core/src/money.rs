//! # Money Module
//!
//! Provides the `Money` type for prices, sale totals and ledger balances.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A shopkeeper balance is the sum of hundreds of ledger entries.        │
//! │  Drift of a paisa per entry shows up on the statement.                 │
//! │                                                                         │
//! │  OUR SOLUTION: Integer paisa (1 rupee = 100 paisa)                     │
//! │    Every amount is an exact i64 count of minor units.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockbook_core::money::Money;
//!
//! let price = Money::from_major(12_500);          // Rs 12,500.00
//! let line = price * 2;                           // Rs 25,000.00
//! let balance = Money::zero() - line;             // shopkeeper owes us
//!
//! assert_eq!(line.minor(), 2_500_000);
//! assert!(balance.is_negative());
//! assert_eq!(balance.to_string(), "-Rs 25,000.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (paisa).
///
/// ## Design Decisions
/// - **i64 (signed)**: ledger balances are negative when a shopkeeper owes us
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Serialized as a bare integer** in the snapshot
///
/// ## Where Money is Used
/// ```text
/// Product.price ──► SaleItem.price ──► SaleItem.total ──► Sale.total
///                                                            │
///                              Transaction.amount ◄──────────┘
///                                      │
///                                      ▼
///                             Shopkeeper.balance (signed)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paisa.
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates a Money value from whole rupees.
    ///
    /// ```rust
    /// use stockbook_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(-5).minor(), -500);
    /// ```
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * 100)
    }

    /// Returns the value in paisa.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paisa portion, always 0-99.
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies a unit price by a quantity.
    ///
    /// ```rust
    /// use stockbook_core::money::Money;
    ///
    /// let unit_price = Money::from_minor(299);
    /// assert_eq!(unit_price.multiply_quantity(3).minor(), 897);
    /// ```
    ///
    /// Saturates at the `i64` bounds; use [`Money::checked_multiply_quantity`]
    /// where an overflow must be reported.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// `None` when the product does not fit in an `i64`.
    #[inline]
    pub fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        self.0.checked_mul(qty).map(Money)
    }

    /// `None` on overflow.
    #[inline]
    pub fn checked_add(&self, other: Money) -> Option<Self> {
        self.0.checked_add(other.0).map(Money)
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses operator input such as `1500`, `1,500.5` or `-20.75` (rupees).
///
/// At most two decimal places are accepted; anything finer would be lost.
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: reason.to_string(),
        };

        let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
        let (negative, digits) = match cleaned.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, cleaned.as_str()),
        };

        let (whole, fraction) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid("expected a number"));
        }
        if !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid("expected digits with an optional decimal point"));
        }
        if fraction.len() > 2 {
            return Err(invalid("at most two decimal places"));
        }

        let major: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("amount is too large"))?
        };
        let minor: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid("bad fraction"))? * 10,
            _ => fraction.parse().map_err(|_| invalid("bad fraction"))?,
        };

        let total = major
            .checked_mul(100)
            .and_then(|m| m.checked_add(minor))
            .ok_or_else(|| invalid("amount is too large"))?;

        Ok(Money(if negative { -total } else { total }))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money as `Rs 12,345.67` with thousands separators.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let digits = self.major().abs().to_string();

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        write!(f, "{}Rs {}.{:02}", sign, grouped, self.minor_part())
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

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Multiplication by a quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
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
    fn test_from_minor_and_major() {
        let money = Money::from_minor(1099);
        assert_eq!(money.minor(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor_part(), 99);

        assert_eq!(Money::from_major(250).minor(), 25_000);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_minor(1099).to_string(), "Rs 10.99");
        assert_eq!(Money::from_major(1000).to_string(), "Rs 1,000.00");
        assert_eq!(Money::from_major(1_234_567).to_string(), "Rs 1,234,567.00");
        assert_eq!(Money::from_minor(-550).to_string(), "-Rs 5.50");
        assert_eq!(Money::zero().to_string(), "Rs 0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_minor(1000);
        let b = Money::from_minor(500);

        assert_eq!((a + b).minor(), 1500);
        assert_eq!((a - b).minor(), 500);
        assert_eq!((-a).minor(), -1000);
        assert_eq!((a * 3).minor(), 3000);
    }

    #[test]
    fn test_quantity_overflow() {
        let price = Money::from_major(2_200);
        assert_eq!(price.checked_multiply_quantity(3), Some(Money::from_major(6_600)));
        assert_eq!(price.checked_multiply_quantity(90_000_000_000_000), None);
        assert_eq!(price.multiply_quantity(90_000_000_000_000).minor(), i64::MAX);
        assert_eq!(Money::from_minor(i64::MAX).checked_add(Money::from_minor(1)), None);
    }

    #[test]
    fn test_sum() {
        let amounts = [Money::from_major(1), Money::from_major(2), Money::from_minor(50)];
        let owned: Money = amounts.iter().copied().sum();
        let borrowed: Money = amounts.iter().sum();
        assert_eq!(owned.minor(), 350);
        assert_eq!(owned, borrowed);
    }

    #[test]
    fn test_sign_checks() {
        assert!(Money::zero().is_zero());
        assert!(Money::from_minor(1).is_positive());
        assert!(Money::from_minor(-1).is_negative());
        assert_eq!(Money::from_minor(-700).abs().minor(), 700);
    }

    #[test]
    fn test_parse() {
        assert_eq!("1500".parse::<Money>().unwrap().minor(), 150_000);
        assert_eq!("1,500.5".parse::<Money>().unwrap().minor(), 150_050);
        assert_eq!("0.75".parse::<Money>().unwrap().minor(), 75);
        assert_eq!(".5".parse::<Money>().unwrap().minor(), 50);
        assert_eq!("-20.25".parse::<Money>().unwrap().minor(), -2025);

        assert!("".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("1.234".parse::<Money>().is_err());
        assert!("1.2.3".parse::<Money>().is_err());
    }

    #[test]
    fn test_serializes_as_integer() {
        let json = serde_json::to_string(&Money::from_minor(12_345)).unwrap();
        assert_eq!(json, "12345");
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back.minor(), 12_345);
    }
}
