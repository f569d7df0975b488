//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  The original seeStore client stored prices as JS numbers and           │
//! │  accumulated cart totals by float addition. This crate does not.       │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Centavos                                         │
//! │    R$ 10,00 = 1000 centavos, stored in i64                              │
//! │    Every sum, discount and subtotal is exact integer arithmetic.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use seestore_core::money::Money;
//!
//! let price = Money::from_centavos(1099); // R$ 10,99
//! let line = price * 3i64;
//! assert_eq!(line.centavos(), 3297);
//! assert_eq!(line.format_brl(), "R$ 32,97");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

/// A monetary value in centavos (the smallest BRL unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: discounts larger than a line total are representable,
///   which the discount gate deliberately permits (see the cart module)
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support for JSON serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos.
    #[inline]
    pub const fn from_centavos(centavos: i64) -> Self {
        Money(centavos)
    }

    /// Creates a Money value from reais and centavos.
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_reais(-5, 50)` is R$ -5,50.
    #[inline]
    pub const fn from_reais(reais: i64, centavos: i64) -> Self {
        if reais < 0 {
            Money(reais * 100 - centavos)
        } else {
            Money(reais * 100 + centavos)
        }
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn centavos(&self) -> i64 {
        self.0
    }

    /// Returns the whole-real portion.
    #[inline]
    pub const fn reais(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the centavo portion (always 0-99).
    #[inline]
    pub const fn centavos_part(&self) -> i64 {
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

    /// Multiplies money by a quantity.
    ///
    /// Used for line totals: unit price × quantity.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Formats the value as Brazilian currency: `R$ 1.234,56`.
    ///
    /// Thousands are separated with `.`, the decimal separator is `,`,
    /// negative values carry a leading minus. This is what the receipt
    /// renderer prints; it matches the `pt-BR` `Intl.NumberFormat` output
    /// the web client shows on screen.
    pub fn format_brl(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let whole = self.reais().abs();
        let frac = self.centavos_part();

        // Group the integer part in threes from the right.
        let digits = whole.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(c);
        }

        format!("{}R$ {},{:02}", sign, grouped, frac)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display delegates to the BRL formatting used on receipts.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_brl())
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

impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        Money(self.0 * qty as i64)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_centavos() {
        let money = Money::from_centavos(1099);
        assert_eq!(money.centavos(), 1099);
        assert_eq!(money.reais(), 10);
        assert_eq!(money.centavos_part(), 99);
    }

    #[test]
    fn test_from_reais() {
        assert_eq!(Money::from_reais(10, 99).centavos(), 1099);
        assert_eq!(Money::from_reais(-5, 50).centavos(), -550);
    }

    #[test]
    fn test_format_brl() {
        assert_eq!(Money::from_centavos(1099).format_brl(), "R$ 10,99");
        assert_eq!(Money::from_centavos(500).format_brl(), "R$ 5,00");
        assert_eq!(Money::from_centavos(0).format_brl(), "R$ 0,00");
        assert_eq!(Money::from_centavos(-550).format_brl(), "-R$ 5,50");
        assert_eq!(Money::from_centavos(123_456_789).format_brl(), "R$ 1.234.567,89");
        assert_eq!(Money::from_centavos(100_000).format_brl(), "R$ 1.000,00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_centavos(1000);
        let b = Money::from_centavos(500);

        assert_eq!((a + b).centavos(), 1500);
        assert_eq!((a - b).centavos(), 500);
        let tripled: Money = a * 3;
        assert_eq!(tripled.centavos(), 3000);
    }

    #[test]
    fn test_sum_iterator() {
        let total: Money = [100, 250, 399]
            .iter()
            .map(|&c| Money::from_centavos(c))
            .sum();
        assert_eq!(total.centavos(), 749);
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_centavos(299);
        assert_eq!(unit_price.multiply_quantity(3).centavos(), 897);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        assert!(Money::from_centavos(100).is_positive());
        assert!(Money::from_centavos(-100).is_negative());
    }

    #[test]
    fn test_negative_subtotal_is_representable() {
        // A discount bigger than the line total must stay representable;
        // the discount gate does not clamp it.
        let line = Money::from_centavos(500) - Money::from_centavos(700);
        assert_eq!(line.centavos(), -200);
        assert_eq!(line.format_brl(), "-R$ 2,00");
    }
}
