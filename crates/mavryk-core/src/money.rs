//! # Money Module
//!
//! Provides the `Money` type for whole-đồng amounts.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In the browser:                                                        │
//! │    100 × 100 / 600 = 16.666666666666668  → Math.round → 17             │
//! │    0.1 + 0.2 = 0.30000000000000004                                      │
//! │                                                                         │
//! │  Splitting 100 ₫ three ways by float math can leak or invent a đồng.    │
//! │                                                                         │
//! │  OUR SOLUTION: Integer đồng, i128 intermediates                         │
//! │    share = (total × part + whole / 2) / whole                          │
//! │    Every rounding step is exact and reproducible                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! VND has no minor unit in practice, so one `Money` unit is one đồng and
//! "round to nearest integer" is the natural granularity.
//!
//! ## Usage
//! ```rust
//! use mavryk_core::money::Money;
//!
//! let price = Money::from_dong(249_000);
//! let total = price + Money::from_dong(1_000);
//! assert_eq!(total.dong(), 250_000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use ts_rs::TS;

use crate::types::RoundingMode;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in whole Vietnamese đồng.
///
/// ## Design Decisions
/// - **i64 (signed)**: differences (e.g. `total - discount`) may go negative
///   before validation catches them
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Serialized as a bare number**: matches the storefront's JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole đồng.
    ///
    /// ## Example
    /// ```rust
    /// use mavryk_core::money::Money;
    ///
    /// let price = Money::from_dong(199_000);
    /// assert_eq!(price.dong(), 199_000);
    /// ```
    #[inline]
    pub const fn from_dong(dong: i64) -> Self {
        Money(dong)
    }

    /// Returns the value in đồng.
    #[inline]
    pub const fn dong(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
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

    /// Checked addition. `None` on overflow.
    #[inline]
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Checked subtraction. `None` on overflow.
    #[inline]
    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    /// Multiplies a unit price by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use mavryk_core::money::Money;
    ///
    /// let unit_price = Money::from_dong(150_000);
    /// assert_eq!(unit_price.checked_mul_quantity(3), Some(Money::from_dong(450_000)));
    /// assert_eq!(Money::from_dong(i64::MAX).checked_mul_quantity(2), None);
    /// ```
    #[inline]
    pub fn checked_mul_quantity(self, qty: i64) -> Option<Money> {
        self.0.checked_mul(qty).map(Money)
    }

    /// Computes `round(self × numerator / denominator)`.
    ///
    /// This is the proportional share primitive behind discount allocation:
    /// `discount.proportion(line_total, subtotal, mode)` is the line's share
    /// of the discount.
    ///
    /// Returns `None` when `denominator` is zero or the result does not fit
    /// in an `i64`.
    ///
    /// ## Example
    /// ```rust
    /// use mavryk_core::money::Money;
    /// use mavryk_core::types::RoundingMode;
    ///
    /// let discount = Money::from_dong(100);
    /// // 100 × 100 / 600 = 16.67 → 17
    /// let share = discount.proportion(100, 600, RoundingMode::HalfUp);
    /// assert_eq!(share, Some(Money::from_dong(17)));
    /// ```
    pub fn proportion(self, numerator: i64, denominator: i64, mode: RoundingMode) -> Option<Money> {
        if denominator == 0 {
            return None;
        }

        let product = (self.0 as i128).checked_mul(numerator as i128)?;
        let rounded = div_round(product, denominator as i128, mode);
        i64::try_from(rounded).ok().map(Money)
    }

    /// Computes a percentage of this amount, given in basis points.
    ///
    /// ## Example
    /// ```rust
    /// use mavryk_core::money::Money;
    /// use mavryk_core::types::RoundingMode;
    ///
    /// let subtotal = Money::from_dong(245_000);
    /// // 15% of 245.000 = 36.750
    /// assert_eq!(
    ///     subtotal.percentage(1500, RoundingMode::HalfUp),
    ///     Some(Money::from_dong(36_750))
    /// );
    /// ```
    pub fn percentage(self, bps: u32, mode: RoundingMode) -> Option<Money> {
        self.proportion(i64::from(bps), 10_000, mode)
    }
}

/// Divides with rounding to nearest. Half-way cases follow `mode`.
///
/// Works on signed values: `HalfUp` rounds half away from zero, which is
/// what `Math.round` does for the non-negative amounts the storefront uses.
fn div_round(numerator: i128, denominator: i128, mode: RoundingMode) -> i128 {
    let (num, den) = if denominator < 0 {
        (-numerator, -denominator)
    } else {
        (numerator, denominator)
    };

    let quotient = num.div_euclid(den);
    let remainder = num.rem_euclid(den);
    let twice = remainder * 2;

    if twice > den {
        return quotient + 1;
    }
    if twice < den {
        return quotient;
    }

    // Exactly half-way between `quotient` and `quotient + 1`
    match mode {
        RoundingMode::HalfUp => {
            if num >= 0 {
                quotient + 1
            } else {
                quotient
            }
        }
        RoundingMode::HalfEven => {
            if quotient % 2 == 0 {
                quotient
            } else {
                quotient + 1
            }
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Formats as `1.234.567 ₫`, the way VND is written on receipts.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{} ₫", sign, grouped)
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

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
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
    fn test_from_dong() {
        let money = Money::from_dong(249_000);
        assert_eq!(money.dong(), 249_000);
        assert!(money.is_positive());
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_dong(0).to_string(), "0 ₫");
        assert_eq!(Money::from_dong(999).to_string(), "999 ₫");
        assert_eq!(Money::from_dong(1_000).to_string(), "1.000 ₫");
        assert_eq!(Money::from_dong(1_234_567).to_string(), "1.234.567 ₫");
        assert_eq!(Money::from_dong(-50_000).to_string(), "-50.000 ₫");
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_dong(1000);
        let b = Money::from_dong(500);
        assert_eq!((a + b).dong(), 1500);
        assert_eq!((a - b).dong(), 500);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.dong(), 2000);
    }

    #[test]
    fn test_checked_overflow() {
        let max = Money::from_dong(i64::MAX);
        assert_eq!(max.checked_add(Money::from_dong(1)), None);
        assert_eq!(Money::from_dong(i64::MIN).checked_sub(Money::from_dong(1)), None);
        assert_eq!(max.checked_mul_quantity(2), None);
    }

    #[test]
    fn test_proportion_rounds_to_nearest() {
        let d = Money::from_dong(100);
        assert_eq!(d.proportion(100, 600, RoundingMode::HalfUp), Some(Money::from_dong(17)));
        assert_eq!(d.proportion(200, 600, RoundingMode::HalfUp), Some(Money::from_dong(33)));
        assert_eq!(d.proportion(0, 600, RoundingMode::HalfUp), Some(Money::zero()));
    }

    #[test]
    fn test_proportion_half_way_cases() {
        // 5 × 1 / 2 = 2.5
        let five = Money::from_dong(5);
        assert_eq!(five.proportion(1, 2, RoundingMode::HalfUp), Some(Money::from_dong(3)));
        assert_eq!(five.proportion(1, 2, RoundingMode::HalfEven), Some(Money::from_dong(2)));

        // 7 × 1 / 2 = 3.5 → 4 both ways
        let seven = Money::from_dong(7);
        assert_eq!(seven.proportion(1, 2, RoundingMode::HalfUp), Some(Money::from_dong(4)));
        assert_eq!(seven.proportion(1, 2, RoundingMode::HalfEven), Some(Money::from_dong(4)));
    }

    #[test]
    fn test_proportion_negative_values() {
        // -2.5 rounds away from zero under HalfUp
        let neg = Money::from_dong(-5);
        assert_eq!(neg.proportion(1, 2, RoundingMode::HalfUp), Some(Money::from_dong(-3)));
        assert_eq!(neg.proportion(1, 2, RoundingMode::HalfEven), Some(Money::from_dong(-2)));
        // Negative denominator is normalized
        assert_eq!(
            Money::from_dong(5).proportion(1, -2, RoundingMode::HalfUp),
            Some(Money::from_dong(-3))
        );
    }

    #[test]
    fn test_proportion_zero_denominator() {
        assert_eq!(Money::from_dong(100).proportion(1, 0, RoundingMode::HalfUp), None);
    }

    #[test]
    fn test_proportion_uses_wide_intermediate() {
        // i64::MAX × 2 overflows i64 but not i128; the quotient fits again
        let big = Money::from_dong(i64::MAX);
        assert_eq!(big.proportion(2, 2, RoundingMode::HalfUp), Some(big));
        assert_eq!(big.proportion(3, 1, RoundingMode::HalfUp), None);
    }

    #[test]
    fn test_percentage() {
        let subtotal = Money::from_dong(10_000);
        assert_eq!(subtotal.percentage(1000, RoundingMode::HalfUp), Some(Money::from_dong(1_000)));
        // 8.25% of 10 = 0.825 → 1
        assert_eq!(
            Money::from_dong(10).percentage(825, RoundingMode::HalfUp),
            Some(Money::from_dong(1))
        );
    }
}
