//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                         │
//! │                                                                     │
//! │  In JavaScript/floating point:                                      │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                       │
//! │                                                                     │
//! │  OUR SOLUTION: Integer Yen                                          │
//! │    The yen has no minor unit in retail, so every amount in the      │
//! │    system is a whole i64. Tax is integer basis-point arithmetic     │
//! │    with an explicit floor, matching the printed receipt exactly.    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Two Tax Directions
//!
//! The register knows the pre-tax subtotal and computes
//! `tax = floor(subtotal × rate)`. The tablet only receives the taxed
//! `total_amount` inside the payload and derives
//! `subtotal = floor(total / (1 + rate))` back out. The two directions are
//! NOT exact inverses for every amount - the discrepancy is the rounding
//! remainder and is accepted legacy behavior (see `strip_tax` tests).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01% = 1/10000. 1000 bps = 10% (Japanese consumption tax).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// The standard 10% consumption tax rate.
    #[inline]
    pub const fn consumption() -> Self {
        TaxRate(crate::CONSUMPTION_TAX_BPS)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::consumption()
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in whole yen.
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for corrections and refunds
/// - **Single field tuple struct**: Zero-cost abstraction over i64,
///   serializes as a bare integer on the payload wire
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole yen.
    #[inline]
    pub const fn from_yen(yen: i64) -> Self {
        Money(yen)
    }

    /// Returns the value in whole yen.
    #[inline]
    pub const fn yen(&self) -> i64 {
        self.0
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

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Forward tax computation: `floor(amount × rate)`.
    ///
    /// This is the register direction. Floor, not round: ¥305 at 10% is
    /// ¥30 of tax, matching the printed receipt.
    ///
    /// ## Example
    /// ```rust
    /// use reji_core::money::{Money, TaxRate};
    ///
    /// let subtotal = Money::from_yen(300);
    /// assert_eq!(subtotal.calculate_tax(TaxRate::consumption()).yen(), 30);
    ///
    /// let odd = Money::from_yen(305);
    /// assert_eq!(odd.calculate_tax(TaxRate::consumption()).yen(), 30);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 to prevent overflow on large amounts; integer division floors
        // for the non-negative amounts this is used on.
        let tax = (self.0 as i128 * rate.bps() as i128) / 10000;
        Money(tax as i64)
    }

    /// Adds tax on top of this (pre-tax) amount.
    pub fn with_tax(&self, rate: TaxRate) -> Money {
        *self + self.calculate_tax(rate)
    }

    /// Reverse derivation: treats this amount as tax-inclusive and returns
    /// the pre-tax portion, `floor(total / (1 + rate))`.
    ///
    /// This is the tablet direction: the payload carries only the taxed
    /// total, so the payment screen re-derives the subtotal/tax split.
    /// The derivation does NOT exactly invert [`calculate_tax`] for every
    /// amount; the discrepancy is bounded by the rounding remainder and is
    /// the behavior receipts have always shown.
    ///
    /// ## Example
    /// ```rust
    /// use reji_core::money::{Money, TaxRate};
    ///
    /// let total = Money::from_yen(1100);
    /// assert_eq!(total.strip_tax(TaxRate::consumption()).yen(), 1000);
    /// ```
    pub fn strip_tax(&self, rate: TaxRate) -> Money {
        let divisor = 10000 + rate.bps() as i128;
        let subtotal = (self.0 as i128 * 10000) / divisor;
        Money(subtotal as i64)
    }

    /// The tax portion of a tax-inclusive amount: `total - strip_tax(total)`.
    pub fn included_tax(&self, rate: TaxRate) -> Money {
        *self - self.strip_tax(rate)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money with a yen sign.
///
/// For debugging and logs; the UI layer owns localized formatting.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 0 {
            write!(f, "-¥{}", -self.0)
        } else {
            write!(f, "¥{}", self.0)
        }
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
