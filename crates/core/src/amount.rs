//! Amount - Fixed-point asset amount
//!
//! All asset amounts in Tradewind are non-negative integers scaled by
//! 10^7 (seven decimal places). Arithmetic stays on the scaled integer;
//! decimals appear only when parsing and printing.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when working with amounts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("Amount cannot be negative: {0}")]
    Negative(i64),

    #[error("Amount overflows the 64-bit range: {0}")]
    Overflow(String),

    #[error("Amount has more than 7 decimal places: {0}")]
    TooPrecise(String),

    #[error("Invalid amount: {0}")]
    Invalid(String),
}

/// A non-negative fixed-point asset amount.
///
/// # Invariant
/// The inner scaled value is always >= 0. This is enforced by the
/// constructor.
///
/// # Example
/// ```
/// use tradewind_core::Amount;
///
/// let amount: Amount = "100.5".parse().unwrap();
/// assert_eq!(amount.value(), 1_005_000_000);
/// assert_eq!(amount.to_string(), "100.5");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(i64);

/// Number of decimal places carried by every amount
pub const DECIMALS: u32 = 7;

/// Scaled representation of one whole unit
pub const ONE: i64 = 10_000_000;

impl Amount {
    /// Zero amount constant
    pub const ZERO: Self = Self(0);

    /// Largest representable amount
    pub const MAX: Self = Self(i64::MAX);

    /// Create an Amount from a scaled integer value.
    ///
    /// Returns an error if the value is negative.
    pub fn new(value: i64) -> Result<Self, AmountError> {
        if value < 0 {
            Err(AmountError::Negative(value))
        } else {
            Ok(Self(value))
        }
    }

    /// Create an Amount from a count of whole units.
    pub fn from_whole(units: i64) -> Result<Self, AmountError> {
        let scaled = units
            .checked_mul(ONE)
            .ok_or_else(|| AmountError::Overflow(units.to_string()))?;
        Self::new(scaled)
    }

    /// Create an Amount without validation.
    ///
    /// The caller must ensure the value is non-negative. Use only for
    /// values derived from other amounts.
    #[inline]
    pub const fn new_unchecked(value: i64) -> Self {
        Self(value)
    }

    /// Get the scaled integer value
    #[inline]
    pub const fn value(&self) -> i64 {
        self.0
    }

    /// Check if the amount is zero
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition
    pub fn checked_add(&self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    /// Checked subtraction - returns None if the result would be negative
    pub fn checked_sub(&self, other: Amount) -> Option<Amount> {
        let result = self.0.checked_sub(other.0)?;
        if result < 0 {
            None
        } else {
            Some(Amount(result))
        }
    }

    /// The smaller of two amounts
    pub fn min(self, other: Amount) -> Amount {
        if self.0 <= other.0 {
            self
        } else {
            other
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Decimal::new(self.0, DECIMALS).normalize())
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal =
            Decimal::from_str(s.trim()).map_err(|_| AmountError::Invalid(s.to_string()))?;
        Amount::try_from(decimal)
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(AmountError::Invalid(value.to_string()));
        }
        let scaled = value
            .checked_mul(Decimal::from(ONE))
            .ok_or_else(|| AmountError::Overflow(value.to_string()))?;
        if scaled.fract() != Decimal::ZERO {
            return Err(AmountError::TooPrecise(value.to_string()));
        }
        let raw = scaled
            .to_i64()
            .ok_or_else(|| AmountError::Overflow(value.to_string()))?;
        Self::new(raw)
    }
}

impl TryFrom<String> for Amount {
    type Error = AmountError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> Self {
        amount.to_string()
    }
}
