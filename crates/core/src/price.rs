//! Price - Exact rational prices
//!
//! An offer's price is the amount of the buying asset demanded per unit
//! of the selling asset, kept as a reduced u32/u32 fraction. Comparisons
//! cross-multiply in 64 bits; floating point is never involved.

use crate::amount::Amount;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when constructing prices
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    #[error("Price numerator and denominator must be positive: {n}/{d}")]
    NotPositive { n: u32, d: u32 },

    #[error("Price does not fit a 32-bit fraction: {0}")]
    OutOfRange(String),

    #[error("Invalid price: {0}")]
    Invalid(String),
}

/// An exact price: `n` units of the buying asset per `d` units of the
/// selling asset.
///
/// Always stored reduced, so equal prices compare equal structurally.
///
/// # Example
/// ```
/// use tradewind_core::Price;
///
/// let p: Price = "1.5".parse().unwrap();
/// assert_eq!((p.n(), p.d()), (3, 2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Price {
    n: u32,
    d: u32,
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

impl Price {
    /// Create a price from a fraction, reducing it to lowest terms.
    pub fn new(n: u32, d: u32) -> Result<Self, PriceError> {
        if n == 0 || d == 0 {
            return Err(PriceError::NotPositive { n, d });
        }
        let g = gcd(n as u128, d as u128) as u32;
        Ok(Self { n: n / g, d: d / g })
    }

    /// Numerator: buying units
    pub fn n(&self) -> u32 {
        self.n
    }

    /// Denominator: selling units
    pub fn d(&self) -> u32 {
        self.d
    }

    /// The reciprocal price (selling and buying roles swapped)
    pub fn inverse(&self) -> Price {
        Price {
            n: self.d,
            d: self.n,
        }
    }

    /// Whether a taker quoting `taker` crosses a resting offer quoting
    /// this price on the opposite side.
    ///
    /// The taker sells what the resting offer buys, so the two cross
    /// when `self <= taker.inverse()`: n1*n2 <= d1*d2.
    pub fn crosses(&self, taker: &Price) -> bool {
        (self.n as u64) * (taker.n as u64) <= (self.d as u64) * (taker.d as u64)
    }

    /// Strict form of [`Price::crosses`], used by passive takers.
    pub fn crosses_strictly(&self, taker: &Price) -> bool {
        (self.n as u64) * (taker.n as u64) < (self.d as u64) * (taker.d as u64)
    }

    /// `ceil(amount * n / d)`: the buying units owed for `amount`
    /// selling units, rounded in the selling side's favor.
    ///
    /// Returns None on 64-bit overflow.
    pub fn mul_ceil(&self, amount: Amount) -> Option<Amount> {
        let product = amount.value() as i128 * self.n as i128;
        let result = (product + self.d as i128 - 1) / self.d as i128;
        i64::try_from(result).ok().map(Amount::new_unchecked)
    }

    /// `floor(amount * d / n)`: the selling units purchasable with
    /// `amount` buying units, truncated.
    ///
    /// Returns None on 64-bit overflow.
    pub fn div_floor(&self, amount: Amount) -> Option<Amount> {
        let product = amount.value() as i128 * self.d as i128;
        let result = product / self.n as i128;
        i64::try_from(result).ok().map(Amount::new_unchecked)
    }
}

impl Ord for Price {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = (self.n as u64) * (other.d as u64);
        let rhs = (other.n as u64) * (self.d as u64);
        lhs.cmp(&rhs)
    }
}

impl PartialOrd for Price {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.n, self.d)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal =
            Decimal::from_str(s.trim()).map_err(|_| PriceError::Invalid(s.to_string()))?;
        Price::try_from(decimal)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        if value.is_sign_negative() || value.is_zero() {
            return Err(PriceError::Invalid(value.to_string()));
        }
        let mut n = value.mantissa();
        let mut d = 10i128.pow(value.scale());

        let g = gcd(n as u128, d as u128) as i128;
        n /= g;
        d /= g;

        let n = u32::try_from(n).map_err(|_| PriceError::OutOfRange(value.to_string()))?;
        let d = u32::try_from(d).map_err(|_| PriceError::OutOfRange(value.to_string()))?;
        Price::new(n, d)
    }
}
