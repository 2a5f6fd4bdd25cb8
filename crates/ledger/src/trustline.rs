//! Trustlines
//!
//! A trustline is the relationship between an account and an issued
//! asset: how much of it the account is willing to hold (the limit),
//! how much it currently holds, and whether the issuer has authorized
//! the holding.

use serde::{Deserialize, Serialize};
use tradewind_core::{AccountId, Amount, Asset};

/// A trustline entry.
///
/// # Invariant
/// `balance <= limit` at all times; both are non-negative by
/// construction of `Amount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trustline {
    /// The trusting account
    pub account: AccountId,
    /// The trusted asset
    pub asset: Asset,
    /// Maximum balance the account accepts
    pub limit: Amount,
    /// Current balance
    pub balance: Amount,
    /// Whether the issuer has authorized this line
    pub authorized: bool,
}

impl Trustline {
    /// Create a new empty trustline
    pub fn new(account: impl Into<AccountId>, asset: Asset, limit: Amount, authorized: bool) -> Self {
        Self {
            account: account.into(),
            asset,
            limit,
            balance: Amount::ZERO,
            authorized,
        }
    }

    /// Room left under the limit
    pub fn capacity(&self) -> Amount {
        self.limit.checked_sub(self.balance).unwrap_or(Amount::ZERO)
    }

    /// A line is removable once its limit is zero and it holds nothing
    pub fn is_removable(&self) -> bool {
        self.limit.is_zero() && self.balance.is_zero()
    }
}
