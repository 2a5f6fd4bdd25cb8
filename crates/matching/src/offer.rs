//! Resting offers

use serde::{Deserialize, Serialize};
use tradewind_core::{AccountId, Amount, Asset, AssetPair, Price};

use crate::error::MatchingError;

/// Unique offer identifier, assigned from a monotonically increasing
/// counter. Id 0 is reserved for payment-derived synthetic orders and
/// never rests in a book.
pub type OfferId = u64;

/// An offer resting in an order book: the owner sells `amount` units of
/// `selling`, demanding `price` units of `buying` per unit sold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    /// Unique offer id
    pub id: OfferId,
    /// Owning account
    pub owner: AccountId,
    /// Asset being sold
    pub selling: Asset,
    /// Asset being bought
    pub buying: Asset,
    /// Remaining amount of the selling asset
    pub amount: Amount,
    /// Units of buying demanded per unit of selling
    pub price: Price,
    /// Passive offers do not cross equal-priced counter-offers
    pub passive: bool,
}

impl Offer {
    /// Create a new offer, rejecting degenerate ones.
    pub fn new(
        id: OfferId,
        owner: impl Into<AccountId>,
        selling: Asset,
        buying: Asset,
        amount: Amount,
        price: Price,
        passive: bool,
    ) -> Result<Self, MatchingError> {
        if selling == buying {
            return Err(MatchingError::InvalidOffer(
                "selling and buying asset must differ",
            ));
        }
        if amount.is_zero() {
            return Err(MatchingError::InvalidOffer("amount must be positive"));
        }
        Ok(Self {
            id,
            owner: owner.into(),
            selling,
            buying,
            amount,
            price,
            passive,
        })
    }

    /// The normalized pair this offer trades on
    pub fn pair(&self) -> AssetPair {
        AssetPair::new(self.selling.clone(), self.buying.clone())
            .expect("selling and buying differ by construction")
    }
}
