//! Trade records emitted by the crossing engine

use serde::{Deserialize, Serialize};
use tradewind_core::{AccountId, Amount, Asset};

use crate::offer::OfferId;

/// Taker id recorded for payment-derived crossing orders, which never
/// rest and carry no real offer id.
pub const SYNTHETIC_OFFER_ID: OfferId = 0;

/// One executed fill between a resting offer and an incoming order.
///
/// `seller` is the resting offer's owner; the fill always executes at
/// the resting offer's price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Resting offer id
    pub offer_id: OfferId,
    /// Resting offer owner
    pub seller: AccountId,
    /// Asset the seller gave up
    pub sold_asset: Asset,
    /// Amount the seller gave up
    pub sold_amount: Amount,
    /// Taker account
    pub buyer: AccountId,
    /// Asset the taker paid with
    pub paid_asset: Asset,
    /// Amount the taker paid
    pub paid_amount: Amount,
    /// Taker's offer id; [`SYNTHETIC_OFFER_ID`] for payment-derived
    /// orders
    pub taker_offer_id: OfferId,
}

impl Trade {
    /// Whether this fill came from a payment rather than an offer
    pub fn is_payment_fill(&self) -> bool {
        self.taker_offer_id == SYNTHETIC_OFFER_ID
    }
}
