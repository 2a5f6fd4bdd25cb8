//! Matching engine errors

use thiserror::Error;
use tradewind_core::Asset;
use tradewind_ledger::LedgerError;

use crate::offer::OfferId;

/// Matching engine errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchingError {
    /// Offer rejected before reaching the book
    #[error("Invalid offer: {0}")]
    InvalidOffer(&'static str),

    /// Offer not found
    #[error("Offer not found: {0}")]
    OfferNotFound(OfferId),

    /// Offer does not belong to this book's asset pair
    #[error("Offer trades a different asset pair than this book")]
    PairMismatch,

    /// An order may not cross a resting offer of the same account
    #[error("Order crosses the account's own offer")]
    OfferCrossesSelf,

    /// The book ran dry before the required amount was acquired
    #[error("Insufficient liquidity buying {0}")]
    InsufficientLiquidity(Asset),

    /// A fill amount left the 64-bit range
    #[error("Fill amount overflow")]
    AmountOverflow,

    /// A balance transfer backing a fill was refused
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
