//! Path payment errors

use thiserror::Error;
use tradewind_core::Amount;
use tradewind_ledger::LedgerError;
use tradewind_matching::MatchingError;

/// Path payment errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// More intermediate hops than the path limit allows
    #[error("Path of {len} hops exceeds the maximum of {max}")]
    PathTooLong { len: usize, max: usize },

    /// Strict-send yielded less than the caller's floor
    #[error("Path delivered {received}, below the required minimum {minimum}")]
    TooFewDestinationAssets { received: Amount, minimum: Amount },

    /// Strict-receive demanded more than the caller's ceiling
    #[error("Path requires {required}, above the allowed maximum {maximum}")]
    TooMuchSourceAssets { required: Amount, maximum: Amount },

    /// A hop failed inside the crossing engine
    #[error(transparent)]
    Matching(#[from] MatchingError),

    /// An endpoint transfer was refused
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
