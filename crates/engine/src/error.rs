//! Operation-level errors
//!
//! The single error surface reported to the harness. Errors from the
//! ledger, matching and path layers map onto it; an error fails the
//! enclosing transaction and never the close itself.

use serde::Serialize;
use thiserror::Error;
use tradewind_core::{Amount, Asset};
use tradewind_ledger::LedgerError;
use tradewind_matching::{MatchingError, OfferId};
use tradewind_paths::PathError;

/// Result code of a failed operation
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", content = "details", rename_all = "snake_case")]
pub enum OperationError {
    #[error("Malformed operation: {0}")]
    Malformed(String),

    #[error("Invalid offer: {0}")]
    InvalidOffer(String),

    #[error("Insufficient liquidity buying {0}")]
    InsufficientLiquidity(Asset),

    #[error("Not authorized to transact in {asset}")]
    NotAuthorized { asset: Asset },

    #[error("New trust limit {limit} is below the held balance {balance}")]
    LimitBelowBalance { limit: Amount, balance: Amount },

    #[error("The issuer does not require authorization")]
    TrustNotRequired,

    #[error("Authorization is not revocable")]
    AuthorizationNotRevocable,

    #[error("Receiving trustline is full")]
    LineFull,

    #[error("Underfunded")]
    Underfunded,

    #[error("Path delivered {received}, below the required minimum {minimum}")]
    TooFewDestinationAssets { received: Amount, minimum: Amount },

    #[error("Path requires {required}, above the allowed maximum {maximum}")]
    TooMuchSourceAssets { required: Amount, maximum: Amount },

    #[error("Path exceeds {max} intermediate hops")]
    PathTooLong { max: usize },

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Account already exists: {0}")]
    AccountExists(String),

    #[error("Offer not found: {0}")]
    OfferNotFound(OfferId),

    #[error("Order crosses the account's own offer")]
    OfferCrossesSelf,

    #[error("Account merge blocked: {0}")]
    MergeBlocked(String),
}

impl From<LedgerError> for OperationError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::AccountNotFound(id) => OperationError::AccountNotFound(id),
            LedgerError::AccountExists(id) => OperationError::AccountExists(id),
            LedgerError::NoTrustline { asset, .. } | LedgerError::NotAuthorized { asset, .. } => {
                OperationError::NotAuthorized { asset }
            }
            LedgerError::Underfunded { .. } => OperationError::Underfunded,
            LedgerError::LineFull { .. } | LedgerError::BalanceOverflow { .. } => {
                OperationError::LineFull
            }
            LedgerError::LimitBelowBalance { limit, balance } => {
                OperationError::LimitBelowBalance { limit, balance }
            }
            LedgerError::AuthNotRequired { .. } => OperationError::TrustNotRequired,
            LedgerError::AuthorizationNotRevocable { .. } => {
                OperationError::AuthorizationNotRevocable
            }
            LedgerError::InvalidTrustline { reason, .. } => {
                OperationError::Malformed(reason.to_string())
            }
            LedgerError::MergeBlocked { reason, .. } => {
                OperationError::MergeBlocked(reason.to_string())
            }
        }
    }
}

impl From<MatchingError> for OperationError {
    fn from(err: MatchingError) -> Self {
        match err {
            MatchingError::InvalidOffer(reason) => OperationError::InvalidOffer(reason.to_string()),
            MatchingError::OfferNotFound(id) => OperationError::OfferNotFound(id),
            MatchingError::PairMismatch => {
                OperationError::InvalidOffer("selling and buying asset must differ".to_string())
            }
            MatchingError::OfferCrossesSelf => OperationError::OfferCrossesSelf,
            MatchingError::InsufficientLiquidity(asset) => {
                OperationError::InsufficientLiquidity(asset)
            }
            MatchingError::AmountOverflow => {
                OperationError::Malformed("fill amount overflow".to_string())
            }
            MatchingError::Ledger(err) => err.into(),
        }
    }
}

impl From<PathError> for OperationError {
    fn from(err: PathError) -> Self {
        match err {
            PathError::PathTooLong { max, .. } => OperationError::PathTooLong { max },
            PathError::TooFewDestinationAssets { received, minimum } => {
                OperationError::TooFewDestinationAssets { received, minimum }
            }
            PathError::TooMuchSourceAssets { required, maximum } => {
                OperationError::TooMuchSourceAssets { required, maximum }
            }
            PathError::Matching(err) => err.into(),
            PathError::Ledger(err) => err.into(),
        }
    }
}
