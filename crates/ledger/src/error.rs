//! Ledger errors

use thiserror::Error;
use tradewind_core::{Amount, Asset};

/// Errors that can occur in ledger operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Account already exists: {0}")]
    AccountExists(String),

    #[error("Account {account} has no trustline for {asset}")]
    NoTrustline { account: String, asset: Asset },

    #[error("Account {account} is not authorized to hold {asset}")]
    NotAuthorized { account: String, asset: Asset },

    #[error("Account {account} underfunded for {asset}")]
    Underfunded { account: String, asset: Asset },

    #[error("Trustline of {account} for {asset} cannot receive beyond its limit")]
    LineFull { account: String, asset: Asset },

    #[error("New trust limit {limit} is below current balance {balance}")]
    LimitBelowBalance { limit: Amount, balance: Amount },

    #[error("Issuer {issuer} is not flagged auth-required")]
    AuthNotRequired { issuer: String },

    #[error("Issuer {issuer} cannot revoke authorization (auth-revocable not set)")]
    AuthorizationNotRevocable { issuer: String },

    #[error("Invalid trustline for {account} on {asset}: {reason}")]
    InvalidTrustline {
        account: String,
        asset: Asset,
        reason: &'static str,
    },

    #[error("Balance overflow for {account}")]
    BalanceOverflow { account: String },

    #[error("Cannot merge account {account}: {reason}")]
    MergeBlocked {
        account: String,
        reason: &'static str,
    },
}
