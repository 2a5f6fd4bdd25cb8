//! Tradewind Ledger - Accounts, trustlines and authorization
//!
//! All balance state changes go through this crate. It holds the account
//! and trustline entries and enforces the transfer rules: authorization,
//! trust limits and funding.
//!
//! # Key Types
//! - `Account`: native balance, sequence number, signers, thresholds, flags
//! - `Trustline`: (account, asset) with limit, balance and authorization
//! - `LedgerState`: the owned collection of both, with credit/debit rules

pub mod account;
pub mod error;
pub mod state;
pub mod trustline;

pub use account::{Account, AccountFlags, Thresholds};
pub use error::LedgerError;
pub use state::LedgerState;
pub use trustline::Trustline;
