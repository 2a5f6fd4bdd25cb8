//! Operations and transactions
//!
//! A closed tagged-variant type with one case per operation kind; the
//! engine dispatches on it exhaustively. The set mirrors what the
//! ledger accepts from the harness: account lifecycle, payments, path
//! payments, offers, trust, options, data and inflation.

use serde::{Deserialize, Serialize};
use strum_macros::Display;
use tradewind_core::{AccountId, Amount, Asset, Price};
use tradewind_ledger::Thresholds;
use tradewind_matching::OfferId;

/// Issuer flag names used by SetOptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AccountFlag {
    AuthRequired,
    AuthRevocable,
}

/// A signer change carried by SetOptions; weight 0 removes the signer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerUpdate {
    pub key: String,
    pub weight: u8,
}

/// The optional fields of a SetOptions operation; `None` leaves the
/// corresponding account field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionsChange {
    pub inflation_destination: Option<AccountId>,
    pub clear_flags: Vec<AccountFlag>,
    pub set_flags: Vec<AccountFlag>,
    pub master_weight: Option<u8>,
    pub thresholds: Option<Thresholds>,
    pub home_domain: Option<String>,
    pub signer: Option<SignerUpdate>,
}

/// One ledger operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
    /// Fund a new account from the operation source
    CreateAccount {
        destination: AccountId,
        starting_balance: Amount,
    },
    /// Direct transfer of one asset
    Payment {
        destination: AccountId,
        asset: Asset,
        amount: Amount,
    },
    /// Deliver a fixed destination amount through a conversion path
    PathPaymentStrictReceive {
        send_asset: Asset,
        send_max: Amount,
        destination: AccountId,
        dest_asset: Asset,
        dest_amount: Amount,
        path: Vec<Asset>,
    },
    /// Spend a fixed source amount through a conversion path
    PathPaymentStrictSend {
        send_asset: Asset,
        send_amount: Amount,
        destination: AccountId,
        dest_asset: Asset,
        dest_min: Amount,
        path: Vec<Asset>,
    },
    /// Create (offer_id 0), update, or cancel (amount 0) an offer
    ManageOffer {
        offer_id: OfferId,
        selling: Asset,
        buying: Asset,
        amount: Amount,
        price: Price,
    },
    /// Create an offer that will not cross equal-priced counter-offers
    CreatePassiveOffer {
        selling: Asset,
        buying: Asset,
        amount: Amount,
        price: Price,
    },
    /// Create, update or remove a trustline
    ChangeTrust { asset: Asset, limit: Amount },
    /// Grant or revoke trustline authorization as the asset's issuer
    AllowTrust {
        trustor: AccountId,
        asset_code: String,
        authorize: bool,
    },
    /// Adjust account options
    SetOptions(OptionsChange),
    /// Merge the source account into another, moving its whole balance
    AccountMerge { destination: AccountId },
    /// Set (`Some`) or delete (`None`) a data entry
    ManageData {
        name: String,
        value: Option<String>,
    },
    /// Run an inflation payout
    Inflation,
}

/// Operation kind names for results and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    CreateAccount,
    Payment,
    PathPaymentStrictReceive,
    PathPaymentStrictSend,
    ManageOffer,
    CreatePassiveOffer,
    ChangeTrust,
    AllowTrust,
    SetOptions,
    AccountMerge,
    ManageData,
    Inflation,
}

impl Operation {
    /// The kind tag of this operation
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::CreateAccount { .. } => OperationKind::CreateAccount,
            Operation::Payment { .. } => OperationKind::Payment,
            Operation::PathPaymentStrictReceive { .. } => OperationKind::PathPaymentStrictReceive,
            Operation::PathPaymentStrictSend { .. } => OperationKind::PathPaymentStrictSend,
            Operation::ManageOffer { .. } => OperationKind::ManageOffer,
            Operation::CreatePassiveOffer { .. } => OperationKind::CreatePassiveOffer,
            Operation::ChangeTrust { .. } => OperationKind::ChangeTrust,
            Operation::AllowTrust { .. } => OperationKind::AllowTrust,
            Operation::SetOptions(_) => OperationKind::SetOptions,
            Operation::AccountMerge { .. } => OperationKind::AccountMerge,
            Operation::ManageData { .. } => OperationKind::ManageData,
            Operation::Inflation => OperationKind::Inflation,
        }
    }
}

/// A group of operations applied atomically under one source account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Source account; pays and sequences the transaction
    pub source: AccountId,
    /// Operations, applied in order
    pub operations: Vec<Operation>,
}

impl Transaction {
    /// A transaction wrapping a single operation
    pub fn single(source: impl Into<AccountId>, operation: Operation) -> Self {
        Self {
            source: source.into(),
            operations: vec![operation],
        }
    }

    /// A multi-operation transaction
    pub fn new(source: impl Into<AccountId>, operations: Vec<Operation>) -> Self {
        Self {
            source: source.into(),
            operations,
        }
    }
}
