//! Per-close results reported back to the harness

use serde::Serialize;
use tradewind_core::{AccountId, Amount};
use tradewind_matching::OfferId;

use crate::error::OperationError;
use crate::operation::OperationKind;

/// Success payload of one applied operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum OperationOutcome {
    AccountCreated {
        account: AccountId,
    },
    PaymentDelivered {
        amount: Amount,
    },
    PathCompleted {
        source_spent: Amount,
        destination_received: Amount,
    },
    /// The offer's id and what remained resting after crossing;
    /// `remaining` 0 means it executed fully on submission
    OfferPlaced {
        offer_id: OfferId,
        remaining: Amount,
    },
    OfferCancelled {
        offer_id: OfferId,
    },
    TrustChanged,
    AuthorizationSet {
        authorized: bool,
    },
    OptionsApplied,
    AccountMerged {
        absorbed: Amount,
    },
    DataManaged,
    InflationDistributed {
        payout: Amount,
        recipients: usize,
    },
}

/// Why a transaction failed: the index of the first failing operation
/// and its result code
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedTransaction {
    pub failed_operation: usize,
    pub kind: OperationKind,
    pub error: OperationError,
}

/// The recorded fate of one submitted transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionResult {
    /// Source account of the transaction
    pub source: AccountId,
    /// All operation outcomes on success, or the first failure; a
    /// failed transaction contributed no state change
    pub outcome: Result<Vec<OperationOutcome>, FailedTransaction>,
}

impl TransactionResult {
    /// Whether the transaction committed
    pub fn succeeded(&self) -> bool {
        self.outcome.is_ok()
    }
}
