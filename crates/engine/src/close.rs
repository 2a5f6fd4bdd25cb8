//! The ledger close loop
//!
//! Transactions queue between closes. A close permutes the queue with
//! an rng seeded from the close sequence - reproducible run to run,
//! but distinct from submission order, so callers cannot come to rely
//! on it - then applies each transaction atomically: a snapshot is
//! taken first and restored if any operation fails. The close itself
//! always completes; failed transactions are recorded as failed and
//! contribute no state change.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, info, warn};
use tradewind_core::Amount;
use tradewind_ledger::LedgerState;
use tradewind_matching::{BookSet, Trade};

use crate::apply::{apply_operation, WorkingState};
use crate::operation::Transaction;
use crate::result::{FailedTransaction, OperationOutcome, TransactionResult};

/// The committed output of one close
#[derive(Debug, Clone, Serialize)]
pub struct ClosedLedger {
    /// Close sequence number
    pub sequence: u32,
    /// Close timestamp
    pub closed_at: DateTime<Utc>,
    /// One result per applied transaction, in apply order
    pub results: Vec<TransactionResult>,
    /// Every trade the close produced, in apply order
    pub trades: Vec<Trade>,
}

impl ClosedLedger {
    /// Whether every transaction in the close committed
    pub fn all_succeeded(&self) -> bool {
        self.results.iter().all(|r| r.succeeded())
    }
}

/// The ledger: current state, the order books, and the queue of
/// transactions awaiting the next close.
#[derive(Debug)]
pub struct Ledger {
    sequence: u32,
    state: WorkingState,
    pending: Vec<Transaction>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// An empty ledger at sequence 1 (the genesis close)
    pub fn new() -> Self {
        Self {
            sequence: 1,
            state: WorkingState::new(),
            pending: Vec::new(),
        }
    }

    /// A ledger bootstrapped with a master account holding the whole
    /// initial native supply
    pub fn with_genesis(master: &str, supply: Amount) -> Self {
        let mut ledger = Self::new();
        ledger
            .state
            .ledger
            .create_account(master, supply)
            .expect("empty ledger");
        ledger
    }

    /// Current close sequence
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// The committed account and trustline state
    pub fn state(&self) -> &LedgerState {
        &self.state.ledger
    }

    /// The resting order books
    pub fn books(&self) -> &BookSet {
        &self.state.books
    }

    /// Number of transactions queued for the next close
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Queue a transaction for the next close
    pub fn submit(&mut self, transaction: Transaction) {
        self.pending.push(transaction);
    }

    /// Advance the ledger by one close, applying every queued
    /// transaction.
    pub fn close(&mut self) -> ClosedLedger {
        self.sequence += 1;
        let mut queue = std::mem::take(&mut self.pending);

        // applied order is an engine choice, not submission order
        let mut rng = StdRng::seed_from_u64(self.sequence as u64);
        queue.shuffle(&mut rng);

        info!(
            sequence = self.sequence,
            transactions = queue.len(),
            "closing ledger"
        );

        let mut results = Vec::with_capacity(queue.len());
        let mut trades = Vec::new();

        for transaction in queue {
            let snapshot = self.state.clone();
            let mut tx_trades = Vec::new();

            match self.apply_transaction(&transaction, &mut tx_trades) {
                Ok(outcomes) => {
                    debug!(source = %transaction.source, operations = outcomes.len(), "transaction applied");
                    trades.append(&mut tx_trades);
                    results.push(TransactionResult {
                        source: transaction.source,
                        outcome: Ok(outcomes),
                    });
                }
                Err(failed) => {
                    warn!(
                        source = %transaction.source,
                        operation = failed.failed_operation,
                        error = %failed.error,
                        "transaction failed, rolled back"
                    );
                    self.state = snapshot;
                    results.push(TransactionResult {
                        source: transaction.source,
                        outcome: Err(failed),
                    });
                }
            }
        }

        ClosedLedger {
            sequence: self.sequence,
            closed_at: Utc::now(),
            results,
            trades,
        }
    }

    fn apply_transaction(
        &mut self,
        transaction: &Transaction,
        trades: &mut Vec<Trade>,
    ) -> Result<Vec<OperationOutcome>, FailedTransaction> {
        let Some(first) = transaction.operations.first() else {
            return Ok(Vec::new());
        };

        self.state
            .ledger
            .bump_sequence(&transaction.source)
            .map_err(|e| FailedTransaction {
                failed_operation: 0,
                kind: first.kind(),
                error: e.into(),
            })?;

        let mut outcomes = Vec::with_capacity(transaction.operations.len());
        for (index, operation) in transaction.operations.iter().enumerate() {
            match apply_operation(&mut self.state, &transaction.source, operation, trades) {
                Ok(outcome) => outcomes.push(outcome),
                Err(error) => {
                    return Err(FailedTransaction {
                        failed_operation: index,
                        kind: operation.kind(),
                        error,
                    });
                }
            }
        }
        Ok(outcomes)
    }
}
