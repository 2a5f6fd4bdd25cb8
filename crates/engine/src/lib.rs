//! Tradewind Engine
//!
//! The operation surface of the ledger: a closed set of operations
//! dispatched exhaustively, grouped into transactions, applied in
//! discrete ledger closes. Each close permutes the queued transactions
//! deterministically, applies them one at a time - each transaction
//! commits fully or rolls back fully - and reports per-transaction
//! results together with the trades the close produced.

mod apply;
mod close;
mod error;
mod operation;
mod result;

pub use close::{ClosedLedger, Ledger};
pub use error::OperationError;
pub use operation::{
    AccountFlag, Operation, OperationKind, OptionsChange, SignerUpdate, Transaction,
};
pub use result::{FailedTransaction, OperationOutcome, TransactionResult};
