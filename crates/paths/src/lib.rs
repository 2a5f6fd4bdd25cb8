//! Tradewind Path Payments
//!
//! Moves value from a source account to a destination account through a
//! sequence of intermediate assets, converting at each hop over the
//! order book for that pair. Strict-send fixes the source amount and
//! executes forward; strict-receive fixes the destination amount and
//! executes backward, so every hop buys exactly what the next one
//! spends. Either the whole path executes or none of it does - callers
//! snapshot state before invoking and roll back on error.

mod error;
mod executor;

pub use error::PathError;
pub use executor::{strict_receive, strict_send, PathOutcome, MAX_PATH_LEN};
