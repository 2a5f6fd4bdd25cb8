//! Path execution
//!
//! A payment's full conversion chain is `[send asset] + path + [dest
//! asset]` with adjacent duplicates collapsed; each remaining window of
//! two assets is one crossing over that pair's book. Intermediate hops
//! settle only the resting owners' balances: the source pays its total
//! once at the start of the chain and the destination receives once at
//! the end, so the source needs no trustlines on intermediate assets.

use tracing::debug;
use tradewind_core::{Amount, Asset, AssetPair};
use tradewind_ledger::LedgerState;
use tradewind_matching::{
    cross_buy, cross_sell, BookSet, MatchingError, Taker, Trade, SYNTHETIC_OFFER_ID,
};

use crate::error::PathError;

/// Maximum number of intermediate assets in a path
pub const MAX_PATH_LEN: usize = 5;

/// Net effect of an executed path payment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathOutcome {
    /// Send-asset units the source paid
    pub source_spent: Amount,
    /// Destination-asset units the destination received
    pub destination_received: Amount,
    /// Every fill executed along the path, source end first
    pub trades: Vec<Trade>,
}

fn conversion_chain(send_asset: &Asset, path: &[Asset], dest_asset: &Asset) -> Vec<Asset> {
    let mut chain = Vec::with_capacity(path.len() + 2);
    chain.push(send_asset.clone());
    chain.extend(path.iter().cloned());
    chain.push(dest_asset.clone());
    chain.dedup();
    chain
}

fn hop_taker(source: &str, selling: &Asset, buying: &Asset) -> Taker {
    Taker {
        account: source.to_string(),
        selling: selling.clone(),
        buying: buying.clone(),
        offer_id: SYNTHETIC_OFFER_ID,
        price_limit: None,
        passive: false,
        settle: false,
    }
}

/// Deliver exactly `dest_amount` of `dest_asset`, spending at most
/// `send_max` of `send_asset`.
///
/// Executes backward from the destination: each hop buys exactly the
/// amount the hop after it spent, so the chain is exact and the
/// required source amount falls out of the walk.
#[allow(clippy::too_many_arguments)]
pub fn strict_receive(
    ledger: &mut LedgerState,
    books: &mut BookSet,
    source: &str,
    send_asset: &Asset,
    send_max: Amount,
    destination: &str,
    dest_asset: &Asset,
    dest_amount: Amount,
    path: &[Asset],
) -> Result<PathOutcome, PathError> {
    if path.len() > MAX_PATH_LEN {
        return Err(PathError::PathTooLong {
            len: path.len(),
            max: MAX_PATH_LEN,
        });
    }

    let chain = conversion_chain(send_asset, path, dest_asset);
    if chain.len() == 1 {
        // no conversion: a plain transfer, still bounded by send_max
        if dest_amount > send_max {
            return Err(PathError::TooMuchSourceAssets {
                required: dest_amount,
                maximum: send_max,
            });
        }
        ledger.transfer(source, destination, send_asset, dest_amount)?;
        return Ok(PathOutcome {
            source_spent: dest_amount,
            destination_received: dest_amount,
            trades: Vec::new(),
        });
    }

    let mut hop_trades: Vec<Vec<Trade>> = Vec::with_capacity(chain.len() - 1);
    let mut need = dest_amount;

    for window in chain.windows(2).rev() {
        let (prev, next) = (&window[0], &window[1]);
        let pair =
            AssetPair::new(prev.clone(), next.clone()).expect("adjacent duplicates collapsed");
        let book = books.book_mut(pair);
        let taker = hop_taker(source, prev, next);

        let mut trades = Vec::new();
        let spent = cross_buy(ledger, book, &taker, need, &mut trades)?;
        debug!(from = %prev, to = %next, bought = %need, %spent, "path hop");
        hop_trades.push(trades);
        need = spent;
    }

    let required = need;
    if required > send_max {
        return Err(PathError::TooMuchSourceAssets {
            required,
            maximum: send_max,
        });
    }

    ledger.debit(source, send_asset, required)?;
    ledger.credit(destination, dest_asset, dest_amount)?;

    hop_trades.reverse();
    Ok(PathOutcome {
        source_spent: required,
        destination_received: dest_amount,
        trades: hop_trades.into_iter().flatten().collect(),
    })
}

/// Spend exactly `send_amount` of `send_asset`, delivering at least
/// `dest_min` of `dest_asset`.
///
/// Executes forward from the source; every hop must absorb the full
/// carried amount or the payment fails for lack of liquidity.
#[allow(clippy::too_many_arguments)]
pub fn strict_send(
    ledger: &mut LedgerState,
    books: &mut BookSet,
    source: &str,
    send_asset: &Asset,
    send_amount: Amount,
    destination: &str,
    dest_asset: &Asset,
    dest_min: Amount,
    path: &[Asset],
) -> Result<PathOutcome, PathError> {
    if path.len() > MAX_PATH_LEN {
        return Err(PathError::PathTooLong {
            len: path.len(),
            max: MAX_PATH_LEN,
        });
    }

    let chain = conversion_chain(send_asset, path, dest_asset);
    if chain.len() == 1 {
        if send_amount < dest_min {
            return Err(PathError::TooFewDestinationAssets {
                received: send_amount,
                minimum: dest_min,
            });
        }
        ledger.transfer(source, destination, send_asset, send_amount)?;
        return Ok(PathOutcome {
            source_spent: send_amount,
            destination_received: send_amount,
            trades: Vec::new(),
        });
    }

    let mut all_trades = Vec::new();
    let mut carry = send_amount;

    for window in chain.windows(2) {
        let (prev, next) = (&window[0], &window[1]);
        let pair =
            AssetPair::new(prev.clone(), next.clone()).expect("adjacent duplicates collapsed");
        let book = books.book_mut(pair);
        let taker = hop_taker(source, prev, next);

        let outcome = cross_sell(ledger, book, &taker, carry, &mut all_trades)?;
        if outcome.sold != carry {
            return Err(MatchingError::InsufficientLiquidity(next.clone()).into());
        }
        debug!(from = %prev, to = %next, sold = %outcome.sold, bought = %outcome.bought, "path hop");
        carry = outcome.bought;
    }

    let received = carry;
    if received < dest_min {
        return Err(PathError::TooFewDestinationAssets {
            received,
            minimum: dest_min,
        });
    }

    ledger.debit(source, send_asset, send_amount)?;
    ledger.credit(destination, dest_asset, received)?;

    Ok(PathOutcome {
        source_spent: send_amount,
        destination_received: received,
        trades: all_trades,
    })
}
