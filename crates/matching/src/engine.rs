//! The crossing engine
//!
//! Executes an incoming order against the best resting counter-offers
//! of one book until the order is exhausted, the book runs dry, or no
//! counter-offer crosses the order's limit price. Every fill executes
//! at the resting offer's price and moves balances through the ledger
//! immediately; callers that need atomicity snapshot state beforehand.
//!
//! Rounding: the buying-asset amount of a fill is truncated, the
//! selling-asset payment is rounded up, so the resting owner never
//! receives less than the quoted price and both legs of a fill share
//! the same two integers.

use tracing::debug;
use tradewind_core::{AccountId, Amount, Asset, Price};
use tradewind_ledger::LedgerState;

use crate::error::MatchingError;
use crate::offer::OfferId;
use crate::orderbook::OrderBook;
use crate::trade::Trade;

/// The incoming side of a crossing: who is taking, what they give and
/// get, and how their own balances settle.
#[derive(Debug, Clone)]
pub struct Taker {
    /// Taking account
    pub account: AccountId,
    /// Asset the taker gives up
    pub selling: Asset,
    /// Asset the taker acquires
    pub buying: Asset,
    /// The taker's offer id; `SYNTHETIC_OFFER_ID` for payment-derived
    /// orders
    pub offer_id: OfferId,
    /// Minimum buying units demanded per selling unit; `None` takes
    /// any price (payment conversions)
    pub price_limit: Option<Price>,
    /// Passive orders only cross strictly better prices
    pub passive: bool,
    /// Whether each fill also moves the taker's own balances. Path
    /// payments settle their endpoints in aggregate and pass `false`.
    pub settle: bool,
}

/// Result of a sell-side crossing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SellOutcome {
    /// Selling-asset units the taker gave up
    pub sold: Amount,
    /// Buying-asset units the taker acquired
    pub bought: Amount,
}

fn apply_fill_transfers(
    ledger: &mut LedgerState,
    taker: &Taker,
    owner: &str,
    bought: Amount,
    paid: Amount,
) -> Result<(), MatchingError> {
    if taker.settle {
        ledger.transfer(owner, &taker.account, &taker.buying, bought)?;
        ledger.transfer(&taker.account, owner, &taker.selling, paid)?;
    } else {
        // The taker's legs are netted by the caller (path execution);
        // only the resting owner's balances move here.
        ledger.debit(owner, &taker.buying, bought)?;
        ledger.credit(owner, &taker.selling, paid)?;
    }
    Ok(())
}

/// Sell up to `max_sell` units of the taker's selling asset into the
/// book, best price first. Stops at the limit price, on an empty book,
/// or when the remainder is too small to buy a single unit.
pub fn cross_sell(
    ledger: &mut LedgerState,
    book: &mut OrderBook,
    taker: &Taker,
    max_sell: Amount,
    trades: &mut Vec<Trade>,
) -> Result<SellOutcome, MatchingError> {
    let mut sold = Amount::ZERO;
    let mut bought = Amount::ZERO;

    loop {
        let remaining = max_sell.checked_sub(sold).unwrap_or(Amount::ZERO);
        if remaining.is_zero() {
            break;
        }

        let (rest_id, rest_owner, rest_price, rest_amount) = match book.best(&taker.buying) {
            Some(o) => (o.id, o.owner.clone(), o.price, o.amount),
            None => break,
        };

        if let Some(limit) = taker.price_limit {
            let crosses = if taker.passive {
                rest_price.crosses_strictly(&limit)
            } else {
                rest_price.crosses(&limit)
            };
            if !crosses {
                break;
            }
        }
        if rest_owner == taker.account {
            return Err(MatchingError::OfferCrossesSelf);
        }

        let affordable = rest_price
            .div_floor(remaining)
            .ok_or(MatchingError::AmountOverflow)?;
        let fill_bought = rest_amount.min(affordable);
        if fill_bought.is_zero() {
            // remainder cannot buy one scaled unit at this price
            break;
        }
        let fill_paid = rest_price
            .mul_ceil(fill_bought)
            .ok_or(MatchingError::AmountOverflow)?;

        apply_fill_transfers(ledger, taker, &rest_owner, fill_bought, fill_paid)?;
        book.apply_fill(rest_id, fill_bought)?;

        debug!(
            offer = rest_id,
            seller = %rest_owner,
            buyer = %taker.account,
            %fill_bought,
            %fill_paid,
            "fill"
        );
        trades.push(Trade {
            offer_id: rest_id,
            seller: rest_owner,
            sold_asset: taker.buying.clone(),
            sold_amount: fill_bought,
            buyer: taker.account.clone(),
            paid_asset: taker.selling.clone(),
            paid_amount: fill_paid,
            taker_offer_id: taker.offer_id,
        });

        sold = sold
            .checked_add(fill_paid)
            .ok_or(MatchingError::AmountOverflow)?;
        bought = bought
            .checked_add(fill_bought)
            .ok_or(MatchingError::AmountOverflow)?;
    }

    Ok(SellOutcome { sold, bought })
}

/// Buy exactly `target` units of the taker's buying asset from the
/// book, paying whatever the resting prices demand.
///
/// Returns the selling-asset units spent. Fails with
/// `InsufficientLiquidity` if the book runs dry first.
pub fn cross_buy(
    ledger: &mut LedgerState,
    book: &mut OrderBook,
    taker: &Taker,
    target: Amount,
    trades: &mut Vec<Trade>,
) -> Result<Amount, MatchingError> {
    let mut need = target;
    let mut spent = Amount::ZERO;

    while !need.is_zero() {
        let (rest_id, rest_owner, rest_price, rest_amount) = match book.best(&taker.buying) {
            Some(o) => (o.id, o.owner.clone(), o.price, o.amount),
            None => return Err(MatchingError::InsufficientLiquidity(taker.buying.clone())),
        };
        if rest_owner == taker.account {
            return Err(MatchingError::OfferCrossesSelf);
        }

        let fill_bought = rest_amount.min(need);
        let fill_paid = rest_price
            .mul_ceil(fill_bought)
            .ok_or(MatchingError::AmountOverflow)?;

        apply_fill_transfers(ledger, taker, &rest_owner, fill_bought, fill_paid)?;
        book.apply_fill(rest_id, fill_bought)?;

        debug!(
            offer = rest_id,
            seller = %rest_owner,
            buyer = %taker.account,
            %fill_bought,
            %fill_paid,
            "fill"
        );
        trades.push(Trade {
            offer_id: rest_id,
            seller: rest_owner,
            sold_asset: taker.buying.clone(),
            sold_amount: fill_bought,
            buyer: taker.account.clone(),
            paid_asset: taker.selling.clone(),
            paid_amount: fill_paid,
            taker_offer_id: taker.offer_id,
        });

        need = need
            .checked_sub(fill_bought)
            .expect("fill never exceeds need");
        spent = spent
            .checked_add(fill_paid)
            .ok_or(MatchingError::AmountOverflow)?;
    }

    Ok(spent)
}
