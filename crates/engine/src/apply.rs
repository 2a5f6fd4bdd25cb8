//! Operation application
//!
//! One function per operation family, dispatched from an exhaustive
//! match. Operations mutate the working state directly; the close loop
//! snapshots it per transaction and rolls back on error, so nothing
//! here needs to undo partial work.

use std::collections::BTreeMap;

use tradewind_core::{AccountId, Amount, Asset, AssetPair, Price};
use tradewind_ledger::LedgerState;
use tradewind_matching::{cross_sell, BookSet, Offer, OfferId, Taker, Trade};
use tradewind_paths::{strict_receive, strict_send};

use crate::error::OperationError;
use crate::operation::{AccountFlag, Operation, OptionsChange};
use crate::result::OperationOutcome;

/// The state one ledger close mutates
#[derive(Debug, Clone)]
pub(crate) struct WorkingState {
    pub ledger: LedgerState,
    pub books: BookSet,
    /// Next real offer id; ids are burned at operation start so they
    /// stay deterministic per submission, resting or not
    pub next_offer_id: OfferId,
}

impl WorkingState {
    pub fn new() -> Self {
        Self {
            ledger: LedgerState::new(),
            books: BookSet::new(),
            next_offer_id: 1,
        }
    }
}

pub(crate) fn apply_operation(
    state: &mut WorkingState,
    source: &str,
    operation: &Operation,
    trades: &mut Vec<Trade>,
) -> Result<OperationOutcome, OperationError> {
    match operation {
        Operation::CreateAccount {
            destination,
            starting_balance,
        } => create_account(state, source, destination, *starting_balance),
        Operation::Payment {
            destination,
            asset,
            amount,
        } => payment(state, source, destination, asset, *amount),
        Operation::PathPaymentStrictReceive {
            send_asset,
            send_max,
            destination,
            dest_asset,
            dest_amount,
            path,
        } => {
            if dest_amount.is_zero() {
                return Err(OperationError::Malformed(
                    "destination amount must be positive".to_string(),
                ));
            }
            let outcome = strict_receive(
                &mut state.ledger,
                &mut state.books,
                source,
                send_asset,
                *send_max,
                destination,
                dest_asset,
                *dest_amount,
                path,
            )?;
            trades.extend(outcome.trades);
            Ok(OperationOutcome::PathCompleted {
                source_spent: outcome.source_spent,
                destination_received: outcome.destination_received,
            })
        }
        Operation::PathPaymentStrictSend {
            send_asset,
            send_amount,
            destination,
            dest_asset,
            dest_min,
            path,
        } => {
            if send_amount.is_zero() {
                return Err(OperationError::Malformed(
                    "send amount must be positive".to_string(),
                ));
            }
            let outcome = strict_send(
                &mut state.ledger,
                &mut state.books,
                source,
                send_asset,
                *send_amount,
                destination,
                dest_asset,
                *dest_min,
                path,
            )?;
            trades.extend(outcome.trades);
            Ok(OperationOutcome::PathCompleted {
                source_spent: outcome.source_spent,
                destination_received: outcome.destination_received,
            })
        }
        Operation::ManageOffer {
            offer_id,
            selling,
            buying,
            amount,
            price,
        } => manage_offer(
            state, source, *offer_id, selling, buying, *amount, *price, trades,
        ),
        Operation::CreatePassiveOffer {
            selling,
            buying,
            amount,
            price,
        } => place_offer(
            state, source, None, selling, buying, *amount, *price, true, trades,
        ),
        Operation::ChangeTrust { asset, limit } => {
            state
                .ledger
                .change_trust(source, asset.clone(), *limit)?;
            Ok(OperationOutcome::TrustChanged)
        }
        Operation::AllowTrust {
            trustor,
            asset_code,
            authorize,
        } => {
            let asset = Asset::credit(asset_code, source)
                .map_err(|e| OperationError::Malformed(e.to_string()))?;
            state
                .ledger
                .set_authorization(source, trustor, &asset, *authorize)?;
            Ok(OperationOutcome::AuthorizationSet {
                authorized: *authorize,
            })
        }
        Operation::SetOptions(change) => set_options(&mut state.ledger, source, change),
        Operation::AccountMerge { destination } => {
            if state.books.offers_by(source).next().is_some() {
                return Err(OperationError::MergeBlocked(
                    "the account still owns offers".to_string(),
                ));
            }
            let absorbed = state.ledger.merge_account(source, destination)?;
            Ok(OperationOutcome::AccountMerged { absorbed })
        }
        Operation::ManageData { name, value } => {
            state
                .ledger
                .account_mut(source)?
                .set_data(name.clone(), value.clone());
            Ok(OperationOutcome::DataManaged)
        }
        Operation::Inflation => run_inflation(&mut state.ledger),
    }
}

fn create_account(
    state: &mut WorkingState,
    source: &str,
    destination: &str,
    starting_balance: Amount,
) -> Result<OperationOutcome, OperationError> {
    if starting_balance.is_zero() {
        return Err(OperationError::Malformed(
            "starting balance must be positive".to_string(),
        ));
    }
    if state.ledger.has_account(destination) {
        return Err(OperationError::AccountExists(destination.to_string()));
    }
    state
        .ledger
        .debit(source, &Asset::Native, starting_balance)?;
    state.ledger.create_account(destination, starting_balance)?;
    Ok(OperationOutcome::AccountCreated {
        account: destination.to_string(),
    })
}

fn payment(
    state: &mut WorkingState,
    source: &str,
    destination: &str,
    asset: &Asset,
    amount: Amount,
) -> Result<OperationOutcome, OperationError> {
    if amount.is_zero() {
        return Err(OperationError::Malformed(
            "payment amount must be positive".to_string(),
        ));
    }
    state.ledger.transfer(source, destination, asset, amount)?;
    Ok(OperationOutcome::PaymentDelivered { amount })
}

#[allow(clippy::too_many_arguments)]
fn manage_offer(
    state: &mut WorkingState,
    source: &str,
    offer_id: OfferId,
    selling: &Asset,
    buying: &Asset,
    amount: Amount,
    price: Price,
    trades: &mut Vec<Trade>,
) -> Result<OperationOutcome, OperationError> {
    if offer_id == 0 {
        return place_offer(
            state, source, None, selling, buying, amount, price, false, trades,
        );
    }

    // update or cancel an existing offer
    let existing = state
        .books
        .remove(selling, buying, offer_id)
        .ok_or(OperationError::OfferNotFound(offer_id))?;
    if existing.owner != source {
        return Err(OperationError::OfferNotFound(offer_id));
    }
    if amount.is_zero() {
        return Ok(OperationOutcome::OfferCancelled { offer_id });
    }
    // re-cross under the same id; time priority is lost, id is not
    place_offer(
        state,
        source,
        Some(offer_id),
        selling,
        buying,
        amount,
        price,
        false,
        trades,
    )
}

#[allow(clippy::too_many_arguments)]
fn place_offer(
    state: &mut WorkingState,
    source: &str,
    offer_id: Option<OfferId>,
    selling: &Asset,
    buying: &Asset,
    amount: Amount,
    price: Price,
    passive: bool,
    trades: &mut Vec<Trade>,
) -> Result<OperationOutcome, OperationError> {
    if selling == buying {
        return Err(OperationError::InvalidOffer(
            "selling and buying asset must differ".to_string(),
        ));
    }
    if amount.is_zero() {
        return Err(OperationError::InvalidOffer(
            "amount must be positive".to_string(),
        ));
    }
    state.ledger.require_authorized(source, selling)?;
    state.ledger.require_authorized(source, buying)?;
    if !selling.is_issued_by(source) && state.ledger.balance(source, selling) < amount {
        return Err(OperationError::Underfunded);
    }

    let id = match offer_id {
        Some(id) => id,
        None => {
            let id = state.next_offer_id;
            state.next_offer_id += 1;
            id
        }
    };

    let pair = AssetPair::new(selling.clone(), buying.clone()).expect("assets differ");
    let taker = Taker {
        account: source.to_string(),
        selling: selling.clone(),
        buying: buying.clone(),
        offer_id: id,
        price_limit: Some(price),
        passive,
        settle: true,
    };
    let outcome = cross_sell(
        &mut state.ledger,
        state.books.book_mut(pair),
        &taker,
        amount,
        trades,
    )?;

    let remaining = amount.checked_sub(outcome.sold).unwrap_or(Amount::ZERO);
    if !remaining.is_zero() {
        let offer = Offer::new(
            id,
            source,
            selling.clone(),
            buying.clone(),
            remaining,
            price,
            passive,
        )?;
        state.books.insert(offer)?;
    }
    Ok(OperationOutcome::OfferPlaced {
        offer_id: id,
        remaining,
    })
}

fn set_options(
    ledger: &mut LedgerState,
    source: &str,
    change: &OptionsChange,
) -> Result<OperationOutcome, OperationError> {
    if let Some(dest) = &change.inflation_destination {
        ledger.account(dest)?;
    }

    let account = ledger.account_mut(source)?;
    for flag in &change.clear_flags {
        match flag {
            AccountFlag::AuthRequired => account.flags.auth_required = false,
            AccountFlag::AuthRevocable => account.flags.auth_revocable = false,
        }
    }
    for flag in &change.set_flags {
        match flag {
            AccountFlag::AuthRequired => account.flags.auth_required = true,
            AccountFlag::AuthRevocable => account.flags.auth_revocable = true,
        }
    }
    if let Some(weight) = change.master_weight {
        account.master_weight = weight;
    }
    if let Some(thresholds) = change.thresholds {
        account.thresholds = thresholds;
    }
    if let Some(domain) = &change.home_domain {
        account.home_domain = Some(domain.clone());
    }
    if let Some(signer) = &change.signer {
        account.set_signer(signer.key.clone(), signer.weight);
    }
    if let Some(dest) = &change.inflation_destination {
        account.inflation_destination = Some(dest.clone());
    }
    Ok(OperationOutcome::OptionsApplied)
}

/// Mint `supply / 1000` and split it by inflation-destination vote
/// weight; votes below 0.05% of the supply are excluded.
fn run_inflation(ledger: &mut LedgerState) -> Result<OperationOutcome, OperationError> {
    let supply = ledger.native_supply();
    let pool = supply.value() / 1000;
    let min_votes = supply.value() as i128 / 2000;

    let mut votes: BTreeMap<AccountId, i128> = BTreeMap::new();
    for account in ledger.accounts() {
        if let Some(dest) = &account.inflation_destination {
            *votes.entry(dest.clone()).or_default() += account.balance.value() as i128;
        }
    }
    votes.retain(|dest, v| *v > 0 && *v >= min_votes && ledger.has_account(dest));

    let total: i128 = votes.values().sum();
    if total == 0 || pool == 0 {
        return Ok(OperationOutcome::InflationDistributed {
            payout: Amount::ZERO,
            recipients: 0,
        });
    }

    let mut paid: i64 = 0;
    let mut recipients = 0;
    for (dest, weight) in votes {
        let share = (pool as i128 * weight / total) as i64;
        if share == 0 {
            continue;
        }
        ledger.credit(&dest, &Asset::Native, Amount::new_unchecked(share))?;
        paid += share;
        recipients += 1;
    }
    Ok(OperationOutcome::InflationDistributed {
        payout: Amount::new_unchecked(paid),
        recipients,
    })
}
