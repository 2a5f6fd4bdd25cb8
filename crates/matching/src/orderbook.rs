//! Order book with price-time priority
//!
//! One book holds both trade directions of a normalized asset pair.
//! Within a side, offers are keyed by (price, offer id): the cheapest
//! price comes first, and at equal price the lower (older) id wins.
//! Offer ids increase monotonically, so id order is time order.

use std::collections::{BTreeMap, HashMap};

use tradewind_core::{Amount, Asset, AssetPair, Price};

use crate::error::MatchingError;
use crate::offer::{Offer, OfferId};

/// Which side of the book an offer rests on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    /// Selling the pair's base asset
    Base,
    /// Selling the pair's counter asset
    Counter,
}

/// An order book for a single asset pair
#[derive(Debug, Clone)]
pub struct OrderBook {
    pair: AssetPair,
    /// Offers selling the pair's base asset, best price first
    base_side: BTreeMap<(Price, OfferId), Offer>,
    /// Offers selling the pair's counter asset, best price first
    counter_side: BTreeMap<(Price, OfferId), Offer>,
    /// Offer id -> its key, for O(log n) removal
    index: HashMap<OfferId, (Price, Side)>,
}

impl OrderBook {
    /// Create an empty book for a pair
    pub fn new(pair: AssetPair) -> Self {
        Self {
            pair,
            base_side: BTreeMap::new(),
            counter_side: BTreeMap::new(),
            index: HashMap::new(),
        }
    }

    /// The pair this book trades
    pub fn pair(&self) -> &AssetPair {
        &self.pair
    }

    fn side_of(&self, selling: &Asset) -> Option<Side> {
        if self.pair.base() == selling {
            Some(Side::Base)
        } else if self.pair.counter() == selling {
            Some(Side::Counter)
        } else {
            None
        }
    }

    fn side(&self, side: Side) -> &BTreeMap<(Price, OfferId), Offer> {
        match side {
            Side::Base => &self.base_side,
            Side::Counter => &self.counter_side,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut BTreeMap<(Price, OfferId), Offer> {
        match side {
            Side::Base => &mut self.base_side,
            Side::Counter => &mut self.counter_side,
        }
    }

    /// Insert a resting offer.
    pub fn insert(&mut self, offer: Offer) -> Result<(), MatchingError> {
        if offer.amount.is_zero() {
            return Err(MatchingError::InvalidOffer("amount must be positive"));
        }
        if self.pair != offer.pair() {
            return Err(MatchingError::PairMismatch);
        }
        let side = self
            .side_of(&offer.selling)
            .expect("pair checked above");
        self.index.insert(offer.id, (offer.price, side));
        self.side_mut(side).insert((offer.price, offer.id), offer);
        Ok(())
    }

    /// The best-priced offer selling `selling`, oldest id breaking ties
    pub fn best(&self, selling: &Asset) -> Option<&Offer> {
        let side = self.side_of(selling)?;
        self.side(side).values().next()
    }

    /// Look up an offer by id
    pub fn get(&self, id: OfferId) -> Option<&Offer> {
        let (price, side) = self.index.get(&id)?;
        self.side(*side).get(&(*price, id))
    }

    /// Remove an offer. No-op (returning None) if absent.
    pub fn remove(&mut self, id: OfferId) -> Option<Offer> {
        let (price, side) = self.index.remove(&id)?;
        self.side_mut(side).remove(&(price, id))
    }

    /// Reduce an offer's remaining amount after a fill, removing it
    /// once exhausted.
    pub fn apply_fill(&mut self, id: OfferId, sold: Amount) -> Result<(), MatchingError> {
        let (price, side) = *self
            .index
            .get(&id)
            .ok_or(MatchingError::OfferNotFound(id))?;
        let offer = self
            .side_mut(side)
            .get_mut(&(price, id))
            .ok_or(MatchingError::OfferNotFound(id))?;
        offer.amount = offer
            .amount
            .checked_sub(sold)
            .ok_or(MatchingError::AmountOverflow)?;
        if offer.amount.is_zero() {
            self.remove(id);
        }
        Ok(())
    }

    /// Number of resting offers
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the book is empty
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Iterate all resting offers, both sides
    pub fn offers(&self) -> impl Iterator<Item = &Offer> {
        self.base_side.values().chain(self.counter_side.values())
    }

    /// Total remaining amount offered for sale in `selling`
    pub fn depth(&self, selling: &Asset) -> Amount {
        let Some(side) = self.side_of(selling) else {
            return Amount::ZERO;
        };
        self.side(side)
            .values()
            .fold(Amount::ZERO, |acc, o| {
                acc.checked_add(o.amount).unwrap_or(Amount::MAX)
            })
    }
}
