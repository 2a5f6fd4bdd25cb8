//! The collection of order books across all asset pairs
//!
//! Books are created on demand and indexed by normalized pair, so both
//! trade directions land in the same book. The collection is owned
//! state passed explicitly to the crossing engine - never a global.

use std::collections::BTreeMap;

use tradewind_core::{Asset, AssetPair};

use crate::error::MatchingError;
use crate::offer::{Offer, OfferId};
use crate::orderbook::OrderBook;

/// All order books, keyed by normalized asset pair
#[derive(Debug, Clone, Default)]
pub struct BookSet {
    books: BTreeMap<AssetPair, OrderBook>,
}

impl BookSet {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// The book for a pair, if it has ever held an offer
    pub fn book(&self, pair: &AssetPair) -> Option<&OrderBook> {
        self.books.get(pair)
    }

    /// The book for two assets, if any
    pub fn book_for(&self, a: &Asset, b: &Asset) -> Option<&OrderBook> {
        self.book(&AssetPair::new(a.clone(), b.clone())?)
    }

    /// The book for a pair, created if absent
    pub fn book_mut(&mut self, pair: AssetPair) -> &mut OrderBook {
        self.books
            .entry(pair.clone())
            .or_insert_with(|| OrderBook::new(pair))
    }

    /// Insert an offer into its pair's book
    pub fn insert(&mut self, offer: Offer) -> Result<(), MatchingError> {
        self.book_mut(offer.pair()).insert(offer)
    }

    /// Remove an offer trading the two given assets. None if absent.
    pub fn remove(&mut self, a: &Asset, b: &Asset, id: OfferId) -> Option<Offer> {
        let pair = AssetPair::new(a.clone(), b.clone())?;
        self.books.get_mut(&pair)?.remove(id)
    }

    /// Iterate every resting offer across all books
    pub fn offers(&self) -> impl Iterator<Item = &Offer> {
        self.books.values().flat_map(|b| b.offers())
    }

    /// Iterate one account's resting offers across all books
    pub fn offers_by<'a>(&'a self, owner: &'a str) -> impl Iterator<Item = &'a Offer> {
        self.offers().filter(move |o| o.owner == owner)
    }

    /// Total resting offer count across all books
    pub fn total_offers(&self) -> usize {
        self.books.values().map(|b| b.len()).sum()
    }
}
