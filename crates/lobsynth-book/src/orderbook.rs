//! Price-level order book with snapshot-per-mutation history.

use std::collections::BTreeMap;

use lobsynth_core::constants::SNAPSHOT_LEVELS;
use lobsynth_core::traits::OrderBook as OrderBookTrait;
use lobsynth_core::types::{PriceLevel, Side, Timestamp};
use ordered_float::OrderedFloat;

use crate::snapshot::BookSnapshot;

type BookSide = BTreeMap<OrderedFloat<f64>, f64>;

/// Two-sided price-level book.
///
/// Each side maps price to resting volume. Both maps are stored in ascending
/// key order; the bid side is read back to front so that its natural order is
/// descending. Every mutating call appends exactly one [`BookSnapshot`] to the
/// history, so `history().len()` always equals the number of mutations.
#[derive(Debug, Clone)]
pub struct PriceLevelBook {
    /// Bid side (price -> volume), best bid is the last key
    bids: BookSide,
    /// Ask side (price -> volume), best ask is the first key
    asks: BookSide,
    /// Levels per side captured in each snapshot
    snapshot_depth: usize,
    /// Timestamp of the most recent snapshot, snapshots never go back in time
    last_timestamp: Timestamp,
    /// Append-only snapshot log
    history: Vec<BookSnapshot>,
}

impl Default for PriceLevelBook {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceLevelBook {
    /// Create an empty book capturing `SNAPSHOT_LEVELS` levels per side
    #[must_use]
    pub fn new() -> Self {
        Self::with_snapshot_depth(SNAPSHOT_LEVELS)
    }

    /// Create an empty book capturing `depth` levels per side in each snapshot
    #[must_use]
    pub fn with_snapshot_depth(depth: usize) -> Self {
        Self {
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            snapshot_depth: depth,
            last_timestamp: Timestamp::EPOCH,
            history: Vec::new(),
        }
    }

    /// Upsert a bid level, or remove it when `volume <= 0`
    pub fn update_bid(&mut self, price: f64, volume: f64) {
        self.update(Side::Bid, price, volume);
    }

    /// Upsert an ask level, or remove it when `volume <= 0`
    pub fn update_ask(&mut self, price: f64, volume: f64) {
        self.update(Side::Ask, price, volume);
    }

    /// Upsert a level on `side`, or remove it when `volume <= 0`
    pub fn update(&mut self, side: Side, price: f64, volume: f64) {
        let book_side = self.side_mut(side);
        if volume > 0.0 {
            book_side.insert(OrderedFloat(price), volume);
        } else {
            book_side.remove(&OrderedFloat(price));
        }
        self.record();
    }

    /// Remove a level unconditionally. Removing an absent level still records a snapshot.
    pub fn clear_level(&mut self, side: Side, price: f64) {
        self.side_mut(side).remove(&OrderedFloat(price));
        self.record();
    }

    /// Resting volume at `price`, `None` if the level is absent
    #[must_use]
    pub fn volume_at(&self, side: Side, price: f64) -> Option<f64> {
        self.side(side).get(&OrderedFloat(price)).copied()
    }

    /// Number of distinct levels on `side`
    #[must_use]
    pub fn level_count(&self, side: Side) -> usize {
        self.side(side).len()
    }

    /// Check if both sides are empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Iterate over the levels of `side`, best first
    pub fn levels(&self, side: Side) -> Box<dyn Iterator<Item = PriceLevel> + '_> {
        let to_level = |(p, v): (&OrderedFloat<f64>, &f64)| PriceLevel::new(p.into_inner(), *v);
        match side {
            Side::Bid => Box::new(self.bids.iter().rev().map(to_level)),
            Side::Ask => Box::new(self.asks.iter().map(to_level)),
        }
    }

    /// Capture the current state without recording it
    #[must_use]
    pub fn snapshot(&self) -> BookSnapshot {
        BookSnapshot::capture(self, self.next_timestamp(), self.snapshot_depth)
    }

    /// Full ordered history of snapshots, one per mutation
    #[must_use]
    pub fn history(&self) -> &[BookSnapshot] {
        &self.history
    }

    /// Consume the book, keeping only its history
    #[must_use]
    pub fn into_history(self) -> Vec<BookSnapshot> {
        self.history
    }

    /// Levels per side captured in each snapshot
    #[must_use]
    pub const fn snapshot_depth(&self) -> usize {
        self.snapshot_depth
    }

    fn record(&mut self) {
        let snapshot = self.snapshot();
        self.last_timestamp = snapshot.timestamp;
        self.history.push(snapshot);
    }

    fn next_timestamp(&self) -> Timestamp {
        Timestamp::now().max(self.last_timestamp)
    }

    fn side(&self, side: Side) -> &BookSide {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut BookSide {
        match side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
        }
    }
}

impl OrderBookTrait for PriceLevelBook {
    fn best_bid(&self) -> PriceLevel {
        self.bids
            .iter()
            .next_back()
            .map_or(PriceLevel::EMPTY, |(p, v)| PriceLevel::new(p.into_inner(), *v))
    }

    fn best_ask(&self) -> PriceLevel {
        self.asks
            .iter()
            .next()
            .map_or(PriceLevel::EMPTY, |(p, v)| PriceLevel::new(p.into_inner(), *v))
    }

    fn top_levels(&self, side: Side, depth: usize) -> Vec<PriceLevel> {
        self.levels(side).take(depth).collect()
    }
}
