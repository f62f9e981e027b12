//! Immutable point-in-time captures of the book.

use lobsynth_core::traits::OrderBook;
use lobsynth_core::types::{PriceLevel, Side, Timestamp};
use serde::{Deserialize, Serialize};

/// Book state captured right after one mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSnapshot {
    /// Capture time, non-decreasing across a session
    pub timestamp: Timestamp,
    /// Mid price, 0 when either side is empty
    pub mid_price: f64,
    /// Spread, 0 when either side is empty
    pub spread: f64,
    /// Best bid, `(0, 0)` when there are no bids
    pub best_bid: PriceLevel,
    /// Best ask, `(0, 0)` when there are no asks
    pub best_ask: PriceLevel,
    /// Up to N bid levels, descending by price
    pub bid_levels: Vec<PriceLevel>,
    /// Up to N ask levels, ascending by price
    pub ask_levels: Vec<PriceLevel>,
}

impl BookSnapshot {
    /// Capture `book` at `timestamp`, keeping up to `depth` levels per side
    #[must_use]
    pub fn capture<B: OrderBook + ?Sized>(book: &B, timestamp: Timestamp, depth: usize) -> Self {
        Self {
            timestamp,
            mid_price: book.mid_price(),
            spread: book.spread(),
            best_bid: book.best_bid(),
            best_ask: book.best_ask(),
            bid_levels: book.top_levels(Side::Bid, depth),
            ask_levels: book.top_levels(Side::Ask, depth),
        }
    }

    /// Level `index` of `side` (0 = best), zero-filled past the captured depth
    #[must_use]
    pub fn level(&self, side: Side, index: usize) -> PriceLevel {
        let levels = match side {
            Side::Bid => &self.bid_levels,
            Side::Ask => &self.ask_levels,
        };
        levels.get(index).copied().unwrap_or(PriceLevel::EMPTY)
    }

    /// Capture time in fractional seconds
    #[must_use]
    pub fn timestamp_secs(&self) -> f64 {
        self.timestamp.as_secs_f64()
    }
}

impl OrderBook for BookSnapshot {
    fn best_bid(&self) -> PriceLevel {
        self.best_bid
    }

    fn best_ask(&self) -> PriceLevel {
        self.best_ask
    }

    fn top_levels(&self, side: Side, depth: usize) -> Vec<PriceLevel> {
        let levels = match side {
            Side::Bid => &self.bid_levels,
            Side::Ask => &self.ask_levels,
        };
        levels.iter().take(depth).copied().collect()
    }

    fn mid_price(&self) -> f64 {
        self.mid_price
    }

    fn spread(&self) -> f64 {
        self.spread
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orderbook::PriceLevelBook;

    fn create_test_book() -> PriceLevelBook {
        let mut book = PriceLevelBook::new();
        for i in 0..7 {
            let offset = f64::from(i) * 0.5;
            book.update_bid(100.0 - offset, 10.0 + offset);
            book.update_ask(101.0 + offset, 10.0 + offset);
        }
        book
    }

    #[test]
    fn test_snapshot_caps_depth() {
        let book = create_test_book();
        let snapshot = book.snapshot();

        assert_eq!(snapshot.bid_levels.len(), 5);
        assert_eq!(snapshot.ask_levels.len(), 5);
        assert_eq!(snapshot.bid_levels[0].price, 100.0);
        assert_eq!(snapshot.bid_levels[4].price, 98.0);
        assert_eq!(snapshot.ask_levels[4].price, 103.0);
    }

    #[test]
    fn test_snapshot_matches_book_queries() {
        let book = create_test_book();
        let snapshot = book.snapshot();

        assert_eq!(snapshot.mid_price, book.mid_price());
        assert_eq!(snapshot.spread, book.spread());
        assert_eq!(snapshot.best_bid, book.best_bid());
        assert_eq!(snapshot.best_ask, book.best_ask());
    }

    #[test]
    fn test_snapshot_is_pure() {
        let book = create_test_book();
        let a = book.snapshot();
        let b = book.snapshot();

        assert_eq!(a.bid_levels, b.bid_levels);
        assert_eq!(a.ask_levels, b.ask_levels);
        assert_eq!(a.mid_price, b.mid_price);
        assert_eq!(book.history().len(), 14);
    }

    #[test]
    fn test_level_zero_fill() {
        let mut book = PriceLevelBook::new();
        book.update_bid(100.0, 5.0);
        let snapshot = book.snapshot();

        assert_eq!(snapshot.level(Side::Bid, 0).as_tuple(), (100.0, 5.0));
        assert_eq!(snapshot.level(Side::Bid, 3), PriceLevel::EMPTY);
        assert_eq!(snapshot.level(Side::Ask, 0), PriceLevel::EMPTY);
    }

    #[test]
    fn test_snapshot_as_order_book() {
        let book = create_test_book();
        let snapshot = book.snapshot();

        let top: Vec<f64> = snapshot.top_levels(Side::Ask, 2).iter().map(|l| l.price).collect();
        assert_eq!(top, vec![101.0, 101.5]);
        assert!(snapshot.is_two_sided());
    }
}
