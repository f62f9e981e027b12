//! Core traits for the order-book pipeline.

use crate::types::{PriceLevel, Side};

/// Read-only view of a two-sided price-level book.
///
/// Implemented by the live book and by its immutable snapshots, so that
/// queries read the same whichever one a caller holds. Empty sides report
/// the `(0, 0)` "no quote" level and a zero mid/spread.
pub trait OrderBook {
    /// Best bid level, `PriceLevel::EMPTY` if there are no bids
    fn best_bid(&self) -> PriceLevel;

    /// Best ask level, `PriceLevel::EMPTY` if there are no asks
    fn best_ask(&self) -> PriceLevel;

    /// Up to `depth` levels of `side`, best first
    fn top_levels(&self, side: Side, depth: usize) -> Vec<PriceLevel>;

    /// Arithmetic mean of best bid and best ask, 0 if either side is empty
    fn mid_price(&self) -> f64 {
        let (bid, ask) = (self.best_bid(), self.best_ask());
        if bid.price <= 0.0 || ask.price <= 0.0 {
            return 0.0;
        }
        (bid.price + ask.price) / 2.0
    }

    /// Best ask minus best bid, 0 if either side is empty
    fn spread(&self) -> f64 {
        let (bid, ask) = (self.best_bid(), self.best_ask());
        if bid.price <= 0.0 || ask.price <= 0.0 {
            return 0.0;
        }
        ask.price - bid.price
    }

    /// Whether both sides carry a quote
    fn is_two_sided(&self) -> bool {
        !self.best_bid().is_empty_quote() && !self.best_ask().is_empty_quote()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedBook {
        bid: PriceLevel,
        ask: PriceLevel,
    }

    impl OrderBook for FixedBook {
        fn best_bid(&self) -> PriceLevel {
            self.bid
        }

        fn best_ask(&self) -> PriceLevel {
            self.ask
        }

        fn top_levels(&self, side: Side, depth: usize) -> Vec<PriceLevel> {
            let level = if side.is_bid() { self.bid } else { self.ask };
            if depth == 0 || level.is_empty_quote() {
                Vec::new()
            } else {
                vec![level]
            }
        }
    }

    #[test]
    fn test_default_mid_and_spread() {
        let book = FixedBook {
            bid: PriceLevel::new(100.0, 5.0),
            ask: PriceLevel::new(101.0, 5.0),
        };
        assert!((book.mid_price() - 100.5).abs() < 1e-12);
        assert!((book.spread() - 1.0).abs() < 1e-12);
        assert!(book.is_two_sided());
    }

    #[test]
    fn test_one_sided_book_has_zero_mid() {
        let book = FixedBook {
            bid: PriceLevel::new(100.0, 5.0),
            ask: PriceLevel::EMPTY,
        };
        assert_eq!(book.mid_price(), 0.0);
        assert_eq!(book.spread(), 0.0);
        assert!(!book.is_two_sided());
    }

    #[test]
    fn test_trait_object_safety() {
        fn _takes_order_book(_: &dyn OrderBook) {}
    }
}
