//! Core domain types for the order-book pipeline.

mod side;
mod timestamp;

pub use side::Side;
pub use timestamp::Timestamp;

use serde::{Deserialize, Serialize};

/// A price level on one side of the book
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceLevel {
    /// Price at this level
    pub price: f64,
    /// Resting volume at this level
    pub volume: f64,
}

impl PriceLevel {
    /// The "no quote" level returned for an empty side
    pub const EMPTY: Self = Self {
        price: 0.0,
        volume: 0.0,
    };

    /// Create a new level
    #[must_use]
    pub const fn new(price: f64, volume: f64) -> Self {
        Self { price, volume }
    }

    /// Whether this level carries volume, i.e. may exist in a book.
    /// A level with volume <= 0 is removed, never stored as zero.
    #[inline]
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.volume > 0.0
    }

    /// Whether this is the (0, 0) placeholder for an empty side
    #[inline]
    #[must_use]
    pub fn is_empty_quote(&self) -> bool {
        self.price == 0.0 && self.volume == 0.0
    }

    /// As a `(price, volume)` tuple
    #[inline]
    #[must_use]
    pub const fn as_tuple(&self) -> (f64, f64) {
        (self.price, self.volume)
    }
}

impl From<(f64, f64)> for PriceLevel {
    fn from((price, volume): (f64, f64)) -> Self {
        Self::new(price, volume)
    }
}
