//! Book side (Bid/Ask).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Side of the book a level rests on
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum Side {
    /// Bid side, best price is the highest
    #[default]
    Bid = 0,
    /// Ask side, best price is the lowest
    Ask = 1,
}

impl Side {
    /// Check if this is the bid side
    #[inline]
    #[must_use]
    pub const fn is_bid(self) -> bool {
        matches!(self, Side::Bid)
    }

    /// Check if this is the ask side
    #[inline]
    #[must_use]
    pub const fn is_ask(self) -> bool {
        matches!(self, Side::Ask)
    }

    /// Get the opposite side
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }

    /// Lowercase label used in CSV headers and logs
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Side::Bid => "bid",
            Side::Ask => "ask",
        }
    }
}

impl fmt::Debug for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Bid => write!(f, "Bid"),
            Side::Ask => write!(f, "Ask"),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Bid => write!(f, "BID"),
            Side::Ask => write!(f, "ASK"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Bid.opposite(), Side::Ask);
        assert_eq!(Side::Ask.opposite(), Side::Bid);
    }

    #[test]
    fn test_side_predicates() {
        assert!(Side::Bid.is_bid());
        assert!(!Side::Bid.is_ask());
        assert!(Side::Ask.is_ask());
    }

    #[test]
    fn test_side_display() {
        assert_eq!(format!("{}", Side::Bid), "BID");
        assert_eq!(format!("{}", Side::Ask), "ASK");
        assert_eq!(Side::Ask.label(), "ask");
    }
}
