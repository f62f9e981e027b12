//! Microstructure events overlaid on the random walk.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of random event, drawn uniformly by the simulator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventKind {
    /// Inflate a near bid level
    LargeBid,
    /// Inflate a near ask level
    LargeAsk,
    /// Shrink a bid level to a tenth
    CancelBid,
    /// Shrink an ask level to a tenth
    CancelAsk,
    /// Move the reference price up three ticks
    ShiftUp,
    /// Move the reference price down three ticks
    ShiftDown,
    /// Temporarily inflate a near ask level tenfold
    Spoof,
    /// Consume a run of nearest asks
    SweepUp,
    /// Consume a run of nearest bids
    SweepDown,
    /// No-op
    None,
}

impl EventKind {
    /// Number of event kinds
    pub const COUNT: usize = 10;

    /// Every kind, in draw order
    pub const ALL: [EventKind; Self::COUNT] = [
        EventKind::LargeBid,
        EventKind::LargeAsk,
        EventKind::CancelBid,
        EventKind::CancelAsk,
        EventKind::ShiftUp,
        EventKind::ShiftDown,
        EventKind::Spoof,
        EventKind::SweepUp,
        EventKind::SweepDown,
        EventKind::None,
    ];

    /// Position of this kind in [`EventKind::ALL`]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Short snake-case name for logs and config keys
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            EventKind::LargeBid => "large_bid",
            EventKind::LargeAsk => "large_ask",
            EventKind::CancelBid => "cancel_bid",
            EventKind::CancelAsk => "cancel_ask",
            EventKind::ShiftUp => "shift_up",
            EventKind::ShiftDown => "shift_down",
            EventKind::Spoof => "spoof",
            EventKind::SweepUp => "sweep_up",
            EventKind::SweepDown => "sweep_down",
            EventKind::None => "none",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An event as applied to the book
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MarketEvent {
    /// A level's size was scaled up by `multiplier`
    LargeBid {
        /// Level price
        price: f64,
        /// Size after the event
        volume: f64,
        /// Scale factor in [2, 5)
        multiplier: f64,
    },
    /// A level's size was scaled up by `multiplier`
    LargeAsk {
        /// Level price
        price: f64,
        /// Size after the event
        volume: f64,
        /// Scale factor in [2, 5)
        multiplier: f64,
    },
    /// A bid level was reduced to a tenth
    CancelBid {
        /// Level price
        price: f64,
        /// Size after the event
        volume: f64,
    },
    /// An ask level was reduced to a tenth
    CancelAsk {
        /// Level price
        price: f64,
        /// Size after the event
        volume: f64,
    },
    /// Reference price moved up
    ShiftUp {
        /// New reference price
        reference: f64,
    },
    /// Reference price moved down, floored at one tick
    ShiftDown {
        /// New reference price
        reference: f64,
    },
    /// An ask level was inflated and a reversion scheduled
    Spoof {
        /// Spoofed price
        price: f64,
        /// Size the reversion restores
        original: f64,
        /// Size while spoofed
        spoofed: f64,
    },
    /// Nearest asks were removed
    SweepUp {
        /// Levels removed
        depth: usize,
        /// New reference price
        reference: f64,
    },
    /// Nearest bids were removed
    SweepDown {
        /// Levels removed
        depth: usize,
        /// New reference price
        reference: f64,
    },
    /// The drawn kind needed a level on an empty side and did nothing
    Skipped(EventKind),
    /// Nothing happened
    None,
}

impl MarketEvent {
    /// The kind that produced this event
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            MarketEvent::LargeBid { .. } => EventKind::LargeBid,
            MarketEvent::LargeAsk { .. } => EventKind::LargeAsk,
            MarketEvent::CancelBid { .. } => EventKind::CancelBid,
            MarketEvent::CancelAsk { .. } => EventKind::CancelAsk,
            MarketEvent::ShiftUp { .. } => EventKind::ShiftUp,
            MarketEvent::ShiftDown { .. } => EventKind::ShiftDown,
            MarketEvent::Spoof { .. } => EventKind::Spoof,
            MarketEvent::SweepUp { .. } => EventKind::SweepUp,
            MarketEvent::SweepDown { .. } => EventKind::SweepDown,
            MarketEvent::Skipped(kind) => *kind,
            MarketEvent::None => EventKind::None,
        }
    }

    /// Whether the event mutated the book
    #[must_use]
    pub fn touched_book(&self) -> bool {
        !matches!(
            self,
            MarketEvent::ShiftUp { .. }
                | MarketEvent::ShiftDown { .. }
                | MarketEvent::Skipped(_)
                | MarketEvent::None
        )
    }
}

/// Occurrence count per event kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCounts {
    counts: [u64; EventKind::COUNT],
}

impl EventCounts {
    /// Increment the count for `kind`
    pub fn record(&mut self, kind: EventKind) {
        self.counts[kind.index()] += 1;
    }

    /// Count for `kind`
    #[must_use]
    pub fn get(&self, kind: EventKind) -> u64 {
        self.counts[kind.index()]
    }

    /// Sum over all kinds
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// `(kind, count)` pairs in draw order
    pub fn iter(&self) -> impl Iterator<Item = (EventKind, u64)> + '_ {
        EventKind::ALL.iter().map(move |&kind| (kind, self.get(kind)))
    }
}

impl fmt::Display for EventCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (kind, count) in self.iter() {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{kind}={count}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_matches_index() {
        for (i, kind) in EventKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn test_event_kind() {
        let event = MarketEvent::Spoof {
            price: 100.05,
            original: 4.0,
            spoofed: 40.0,
        };
        assert_eq!(event.kind(), EventKind::Spoof);
        assert!(event.touched_book());

        assert_eq!(MarketEvent::Skipped(EventKind::SweepUp).kind(), EventKind::SweepUp);
        assert!(!MarketEvent::ShiftUp { reference: 1.0 }.touched_book());
        assert!(!MarketEvent::None.touched_book());
    }

    #[test]
    fn test_counts() {
        let mut counts = EventCounts::default();
        counts.record(EventKind::Spoof);
        counts.record(EventKind::Spoof);
        counts.record(EventKind::None);

        assert_eq!(counts.get(EventKind::Spoof), 2);
        assert_eq!(counts.get(EventKind::LargeBid), 0);
        assert_eq!(counts.total(), 3);
        assert!(counts.to_string().contains("spoof=2"));
        assert!(counts.to_string().starts_with("large_bid=0"));
    }
}
