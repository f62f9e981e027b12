//! # lobsynth-book
//!
//! Two-sided price-level book with an append-only snapshot history.
//!
//! This crate provides:
//! - `PriceLevelBook`: bids descending, asks ascending, O(log n) upserts
//! - `BookSnapshot`: immutable point-in-time capture, one per mutation
//! - CSV export of a snapshot history
//!
//! ## Example
//!
//! ```rust
//! use lobsynth_book::PriceLevelBook;
//! use lobsynth_core::traits::OrderBook;
//!
//! let mut book = PriceLevelBook::new();
//! book.update_bid(100.0, 5.0);
//! book.update_ask(101.0, 5.0);
//!
//! assert_eq!(book.mid_price(), 100.5);
//! assert_eq!(book.history().len(), 2);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_precision_loss,
    clippy::missing_errors_doc,
    clippy::float_cmp
)]

pub mod export;
pub mod orderbook;
pub mod snapshot;

pub use export::{save_history_csv, write_history_csv};
pub use orderbook::PriceLevelBook;
pub use snapshot::BookSnapshot;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::export::{save_history_csv, write_history_csv};
    pub use crate::orderbook::PriceLevelBook;
    pub use crate::snapshot::BookSnapshot;
    pub use lobsynth_core::traits::OrderBook;
}
