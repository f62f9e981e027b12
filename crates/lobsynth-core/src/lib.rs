//! # lobsynth-core
//!
//! Core types, constants and errors shared by the lobsynth crates.
//!
//! This crate provides:
//! - Domain types: `Side`, `Timestamp`, `PriceLevel`
//! - The read-only `OrderBook` query trait
//! - The workspace-wide `Error` / `Result` pair
//!
//! ## Example
//!
//! ```rust
//! use lobsynth_core::types::{PriceLevel, Side, Timestamp};
//!
//! let level = PriceLevel::new(100.25, 12.0);
//! let side = Side::Bid;
//! let ts = Timestamp::now();
//! assert!(level.is_present());
//! assert_eq!(side.opposite(), Side::Ask);
//! assert!(ts.as_secs_f64() > 0.0);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::float_cmp)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

pub use constants::*;
pub use error::{Error, Result};
pub use traits::*;
pub use types::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::constants::*;
    pub use crate::error::{Error, Result};
    pub use crate::traits::*;
    pub use crate::types::*;
}
