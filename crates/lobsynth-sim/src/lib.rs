//! # lobsynth-sim
//!
//! Stochastic limit-order-book simulator.
//!
//! This crate provides:
//! - `MarketSimulator`: a drifting random walk that re-seeds a ladder of
//!   levels around a reference price on every update
//! - A microstructure overlay of large orders, cancels, shifts, sweeps and
//!   spoofs, drawn uniformly per event
//! - Delayed spoof reversion on background threads, delivered to the
//!   simulator as channel messages so the book keeps a single writer
//!
//! ## Example
//!
//! ```rust
//! use lobsynth_sim::{MarketSimulator, SimulatorConfig};
//!
//! let mut sim = MarketSimulator::with_seed(SimulatorConfig::training(), 42)?;
//! sim.generate_update_with_elapsed(0.01);
//! sim.simulate_random_event()?;
//!
//! assert!(sim.book().history().len() >= 40);
//! # Ok::<(), lobsynth_core::Error>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_precision_loss,
    clippy::missing_errors_doc,
    clippy::float_cmp
)]

pub mod config;
pub mod events;
pub mod reversion;
pub mod simulator;

pub use config::SimulatorConfig;
pub use events::{EventCounts, EventKind, MarketEvent};
pub use reversion::{PendingReversion, ReversionScheduler};
pub use simulator::{MarketSimulator, SimulationSummary};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::SimulatorConfig;
    pub use crate::events::{EventCounts, EventKind, MarketEvent};
    pub use crate::simulator::{MarketSimulator, SimulationSummary};
}
