//! # lobsynth-cli
//!
//! Command-line driver for the lobsynth pipeline.
//!
//! This crate provides:
//! - TOML configuration aggregating simulator, feature and label settings
//! - Tracing subscriber setup (human or JSON output)
//! - The CSV export run and the training-set run

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::float_cmp
)]

pub mod config;
pub mod logging;
pub mod runner;

pub use config::AppConfig;
pub use runner::{run, Mode};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{AppConfig, OutputConfig, RunConfig};
    pub use crate::logging::init_tracing;
    pub use crate::runner::{run, run_csv, run_features, Mode};
}
