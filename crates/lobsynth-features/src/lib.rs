//! # lobsynth-features
//!
//! Turns a book snapshot history into a labeled training set.
//!
//! This crate provides:
//! - `FeatureExtractor`: 32-field `FeatureRecord` per snapshot, with rolling
//!   volatility, momentum and trend windows
//! - Look-ahead labeling and sequence windowing into a `LabeledDataset`
//! - Native-endian binary export and import of datasets
//!
//! ## Example
//!
//! ```rust
//! use lobsynth_book::PriceLevelBook;
//! use lobsynth_features::{FeatureExtractor, FeatureConfig};
//!
//! let mut book = PriceLevelBook::new();
//! book.update_bid(100.0, 5.0);
//! book.update_ask(101.0, 5.0);
//!
//! let mut extractor = FeatureExtractor::new(FeatureConfig::default());
//! let records = extractor.extract_features(book.history());
//! assert_eq!(records[1].vwmp, 100.5);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_precision_loss,
    clippy::missing_errors_doc,
    clippy::float_cmp
)]

pub mod dataset_io;
pub mod features;
pub mod labeling;

pub use dataset_io::{load_dataset, save_dataset};
pub use features::{FeatureConfig, FeatureExtractor, FeatureRecord};
pub use labeling::{
    compute_labels, dataset_from_history, mid_prices, prepare_labeled_data, ClassDistribution,
    Label, LabelConfig, LabeledDataset, TrainingExample,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::dataset_io::{load_dataset, save_dataset};
    pub use crate::features::{FeatureConfig, FeatureExtractor, FeatureRecord};
    pub use crate::labeling::{
        dataset_from_history, prepare_labeled_data, Label, LabelConfig, LabeledDataset,
    };
}
