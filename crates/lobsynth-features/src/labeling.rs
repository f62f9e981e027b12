//! Look-ahead labels and training-sequence windowing.

use std::fmt;

use lobsynth_book::BookSnapshot;
use lobsynth_core::constants::{DEFAULT_HORIZON, DEFAULT_LABEL_THRESHOLD, DEFAULT_SEQUENCE_LENGTH};
use lobsynth_core::error::{Error, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::features::{FeatureExtractor, FeatureRecord};

/// Direction of the mid price over the look-ahead horizon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum Label {
    /// Return above the threshold
    Up = 0,
    /// Return below minus the threshold
    Down = 1,
    /// Return within the threshold band
    NoChange = 2,
}

impl Label {
    /// Wire value
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Classify a relative return against a symmetric threshold
    #[must_use]
    pub fn from_return(future_return: f64, threshold: f64) -> Self {
        if future_return > threshold {
            Label::Up
        } else if future_return < -threshold {
            Label::Down
        } else {
            Label::NoChange
        }
    }
}

impl TryFrom<i32> for Label {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            0 => Ok(Label::Up),
            1 => Ok(Label::Down),
            2 => Ok(Label::NoChange),
            other => Err(Error::MalformedData(format!("label value {other} outside 0..=2"))),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Up => write!(f, "Up"),
            Label::Down => write!(f, "Down"),
            Label::NoChange => write!(f, "No Change"),
        }
    }
}

/// Sequence and labeling parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Feature records per training sequence
    pub sequence_length: usize,
    /// Absolute return threshold for Up/Down
    pub threshold: f64,
    /// Look-ahead in snapshots
    pub horizon: usize,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            sequence_length: DEFAULT_SEQUENCE_LENGTH,
            threshold: DEFAULT_LABEL_THRESHOLD,
            horizon: DEFAULT_HORIZON,
        }
    }
}

impl LabelConfig {
    /// Config with the default horizon
    #[must_use]
    pub fn new(sequence_length: usize, threshold: f64) -> Self {
        Self {
            sequence_length,
            threshold,
            ..Default::default()
        }
    }
}

/// Label every index that has a mid price `horizon` steps ahead.
/// Indices without a future price, or with a non-positive current price, are `None`.
#[must_use]
pub fn compute_labels(mid_prices: &[f64], horizon: usize, threshold: f64) -> Vec<Option<Label>> {
    (0..mid_prices.len())
        .map(|i| {
            let current = mid_prices[i];
            let future = *mid_prices.get(i + horizon)?;
            if current <= 0.0 {
                return None;
            }
            Some(Label::from_return((future - current) / current, threshold))
        })
        .collect()
}

/// One flattened feature sequence with its label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    /// `sequence_length` records, concatenated
    pub sequence: Vec<f64>,
    /// Label of the step right after the sequence
    pub label: Label,
}

/// Per-class example counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassDistribution {
    /// Up examples
    pub up: usize,
    /// Down examples
    pub down: usize,
    /// NoChange examples
    pub no_change: usize,
}

impl ClassDistribution {
    /// Total examples
    #[must_use]
    pub fn total(&self) -> usize {
        self.up + self.down + self.no_change
    }

    /// Count for one class
    #[must_use]
    pub fn count(&self, label: Label) -> usize {
        match label {
            Label::Up => self.up,
            Label::Down => self.down,
            Label::NoChange => self.no_change,
        }
    }

    /// Share of one class in percent, 0 for an empty distribution
    #[must_use]
    pub fn percent(&self, label: Label) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            100.0 * self.count(label) as f64 / total as f64
        }
    }
}

impl fmt::Display for ClassDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Class distribution:")?;
        for label in [Label::Up, Label::Down, Label::NoChange] {
            writeln!(
                f,
                "  {:<9} = {} ({:.2}%)",
                label.to_string(),
                self.count(label),
                self.percent(label)
            )?;
        }
        Ok(())
    }
}

/// Ordered collection of training examples with a uniform sequence width
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabeledDataset {
    examples: Vec<TrainingExample>,
}

impl LabeledDataset {
    /// Build a dataset, rejecting sequences of differing width
    pub fn new(examples: Vec<TrainingExample>) -> Result<Self> {
        if let Some(first) = examples.first() {
            let width = first.sequence.len();
            if let Some(bad) = examples.iter().find(|e| e.sequence.len() != width) {
                return Err(Error::LengthMismatch {
                    what: "training sequence widths",
                    left: width,
                    right: bad.sequence.len(),
                });
            }
        }
        Ok(Self { examples })
    }

    /// Number of examples
    #[must_use]
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    /// Whether there are no examples
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Values per sequence, 0 for an empty dataset
    #[must_use]
    pub fn width(&self) -> usize {
        self.examples.first().map_or(0, |e| e.sequence.len())
    }

    /// All examples in order
    #[must_use]
    pub fn examples(&self) -> &[TrainingExample] {
        &self.examples
    }

    /// Labels in example order
    pub fn labels(&self) -> impl Iterator<Item = Label> + '_ {
        self.examples.iter().map(|e| e.label)
    }

    /// Count examples per class
    #[must_use]
    pub fn class_distribution(&self) -> ClassDistribution {
        let mut dist = ClassDistribution::default();
        for label in self.labels() {
            match label {
                Label::Up => dist.up += 1,
                Label::Down => dist.down += 1,
                Label::NoChange => dist.no_change += 1,
            }
        }
        dist
    }

    /// Sequences as an `examples x width` matrix
    pub fn to_array(&self) -> Result<Array2<f64>> {
        let flat: Vec<f64> = self
            .examples
            .iter()
            .flat_map(|e| e.sequence.iter().copied())
            .collect();
        Array2::from_shape_vec((self.len(), self.width()), flat)
            .map_err(|e| Error::MalformedData(format!("dataset shape: {e}")))
    }

    /// Labels as wire values
    #[must_use]
    pub fn label_values(&self) -> Vec<i32> {
        self.labels().map(Label::as_i32).collect()
    }
}

/// Build labeled training sequences from index-aligned features and mid prices
///
/// A window starting at `i` covers records `i..i + L` and carries the label
/// computed at `i + L`. Windows are emitted for every `i` with
/// `i + L + H < len` whose target label is defined.
pub fn prepare_labeled_data(
    features: &[FeatureRecord],
    mid_prices: &[f64],
    config: &LabelConfig,
) -> Result<LabeledDataset> {
    if features.len() != mid_prices.len() {
        return Err(Error::LengthMismatch {
            what: "features vs mid prices",
            left: features.len(),
            right: mid_prices.len(),
        });
    }
    if config.sequence_length == 0 {
        return Err(Error::InvalidConfig("sequence_length must be at least 1".to_string()));
    }

    let len = features.len();
    let required = config.sequence_length + config.horizon;
    if len <= required {
        tracing::warn!(available = len, required, "not enough data for sequence creation");
        return Err(Error::InsufficientData {
            available: len,
            required,
        });
    }

    let labels = compute_labels(mid_prices, config.horizon, config.threshold);
    let flat: Vec<[f64; lobsynth_core::constants::FEATURE_WIDTH]> =
        features.iter().map(FeatureRecord::to_array).collect();

    let examples: Vec<TrainingExample> = (0..len - required)
        .filter_map(|i| {
            let label = labels[i + config.sequence_length]?;
            let sequence = flat[i..i + config.sequence_length]
                .iter()
                .flat_map(|record| record.iter().copied())
                .collect();
            Some(TrainingExample { sequence, label })
        })
        .collect();

    let dataset = LabeledDataset { examples };
    let dist = dataset.class_distribution();
    tracing::info!(
        sequences = dataset.len(),
        up = dist.up,
        down = dist.down,
        no_change = dist.no_change,
        "created labeled sequences"
    );
    Ok(dataset)
}

/// Mid price of every snapshot, index-aligned with the history
#[must_use]
pub fn mid_prices(history: &[BookSnapshot]) -> Vec<f64> {
    history.iter().map(|s| s.mid_price).collect()
}

/// Run feature extraction and labeling over a snapshot history
pub fn dataset_from_history(
    history: &[BookSnapshot],
    extractor: &mut FeatureExtractor,
    config: &LabelConfig,
) -> Result<LabeledDataset> {
    let features = extractor.extract_features(history);
    prepare_labeled_data(&features, &mid_prices(history), config)
}
