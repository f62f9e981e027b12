//! Constants used throughout the lobsynth pipeline.

/// Number of price levels per side captured in every book snapshot
pub const SNAPSHOT_LEVELS: usize = 5;

/// Number of price levels per side encoded into a feature record
pub const FEATURE_LEVELS: usize = 5;

/// Width of one flattened feature record:
/// 6 instantaneous fields, 4 x `FEATURE_LEVELS` level fields, 6 rolling statistics
pub const FEATURE_WIDTH: usize = 6 + 4 * FEATURE_LEVELS + 6;

/// Default rolling window length (prices, price changes, spreads)
pub const DEFAULT_FEATURE_WINDOW: usize = 10;

/// Default divisor applied to level sizes in feature records
pub const DEFAULT_VOLUME_NORMALIZATION: f64 = 100.0;

/// Retained prices required before 1/5/10-step momentum is reported
pub const MOMENTUM_MIN_PRICES: usize = 11;

/// Default number of feature records per training sequence
pub const DEFAULT_SEQUENCE_LENGTH: usize = 10;

/// Default look-ahead horizon, in snapshots
pub const DEFAULT_HORIZON: usize = 5;

/// Default absolute return threshold separating Up/Down from NoChange
pub const DEFAULT_LABEL_THRESHOLD: f64 = 0.0005;

/// Nanoseconds per second
pub const NS_PER_SEC: u64 = 1_000_000_000;
