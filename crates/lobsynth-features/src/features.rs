//! Rolling per-snapshot feature extraction.

use std::collections::VecDeque;

use lobsynth_book::BookSnapshot;
use lobsynth_core::constants::{
    DEFAULT_FEATURE_WINDOW, DEFAULT_VOLUME_NORMALIZATION, FEATURE_LEVELS, FEATURE_WIDTH,
    MOMENTUM_MIN_PRICES,
};
use lobsynth_core::types::Side;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Feature extractor parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Length of the price, price-change and spread windows
    pub window: usize,
    /// Divisor applied to level sizes
    pub volume_normalization: f64,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_FEATURE_WINDOW,
            volume_normalization: DEFAULT_VOLUME_NORMALIZATION,
        }
    }
}

/// Fixed-width feature vector for one snapshot
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureRecord {
    /// Relative change of mid vs the previous retained mid
    pub price_change: f64,
    /// Absolute spread
    pub spread: f64,
    /// Spread as a fraction of mid
    pub spread_pct: f64,
    /// Best-level size imbalance in [-1, 1]
    pub size_imbalance: f64,
    /// Volume-weighted mid price
    pub vwmp: f64,
    /// Relative distance of VWMP from mid
    pub vwmp_diff: f64,
    /// Distance of each bid level below mid, as a fraction of mid
    pub bid_distances: [f64; FEATURE_LEVELS],
    /// Distance of each ask level above mid, as a fraction of mid
    pub ask_distances: [f64; FEATURE_LEVELS],
    /// Normalized bid sizes
    pub bid_sizes_norm: [f64; FEATURE_LEVELS],
    /// Normalized ask sizes
    pub ask_sizes_norm: [f64; FEATURE_LEVELS],
    /// Population std-dev of windowed price changes
    pub volatility: f64,
    /// One-step momentum
    pub price_mom_1: f64,
    /// Five-step momentum
    pub price_mom_5: f64,
    /// Ten-step momentum
    pub price_mom_10: f64,
    /// Mean of windowed price changes
    pub price_trend: f64,
    /// Mean first difference of windowed spreads
    pub spread_trend: f64,
}

impl FeatureRecord {
    /// Flatten in the fixed training order
    #[must_use]
    pub fn to_array(&self) -> [f64; FEATURE_WIDTH] {
        let mut out = [0.0; FEATURE_WIDTH];
        let head = [
            self.price_change,
            self.spread,
            self.spread_pct,
            self.size_imbalance,
            self.vwmp,
            self.vwmp_diff,
        ];
        let tail = [
            self.volatility,
            self.price_mom_1,
            self.price_mom_5,
            self.price_mom_10,
            self.price_trend,
            self.spread_trend,
        ];

        let chunks: [&[f64]; 6] = [
            &head,
            &self.bid_distances,
            &self.ask_distances,
            &self.bid_sizes_norm,
            &self.ask_sizes_norm,
            &tail,
        ];
        let mut offset = 0;
        for chunk in chunks {
            out[offset..offset + chunk.len()].copy_from_slice(chunk);
            offset += chunk.len();
        }
        out
    }

    /// Flatten into a new vector
    #[must_use]
    pub fn to_vec(&self) -> Vec<f64> {
        self.to_array().to_vec()
    }

    /// Append the flattened record to `out`
    pub fn extend_into(&self, out: &mut Vec<f64>) {
        out.extend_from_slice(&self.to_array());
    }
}

/// Push onto a bounded FIFO, evicting the oldest entry at capacity
fn push_bounded(window: &mut VecDeque<f64>, value: f64, capacity: usize) {
    if window.len() >= capacity {
        window.pop_front();
    }
    window.push_back(value);
}

/// `(a - b) / b`, or 0 when `b` is 0
fn relative_change(a: f64, b: f64) -> f64 {
    if b == 0.0 {
        0.0
    } else {
        (a - b) / b
    }
}

/// Stateful extractor carrying the rolling windows between snapshots
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    config: FeatureConfig,
    prices: VecDeque<f64>,
    price_changes: VecDeque<f64>,
    spreads: VecDeque<f64>,
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(FeatureConfig::default())
    }
}

impl FeatureExtractor {
    /// Create an extractor. A zero window is treated as one.
    #[must_use]
    pub fn new(config: FeatureConfig) -> Self {
        let config = FeatureConfig {
            window: config.window.max(1),
            ..config
        };
        Self {
            prices: VecDeque::with_capacity(config.window),
            price_changes: VecDeque::with_capacity(config.window),
            spreads: VecDeque::with_capacity(config.window),
            config,
        }
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// Clear all rolling windows
    pub fn reset(&mut self) {
        self.prices.clear();
        self.price_changes.clear();
        self.spreads.clear();
    }

    /// Extract features for every snapshot, starting from empty windows
    pub fn extract_features(&mut self, snapshots: &[BookSnapshot]) -> Vec<FeatureRecord> {
        self.reset();
        let records: Vec<FeatureRecord> = snapshots.iter().map(|s| self.extract_feature(s)).collect();
        tracing::debug!(records = records.len(), "extracted features");
        records
    }

    /// Extract one record and advance the rolling windows
    pub fn extract_feature(&mut self, snapshot: &BookSnapshot) -> FeatureRecord {
        let window = self.config.window;
        let mid = snapshot.mid_price;
        let mut record = FeatureRecord::default();

        push_bounded(&mut self.prices, mid, window);

        record.spread = snapshot.spread;
        record.spread_pct = if mid == 0.0 { 0.0 } else { snapshot.spread / mid };

        record.price_change = if self.prices.len() < 2 {
            0.0
        } else {
            relative_change(mid, self.prices[self.prices.len() - 2])
        };
        push_bounded(&mut self.price_changes, record.price_change, window);

        let bid = snapshot.best_bid;
        let ask = snapshot.best_ask;
        let total_size = bid.volume + ask.volume;
        if total_size == 0.0 {
            record.size_imbalance = 0.0;
            record.vwmp = mid;
        } else {
            record.size_imbalance = (bid.volume - ask.volume) / total_size;
            record.vwmp = (bid.price * ask.volume + ask.price * bid.volume) / total_size;
        }
        record.vwmp_diff = relative_change(record.vwmp, mid);

        let norm = self.config.volume_normalization;
        for i in 0..FEATURE_LEVELS {
            let level = snapshot.level(Side::Bid, i);
            if level.is_present() {
                record.bid_sizes_norm[i] = level.volume / norm;
                if mid != 0.0 {
                    record.bid_distances[i] = (mid - level.price) / mid;
                }
            }
            let level = snapshot.level(Side::Ask, i);
            if level.is_present() {
                record.ask_sizes_norm[i] = level.volume / norm;
                if mid != 0.0 {
                    record.ask_distances[i] = (level.price - mid) / mid;
                }
            }
        }

        push_bounded(&mut self.spreads, snapshot.spread, window);

        if self.prices.len() >= window {
            self.fill_rolling_stats(&mut record);
        }

        record
    }

    fn fill_rolling_stats(&self, record: &mut FeatureRecord) {
        record.volatility = self.price_changes.iter().population_std_dev();
        record.price_trend = self.price_changes.iter().mean();

        let n = self.prices.len();
        if n >= MOMENTUM_MIN_PRICES {
            let last = self.prices[n - 1];
            record.price_mom_1 = relative_change(last, self.prices[n - 2]);
            record.price_mom_5 = relative_change(last, self.prices[n - 6]);
            record.price_mom_10 = relative_change(last, self.prices[n - 11]);
        }

        if self.spreads.len() >= 2 {
            let diffs: Vec<f64> = self
                .spreads
                .iter()
                .zip(self.spreads.iter().skip(1))
                .map(|(prev, next)| next - prev)
                .collect();
            record.spread_trend = diffs.mean();
        }
    }
}
