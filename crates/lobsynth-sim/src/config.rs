//! Simulator configuration.

use std::time::Duration;

use lobsynth_core::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Parameters of the stochastic price process and event overlay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Starting reference price
    pub initial_price: f64,
    /// Price increment between adjacent levels
    pub tick_size: f64,
    /// Levels seeded on each side
    pub levels: usize,
    /// Standard deviation of the per-second diffusion term
    pub volatility: f64,
    /// Drift applied on an up step
    pub drift_up: f64,
    /// Drift magnitude subtracted on a down step
    pub drift_down: f64,
    /// Probability of an up step
    pub drift_up_probability: f64,
    /// Probability that a simulation tick also fires a random event
    pub event_probability: f64,
    /// Delay before a spoofed level is restored, in milliseconds
    pub spoof_delay_ms: u64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            initial_price: 100.0,
            tick_size: 0.01,
            levels: 10,
            volatility: 0.001,
            drift_up: 0.001,
            drift_down: 0.005,
            drift_up_probability: 0.5,
            event_probability: 0.2,
            spoof_delay_ms: 50,
        }
    }
}

impl SimulatorConfig {
    /// Coarser ticks and higher volatility, used for training-data runs
    #[must_use]
    pub fn training() -> Self {
        Self {
            tick_size: 0.05,
            volatility: 0.2,
            ..Default::default()
        }
    }

    /// Build a config from the four core process parameters
    #[must_use]
    pub fn new(initial_price: f64, tick_size: f64, levels: usize, volatility: f64) -> Self {
        Self {
            initial_price,
            tick_size,
            levels,
            volatility,
            ..Default::default()
        }
    }

    /// Spoof reversion delay
    #[must_use]
    pub fn spoof_delay(&self) -> Duration {
        Duration::from_millis(self.spoof_delay_ms)
    }

    /// Reject parameter combinations the simulator cannot run with
    pub fn validate(&self) -> Result<()> {
        if !(self.tick_size.is_finite() && self.tick_size > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "tick_size must be positive, got {}",
                self.tick_size
            )));
        }
        if !(self.initial_price.is_finite() && self.initial_price > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "initial_price must be positive, got {}",
                self.initial_price
            )));
        }
        if self.levels == 0 {
            return Err(Error::InvalidConfig("levels must be at least 1".to_string()));
        }
        if !(self.volatility.is_finite() && self.volatility >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "volatility must be non-negative, got {}",
                self.volatility
            )));
        }
        for (name, p) in [
            ("drift_up_probability", self.drift_up_probability),
            ("event_probability", self.event_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(Error::InvalidConfig(format!("{name} must be in [0, 1], got {p}")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let default = SimulatorConfig::default();
        assert_eq!(default.initial_price, 100.0);
        assert_eq!(default.tick_size, 0.01);
        assert_eq!(default.levels, 10);
        assert_eq!(default.volatility, 0.001);

        let training = SimulatorConfig::training();
        assert_eq!(training.tick_size, 0.05);
        assert_eq!(training.volatility, 0.2);
        assert_eq!(training.spoof_delay(), Duration::from_millis(50));
    }

    #[test]
    fn test_validate() {
        assert!(SimulatorConfig::default().validate().is_ok());
        assert!(SimulatorConfig::new(100.0, 0.0, 10, 0.1).validate().is_err());
        assert!(SimulatorConfig::new(100.0, 0.01, 0, 0.1).validate().is_err());
        assert!(SimulatorConfig::new(100.0, 0.01, 5, -1.0).validate().is_err());

        let config = SimulatorConfig {
            event_probability: 1.5,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }
}
