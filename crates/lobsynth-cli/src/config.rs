//! Application configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use lobsynth_features::{FeatureConfig, LabelConfig};
use lobsynth_sim::SimulatorConfig;
use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Seed for reproducible runs; entropy when absent
    pub seed: Option<u64>,
    /// Price process and event overlay
    pub simulator: SimulatorConfig,
    /// Rolling feature windows
    pub features: FeatureConfig,
    /// Sequence windowing and labels
    pub labels: LabelConfig,
    /// Simulation exported to CSV
    pub csv_run: RunConfig,
    /// Simulation turned into a training set
    pub feature_run: RunConfig,
    /// Output locations
    pub output: OutputConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            seed: None,
            simulator: SimulatorConfig::training(),
            features: FeatureConfig::default(),
            labels: LabelConfig::new(10, 0.000_001),
            csv_run: RunConfig {
                duration_secs: 10.0,
                updates_per_second: 100,
            },
            feature_run: RunConfig {
                duration_secs: 30.0,
                updates_per_second: 100,
            },
            output: OutputConfig::default(),
        }
    }
}

/// Timing of one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Wall-clock duration in seconds
    pub duration_secs: f64,
    /// Target update cadence
    pub updates_per_second: u32,
}

impl RunConfig {
    /// Duration as a `Duration`, rejecting negative or non-finite values
    pub fn duration(&self) -> anyhow::Result<Duration> {
        Duration::try_from_secs_f64(self.duration_secs)
            .with_context(|| format!("invalid run duration {}s", self.duration_secs))
    }
}

/// Output file locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory all outputs are written into
    pub dir: PathBuf,
    /// Snapshot history CSV
    pub csv_file: String,
    /// Binary feature sequences
    pub features_file: String,
    /// Binary labels
    pub labels_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            csv_file: "orderbook_simulation.csv".to_string(),
            features_file: "features.bin".to_string(),
            labels_file: "labels.bin".to_string(),
        }
    }
}

impl OutputConfig {
    /// Full CSV path
    #[must_use]
    pub fn csv_path(&self) -> PathBuf {
        self.dir.join(&self.csv_file)
    }

    /// Full features path
    #[must_use]
    pub fn features_path(&self) -> PathBuf {
        self.dir.join(&self.features_file)
    }

    /// Full labels path
    #[must_use]
    pub fn labels_path(&self) -> PathBuf {
        self.dir.join(&self.labels_file)
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: AppConfig =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        config.simulator.validate()?;
        Ok(config)
    }

    /// Load from `path` when it exists, otherwise fall back to defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            tracing::warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_runs() {
        let config = AppConfig::default();
        assert_eq!(config.simulator, SimulatorConfig::training());
        assert_eq!(config.csv_run.duration_secs, 10.0);
        assert_eq!(config.feature_run.duration_secs, 30.0);
        assert_eq!(config.labels.sequence_length, 10);
        assert_eq!(config.labels.horizon, 5);
        assert_eq!(config.output.csv_path(), PathBuf::from("./orderbook_simulation.csv"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lobsynth.toml");

        let mut config = AppConfig::default();
        config.seed = Some(7);
        config.simulator.volatility = 0.05;
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "seed = 3\n\n[simulator]\nlevels = 4\n").unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.simulator.levels, 4);
        // Fields missing from the table come from SimulatorConfig::default
        assert_eq!(config.simulator.tick_size, 0.01);
        assert_eq!(config.feature_run.updates_per_second, 100);
    }

    #[test]
    fn test_invalid_simulator_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[simulator]\ntick_size = 0.0\n").unwrap();

        assert!(AppConfig::load(&path).is_err());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_run_duration() {
        let run = RunConfig {
            duration_secs: 0.25,
            updates_per_second: 10,
        };
        assert_eq!(run.duration().unwrap(), Duration::from_millis(250));

        let bad = RunConfig {
            duration_secs: -1.0,
            updates_per_second: 10,
        };
        assert!(bad.duration().is_err());
    }
}
