//! The two pipeline runs: CSV export and training-set build.

use std::path::PathBuf;

use clap::ValueEnum;
use lobsynth_book::save_history_csv;
use lobsynth_core::Error;
use lobsynth_features::{
    dataset_from_history, save_dataset, ClassDistribution, FeatureExtractor,
};
use lobsynth_sim::{MarketSimulator, SimulationSummary, SimulatorConfig};

use crate::config::{AppConfig, RunConfig};

/// Which runs to execute
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Simulate and export the snapshot history to CSV
    Csv,
    /// Simulate, extract features, label and export binary files
    Features,
    /// CSV run followed by the features run
    All,
}

impl Mode {
    fn runs_csv(self) -> bool {
        matches!(self, Mode::Csv | Mode::All)
    }

    fn runs_features(self) -> bool {
        matches!(self, Mode::Features | Mode::All)
    }
}

/// Result of the CSV run
#[derive(Debug)]
pub struct CsvOutcome {
    /// Simulation statistics
    pub summary: SimulationSummary,
    /// Where the CSV went, `None` when the save failed
    pub path: Option<PathBuf>,
}

/// Result of the features run
#[derive(Debug)]
pub struct FeatureOutcome {
    /// Simulation statistics
    pub summary: SimulationSummary,
    /// Labeled sequences built
    pub sequences: usize,
    /// Label balance, `None` when there was not enough data
    pub distribution: Option<ClassDistribution>,
    /// Whether both binary files were written
    pub saved: bool,
}

fn simulator(config: &SimulatorConfig, seed: Option<u64>) -> anyhow::Result<MarketSimulator> {
    let sim = match seed {
        Some(seed) => MarketSimulator::with_seed(config.clone(), seed)?,
        None => MarketSimulator::new(config.clone())?,
    };
    Ok(sim)
}

/// Run one timed simulation. Reversions still in flight afterwards are cancelled.
fn simulate(
    config: &AppConfig,
    run: &RunConfig,
    seed: Option<u64>,
) -> anyhow::Result<(MarketSimulator, SimulationSummary)> {
    let mut sim = simulator(&config.simulator, seed)?;
    let summary = sim.run_simulation(run.duration()?, run.updates_per_second)?;
    sim.cancel_pending_reversions();
    Ok((sim, summary))
}

/// Simulate and save the snapshot history as CSV. A failed save is logged, not returned.
pub fn run_csv(config: &AppConfig) -> anyhow::Result<CsvOutcome> {
    tracing::info!("starting orderbook simulation run");
    let (sim, summary) = simulate(config, &config.csv_run, config.seed)?;

    let path = config.output.csv_path();
    let saved = match save_history_csv(&path, sim.book().history()) {
        Ok(_) => Some(path),
        Err(e) => {
            tracing::error!(error = %e, path = %path.display(), "failed to save orderbook history");
            None
        }
    };

    Ok(CsvOutcome {
        summary,
        path: saved,
    })
}

/// Simulate, build the labeled dataset and save it.
///
/// Too little data ends the run early without writing files. A failed save
/// is logged and reported through `saved`.
pub fn run_features(config: &AppConfig) -> anyhow::Result<FeatureOutcome> {
    tracing::info!("starting feature extraction run");
    // Offset the seed so the two runs in `all` mode differ
    let seed = config.seed.map(|s| s.wrapping_add(1));
    let (sim, summary) = simulate(config, &config.feature_run, seed)?;
    let history = sim.into_book().into_history();

    let mut extractor = FeatureExtractor::new(config.features.clone());
    let dataset = match dataset_from_history(&history, &mut extractor, &config.labels) {
        Ok(dataset) => dataset,
        Err(Error::InsufficientData { available, required }) => {
            tracing::warn!(available, required, "not enough data, skipping export");
            return Ok(FeatureOutcome {
                summary,
                sequences: 0,
                distribution: None,
                saved: false,
            });
        }
        Err(e) => return Err(e.into()),
    };

    let distribution = dataset.class_distribution();
    for line in distribution.to_string().lines() {
        tracing::info!("{line}");
    }

    let saved = match save_dataset(
        &dataset,
        config.output.features_path(),
        config.output.labels_path(),
    ) {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(error = %e, "failed to save dataset");
            false
        }
    };

    Ok(FeatureOutcome {
        summary,
        sequences: dataset.len(),
        distribution: Some(distribution),
        saved,
    })
}

/// Execute the runs selected by `mode`
pub fn run(config: &AppConfig, mode: Mode) -> anyhow::Result<()> {
    if mode.runs_csv() {
        let outcome = run_csv(config)?;
        tracing::info!(summary = %outcome.summary, "csv run finished");
    }
    if mode.runs_features() {
        let outcome = run_features(config)?;
        tracing::info!(
            summary = %outcome.summary,
            sequences = outcome.sequences,
            saved = outcome.saved,
            "features run finished"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputConfig;
    use std::sync::{Arc, Mutex};

    fn quick_config(dir: &std::path::Path) -> AppConfig {
        AppConfig {
            seed: Some(11),
            csv_run: RunConfig {
                duration_secs: 0.2,
                updates_per_second: 100,
            },
            feature_run: RunConfig {
                duration_secs: 0.3,
                updates_per_second: 100,
            },
            output: OutputConfig {
                dir: dir.to_path_buf(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_csv_run_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = quick_config(dir.path());

        let outcome = run_csv(&config).unwrap();
        let path = outcome.path.unwrap();
        let text = std::fs::read_to_string(path).unwrap();

        assert!(outcome.summary.updates > 0);
        assert_eq!(text.lines().count(), outcome.summary.snapshots + 1);
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_csv_save_logged_once() {
        let dir = tempfile::tempdir().unwrap();
        let config = quick_config(dir.path());

        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let outcome = tracing::subscriber::with_default(subscriber, || run_csv(&config)).unwrap();
        assert!(outcome.path.is_some());

        let text = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        let saves = text
            .lines()
            .filter(|l| l.contains("saved snapshot history"))
            .count();
        assert_eq!(saves, 1, "{text}");
    }

    #[test]
    fn test_csv_save_failure_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = quick_config(&dir.path().join("missing"));

        let outcome = run_csv(&config).unwrap();
        assert!(outcome.path.is_none());
    }

    #[test]
    fn test_features_run_writes_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let config = quick_config(dir.path());

        let outcome = run_features(&config).unwrap();
        assert!(outcome.saved);
        assert!(outcome.sequences > 0);
        assert_eq!(
            outcome.distribution.map(|d| d.total()),
            Some(outcome.sequences)
        );

        let loaded = lobsynth_features::load_dataset(
            config.output.features_path(),
            config.output.labels_path(),
        )
        .unwrap();
        assert_eq!(loaded.len(), outcome.sequences);
    }

    #[test]
    fn test_features_run_with_too_little_data() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = quick_config(dir.path());
        config.feature_run.duration_secs = 0.0;
        config.labels.sequence_length = 100;

        let outcome = run_features(&config).unwrap();
        assert_eq!(outcome.sequences, 0);
        assert!(outcome.distribution.is_none());
        assert!(!config.output.features_path().exists());
    }

    #[test]
    fn test_mode_selection() {
        assert!(Mode::All.runs_csv() && Mode::All.runs_features());
        assert!(Mode::Csv.runs_csv() && !Mode::Csv.runs_features());
        assert!(!Mode::Features.runs_csv());
    }
}
