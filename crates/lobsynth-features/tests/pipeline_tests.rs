//! End-to-end tests: simulator -> features -> labels -> binary files.

use std::time::Duration;

use lobsynth_book::{BookSnapshot, PriceLevelBook};
use lobsynth_core::constants::FEATURE_WIDTH;
use lobsynth_core::traits::OrderBook;
use lobsynth_core::Error;
use lobsynth_features::dataset_io::{read_features, read_labels};
use lobsynth_features::{
    dataset_from_history, load_dataset, mid_prices, prepare_labeled_data, save_dataset,
    FeatureConfig, FeatureExtractor, Label, LabelConfig,
};
use lobsynth_sim::{EventKind, MarketSimulator, SimulatorConfig};

fn simulated_history(seed: u64, updates: usize) -> Vec<BookSnapshot> {
    let mut sim = MarketSimulator::with_seed(SimulatorConfig::training(), seed).unwrap();
    for i in 0..updates {
        sim.generate_update_with_elapsed(0.01);
        if i % 5 == 0 {
            sim.simulate_random_event().unwrap();
        }
    }
    sim.cancel_pending_reversions();
    sim.into_book().into_history()
}

#[test]
fn test_features_align_with_history() {
    let history = simulated_history(1, 30);
    let mut extractor = FeatureExtractor::new(FeatureConfig::default());
    let features = extractor.extract_features(&history);

    assert_eq!(features.len(), history.len());
    assert!(features
        .iter()
        .flat_map(|f| f.to_array())
        .all(f64::is_finite));
}

#[test]
fn test_full_pipeline_round_trip() {
    let history = simulated_history(2, 50);
    let mut extractor = FeatureExtractor::default();
    let config = LabelConfig::new(10, 0.000_001);

    let dataset = dataset_from_history(&history, &mut extractor, &config).unwrap();
    let max_windows = history.len() - 10 - 5;
    assert!(!dataset.is_empty());
    assert!(dataset.len() <= max_windows);
    assert_eq!(dataset.width(), 10 * FEATURE_WIDTH);

    let dist = dataset.class_distribution();
    assert_eq!(dist.total(), dataset.len());

    let dir = tempfile::tempdir().unwrap();
    let features_path = dir.path().join("features.bin");
    let labels_path = dir.path().join("labels.bin");
    save_dataset(&dataset, &features_path, &labels_path).unwrap();

    let features_bytes = std::fs::read(&features_path).unwrap();
    assert_eq!(
        features_bytes.len(),
        16 + dataset.len() * dataset.width() * 8
    );
    let (sequences, width) = read_features(&features_bytes).unwrap();
    assert_eq!(width, 10 * FEATURE_WIDTH);
    assert_eq!(sequences.len(), dataset.len());

    let labels = read_labels(&std::fs::read(&labels_path).unwrap()).unwrap();
    assert_eq!(labels, dataset.labels().collect::<Vec<_>>());

    let loaded = load_dataset(&features_path, &labels_path).unwrap();
    assert_eq!(loaded, dataset);
}

#[test]
fn test_two_sided_book_scenario() {
    let mut book = PriceLevelBook::new();
    book.update_bid(100.0, 5.0);
    book.update_ask(101.0, 5.0);

    assert_eq!(book.mid_price(), 100.5);
    assert_eq!(book.spread(), 1.0);

    let snapshot = book.history().last().unwrap().clone();
    let record = FeatureExtractor::default().extract_feature(&snapshot);
    assert_eq!(record.size_imbalance, 0.0);
    assert_eq!(record.vwmp, 100.5);
}

#[test]
fn test_labels_from_history_thresholds() {
    let mids: Vec<f64> = vec![100.0, 100.0, 100.0, 100.0, 100.0, 100.1, 100.03];
    let labels = lobsynth_features::compute_labels(&mids, 5, 0.0005);

    assert_eq!(labels[0], Some(Label::Up));
    assert_eq!(labels[1], Some(Label::NoChange));
    assert_eq!(labels[2], None);
}

#[test]
fn test_short_history_is_insufficient() {
    let mut book = PriceLevelBook::new();
    for i in 0..15 {
        book.update_bid(100.0 - f64::from(i) * 0.01, 1.0);
    }
    let history = book.history();
    assert_eq!(history.len(), 15);

    let features = FeatureExtractor::default().extract_features(history);
    let err = prepare_labeled_data(&features, &mid_prices(history), &LabelConfig::default())
        .unwrap_err();
    assert!(matches!(err, Error::InsufficientData { available: 15, required: 15 }));
}

#[test]
fn test_spoof_reverted_before_next_update() {
    let config = SimulatorConfig {
        spoof_delay_ms: 10,
        ..SimulatorConfig::training()
    };
    let mut sim = MarketSimulator::with_seed(config, 3).unwrap();
    sim.apply_event(EventKind::Spoof).unwrap();
    let spoofed_history = sim.book().history().len();

    std::thread::sleep(Duration::from_millis(100));
    // The update drains the inbox first: one reversion snapshot, then 2N re-seed snapshots
    sim.generate_update_with_elapsed(0.01);

    assert_eq!(sim.book().history().len(), spoofed_history + 1 + 20);
}

#[test]
fn test_short_real_time_run_feeds_pipeline() {
    let mut sim = MarketSimulator::with_seed(SimulatorConfig::training(), 4).unwrap();
    let summary = sim.run_simulation(Duration::from_millis(300), 100).unwrap();
    assert!(summary.updates > 0);

    let history = sim.into_book().into_history();
    assert_eq!(history.len(), summary.snapshots);
    for pair in history.windows(2) {
        assert!(pair[0].timestamp <= pair[1].timestamp);
    }

    let dataset =
        dataset_from_history(&history, &mut FeatureExtractor::default(), &LabelConfig::default())
            .unwrap();
    assert!(!dataset.is_empty());
}
