//! Random-walk book simulator with a microstructure event overlay.

use std::fmt;
use std::thread;
use std::time::{Duration, Instant};

use lobsynth_book::PriceLevelBook;
use lobsynth_core::error::{Error, Result};
use lobsynth_core::traits::OrderBook;
use lobsynth_core::types::Side;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::config::SimulatorConfig;
use crate::events::{EventCounts, EventKind, MarketEvent};
use crate::reversion::ReversionScheduler;

/// Large orders and spoofs pick among this many levels nearest the touch
const NEAR_LEVELS: usize = 4;
/// Reference move of a shift event, in ticks
const SHIFT_TICKS: f64 = 3.0;
/// Cancel events keep this fraction of the level
const CANCEL_KEEP: f64 = 0.1;
/// Size multiplier applied by a spoof
const SPOOF_MULTIPLIER: f64 = 10.0;
/// Updates between progress logs in `run_simulation`
const PROGRESS_EVERY: u64 = 100;

/// Outcome of a timed simulation run
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSummary {
    /// Price updates generated
    pub updates: u64,
    /// Random events fired
    pub events: u64,
    /// Book history length at the end of the run
    pub snapshots: usize,
    /// Per-kind event counts accumulated by the simulator
    pub event_counts: EventCounts,
    /// Wall-clock run time
    pub elapsed: Duration,
}

impl SimulationSummary {
    /// Achieved update rate
    #[must_use]
    pub fn updates_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.updates as f64 / secs
        } else {
            0.0
        }
    }
}

impl fmt::Display for SimulationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} updates, {} events, {} snapshots in {:.2}s",
            self.updates,
            self.events,
            self.snapshots,
            self.elapsed.as_secs_f64()
        )
    }
}

/// Stochastic single-instrument book simulator
///
/// The simulator is the book's only writer. Spoof reversions arrive from
/// background threads as messages and are applied by [`drain_reversions`],
/// which every mutating entry point calls first.
///
/// [`drain_reversions`]: MarketSimulator::drain_reversions
#[derive(Debug)]
pub struct MarketSimulator {
    config: SimulatorConfig,
    reference_price: f64,
    rng: StdRng,
    noise: Normal<f64>,
    last_update: Instant,
    event_counts: EventCounts,
    updates: u64,
    book: PriceLevelBook,
    reversions: ReversionScheduler,
}

impl MarketSimulator {
    /// Create a simulator seeded from OS entropy
    pub fn new(config: SimulatorConfig) -> Result<Self> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create a reproducible simulator
    pub fn with_seed(config: SimulatorConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: SimulatorConfig, rng: StdRng) -> Result<Self> {
        config.validate()?;
        let noise = Normal::new(0.0, config.volatility)
            .map_err(|e| Error::InvalidConfig(format!("volatility: {e}")))?;

        let mut sim = Self {
            reference_price: config.initial_price,
            rng,
            noise,
            last_update: Instant::now(),
            event_counts: EventCounts::default(),
            updates: 0,
            book: PriceLevelBook::new(),
            reversions: ReversionScheduler::new(),
            config,
        };
        sim.seed_levels();

        tracing::debug!(
            price = sim.reference_price,
            tick = sim.config.tick_size,
            levels = sim.config.levels,
            "simulator initialized"
        );
        Ok(sim)
    }

    /// Overwrite `levels` bids and asks around the reference price.
    /// Stale levels from earlier prices are left in place.
    fn seed_levels(&mut self) {
        let tick = self.config.tick_size;
        for i in 1..=self.config.levels {
            let offset = i as f64 * tick;
            let bid_size = self.level_size(i);
            let ask_size = self.level_size(i);
            self.book.update_bid(self.reference_price - offset, bid_size);
            self.book.update_ask(self.reference_price + offset, ask_size);
        }
    }

    /// Size for the level `i` ticks from the reference, decaying with distance
    fn level_size(&mut self, i: usize) -> f64 {
        let u: f64 = self.rng.gen();
        10.0 * (1.0 + 0.5 * u) / (1.0 + 0.2 * i as f64)
    }

    /// Advance the price process by the wall-clock time since the last update
    pub fn generate_update(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_update).as_secs_f64();
        self.last_update = now;
        self.generate_update_with_elapsed(dt);
    }

    /// Advance the price process by `dt` seconds, then re-seed both sides
    pub fn generate_update_with_elapsed(&mut self, dt: f64) {
        self.drain_reversions();

        let drift = if self.rng.gen::<f64>() < self.config.drift_up_probability {
            self.config.drift_up
        } else {
            -self.config.drift_down
        };
        let noise = self.noise.sample(&mut self.rng) * dt.max(0.0).sqrt();
        self.reference_price = (self.reference_price + drift + noise).max(self.config.tick_size);

        self.seed_levels();
        self.updates += 1;
    }

    /// Draw an event kind uniformly and apply it
    pub fn simulate_random_event(&mut self) -> Result<MarketEvent> {
        let kind = EventKind::ALL[self.rng.gen_range(0..EventKind::COUNT)];
        self.apply_event(kind)
    }

    /// Apply one event of the given kind and count it
    pub fn apply_event(&mut self, kind: EventKind) -> Result<MarketEvent> {
        self.drain_reversions();
        self.event_counts.record(kind);

        let event = match kind {
            EventKind::LargeBid => self.large_order(Side::Bid),
            EventKind::LargeAsk => self.large_order(Side::Ask),
            EventKind::CancelBid => self.cancel(Side::Bid),
            EventKind::CancelAsk => self.cancel(Side::Ask),
            EventKind::ShiftUp => {
                self.reference_price += SHIFT_TICKS * self.config.tick_size;
                MarketEvent::ShiftUp {
                    reference: self.reference_price,
                }
            }
            EventKind::ShiftDown => {
                self.reference_price = (self.reference_price
                    - SHIFT_TICKS * self.config.tick_size)
                    .max(self.config.tick_size);
                MarketEvent::ShiftDown {
                    reference: self.reference_price,
                }
            }
            EventKind::Spoof => self.spoof()?,
            EventKind::SweepUp => self.sweep(Side::Ask),
            EventKind::SweepDown => self.sweep(Side::Bid),
            EventKind::None => MarketEvent::None,
        };

        tracing::debug!(?event, "market event");
        Ok(event)
    }

    fn large_order(&mut self, side: Side) -> MarketEvent {
        let levels = self.book.top_levels(side, self.config.levels);
        if levels.is_empty() {
            return MarketEvent::Skipped(if side.is_bid() {
                EventKind::LargeBid
            } else {
                EventKind::LargeAsk
            });
        }

        let level = levels[self.rng.gen_range(0..levels.len().min(NEAR_LEVELS))];
        let multiplier = self.rng.gen_range(2.0..5.0);
        let volume = level.volume * multiplier;
        self.book.update(side, level.price, volume);

        match side {
            Side::Bid => MarketEvent::LargeBid {
                price: level.price,
                volume,
                multiplier,
            },
            Side::Ask => MarketEvent::LargeAsk {
                price: level.price,
                volume,
                multiplier,
            },
        }
    }

    fn cancel(&mut self, side: Side) -> MarketEvent {
        let levels = self.book.top_levels(side, self.config.levels);
        if levels.is_empty() {
            return MarketEvent::Skipped(if side.is_bid() {
                EventKind::CancelBid
            } else {
                EventKind::CancelAsk
            });
        }

        let level = levels[self.rng.gen_range(0..levels.len())];
        let volume = level.volume * CANCEL_KEEP;
        self.book.update(side, level.price, volume);

        match side {
            Side::Bid => MarketEvent::CancelBid {
                price: level.price,
                volume,
            },
            Side::Ask => MarketEvent::CancelAsk {
                price: level.price,
                volume,
            },
        }
    }

    fn spoof(&mut self) -> Result<MarketEvent> {
        let levels = self.book.top_levels(Side::Ask, self.config.levels);
        if levels.is_empty() {
            return Ok(MarketEvent::Skipped(EventKind::Spoof));
        }

        let level = levels[self.rng.gen_range(0..levels.len().min(NEAR_LEVELS))];
        let spoofed = level.volume * SPOOF_MULTIPLIER;
        self.book.update_ask(level.price, spoofed);
        self.reversions
            .schedule(level.price, level.volume, self.config.spoof_delay())?;

        Ok(MarketEvent::Spoof {
            price: level.price,
            original: level.volume,
            spoofed,
        })
    }

    /// Remove a run of 3 to 7 levels nearest the touch on `side`
    fn sweep(&mut self, side: Side) -> MarketEvent {
        let kind = if side.is_ask() {
            EventKind::SweepUp
        } else {
            EventKind::SweepDown
        };

        let wanted = self.rng.gen_range(3..=7);
        let levels = self.book.top_levels(side, wanted);
        if levels.is_empty() {
            return MarketEvent::Skipped(kind);
        }

        for level in &levels {
            self.book.clear_level(side, level.price);
        }

        let depth = levels.len();
        let moved = 2.0 * depth as f64 * self.config.tick_size;
        match side {
            Side::Ask => {
                self.reference_price += moved;
                MarketEvent::SweepUp {
                    depth,
                    reference: self.reference_price,
                }
            }
            Side::Bid => {
                self.reference_price = (self.reference_price - moved).max(self.config.tick_size);
                MarketEvent::SweepDown {
                    depth,
                    reference: self.reference_price,
                }
            }
        }
    }

    /// Apply every spoof reversion that is due. Returns how many were applied.
    pub fn drain_reversions(&mut self) -> usize {
        let due = self.reversions.drain_due(Instant::now());
        for reversion in &due {
            // Upsert: a level re-seeded away since the spoof comes back
            self.book.update_ask(reversion.price, reversion.volume);
            tracing::debug!(
                price = reversion.price,
                volume = reversion.volume,
                "spoof reverted"
            );
        }
        due.len()
    }

    /// Cancel all outstanding spoof reversions
    pub fn cancel_pending_reversions(&mut self) {
        self.reversions.cancel_all();
    }

    /// Run the update loop in real time for `duration`
    ///
    /// Each due tick drains reversions, generates an update and, with
    /// probability `event_probability`, fires a random event. The loop polls
    /// every millisecond and reschedules from the current time when behind.
    pub fn run_simulation(
        &mut self,
        duration: Duration,
        updates_per_second: u32,
    ) -> Result<SimulationSummary> {
        if updates_per_second == 0 {
            return Err(Error::InvalidConfig(
                "updates_per_second must be positive".to_string(),
            ));
        }

        tracing::info!(
            duration_secs = duration.as_secs_f64(),
            updates_per_second,
            "starting simulation"
        );

        let interval = Duration::from_secs(1) / updates_per_second;
        let start = Instant::now();
        let mut next_update = start;
        let mut updates = 0u64;
        let mut events = 0u64;

        while start.elapsed() < duration {
            let now = Instant::now();
            self.drain_reversions();

            if now >= next_update {
                self.generate_update();

                if self.rng.gen::<f64>() < self.config.event_probability {
                    self.simulate_random_event()?;
                    events += 1;
                }

                updates += 1;
                if updates % PROGRESS_EVERY == 0 {
                    tracing::info!(
                        updates,
                        elapsed_secs = now.duration_since(start).as_secs(),
                        "simulation progress"
                    );
                }

                next_update += interval;
                if next_update < now {
                    next_update = now + interval;
                }
            }

            thread::sleep(Duration::from_millis(1));
        }

        let summary = SimulationSummary {
            updates,
            events,
            snapshots: self.book.history().len(),
            event_counts: self.event_counts.clone(),
            elapsed: start.elapsed(),
        };
        tracing::info!(%summary, "simulation complete");
        Ok(summary)
    }

    /// The simulated book
    #[must_use]
    pub fn book(&self) -> &PriceLevelBook {
        &self.book
    }

    /// Consume the simulator, keeping the book and its history
    #[must_use]
    pub fn into_book(self) -> PriceLevelBook {
        self.book
    }

    /// Current reference price
    #[must_use]
    pub fn reference_price(&self) -> f64 {
        self.reference_price
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Per-kind event counts since construction
    #[must_use]
    pub fn event_counts(&self) -> &EventCounts {
        &self.event_counts
    }

    /// Price updates generated since construction
    #[must_use]
    pub fn update_count(&self) -> u64 {
        self.updates
    }

    /// Spoof reversions scheduled since construction
    #[must_use]
    pub fn reversions_scheduled(&self) -> u64 {
        self.reversions.scheduled()
    }
}
