//! Delayed restoration of spoofed levels.
//!
//! Each scheduled reversion runs on its own OS thread. The thread never
//! touches the book: it waits out the delay, checks its cancellation token,
//! and posts a [`PendingReversion`] back through a crossbeam channel. The
//! simulator owns the receiving end and applies due messages between its own
//! mutations, so a reversion cannot interleave with a re-seed.

use std::thread;
use std::time::{Duration, Instant};

use crossbeam::channel::{unbounded, Receiver, Sender, TryRecvError};
use lobsynth_core::error::{Error, Result};
use tokio_util::sync::CancellationToken;

/// Upper bound on a single sleep so cancellation is noticed promptly
const POLL_SLICE: Duration = Duration::from_millis(5);

/// A level restore posted by a reversion thread
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingReversion {
    /// Ask price that was spoofed
    pub price: f64,
    /// Size to restore
    pub volume: f64,
    /// Earliest instant the restore may be applied
    pub due: Instant,
    generation: u64,
}

/// Owner-side handle for scheduling and collecting reversions
pub struct ReversionScheduler {
    tx: Sender<PendingReversion>,
    rx: Receiver<PendingReversion>,
    cancel: CancellationToken,
    /// Received but not yet due
    held: Vec<PendingReversion>,
    /// Bumped by `cancel_all`; messages from older generations are discarded
    generation: u64,
    scheduled: u64,
}

impl ReversionScheduler {
    /// Create a scheduler with an empty inbox
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self {
            tx,
            rx,
            cancel: CancellationToken::new(),
            held: Vec::new(),
            generation: 0,
            scheduled: 0,
        }
    }

    /// Restore `price` to `volume` once `delay` has elapsed
    pub fn schedule(&mut self, price: f64, volume: f64, delay: Duration) -> Result<()> {
        let due = Instant::now() + delay;
        let token = self.cancel.child_token();
        let tx = self.tx.clone();
        let generation = self.generation;

        thread::Builder::new()
            .name("spoof-reversion".to_string())
            .spawn(move || {
                loop {
                    if token.is_cancelled() {
                        tracing::debug!(price, "spoof reversion cancelled");
                        return;
                    }
                    let now = Instant::now();
                    if now >= due {
                        break;
                    }
                    thread::sleep((due - now).min(POLL_SLICE));
                }
                let reversion = PendingReversion {
                    price,
                    volume,
                    due,
                    generation,
                };
                if tx.send(reversion).is_err() {
                    tracing::debug!(price, "simulator gone, spoof reversion dropped");
                }
            })
            .map_err(|e| Error::Io(format!("failed to spawn reversion thread: {e}")))?;

        self.scheduled += 1;
        tracing::debug!(price, volume, ?delay, "spoof reversion scheduled");
        Ok(())
    }

    /// Take every received reversion whose due time is at or before `now`
    pub fn drain_due(&mut self, now: Instant) -> Vec<PendingReversion> {
        loop {
            match self.rx.try_recv() {
                Ok(reversion) if reversion.generation == self.generation => {
                    self.held.push(reversion);
                }
                Ok(_) => {}
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }

        let (due, waiting): (Vec<_>, Vec<_>) = self.held.drain(..).partition(|r| r.due <= now);
        self.held = waiting;
        due
    }

    /// Cancel every outstanding reversion, including ones already posted but
    /// not yet drained. Later schedules are unaffected.
    pub fn cancel_all(&mut self) {
        self.cancel.cancel();
        self.cancel = CancellationToken::new();
        self.generation += 1;
        while self.rx.try_recv().is_ok() {}
        self.held.clear();
    }

    /// Reversions received but not yet due
    #[must_use]
    pub fn held(&self) -> usize {
        self.held.len()
    }

    /// Total reversions scheduled over the scheduler's lifetime
    #[must_use]
    pub fn scheduled(&self) -> u64 {
        self.scheduled
    }
}

impl Default for ReversionScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ReversionScheduler {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl std::fmt::Debug for ReversionScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReversionScheduler")
            .field("held", &self.held.len())
            .field("scheduled", &self.scheduled)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}
