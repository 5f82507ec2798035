//! Simulated upload progress
//!
//! The backend offers no transfer progress events, so the percentage shown
//! during an upload is synthesized on a timer rather than measured. A
//! background task advances a shared display cell by a random step on each
//! tick and parks at a ceiling below 100; the real request outcome decides
//! whether the display jumps to 100 or resets. The simulator never finishes
//! on its own and must be stopped by its owner.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use rand::Rng;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::constants::progress;

/// Receiver for displayed progress updates
pub trait ProgressSink: Send + Sync {
    /// Called with the percentage to display, in the range 0..=100
    fn progress(&self, percent: u8);
}

/// Shared cell holding the percentage currently on screen
///
/// Updates through the [`ProgressSink`] impl are monotone: a stale or lower
/// value never rewinds the display. [`reset`](Self::reset) and
/// [`force`](Self::force) bypass monotonicity for phase transitions.
#[derive(Debug, Default)]
pub struct DisplayedPercent(AtomicU8);

impl DisplayedPercent {
    /// A cell starting at zero
    pub fn new() -> Self {
        Self(AtomicU8::new(0))
    }

    /// Current displayed value
    pub fn get(&self) -> u8 {
        self.0.load(Ordering::Relaxed)
    }

    /// Rewind to zero, for session start and failure
    pub fn reset(&self) {
        self.0.store(0, Ordering::Relaxed);
    }

    /// Set an exact value regardless of the current one
    pub fn force(&self, percent: u8) {
        self.0.store(percent.min(100), Ordering::Relaxed);
    }
}

impl ProgressSink for DisplayedPercent {
    fn progress(&self, percent: u8) {
        let clamped = percent.min(100);
        // fetch_max keeps the display monotone even if ticks land out of order
        self.0.fetch_max(clamped, Ordering::Relaxed);
    }
}

/// Handle to the background simulator task
#[derive(Debug)]
pub struct SimulatedProgress {
    handle: JoinHandle<()>,
}

impl SimulatedProgress {
    /// Spawn a simulator feeding the given sink
    ///
    /// Starts from zero, advances by a random step each tick, and parks at
    /// the simulated ceiling until stopped.
    pub fn start(sink: Arc<dyn ProgressSink>) -> Self {
        let handle = tokio::spawn(async move {
            let mut percent: u8 = 0;
            let mut interval = tokio::time::interval(progress::SIMULATOR_TICK);
            // First tick completes immediately; skip it so the display holds
            // zero for one full tick.
            interval.tick().await;
            loop {
                interval.tick().await;
                if percent < progress::SIMULATED_CAP {
                    let step = rand::thread_rng()
                        .gen_range(progress::MIN_STEP..=progress::MAX_STEP);
                    percent = percent.saturating_add(step).min(progress::SIMULATED_CAP);
                    sink.progress(percent);
                }
            }
        });
        debug!("Started simulated progress task");
        Self { handle }
    }

    /// Stop the simulator
    ///
    /// Must be called before the owning session reaches a terminal phase;
    /// the task never exits on its own.
    pub fn stop(self) {
        self.handle.abort();
        debug!("Stopped simulated progress task");
    }
}
