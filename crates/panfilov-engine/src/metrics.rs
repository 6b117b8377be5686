//! Per-step and per-run timing metrics.
//!
//! All durations are wall-clock microseconds measured on the worker
//! that reports them.

use std::time::{Duration, Instant};

/// Timing of one worker's step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepMetrics {
    /// Whole step, including any snapshot gather.
    pub total_us: u64,
    /// Mirror plus neighbour exchange.
    pub exchange_us: u64,
    /// The three update passes.
    pub compute_us: u64,
    /// End-of-step barrier.
    pub barrier_us: u64,
    /// Snapshot gather and hook, zero on steps without a snapshot.
    pub snapshot_us: u64,
    /// Whether this step gathered a snapshot.
    pub snapshot: bool,
}

/// Accumulated timing of one worker over a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunMetrics {
    /// Completed steps.
    pub steps: u64,
    /// Snapshots taken.
    pub snapshots: u64,
    /// Sum of [`StepMetrics::total_us`].
    pub total_us: u64,
    /// Sum of [`StepMetrics::exchange_us`].
    pub exchange_us: u64,
    /// Sum of [`StepMetrics::compute_us`].
    pub compute_us: u64,
    /// Sum of [`StepMetrics::barrier_us`].
    pub barrier_us: u64,
    /// Sum of [`StepMetrics::snapshot_us`].
    pub snapshot_us: u64,
}

impl RunMetrics {
    /// Fold one step in.
    pub fn record(&mut self, step: &StepMetrics) {
        self.steps += 1;
        if step.snapshot {
            self.snapshots += 1;
        }
        self.total_us += step.total_us;
        self.exchange_us += step.exchange_us;
        self.compute_us += step.compute_us;
        self.barrier_us += step.barrier_us;
        self.snapshot_us += step.snapshot_us;
    }

    /// Mean step time in microseconds, zero before the first step.
    pub fn mean_step_us(&self) -> f64 {
        if self.steps == 0 {
            return 0.0;
        }
        self.total_us as f64 / self.steps as f64
    }

    /// Share of step time spent communicating (exchange and barrier).
    pub fn communication_fraction(&self) -> f64 {
        if self.total_us == 0 {
            return 0.0;
        }
        (self.exchange_us + self.barrier_us) as f64 / self.total_us as f64
    }
}

/// Elapsed microseconds since `start`, saturating.
pub(crate) fn micros_since(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX)
}

/// Whole milliseconds in `d`, saturating.
pub(crate) fn saturating_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
