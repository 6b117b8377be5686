//! One worker's time-stepping loop.
//!
//! A [`Driver`] owns everything a worker needs: its subdomain, the grid
//! store, the halo exchange buffers, the kinetics pipeline, a private
//! thread pool, and its transport endpoint. It is `Send` so the cluster
//! can move it onto a worker thread, and every method takes `&mut self`.
//!
//! # State machine
//!
//! ```text
//! Running ──step()──▶ Running      while t < t_final
//! Running ──step()──▶ Done         once t >= t_final
//! ```
//!
//! All drivers of a run advance in lockstep: every step ends with a
//! barrier, and snapshot gathers are collective.

use std::time::Instant;

use panfilov_core::{Phase, Rank, StepError};
use panfilov_grid::{assemble_global, FieldStats, GridStore, Partition, WorkerPool};
use panfilov_halo::{HaloExchange, Transport};
use panfilov_kinetics::Kinetics;

use crate::config::SimConfig;
use crate::error::RunError;
use crate::hook::{GlobalSnapshot, SnapshotHook};
use crate::metrics::{micros_since, RunMetrics, StepMetrics};

// Compile-time assertion: a Driver can be moved onto a worker thread.
const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<Driver>();
    }
};

/// Whether a driver has more steps to take.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    /// `t < t_final`.
    Running,
    /// `t >= t_final`.
    Done,
}

/// What a worker hands back after its last step.
#[derive(Clone, Debug)]
pub struct WorkerOutcome {
    /// The reporting worker.
    pub rank: Rank,
    /// Completed steps.
    pub niter: u64,
    /// Final simulated time.
    pub t: f64,
    /// Statistics of the final global excitation field.
    pub stats: FieldStats,
    /// Final global excitation field, row-major `n × n`; `Some` on the
    /// coordinating worker only.
    pub field: Option<Vec<f64>>,
    /// This worker's timing.
    pub metrics: RunMetrics,
}

/// The stepping loop of one worker.
pub struct Driver {
    partition: Partition,
    store: GridStore,
    halo: HaloExchange,
    kinetics: Kinetics,
    pool: WorkerPool,
    transport: Box<dyn Transport>,
    t_final: f64,
    dt: f64,
    plot_freq: u64,
    t: f64,
    niter: u64,
    metrics: RunMetrics,
}

impl Driver {
    /// Build the driver for the worker behind `transport`.
    ///
    /// Allocates and seeds the grid store and builds the worker's pool.
    /// `config` must already be validated.
    pub fn new(config: &SimConfig, transport: Box<dyn Transport>) -> Result<Self, RunError> {
        let rank = transport.rank();
        let partition = config.partition(rank);
        let mut store = GridStore::new(partition.rows, partition.cols)
            .map_err(|source| RunError::Grid { rank, source })?;
        config.initial.apply(&mut store, &partition);
        let pool = WorkerPool::new(config.threads, rank.index())
            .map_err(|source| RunError::Pool { rank, source })?;

        tracing::debug!(
            %rank,
            rows = partition.rows,
            cols = partition.cols,
            row_offset = partition.row_offset,
            col_offset = partition.col_offset,
            "worker subdomain ready"
        );

        Ok(Self {
            halo: HaloExchange::new(&partition, !config.no_comm),
            kinetics: Kinetics::new(config.params, config.discretization()),
            partition,
            store,
            pool,
            transport,
            t_final: config.t_final,
            dt: config.dt,
            plot_freq: config.plot_freq,
            t: 0.0,
            niter: 0,
            metrics: RunMetrics::default(),
        })
    }

    /// This worker's rank.
    pub fn rank(&self) -> Rank {
        self.partition.rank
    }

    /// Simulated time.
    pub fn t(&self) -> f64 {
        self.t
    }

    /// Completed steps.
    pub fn niter(&self) -> u64 {
        self.niter
    }

    /// Current state.
    pub fn state(&self) -> DriverState {
        if self.t < self.t_final {
            DriverState::Running
        } else {
            DriverState::Done
        }
    }

    /// This worker's subdomain.
    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    /// This worker's grids.
    pub fn store(&self) -> &GridStore {
        &self.store
    }

    /// Accumulated timing.
    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }

    /// Take one timestep.
    ///
    /// Advances the clock, refreshes ghost cells, runs the update passes,
    /// waits at the barrier, swaps the excitation buffers and, every
    /// `plot_freq` steps, gathers a snapshot for `hook` (invoked on the
    /// coordinating worker only).
    pub fn step(&mut self, hook: &mut dyn SnapshotHook) -> Result<StepMetrics, RunError> {
        let rank = self.rank();
        let start = Instant::now();
        self.t += self.dt;
        self.niter += 1;
        let niter = self.niter;

        let exchange_start = Instant::now();
        self.halo
            .refresh(
                self.store.excitation_prev_mut(),
                &*self.transport,
                &self.pool,
                niter,
            )
            .map_err(|source| RunError::Step { rank, source })?;
        let exchange_us = micros_since(exchange_start);

        let compute_start = Instant::now();
        self.kinetics
            .advance(&mut self.store.update_views(), &self.pool);
        let compute_us = micros_since(compute_start);

        let barrier_start = Instant::now();
        self.transport.barrier().map_err(|e| RunError::Step {
            rank,
            source: StepError::exchange(niter, Phase::Barrier, e),
        })?;
        let barrier_us = micros_since(barrier_start);

        self.store.swap();

        let snapshot = self.plot_freq > 0 && niter % self.plot_freq == 0;
        let mut snapshot_us = 0;
        if snapshot {
            let snapshot_start = Instant::now();
            if let Some(excitation) = self.gather_field()? {
                tracing::debug!(niter, t = self.t, "snapshot gathered");
                hook.on_snapshot(&GlobalSnapshot {
                    t: self.t,
                    niter,
                    n: self.partition.n,
                    excitation,
                });
            }
            snapshot_us = micros_since(snapshot_start);
        }

        let metrics = StepMetrics {
            total_us: micros_since(start),
            exchange_us,
            compute_us,
            barrier_us,
            snapshot_us,
            snapshot,
        };
        self.metrics.record(&metrics);
        tracing::trace!(%rank, niter, t = self.t, total_us = metrics.total_us, "step complete");
        Ok(metrics)
    }

    /// Step until [`DriverState::Done`], then collect the final global
    /// statistics and field.
    pub fn run(&mut self, hook: &mut dyn SnapshotHook) -> Result<WorkerOutcome, RunError> {
        while self.state() == DriverState::Running {
            self.step(hook)?;
        }
        let stats = self.global_stats()?;
        let field = self.gather_field()?;
        tracing::debug!(rank = %self.rank(), niter = self.niter, t = self.t, "worker done");
        Ok(WorkerOutcome {
            rank: self.rank(),
            niter: self.niter,
            t: self.t,
            stats,
            field,
            metrics: self.metrics,
        })
    }

    /// Collective: assemble the current global excitation field on the
    /// coordinating worker. Every worker must call this at the same
    /// point; only the coordinating worker gets `Some`.
    pub fn gather_field(&self) -> Result<Option<Vec<f64>>, RunError> {
        let rank = self.rank();
        let payload = self.store.current().interior_to_vec();
        let parts = self.transport.gather(payload).map_err(|e| RunError::Step {
            rank,
            source: StepError::exchange(self.niter, Phase::Gather, e),
        })?;
        match parts {
            None => Ok(None),
            Some(parts) => assemble_global(self.partition.n, self.partition.topology, &parts)
                .map(Some)
                .map_err(|source| RunError::Grid { rank, source }),
        }
    }

    /// Collective: maximum and sum of squares of the current excitation
    /// over all workers, available on every worker.
    pub fn global_stats(&self) -> Result<FieldStats, RunError> {
        let rank = self.rank();
        let reduce_err = |e| RunError::Step {
            rank,
            source: StepError::exchange(self.niter, Phase::Reduce, e),
        };
        let local = self.store.current().stats();
        let max = self.transport.all_reduce_max(local.max).map_err(reduce_err)?;
        let sum_sq = self
            .transport
            .all_reduce_sum(local.sum_sq)
            .map_err(reduce_err)?;
        let cells = (self.partition.n * self.partition.n) as u64;
        Ok(FieldStats { max, sum_sq, cells })
    }
}

impl std::fmt::Debug for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("rank", &self.partition.rank)
            .field("t", &self.t)
            .field("niter", &self.niter)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hook::NoSnapshots;
    use panfilov_halo::LocalTransport;
    use panfilov_kinetics::InitialCondition;

    fn config() -> SimConfig {
        SimConfig {
            n: 8,
            t_final: 1.0,
            dt: 0.25,
            ..SimConfig::default()
        }
    }

    #[test]
    fn fresh_driver_is_running_at_zero() {
        let d = Driver::new(&config(), Box::new(LocalTransport)).unwrap();
        assert_eq!(d.state(), DriverState::Running);
        assert_eq!(d.t(), 0.0);
        assert_eq!(d.niter(), 0);
        assert_eq!(d.rank(), Rank::ROOT);
        assert_eq!(d.partition().rows, 8);
    }

    #[test]
    fn runs_until_t_final() {
        let mut d = Driver::new(&config(), Box::new(LocalTransport)).unwrap();
        let outcome = d.run(&mut NoSnapshots).unwrap();
        assert_eq!(d.state(), DriverState::Done);
        assert_eq!(outcome.niter, 4);
        assert_eq!(outcome.t, 1.0);
        assert_eq!(outcome.metrics.steps, 4);
        assert_eq!(d.store().swaps(), 4);
        assert_eq!(outcome.field.map(|f| f.len()), Some(64));
    }

    #[test]
    fn non_dyadic_dt_accumulates_like_a_float_clock() {
        // 0.1 added ten times falls just short of 1.0, so an eleventh
        // step is taken.
        let cfg = SimConfig {
            dt: 0.1,
            ..config()
        };
        let outcome = Driver::new(&cfg, Box::new(LocalTransport))
            .unwrap()
            .run(&mut NoSnapshots)
            .unwrap();
        assert_eq!(outcome.niter, 11);
        assert!(outcome.t >= 1.0);
    }

    #[test]
    fn snapshots_follow_plot_freq() {
        let cfg = SimConfig {
            plot_freq: 2,
            initial: InitialCondition::PlanarWave,
            ..config()
        };
        let mut seen = Vec::new();
        let mut hook = |s: &GlobalSnapshot| seen.push((s.niter, s.t, s.excitation.len()));
        let outcome = Driver::new(&cfg, Box::new(LocalTransport))
            .unwrap()
            .run(&mut hook)
            .unwrap();
        assert_eq!(seen, vec![(2, 0.5, 64), (4, 1.0, 64)]);
        assert_eq!(outcome.metrics.snapshots, 2);
    }

    #[test]
    fn snapshot_shows_freshly_computed_field() {
        let cfg = SimConfig {
            plot_freq: 1,
            t_final: 0.25,
            initial: InitialCondition::PlanarWave,
            ..config()
        };
        let mut last = None;
        let mut hook = |s: &GlobalSnapshot| last = Some(s.excitation.clone());
        let mut d = Driver::new(&cfg, Box::new(LocalTransport)).unwrap();
        d.run(&mut hook).unwrap();
        assert_eq!(last, Some(d.store().current().interior_to_vec()));
        assert_ne!(last, Some(d.store().excitation().interior_to_vec()));
    }

    #[test]
    fn global_stats_cover_whole_grid() {
        let cfg = SimConfig {
            initial: InitialCondition::custom(|_, _| (0.5, 0.0)),
            ..config()
        };
        let d = Driver::new(&cfg, Box::new(LocalTransport)).unwrap();
        let stats = d.global_stats().unwrap();
        assert_eq!(stats.max, 0.5);
        assert_eq!(stats.cells, 64);
        assert_eq!(stats.sum_sq, 16.0);
    }
}
