//! Spawning and joining the workers of a run.

use std::any::Any;
use std::thread;
use std::time::{Duration, Instant};

use panfilov_core::Discretization;
use panfilov_grid::FieldStats;
use panfilov_halo::{ChannelMesh, LocalTransport, Transport};

use crate::config::SimConfig;
use crate::driver::{Driver, WorkerOutcome};
use crate::error::RunError;
use crate::hook::{NoSnapshots, SnapshotHook};
use crate::metrics::{saturating_millis, RunMetrics};

/// Summary of a completed run.
#[derive(Clone, Debug)]
pub struct RunReport {
    /// Global grid size.
    pub n: usize,
    /// Number of workers.
    pub workers: usize,
    /// Completed steps.
    pub niter: u64,
    /// Final simulated time.
    pub t: f64,
    /// The discretization the run used.
    pub disc: Discretization,
    /// Statistics of the final excitation field.
    pub stats: FieldStats,
    /// Final excitation field, row-major `n × n`.
    pub excitation: Vec<f64>,
    /// Timing of the coordinating worker.
    pub metrics: RunMetrics,
    /// Wall-clock time from validation to the last join.
    pub wall: Duration,
}

impl RunReport {
    /// Excitation at global zero-based `(row, col)`, `None` outside the
    /// grid.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.n || col >= self.n {
            return None;
        }
        self.excitation.get(row * self.n + col).copied()
    }
}

/// Entry point for running a configured simulation.
#[derive(Debug)]
pub struct Cluster;

impl Cluster {
    /// Validate `config`, run every worker to completion, and report.
    ///
    /// The coordinating worker runs on the calling thread and drives
    /// `hook`; the others run on named scoped threads. A failure on any
    /// worker aborts the whole run: its dropped endpoint disconnects its
    /// peers, and the originating error is returned in preference to the
    /// resulting disconnects.
    pub fn run(config: &SimConfig, hook: &mut dyn SnapshotHook) -> Result<RunReport, RunError> {
        config.validate()?;
        let disc = config.discretization();
        if !disc.is_stable() {
            tracing::warn!(
                alpha = disc.alpha,
                limit = Discretization::stability_limit(),
                "diffusion number exceeds the explicit-Euler stability limit"
            );
        }
        if config.no_comm && config.workers() > 1 {
            tracing::warn!("inter-worker communication disabled; seams are mirrored");
        }
        tracing::info!(
            n = config.n,
            px = config.px,
            py = config.py,
            t_final = config.t_final,
            dt = config.dt,
            threads = config.threads,
            plot_freq = config.plot_freq,
            initial = %config.initial,
            "starting run"
        );

        let start = Instant::now();
        let outcome = if config.workers() == 1 {
            Driver::new(config, Box::new(LocalTransport))?.run(hook)?
        } else {
            run_mesh(config, hook)?
        };
        let wall = start.elapsed();

        tracing::info!(
            niter = outcome.niter,
            t = outcome.t,
            max = outcome.stats.max,
            l2 = outcome.stats.l2_norm(),
            wall_ms = saturating_millis(wall),
            "run complete"
        );

        Ok(RunReport {
            n: config.n,
            workers: config.workers(),
            niter: outcome.niter,
            t: outcome.t,
            disc,
            stats: outcome.stats,
            excitation: outcome.field.unwrap_or_default(),
            metrics: outcome.metrics,
            wall,
        })
    }
}

fn run_mesh(config: &SimConfig, hook: &mut dyn SnapshotHook) -> Result<WorkerOutcome, RunError> {
    let mut endpoints = ChannelMesh::build(config.workers(), config.recv_timeout);
    let root = endpoints.remove(0);

    thread::scope(|s| {
        let mut handles = Vec::with_capacity(endpoints.len());
        let mut spawn_error = None;
        for endpoint in endpoints {
            let rank = endpoint.rank();
            let spawned = thread::Builder::new()
                .name(format!("panfilov-worker-{rank}"))
                .spawn_scoped(s, move || {
                    Driver::new(config, Box::new(endpoint))?.run(&mut NoSnapshots)
                });
            match spawned {
                Ok(handle) => handles.push((rank, handle)),
                Err(source) => {
                    spawn_error = Some(RunError::Spawn { rank, source });
                    break;
                }
            }
        }

        let root_result = match spawn_error {
            Some(err) => {
                drop(root);
                Err(err)
            }
            None => Driver::new(config, Box::new(root)).and_then(|mut driver| driver.run(hook)),
        };

        let mut errors = Vec::new();
        let mut outcome = None;
        match root_result {
            Ok(o) => outcome = Some(o),
            Err(e) => errors.push(e),
        }
        for (rank, handle) in handles {
            match handle.join() {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => errors.push(e),
                Err(payload) => errors.push(RunError::WorkerPanicked {
                    rank,
                    message: panic_message(payload.as_ref()),
                }),
            }
        }

        match first_cause(errors) {
            Some(err) => {
                tracing::error!(error = %err, "run aborted");
                Err(err)
            }
            None => outcome.ok_or(RunError::WorkerPanicked {
                rank: panfilov_core::Rank::ROOT,
                message: "coordinating worker produced no outcome".into(),
            }),
        }
    })
}

/// The first error that is not merely a peer disconnect, else the first
/// error.
fn first_cause(errors: Vec<RunError>) -> Option<RunError> {
    let idx = errors
        .iter()
        .position(|e| !e.is_disconnect())
        .unwrap_or(0);
    errors.into_iter().nth(idx)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
