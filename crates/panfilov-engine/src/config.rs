//! Run configuration, validation, and error types.

use std::error::Error;
use std::fmt;
use std::time::Duration;

use panfilov_core::{Discretization, ModelParams, ParamError, Rank, DEFAULT_DT};
use panfilov_grid::{Partition, WorkerTopology};
use panfilov_kinetics::InitialCondition;

/// Every worker needs this many interior rows and columns; the mirror
/// reflects about interior row/column 2.
const MIN_SUBDOMAIN: usize = 2;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected by [`SimConfig::validate()`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// `t_final` is NaN, infinite, or not positive.
    InvalidDuration {
        /// The invalid value.
        value: f64,
    },
    /// `dt` is NaN, infinite, or not positive.
    InvalidTimestep {
        /// The invalid value.
        value: f64,
    },
    /// `px` or `py` is zero.
    NoWorkers {
        /// Worker columns.
        px: usize,
        /// Worker rows.
        py: usize,
    },
    /// `px * py` overflows.
    TooManyWorkers {
        /// Worker columns.
        px: usize,
        /// Worker rows.
        py: usize,
    },
    /// The smallest subdomain would have fewer than two interior rows or
    /// columns.
    SubdomainTooSmall {
        /// Global grid size.
        n: usize,
        /// Worker columns.
        px: usize,
        /// Worker rows.
        py: usize,
    },
    /// `threads` is zero.
    NoThreads,
    /// A model constant failed validation.
    InvalidModel {
        /// The violated constraint.
        source: ParamError,
    },
    /// `recv_timeout` is zero.
    ZeroTimeout,
    /// `recv_timeout` is set together with `plot_freq > 0`.
    ///
    /// The snapshot hook runs on the coordinating worker while every
    /// other worker waits in a receive, so a hook that blocks (such as
    /// an interactive plot) would trip the timeout.
    TimeoutWithSnapshots {
        /// The configured snapshot interval.
        plot_freq: u64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDuration { value } => {
                write!(f, "t_final must be finite and positive, got {value}")
            }
            Self::InvalidTimestep { value } => {
                write!(f, "dt must be finite and positive, got {value}")
            }
            Self::NoWorkers { px, py } => {
                write!(f, "worker grid {px}x{py} has no workers")
            }
            Self::TooManyWorkers { px, py } => {
                write!(f, "worker grid {px}x{py} is too large")
            }
            Self::SubdomainTooSmall { n, px, py } => write!(
                f,
                "grid {n}x{n} split over {px}x{py} workers leaves subdomains below \
                 {MIN_SUBDOMAIN}x{MIN_SUBDOMAIN}"
            ),
            Self::NoThreads => write!(f, "threads must be at least 1"),
            Self::InvalidModel { source } => write!(f, "invalid model parameters: {source}"),
            Self::ZeroTimeout => write!(f, "recv_timeout must be non-zero"),
            Self::TimeoutWithSnapshots { plot_freq } => write!(
                f,
                "recv_timeout cannot be combined with snapshots (plot_freq = {plot_freq})"
            ),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidModel { source } => Some(source),
            _ => None,
        }
    }
}

// ── SimConfig ──────────────────────────────────────────────────────

/// Complete configuration of one simulation run.
///
/// `validate()` checks every structural constraint up front so that
/// worker threads never start on a configuration they cannot finish.
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Simulated end time `T`. Default: 1000.
    pub t_final: f64,
    /// Global grid size; the grid is `n × n`. Default: 400.
    pub n: usize,
    /// Worker columns. Default: 1.
    pub px: usize,
    /// Worker rows. Default: 1.
    pub py: usize,
    /// Snapshot every this many steps; 0 disables snapshots. Default: 0.
    pub plot_freq: u64,
    /// Skip neighbour exchange; ghost cells on seams are only mirrored.
    /// Default: false.
    pub no_comm: bool,
    /// Threads in each worker's pool. Default: 1.
    pub threads: usize,
    /// Timestep. Default: 0.1.
    pub dt: f64,
    /// Model constants.
    pub params: ModelParams,
    /// Starting fields. Default: quiescent.
    pub initial: InitialCondition,
    /// Fail a receive that waits longer than this. Default: wait forever.
    /// Must stay `None` when `plot_freq > 0`.
    pub recv_timeout: Option<Duration>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            t_final: 1000.0,
            n: 400,
            px: 1,
            py: 1,
            plot_freq: 0,
            no_comm: false,
            threads: 1,
            dt: DEFAULT_DT,
            params: ModelParams::default(),
            initial: InitialCondition::Quiescent,
            recv_timeout: None,
        }
    }
}

impl SimConfig {
    /// Validate all structural invariants.
    ///
    /// An explicit-Euler stability violation (`alpha > 1/4`) is not an
    /// error; [`Cluster::run`](crate::Cluster::run) logs a warning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.t_final.is_finite() || self.t_final <= 0.0 {
            return Err(ConfigError::InvalidDuration {
                value: self.t_final,
            });
        }
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(ConfigError::InvalidTimestep { value: self.dt });
        }
        if self.px == 0 || self.py == 0 {
            return Err(ConfigError::NoWorkers {
                px: self.px,
                py: self.py,
            });
        }
        if self.px.checked_mul(self.py).is_none() {
            return Err(ConfigError::TooManyWorkers {
                px: self.px,
                py: self.py,
            });
        }
        // Remainders go to the last worker row/column, so the first
        // worker holds the smallest subdomain.
        if self.n / self.px < MIN_SUBDOMAIN || self.n / self.py < MIN_SUBDOMAIN {
            return Err(ConfigError::SubdomainTooSmall {
                n: self.n,
                px: self.px,
                py: self.py,
            });
        }
        if self.threads == 0 {
            return Err(ConfigError::NoThreads);
        }
        self.params
            .validate()
            .map_err(|source| ConfigError::InvalidModel { source })?;
        if self.recv_timeout == Some(Duration::ZERO) {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.recv_timeout.is_some() && self.plot_freq > 0 {
            return Err(ConfigError::TimeoutWithSnapshots {
                plot_freq: self.plot_freq,
            });
        }
        Ok(())
    }

    /// The `px × py` worker grid.
    pub fn topology(&self) -> WorkerTopology {
        WorkerTopology::new(self.px, self.py)
    }

    /// Total number of workers.
    pub fn workers(&self) -> usize {
        self.px * self.py
    }

    /// Timestep, spatial step and diffusion number for this run.
    pub fn discretization(&self) -> Discretization {
        Discretization::new(&self.params, self.n, self.dt)
    }

    /// Subdomain of `rank`.
    pub fn partition(&self, rank: Rank) -> Partition {
        Partition::new(self.n, self.topology(), rank)
    }
}
