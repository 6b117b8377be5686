//! Top-level run errors.

use std::error::Error;
use std::fmt;

use panfilov_core::{ExchangeError, Rank, StepError};
use panfilov_grid::GridError;
use rayon::ThreadPoolBuildError;

use crate::config::ConfigError;

/// Why a run did not complete.
///
/// Every variant except [`Config`](Self::Config) names the worker that
/// observed the failure.
#[derive(Debug)]
pub enum RunError {
    /// The configuration was rejected before any worker started.
    Config(ConfigError),
    /// A worker could not allocate or assemble its grids.
    Grid {
        /// Reporting worker.
        rank: Rank,
        /// Underlying error.
        source: GridError,
    },
    /// A worker's thread pool could not be built.
    Pool {
        /// Reporting worker.
        rank: Rank,
        /// Underlying error.
        source: ThreadPoolBuildError,
    },
    /// A timestep failed on a worker.
    Step {
        /// Reporting worker.
        rank: Rank,
        /// Underlying error.
        source: StepError,
    },
    /// A worker thread could not be spawned.
    Spawn {
        /// Worker whose thread failed to start.
        rank: Rank,
        /// Underlying error.
        source: std::io::Error,
    },
    /// A worker thread panicked.
    WorkerPanicked {
        /// Worker that panicked.
        rank: Rank,
        /// Panic payload, if it was a string.
        message: String,
    },
}

impl RunError {
    /// Whether this error only reports that some other worker went away.
    ///
    /// When one worker fails, its peers observe disconnects; the cluster
    /// reports the originating failure in preference to these.
    pub fn is_disconnect(&self) -> bool {
        matches!(
            self,
            Self::Step {
                source: StepError::Exchange {
                    source: ExchangeError::PeerDisconnected { .. },
                    ..
                },
                ..
            }
        )
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Grid { rank, source } => write!(f, "worker {rank}: grid: {source}"),
            Self::Pool { rank, source } => write!(f, "worker {rank}: thread pool: {source}"),
            Self::Step { rank, source } => write!(f, "worker {rank}: {source}"),
            Self::Spawn { rank, source } => {
                write!(f, "worker {rank}: thread spawn failed: {source}")
            }
            Self::WorkerPanicked { rank, message } => {
                write!(f, "worker {rank} panicked: {message}")
            }
        }
    }
}

impl Error for RunError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Grid { source, .. } => Some(source),
            Self::Pool { source, .. } => Some(source),
            Self::Step { source, .. } => Some(source),
            Self::Spawn { source, .. } => Some(source),
            Self::WorkerPanicked { .. } => None,
        }
    }
}

impl From<ConfigError> for RunError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
