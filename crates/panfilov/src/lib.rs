//! Panfilov: a domain-decomposed Aliev–Panfilov cardiac simulator.
//!
//! This is the top-level facade crate. It re-exports the public API from
//! the Panfilov sub-crates so that users need only a single dependency.
//!
//! # Quick start
//!
//! ```rust
//! use panfilov::prelude::*;
//!
//! // A 16x16 tissue split over a 2x2 worker grid, run to t >= 1.
//! let config = SimConfig {
//!     n: 16,
//!     px: 2,
//!     py: 2,
//!     t_final: 1.0,
//!     initial: InitialCondition::PlanarWave,
//!     ..SimConfig::default()
//! };
//!
//! let report = Cluster::run(&config, &mut NoSnapshots).unwrap();
//! assert_eq!(report.workers, 4);
//! assert_eq!(report.excitation.len(), 16 * 16);
//! // The accumulated clock passes 1.0 on the eleventh step of 0.1.
//! assert_eq!(report.niter, 11);
//! ```
//!
//! # Modules
//!
//! | Module | Crate | Purpose |
//! |--------|-------|---------|
//! | [`types`] | `panfilov-core` | Ranks, sides, model constants, error types |
//! | [`grid`] | `panfilov-grid` | Ghost-padded grids, partitioning, worker pools |
//! | [`halo`] | `panfilov-halo` | Transports and the halo refresh protocol |
//! | [`kinetics`] | `panfilov-kinetics` | Diffusion, excitation and recovery passes |
//! | [`engine`] | `panfilov-engine` | Time-stepping driver and multi-worker runs |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core identifiers, model constants, and error types (`panfilov-core`).
///
/// Contains [`types::Rank`], [`types::Side`], [`types::ModelParams`],
/// [`types::Discretization`], and the exchange/step error hierarchy.
pub use panfilov_core as types;

/// Ghost-padded grids and domain decomposition (`panfilov-grid`).
///
/// [`grid::Grid`] stores one field with a one-cell ghost frame;
/// [`grid::Partition`] maps a rank to its block of the global grid.
pub use panfilov_grid as grid;

/// Halo exchange (`panfilov-halo`).
///
/// The [`halo::Transport`] trait abstracts worker-to-worker messaging;
/// [`halo::ChannelMesh`] provides an in-process implementation and
/// [`halo::HaloExchange`] refreshes ghost cells each step.
pub use panfilov_halo as halo;

/// Reaction-diffusion update passes (`panfilov-kinetics`).
///
/// [`kinetics::Kinetics`] runs [`kinetics::Diffusion`],
/// [`kinetics::FastExcitation`], and [`kinetics::Recovery`] in order.
pub use panfilov_kinetics as kinetics;

/// Time stepping and orchestration (`panfilov-engine`).
///
/// [`engine::Cluster::run`] validates a [`engine::SimConfig`], spawns one
/// [`engine::Driver`] per worker, and returns a [`engine::RunReport`].
pub use panfilov_engine as engine;

/// Common imports for typical Panfilov usage.
///
/// ```rust
/// use panfilov::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use panfilov_core::{Discretization, ModelParams, Rank, Side, DEFAULT_DT};

    // Errors
    pub use panfilov_core::{ExchangeError, StepError};
    pub use panfilov_engine::{ConfigError, RunError};

    // Grid
    pub use panfilov_grid::FieldStats;

    // Kinetics
    pub use panfilov_kinetics::{InitialCondition, UpdatePass};

    // Engine
    pub use panfilov_engine::{
        Cluster, GlobalSnapshot, NoSnapshots, RunMetrics, RunReport, SimConfig, SnapshotHook,
    };
}
