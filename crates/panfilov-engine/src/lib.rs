//! Simulation engine for the Panfilov cardiac simulator.
//!
//! [`Cluster::run`] is the entry point: it validates a [`SimConfig`],
//! wires `px * py` workers together, and drives each through the same
//! sequence of timesteps with a [`Driver`]. Every step is
//!
//! ```text
//! t += dt, niter += 1
//! mirror → row exchange → column exchange      (panfilov-halo)
//! diffusion → excitation → recovery            (panfilov-kinetics)
//! barrier → swap → optional global snapshot
//! ```
//!
//! Snapshots are gathered collectively and handed to a
//! [`SnapshotHook`] on the coordinating worker only.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cluster;
pub mod config;
pub mod driver;
pub mod error;
pub mod hook;
pub mod metrics;

pub use cluster::{Cluster, RunReport};
pub use config::{ConfigError, SimConfig};
pub use driver::{Driver, DriverState, WorkerOutcome};
pub use error::RunError;
pub use hook::{GlobalSnapshot, NoSnapshots, SnapshotHook};
pub use metrics::{RunMetrics, StepMetrics};
