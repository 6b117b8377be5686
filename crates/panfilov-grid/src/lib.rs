//! Grid storage and domain partitioning for Panfilov simulations.
//!
//! # Layout
//!
//! Every worker owns three [`Grid`]s (excitation, previous excitation,
//! recovery) bundled in a [`GridStore`]. Each grid is a single flat
//! row-major buffer with one ghost layer on every side:
//!
//! ```text
//!   col:  0   1 .. cols  cols+1
//! row 0   .   g  ..  g     .      <- ghost row (north)
//!     1   g   i  ..  i     g
//!    ..   g   i  ..  i     g      i = interior, g = ghost
//!  rows   g   i  ..  i     g
//! rows+1  .   g  ..  g     .      <- ghost row (south)
//! ```
//!
//! Corner cells are never read or written.
//!
//! [`Partition`] maps the global `n × n` grid and the `px × py` worker
//! grid to each worker's subdomain and neighbours. [`WorkerPool`] is the
//! fixed-size thread pool that runs a worker's data-parallel loops.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod grid;
pub mod partition;
pub mod pool;
pub mod stats;
pub mod store;

pub use error::GridError;
pub use grid::Grid;
pub use partition::{assemble_global, Neighbours, Partition, WorkerTopology};
pub use pool::WorkerPool;
pub use stats::FieldStats;
pub use store::{GridStore, UpdateViews};
