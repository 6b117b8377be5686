//! Halo exchange for Panfilov simulations.
//!
//! Before every stencil pass a worker's previous-excitation grid must
//! have ghost cells that reflect either the no-flux boundary condition
//! (on the global domain edge) or the current interior of the adjacent
//! worker. [`HaloExchange::refresh`] does this in three strictly ordered
//! phases:
//!
//! 1. [`mirror_edges`]: second-order mirror on all four sides.
//! 2. Row exchange with north/south neighbours (only when `py > 1`).
//! 3. Column exchange with west/east neighbours (only when `px > 1`),
//!    through contiguous pack buffers.
//!
//! Workers talk only through a [`Transport`]. [`ChannelMesh`] wires a
//! set of in-process workers with per-peer channels; [`LocalTransport`]
//! serves the single-worker case.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod exchange;
pub mod local;
pub mod mesh;
pub mod mirror;
pub mod transport;

pub use exchange::HaloExchange;
pub use local::LocalTransport;
pub use mesh::{ChannelMesh, MeshEndpoint};
pub use mirror::mirror_edges;
pub use transport::{Tag, Transport};
