//! Stencil and reaction updates of the Aliev–Panfilov model.
//!
//! One timestep on a haloed grid store is three complete passes over
//! the interior, run in this order by [`Kinetics::advance`]:
//!
//! | Pass | Struct | Reads | Writes |
//! |------|--------|-------|--------|
//! | A | [`Diffusion`] | `E_prev` (with ghosts) | `E` |
//! | B | [`FastExcitation`] | `E`, `R` | `E` |
//! | C | [`Recovery`] | `E`, `R` | `R` |
//!
//! Each pass is row-parallel on the worker's pool and ends with the
//! implicit join of its parallel region, so no pass observes a partial
//! result of the previous one.
//!
//! [`InitialCondition`] seeds a worker's store before the first step.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod diffusion;
pub mod excitation;
pub mod init;
pub mod pass;
pub mod pipeline;
pub mod recovery;

pub use diffusion::Diffusion;
pub use excitation::FastExcitation;
pub use init::{InitialCondition, SeedFn};
pub use pass::{PassContext, UpdatePass};
pub use pipeline::Kinetics;
pub use recovery::Recovery;
