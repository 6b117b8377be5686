//! Test utilities for Panfilov development.
//!
//! - [`SerialModel`]: a deliberately plain single-threaded integrator on
//!   one global grid, used as ground truth for decomposed runs.
//! - [`fixtures`]: seeded random fields and cell labels.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
mod serial;

pub use fixtures::{global_label, random_field};
pub use serial::SerialModel;
