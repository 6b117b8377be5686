//! Core types for the Panfilov cardiac simulator.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the model parameters of the Aliev–Panfilov formulation, the derived
//! numerical constants, worker identifiers and grid sides, and the
//! error types shared by the exchange and stepping layers.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod params;

pub use error::{ExchangeError, ParamError, Phase, StepError};
pub use id::{Rank, Side};
pub use params::{Discretization, ModelParams, DEFAULT_DT};
