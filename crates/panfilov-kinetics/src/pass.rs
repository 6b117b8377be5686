//! The [`UpdatePass`] trait and its per-step context.

use panfilov_core::{Discretization, ModelParams};
use panfilov_grid::UpdateViews;

/// Constants an update pass may read. Fixed for the whole run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PassContext {
    /// Model constants.
    pub params: ModelParams,
    /// Timestep and diffusion number.
    pub disc: Discretization,
}

/// One complete sweep over a worker's interior cells.
///
/// # Contract
///
/// - `apply()` writes every interior cell of the field it owns and
///   nothing else; ghost cells are never written.
/// - Each cell is computed independently from values that no other
///   iteration of the same pass writes, so row-parallel execution gives
///   the same bits as a serial sweep.
/// - Parallel iterators run on whatever pool the caller installed.
///
/// Object-safe; [`Kinetics`](crate::Kinetics) stores passes as
/// `Vec<Box<dyn UpdatePass>>`.
pub trait UpdatePass: Send + Sync + std::fmt::Debug {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Run the pass over `views`.
    fn apply(&self, views: &mut UpdateViews<'_>, ctx: &PassContext);
}
