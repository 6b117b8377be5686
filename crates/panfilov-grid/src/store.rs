//! The per-worker excitation/recovery grid triple.
//!
//! [`GridStore`] owns the three grids a worker integrates:
//!
//! ```text
//! excitation_prev : E at the current step (halo-exchanged, stencil source)
//! excitation      : E at the next step (written by the update passes)
//! recovery        : R, updated in place
//! ```
//!
//! After each step [`swap`](GridStore::swap) exchanges the roles of the
//! two excitation buffers, so the freshly computed field becomes the
//! next step's source and the stale buffer is reused as the next
//! destination. Nothing is reallocated after construction.

use crate::error::GridError;
use crate::grid::Grid;

/// Split borrows handed to the update passes for one step.
///
/// Holding a `UpdateViews` mutably borrows the whole store, so no other
/// access can interleave with an update.
#[must_use]
pub struct UpdateViews<'a> {
    /// Destination for the next excitation field.
    pub next: &'a mut Grid,
    /// Current excitation field, read-only during the update.
    pub prev: &'a Grid,
    /// Recovery field, updated in place.
    pub recovery: &'a mut Grid,
}

/// The three grids of one worker.
#[derive(Clone, Debug)]
pub struct GridStore {
    excitation: Grid,
    excitation_prev: Grid,
    recovery: Grid,
    swaps: u64,
}

impl GridStore {
    /// Allocate three zero-filled grids of the given interior size.
    pub fn new(rows: usize, cols: usize) -> Result<Self, GridError> {
        Ok(Self {
            excitation: Grid::new(rows, cols)?,
            excitation_prev: Grid::new(rows, cols)?,
            recovery: Grid::new(rows, cols)?,
            swaps: 0,
        })
    }

    /// Interior rows of every grid in the store.
    pub fn rows(&self) -> usize {
        self.recovery.rows()
    }

    /// Interior columns of every grid in the store.
    pub fn cols(&self) -> usize {
        self.recovery.cols()
    }

    /// Next-step excitation buffer.
    pub fn excitation(&self) -> &Grid {
        &self.excitation
    }

    /// Current excitation buffer.
    pub fn excitation_prev(&self) -> &Grid {
        &self.excitation_prev
    }

    /// Current excitation buffer, mutably (halo exchange and seeding).
    pub fn excitation_prev_mut(&mut self) -> &mut Grid {
        &mut self.excitation_prev
    }

    /// Recovery buffer.
    pub fn recovery(&self) -> &Grid {
        &self.recovery
    }

    /// Recovery buffer, mutably.
    pub fn recovery_mut(&mut self) -> &mut Grid {
        &mut self.recovery
    }

    /// The most recently completed excitation field.
    ///
    /// Between steps (after [`swap`](Self::swap)) this is the
    /// previous-excitation buffer.
    pub fn current(&self) -> &Grid {
        &self.excitation_prev
    }

    /// Borrow the buffers for one update step.
    pub fn update_views(&mut self) -> UpdateViews<'_> {
        UpdateViews {
            next: &mut self.excitation,
            prev: &self.excitation_prev,
            recovery: &mut self.recovery,
        }
    }

    /// Exchange the roles of the two excitation buffers.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.excitation, &mut self.excitation_prev);
        self.swaps += 1;
    }

    /// Number of swaps since construction.
    pub fn swaps(&self) -> u64 {
        self.swaps
    }
}
