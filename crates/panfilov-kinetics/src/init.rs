//! Initial excitation and recovery fields.

use std::fmt;
use std::sync::Arc;

use panfilov_grid::{GridStore, Partition};

/// Seed function for [`InitialCondition::Custom`]: global zero-based
/// `(row, col)` to `(E, R)`.
pub type SeedFn = dyn Fn(usize, usize) -> (f64, f64) + Send + Sync;

/// How a run's fields start out.
///
/// Every variant is a pure function of the global cell, so each worker
/// seeds its own subdomain without communication and any decomposition
/// starts from the same global state.
#[derive(Clone, Default)]
pub enum InitialCondition {
    /// `E = 0` and `R = 0` everywhere.
    #[default]
    Quiescent,
    /// `E = 1` on the right half (global column `>= n/2`) and `R = 1` on
    /// the bottom half (global row `>= n/2`). Produces a spiral wave.
    PlanarWave,
    /// Arbitrary per-cell seeding.
    Custom(Arc<SeedFn>),
}

impl InitialCondition {
    /// Wrap a seed closure.
    ///
    /// # Examples
    ///
    /// ```
    /// use panfilov_kinetics::InitialCondition;
    ///
    /// let ic = InitialCondition::custom(|row, col| {
    ///     if (row, col) == (1, 1) { (1.0, 0.0) } else { (0.0, 0.0) }
    /// });
    /// assert_eq!(ic.sample(4, 1, 1), (1.0, 0.0));
    /// assert_eq!(ic.sample(4, 0, 0), (0.0, 0.0));
    /// ```
    pub fn custom(f: impl Fn(usize, usize) -> (f64, f64) + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(f))
    }

    /// `(E, R)` at global cell `(row, col)` of an `n × n` grid.
    pub fn sample(&self, n: usize, row: usize, col: usize) -> (f64, f64) {
        match self {
            Self::Quiescent => (0.0, 0.0),
            Self::PlanarWave => {
                let half = n / 2;
                let e = if col >= half { 1.0 } else { 0.0 };
                let r = if row >= half { 1.0 } else { 0.0 };
                (e, r)
            }
            Self::Custom(f) => f(row, col),
        }
    }

    /// Write this condition into the current excitation and recovery
    /// grids of `store`, which holds `partition`'s subdomain.
    ///
    /// Ghost cells and the next-step buffer are left at zero.
    pub fn apply(&self, store: &mut GridStore, partition: &Partition) {
        if matches!(self, Self::Quiescent) {
            return;
        }
        let n = partition.n;
        store.excitation_prev_mut().fill_interior(|row, col| {
            let (gr, gc) = partition.to_global(row, col);
            self.sample(n, gr, gc).0
        });
        store.recovery_mut().fill_interior(|row, col| {
            let (gr, gc) = partition.to_global(row, col);
            self.sample(n, gr, gc).1
        });
    }
}

impl fmt::Debug for InitialCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quiescent => f.write_str("Quiescent"),
            Self::PlanarWave => f.write_str("PlanarWave"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl fmt::Display for InitialCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quiescent => f.write_str("quiescent"),
            Self::PlanarWave => f.write_str("planar-wave"),
            Self::Custom(_) => f.write_str("custom"),
        }
    }
}
