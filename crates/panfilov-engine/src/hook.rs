//! Observation of the global field during a run.

use panfilov_grid::FieldStats;

/// The whole `n × n` excitation field at one step, assembled from every
/// worker's interior.
#[derive(Clone, Debug, PartialEq)]
pub struct GlobalSnapshot {
    /// Simulated time after the step.
    pub t: f64,
    /// Completed steps.
    pub niter: u64,
    /// Grid size.
    pub n: usize,
    /// Row-major excitation values, `n * n` long.
    pub excitation: Vec<f64>,
}

impl GlobalSnapshot {
    /// Excitation at global zero-based `(row, col)`, `None` outside the
    /// grid.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.n || col >= self.n {
            return None;
        }
        self.excitation.get(row * self.n + col).copied()
    }

    /// Global row `row`, `None` outside the grid.
    pub fn row(&self, row: usize) -> Option<&[f64]> {
        if row >= self.n {
            return None;
        }
        self.excitation.get(row * self.n..(row + 1) * self.n)
    }

    /// Maximum and L2 statistics of the field.
    pub fn stats(&self) -> FieldStats {
        self.excitation
            .iter()
            .fold(FieldStats::empty(), |acc, &v| acc.with_value(v))
    }
}

/// Receives periodic global snapshots on the coordinating worker.
///
/// Called synchronously from the stepping loop; every other worker
/// waits at the next step's first exchange until the hook returns.
pub trait SnapshotHook {
    /// Observe one snapshot.
    fn on_snapshot(&mut self, snapshot: &GlobalSnapshot);
}

impl<F: FnMut(&GlobalSnapshot)> SnapshotHook for F {
    fn on_snapshot(&mut self, snapshot: &GlobalSnapshot) {
        self(snapshot)
    }
}

/// A hook that ignores every snapshot.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSnapshots;

impl SnapshotHook for NoSnapshots {
    fn on_snapshot(&mut self, _snapshot: &GlobalSnapshot) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_index_row_major() {
        let s = GlobalSnapshot {
            t: 0.2,
            niter: 2,
            n: 2,
            excitation: vec![1.0, 2.0, 3.0, 4.0],
        };
        assert_eq!(s.get(1, 0), Some(3.0));
        assert_eq!(s.row(0), Some(&[1.0, 2.0][..]));
        assert_eq!(s.stats().max, 4.0);
        assert_eq!(s.stats().sum_sq, 30.0);
    }

    #[test]
    fn accessors_reject_out_of_range_cells() {
        let s = GlobalSnapshot {
            t: 0.2,
            niter: 2,
            n: 2,
            excitation: vec![1.0, 2.0, 3.0, 4.0],
        };
        // (0, 2) would alias (1, 0) in the flat buffer.
        assert_eq!(s.get(0, 2), None);
        assert_eq!(s.get(2, 0), None);
        assert_eq!(s.row(2), None);
    }

    #[test]
    fn closures_are_hooks() {
        let mut seen = Vec::new();
        {
            let mut hook = |s: &GlobalSnapshot| seen.push(s.niter);
            let s = GlobalSnapshot {
                t: 0.1,
                niter: 1,
                n: 1,
                excitation: vec![0.0],
            };
            hook.on_snapshot(&s);
            NoSnapshots.on_snapshot(&s);
        }
        assert_eq!(seen, vec![1]);
    }
}
