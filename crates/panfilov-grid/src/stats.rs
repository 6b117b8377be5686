//! Summary statistics of a scalar field.

/// Maximum and L2 statistics over a set of cells.
///
/// Per-worker statistics are combined with [`merge`](FieldStats::merge)
/// (or the equivalent global reductions) to describe the whole domain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldStats {
    /// Largest value seen, `-inf` when empty.
    pub max: f64,
    /// Sum of squared values.
    pub sum_sq: f64,
    /// Number of cells folded in.
    pub cells: u64,
}

impl FieldStats {
    /// Statistics of zero cells.
    pub fn empty() -> Self {
        Self {
            max: f64::NEG_INFINITY,
            sum_sq: 0.0,
            cells: 0,
        }
    }

    /// Fold one more value in.
    pub fn with_value(self, v: f64) -> Self {
        Self {
            max: self.max.max(v),
            sum_sq: self.sum_sq + v * v,
            cells: self.cells + 1,
        }
    }

    /// Combine statistics of two disjoint cell sets.
    pub fn merge(self, other: Self) -> Self {
        Self {
            max: self.max.max(other.max),
            sum_sq: self.sum_sq + other.sum_sq,
            cells: self.cells + other.cells,
        }
    }

    /// Root-mean-square value, `sqrt(sum_sq / cells)`; zero when empty.
    pub fn l2_norm(&self) -> f64 {
        if self.cells == 0 {
            return 0.0;
        }
        (self.sum_sq / self.cells as f64).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_has_zero_norm() {
        let s = FieldStats::empty();
        assert_eq!(s.cells, 0);
        assert_eq!(s.l2_norm(), 0.0);
        assert_eq!(s.max, f64::NEG_INFINITY);
    }

    #[test]
    fn merge_matches_single_pass() {
        let values = [0.5, -2.0, 3.0, 1.0];
        let whole = values
            .iter()
            .fold(FieldStats::empty(), |s, &v| s.with_value(v));
        let left = values[..2]
            .iter()
            .fold(FieldStats::empty(), |s, &v| s.with_value(v));
        let right = values[2..]
            .iter()
            .fold(FieldStats::empty(), |s, &v| s.with_value(v));
        assert_eq!(left.merge(right), whole);
        assert_eq!(whole.max, 3.0);
        assert!((whole.l2_norm() - (14.25f64 / 4.0).sqrt()).abs() < 1e-12);
    }
}
