//! Worker identifiers and grid sides.

use std::fmt;

/// Linear index of a worker within the worker grid.
///
/// Ranks are assigned row-major: rank `r` sits at worker row `r / px`
/// and worker column `r % px`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rank(pub usize);

impl Rank {
    /// The coordinating worker. Only this rank drives the snapshot hook.
    pub const ROOT: Rank = Rank(0);

    /// Whether this is the coordinating worker.
    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }

    /// The raw index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for Rank {
    fn from(v: usize) -> Self {
        Self(v)
    }
}

/// One of the four sides of a subdomain.
///
/// North is the side with the lowest row index (ghost row 0), west the
/// side with the lowest column index (ghost column 0).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Top edge: ghost row `0`.
    North,
    /// Bottom edge: ghost row `rows + 1`.
    South,
    /// Left edge: ghost column `0`.
    West,
    /// Right edge: ghost column `cols + 1`.
    East,
}

impl Side {
    /// All four sides, rows first.
    pub const ALL: [Side; 4] = [Side::North, Side::South, Side::West, Side::East];

    /// The side facing this one across a shared boundary.
    pub fn opposite(self) -> Self {
        match self {
            Side::North => Side::South,
            Side::South => Side::North,
            Side::West => Side::East,
            Side::East => Side::West,
        }
    }

    /// Whether this side bounds a row (north/south) rather than a column.
    pub fn is_row(self) -> bool {
        matches!(self, Side::North | Side::South)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Side::North => "north",
            Side::South => "south",
            Side::West => "west",
            Side::East => "east",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_involution() {
        for side in Side::ALL {
            assert_eq!(side.opposite().opposite(), side);
            assert_ne!(side.opposite(), side);
        }
    }

    #[test]
    fn row_sides() {
        assert!(Side::North.is_row());
        assert!(Side::South.is_row());
        assert!(!Side::West.is_row());
        assert!(!Side::East.is_row());
    }

    #[test]
    fn root_rank() {
        assert!(Rank(0).is_root());
        assert!(!Rank(3).is_root());
        assert_eq!(Rank::from(7).index(), 7);
        assert_eq!(Rank(5).to_string(), "5");
    }
}
