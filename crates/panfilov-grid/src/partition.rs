//! Domain decomposition of the global grid over the worker grid.
//!
//! The global `n × n` grid is split into `py` bands of rows and `px`
//! bands of columns. Every worker gets `n / py` rows and `n / px`
//! columns; the last worker row and column absorb the remainders.
//!
//! ```text
//!          colid 0   colid 1   colid 2
//! rowid 0  rank 0    rank 1    rank 2
//! rowid 1  rank 3    rank 4    rank 5      (px = 3, py = 2)
//! ```

use panfilov_core::{Rank, Side};
use smallvec::SmallVec;

use crate::error::GridError;

/// The logical `px × py` arrangement of workers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorkerTopology {
    /// Worker columns.
    pub px: usize,
    /// Worker rows.
    pub py: usize,
}

impl WorkerTopology {
    /// A `px × py` worker grid.
    pub fn new(px: usize, py: usize) -> Self {
        Self { px, py }
    }

    /// The one-worker topology.
    pub fn single() -> Self {
        Self { px: 1, py: 1 }
    }

    /// Total number of workers, `px * py`.
    pub fn workers(&self) -> usize {
        self.px * self.py
    }
}

/// Rows complete before columns; within an axis the higher-index side
/// goes first.
const EXCHANGE_ORDER: [Side; 4] = [Side::South, Side::North, Side::East, Side::West];

/// Neighbour ranks of one worker; `None` means the worker lies on that
/// edge of the global domain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Neighbours {
    /// Worker above (`rank - px`).
    pub north: Option<Rank>,
    /// Worker below (`rank + px`).
    pub south: Option<Rank>,
    /// Worker to the left (`rank - 1`).
    pub west: Option<Rank>,
    /// Worker to the right (`rank + 1`).
    pub east: Option<Rank>,
}

impl Neighbours {
    /// Neighbour on `side`, if any.
    pub fn get(&self, side: Side) -> Option<Rank> {
        match side {
            Side::North => self.north,
            Side::South => self.south,
            Side::West => self.west,
            Side::East => self.east,
        }
    }

    /// Sides that face another worker, with that worker's rank, in
    /// exchange order: south, north, east, west.
    pub fn linked(&self) -> SmallVec<[(Side, Rank); 4]> {
        EXCHANGE_ORDER
            .into_iter()
            .filter_map(|side| self.get(side).map(|rank| (side, rank)))
            .collect()
    }
}

/// One worker's subdomain: its size, placement, and neighbours.
///
/// Derived once per run by [`Partition::new`] and stored; nothing else
/// recomputes rank arithmetic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Partition {
    /// Global grid size (the grid is square).
    pub n: usize,
    /// Worker grid.
    pub topology: WorkerTopology,
    /// This worker.
    pub rank: Rank,
    /// Worker row, `rank / px`.
    pub rowid: usize,
    /// Worker column, `rank % px`.
    pub colid: usize,
    /// Local interior rows.
    pub rows: usize,
    /// Local interior columns.
    pub cols: usize,
    /// Global row of local interior row 1, zero-based.
    pub row_offset: usize,
    /// Global column of local interior column 1, zero-based.
    pub col_offset: usize,
    /// Adjacent workers.
    pub neighbours: Neighbours,
}

impl Partition {
    /// Compute the subdomain of `rank` in an `n × n` grid split over
    /// `topology`.
    ///
    /// `rank` must be below `topology.workers()`; callers validate the
    /// worker count before partitioning.
    ///
    /// # Examples
    ///
    /// ```
    /// use panfilov_core::Rank;
    /// use panfilov_grid::{Partition, WorkerTopology};
    ///
    /// // 10 columns over 3 workers: 3, 3, and 4 (remainder goes last).
    /// let topo = WorkerTopology::new(3, 1);
    /// let last = Partition::new(10, topo, Rank(2));
    /// assert_eq!(last.cols, 4);
    /// assert_eq!(last.col_offset, 6);
    /// assert_eq!(last.neighbours.west, Some(Rank(1)));
    /// assert_eq!(last.neighbours.east, None);
    /// ```
    pub fn new(n: usize, topology: WorkerTopology, rank: Rank) -> Self {
        debug_assert!(rank.index() < topology.workers(), "rank outside worker grid");
        let WorkerTopology { px, py } = topology;
        let r = rank.index();
        let rowid = r / px;
        let colid = r % px;

        let rows = n / py + if rowid == py - 1 { n % py } else { 0 };
        let cols = n / px + if colid == px - 1 { n % px } else { 0 };

        let neighbours = Neighbours {
            north: (rowid > 0).then(|| Rank(r - px)),
            south: (rowid < py - 1).then(|| Rank(r + px)),
            west: (colid > 0).then(|| Rank(r - 1)),
            east: (colid < px - 1).then(|| Rank(r + 1)),
        };

        Self {
            n,
            topology,
            rank,
            rowid,
            colid,
            rows,
            cols,
            row_offset: rowid * (n / py),
            col_offset: colid * (n / px),
            neighbours,
        }
    }

    /// Partitions of every worker, in rank order.
    pub fn all(n: usize, topology: WorkerTopology) -> Vec<Partition> {
        (0..topology.workers())
            .map(|r| Partition::new(n, topology, Rank(r)))
            .collect()
    }

    /// Whether row neighbours are exchanged at all (`py > 1`).
    pub fn exchanges_rows(&self) -> bool {
        self.topology.py > 1
    }

    /// Whether column neighbours are exchanged at all (`px > 1`).
    pub fn exchanges_columns(&self) -> bool {
        self.topology.px > 1
    }

    /// Global `(row, col)` of local padded interior cell `(row, col)`.
    pub fn to_global(&self, row: usize, col: usize) -> (usize, usize) {
        (self.row_offset + row - 1, self.col_offset + col - 1)
    }
}

/// Stitch per-rank interior payloads into a row-major `n × n` field.
///
/// `parts[r]` must be the row-major interior of rank `r` as produced by
/// [`Grid::interior_to_vec`](crate::Grid::interior_to_vec).
pub fn assemble_global(
    n: usize,
    topology: WorkerTopology,
    parts: &[Vec<f64>],
) -> Result<Vec<f64>, GridError> {
    if parts.len() != topology.workers() {
        return Err(GridError::DimensionMismatch {
            what: "gathered part list",
            expected: topology.workers(),
            got: parts.len(),
        });
    }
    let mut global = vec![0.0; n * n];
    for (part, payload) in Partition::all(n, topology).iter().zip(parts) {
        if payload.len() != part.rows * part.cols {
            return Err(GridError::DimensionMismatch {
                what: "gathered interior",
                expected: part.rows * part.cols,
                got: payload.len(),
            });
        }
        for (j, row) in payload.chunks_exact(part.cols).enumerate() {
            let start = (part.row_offset + j) * n + part.col_offset;
            global[start..start + part.cols].copy_from_slice(row);
        }
    }
    Ok(global)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn single_worker_owns_everything() {
        let p = Partition::new(400, WorkerTopology::single(), Rank(0));
        assert_eq!((p.rows, p.cols), (400, 400));
        assert_eq!((p.row_offset, p.col_offset), (0, 0));
        assert_eq!(p.neighbours, Neighbours::default());
        assert!(p.neighbours.linked().is_empty());
        assert!(!p.exchanges_rows());
        assert!(!p.exchanges_columns());
    }

    #[test]
    fn interior_worker_has_four_neighbours() {
        // 3x3 worker grid, centre is rank 4.
        let p = Partition::new(9, WorkerTopology::new(3, 3), Rank(4));
        assert_eq!((p.rowid, p.colid), (1, 1));
        assert_eq!(p.neighbours.north, Some(Rank(1)));
        assert_eq!(p.neighbours.south, Some(Rank(7)));
        assert_eq!(p.neighbours.west, Some(Rank(3)));
        assert_eq!(p.neighbours.east, Some(Rank(5)));
        let sides: Vec<Side> = p.neighbours.linked().iter().map(|&(s, _)| s).collect();
        assert_eq!(sides, [Side::South, Side::North, Side::East, Side::West]);
        assert_eq!(p.neighbours.linked()[0], (Side::South, Rank(7)));
    }

    #[test]
    fn remainder_goes_to_last_row_and_column() {
        let topo = WorkerTopology::new(2, 3);
        let parts = Partition::all(11, topo);
        // rows: 3, 3, 5 ; cols: 5, 6
        assert_eq!((parts[0].rows, parts[0].cols), (3, 5));
        assert_eq!((parts[1].rows, parts[1].cols), (3, 6));
        assert_eq!((parts[5].rows, parts[5].cols), (5, 6));
        assert_eq!((parts[5].row_offset, parts[5].col_offset), (6, 5));
    }

    #[test]
    fn to_global_maps_padded_coordinates() {
        let p = Partition::new(8, WorkerTopology::new(2, 2), Rank(3));
        assert_eq!(p.to_global(1, 1), (4, 4));
        assert_eq!(p.to_global(4, 4), (7, 7));
    }

    #[test]
    fn assemble_rejects_wrong_part_count() {
        let err = assemble_global(4, WorkerTopology::new(2, 1), &[vec![0.0; 8]]).unwrap_err();
        assert!(matches!(err, GridError::DimensionMismatch { .. }));
    }

    #[test]
    fn assemble_places_each_part() {
        let topo = WorkerTopology::new(2, 2);
        let parts: Vec<Vec<f64>> = (0..4).map(|r| vec![r as f64; 4]).collect();
        let global = assemble_global(4, topo, &parts).unwrap();
        #[rustfmt::skip]
        let expected = vec![
            0.0, 0.0, 1.0, 1.0,
            0.0, 0.0, 1.0, 1.0,
            2.0, 2.0, 3.0, 3.0,
            2.0, 2.0, 3.0, 3.0,
        ];
        assert_eq!(global, expected);
    }

    proptest! {
        #[test]
        fn partitions_tile_the_domain(px in 1usize..6, py in 1usize..6, extra in 0usize..20) {
            let n = px.max(py) + extra;
            let topo = WorkerTopology::new(px, py);
            let parts = Partition::all(n, topo);
            let mut covered = vec![0u8; n * n];
            for p in &parts {
                for r in 0..p.rows {
                    for c in 0..p.cols {
                        covered[(p.row_offset + r) * n + p.col_offset + c] += 1;
                    }
                }
            }
            prop_assert!(covered.iter().all(|&c| c == 1));
        }

        #[test]
        fn neighbour_links_are_symmetric(px in 1usize..6, py in 1usize..6) {
            let topo = WorkerTopology::new(px, py);
            let parts = Partition::all(px * py * 2, topo);
            for p in &parts {
                for (side, peer) in p.neighbours.linked() {
                    let back = parts[peer.index()].neighbours.get(side.opposite());
                    prop_assert_eq!(back, Some(p.rank));
                }
            }
        }
    }
}
