//! No-flux boundary condition by second-order mirroring.

use panfilov_grid::Grid;
use rayon::prelude::*;

/// Fill all four ghost layers of `grid` by reflecting about the first
/// interior row or column:
///
/// ```text
/// ghost row 0        <- interior row 2
/// ghost row rows+1   <- interior row rows-1
/// ghost col 0        <- interior col 2
/// ghost col cols+1   <- interior col cols-1
/// ```
///
/// Runs on every side regardless of neighbours; the exchange phases that
/// follow overwrite the sides that face another worker. Corner cells are
/// left untouched. Parallel loops use the calling thread pool.
///
/// The grid needs at least two interior rows and columns.
pub fn mirror_edges(grid: &mut Grid) {
    let rows = grid.rows();
    let cols = grid.cols();
    debug_assert!(rows >= 2 && cols >= 2, "mirroring needs a 2x2 interior");

    grid.copy_row(2, 0);
    grid.copy_row(rows - 1, rows + 1);

    grid.par_interior_rows_mut().for_each(|row| {
        row[0] = row[2];
        row[cols + 1] = row[cols - 1];
    });
}
