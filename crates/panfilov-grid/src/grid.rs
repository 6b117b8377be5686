//! Padded 2D scalar grid backed by one flat buffer.

use rayon::prelude::*;
use rayon::slice::{ChunksExact, ChunksExactMut};

use crate::error::GridError;
use crate::stats::FieldStats;

/// A `rows × cols` interior of `f64` cells surrounded by one ghost layer.
///
/// Stored as a single row-major buffer of `(rows + 2) * (cols + 2)`
/// values; `idx(row, col) = row * stride + col` with
/// `stride = cols + 2`. Interior cells occupy rows `1..=rows` and
/// columns `1..=cols`.
///
/// # Examples
///
/// ```
/// use panfilov_grid::Grid;
///
/// let mut g = Grid::new(3, 4).unwrap();
/// assert_eq!(g.stride(), 6);
/// g.set(1, 1, 2.5);
/// assert_eq!(g.as_slice()[g.idx(1, 1)], 2.5);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    stride: usize,
    data: Vec<f64>,
}

impl Grid {
    /// Allocate a zero-filled grid with the given interior size.
    ///
    /// The buffer is reserved fallibly: an allocator refusal is reported
    /// as [`GridError::AllocationFailed`] rather than aborting.
    pub fn new(rows: usize, cols: usize) -> Result<Self, GridError> {
        if rows == 0 || cols == 0 {
            return Err(GridError::EmptyGrid { rows, cols });
        }
        let len = rows
            .checked_add(2)
            .zip(cols.checked_add(2))
            .and_then(|(r, c)| r.checked_mul(c))
            .ok_or(GridError::SizeOverflow { rows, cols })?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| GridError::AllocationFailed {
                bytes: len.saturating_mul(std::mem::size_of::<f64>()),
            })?;
        data.resize(len, 0.0);
        Ok(Self {
            rows,
            cols,
            stride: cols + 2,
            data,
        })
    }

    /// Number of interior rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of interior columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Length of one padded row (`cols + 2`).
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Flat index of `(row, col)` in padded coordinates.
    #[inline(always)]
    pub fn idx(&self, row: usize, col: usize) -> usize {
        row * self.stride + col
    }

    /// Value at `(row, col)` in padded coordinates.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[self.idx(row, col)]
    }

    /// Overwrite the value at `(row, col)` in padded coordinates.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        let i = self.idx(row, col);
        self.data[i] = value;
    }

    /// The whole padded buffer.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// The whole padded buffer, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Interior part (columns `1..=cols`) of padded row `row`.
    pub fn interior_row(&self, row: usize) -> &[f64] {
        let start = self.idx(row, 1);
        &self.data[start..start + self.cols]
    }

    /// Interior part of padded row `row`, mutably.
    pub fn interior_row_mut(&mut self, row: usize) -> &mut [f64] {
        let start = self.idx(row, 1);
        let cols = self.cols;
        &mut self.data[start..start + cols]
    }

    /// Borrow the interior part of `src_row` for reading and of
    /// `dst_row` for writing at the same time.
    ///
    /// Used by the row exchange to send one row while receiving into
    /// another of the same grid.
    ///
    /// # Panics
    ///
    /// Panics if `src_row == dst_row`.
    pub fn row_pair_mut(&mut self, src_row: usize, dst_row: usize) -> (&[f64], &mut [f64]) {
        assert_ne!(src_row, dst_row, "row_pair_mut needs two distinct rows");
        let cols = self.cols;
        let src_start = self.idx(src_row, 1);
        let dst_start = self.idx(dst_row, 1);
        if src_start < dst_start {
            let (lo, hi) = self.data.split_at_mut(dst_start);
            (&lo[src_start..src_start + cols], &mut hi[..cols])
        } else {
            let (lo, hi) = self.data.split_at_mut(src_start);
            (&hi[..cols], &mut lo[dst_start..dst_start + cols])
        }
    }

    /// Copy the interior part of row `src` over the interior part of row
    /// `dst`.
    pub fn copy_row(&mut self, src: usize, dst: usize) {
        let src_start = self.idx(src, 1);
        let dst_start = self.idx(dst, 1);
        self.data
            .copy_within(src_start..src_start + self.cols, dst_start);
    }

    /// Parallel iterator over the padded interior rows `1..=rows`.
    ///
    /// Each item is a full padded row of `stride` values, so index `0`
    /// and `cols + 1` are that row's ghost cells.
    pub fn par_interior_rows_mut(&mut self) -> ChunksExactMut<'_, f64> {
        let start = self.stride;
        let end = (self.rows + 1) * self.stride;
        self.data[start..end].par_chunks_exact_mut(self.stride)
    }

    /// Read-only counterpart of
    /// [`par_interior_rows_mut`](Self::par_interior_rows_mut).
    pub fn par_interior_rows(&self) -> ChunksExact<'_, f64> {
        let start = self.stride;
        let end = (self.rows + 1) * self.stride;
        self.data[start..end].par_chunks_exact(self.stride)
    }

    /// Copy interior column `col` (rows `1..=rows`) into `out`.
    ///
    /// # Panics
    ///
    /// Panics if `out.len() != rows`.
    pub fn pack_column(&self, col: usize, out: &mut [f64]) {
        assert_eq!(out.len(), self.rows, "column buffer length");
        let stride = self.stride;
        let data = &self.data;
        out.par_iter_mut().enumerate().for_each(|(j, v)| {
            *v = data[(j + 1) * stride + col];
        });
    }

    /// Write `values` into column `col` for rows `1..=rows`.
    ///
    /// # Panics
    ///
    /// Panics if `values.len() != rows`.
    pub fn unpack_column(&mut self, col: usize, values: &[f64]) {
        assert_eq!(values.len(), self.rows, "column buffer length");
        self.par_interior_rows_mut()
            .zip(values.par_iter())
            .for_each(|(row, &v)| row[col] = v);
    }

    /// Set every interior cell from `f(row, col)` (1-based padded
    /// coordinates). Ghost cells are left untouched.
    pub fn fill_interior(&mut self, mut f: impl FnMut(usize, usize) -> f64) {
        for row in 1..=self.rows {
            for col in 1..=self.cols {
                let i = self.idx(row, col);
                self.data[i] = f(row, col);
            }
        }
    }

    /// Copy the interior into a fresh row-major `rows × cols` vector.
    pub fn interior_to_vec(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.rows * self.cols);
        for row in 1..=self.rows {
            out.extend_from_slice(self.interior_row(row));
        }
        out
    }

    /// Maximum and sum of squares over the interior.
    pub fn stats(&self) -> FieldStats {
        (1..=self.rows)
            .flat_map(|row| self.interior_row(row).iter().copied())
            .fold(FieldStats::empty(), |acc, v| acc.with_value(v))
    }
}
