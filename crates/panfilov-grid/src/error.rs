//! Grid-specific error types.

use std::error::Error;
use std::fmt;

/// Errors from grid allocation and assembly.
///
/// Allocation failures are fatal: a partially allocated simulation
/// cannot proceed, so callers propagate these straight to process exit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridError {
    /// A grid was requested with zero interior rows or columns.
    EmptyGrid {
        /// Requested interior rows.
        rows: usize,
        /// Requested interior columns.
        cols: usize,
    },
    /// The padded cell count does not fit in `usize`.
    SizeOverflow {
        /// Requested interior rows.
        rows: usize,
        /// Requested interior columns.
        cols: usize,
    },
    /// The allocator refused the request.
    AllocationFailed {
        /// Number of bytes requested.
        bytes: usize,
    },
    /// A buffer did not have the length its layout requires.
    DimensionMismatch {
        /// What the buffer was for.
        what: &'static str,
        /// Required length.
        expected: usize,
        /// Actual length.
        got: usize,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid { rows, cols } => {
                write!(f, "grid must have at least one interior cell, got {rows}x{cols}")
            }
            Self::SizeOverflow { rows, cols } => {
                write!(f, "padded size of a {rows}x{cols} grid overflows usize")
            }
            Self::AllocationFailed { bytes } => {
                write!(f, "grid allocation of {bytes} bytes failed")
            }
            Self::DimensionMismatch {
                what,
                expected,
                got,
            } => write!(f, "{what} has {got} values, expected {expected}"),
        }
    }
}

impl Error for GridError {}
