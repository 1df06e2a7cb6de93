//! This crate provides a generic two-dimensional container over flat,
//! row-major storage: coordinate-based access, shape-preserving transforms,
//! a generic element-wise combination engine, and optional neighbor wiring
//! between stored elements.
//!
//! The pieces, leaves first: [`Shape`] owns the row-major index arithmetic
//! and produces the coordinate sequence ([`Coordinates`]); [`Matrix`]
//! composes a shape with its backing storage and is the public surface for
//! construction, indexing, transforms and row/column views;
//! [`Matrix::combine`] is the two-matrix element-wise engine every arithmetic
//! operator is built on; and [`Matrix::connect`] wires each element of a
//! matrix of [`Connectable`] elements to non-owning handles to its four grid
//! neighbors.
//!
//! This is not a linear-algebra library (no matrix products, determinants or
//! inverses), and it is deliberately single-threaded: every operation runs to
//! completion on the caller's thread with no internal synchronization, so
//! concurrent mutation of one matrix must be prevented by external locking.
//!
//! # Example
//! ```
//! use gridmat::{matrix, Matrix, Shape};
//!
//! let a = matrix![[1, 2], [3, 4]];
//! let b = matrix![[5, 6], [7, 8]];
//! assert_eq!(a + b, matrix![[6, 8], [10, 12]]);
//!
//! let table = Matrix::from_fn(Shape::new(2, 3), |row, column| (row + 1) * (column + 1));
//! assert_eq!(table.flattened(), vec![1, 2, 3, 2, 4, 6]);
//! assert_eq!(table.row(1).unwrap(), &[2, 4, 6]);
//! ```

pub mod connect;
pub mod matrix;
pub mod ops;
pub mod shape;

pub use connect::{CellRef, Connectable, Direction, Linked, Neighbors};
pub use matrix::Matrix;
pub use shape::{Coordinates, Shape};

use smallvec::SmallVec;
use thiserror::Error;

// Determined through benchmarking typical use cases
const DEFAULT_SMALLVEC_SIZE: usize = 32;

/// A type alias for SmallVec with an optimized stack-allocated buffer size.
pub type SmallVecLine<T> = SmallVec<[T; DEFAULT_SMALLVEC_SIZE]>;

/// Errors raised by matrix construction, access, and combination.
///
/// Every condition is detected before any storage mutation; nothing is ever
/// partially applied, and there is no retry or degraded-mode behavior.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixError {
    #[error("{actual} elements cannot fill a {shape} matrix (need {})", .shape.cell_count())]
    LengthMismatch { shape: Shape, actual: usize },

    #[error("shapes differ: {lhs} vs {rhs}")]
    ShapeMismatch { lhs: Shape, rhs: Shape },

    #[error("flat index {index} out of range for a {shape} matrix")]
    IndexOutOfRange { index: usize, shape: Shape },

    #[error("coordinate ({row}, {column}) out of range for a {shape} matrix")]
    CoordinateOutOfRange {
        row: usize,
        column: usize,
        shape: Shape,
    },

    #[error("row {row} out of range for a {shape} matrix")]
    RowOutOfRange { row: usize, shape: Shape },

    #[error("column {column} out of range for a {shape} matrix")]
    ColumnOutOfRange { column: usize, shape: Shape },
}

/// Creates a [`Matrix`] from row literals.
///
/// Each bracketed group is one row; rows are flattened row-major through
/// [`Matrix::from_rows`].
///
/// # Panics
/// Panics when the rows have differing lengths.
///
/// # Examples
///
/// ```
/// use gridmat::{matrix, Shape};
///
/// let m = matrix![
///     [1, 2, 3],
///     [4, 5, 6],
/// ];
/// assert_eq!(m.shape(), Shape::new(2, 3));
/// assert_eq!(m[(1, 0)], 4);
/// ```
#[macro_export]
macro_rules! matrix {
    ($([$($cell:expr),* $(,)?]),+ $(,)?) => {
        $crate::Matrix::from_rows(vec![$(vec![$($cell),*]),+])
            .expect("matrix! rows must all have the same length")
    };
}
