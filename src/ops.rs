//! The element-wise operation engine and the operator sugar built on it.
//!
//! [`Matrix::combine`] is the single primitive: it walks two same-shaped
//! matrices in lockstep and rebuilds a new matrix from paired results. Every
//! arithmetic operator below is a thin call-through to `combine` (or to
//! [`Matrix::map`] for the unary and scalar cases). None of this is linear
//! algebra; `*` and `/` are element-wise.

use crate::{Matrix, MatrixError};
use std::ops::{Add, Div, Mul, Neg, Sub};
use tracing::trace;

impl<T> Matrix<T> {
    /// Pairs the elements of two same-shaped matrices and applies `op`.
    ///
    /// The two operand element types and the result type are independent;
    /// elements are paired at identical flat index (equivalently identical
    /// coordinate, since both matrices share a shape), and the result takes
    /// that shared shape.
    ///
    /// # Errors
    /// Returns [`MatrixError::ShapeMismatch`] when the shapes differ; no
    /// result is produced in that case.
    ///
    /// # Example
    /// ```
    /// use gridmat::{Matrix, MatrixError, Shape};
    ///
    /// let counts = Matrix::from_flat(Shape::new(1, 2), vec![2, 5]).unwrap();
    /// let labels = Matrix::from_flat(Shape::new(1, 2), vec!["a", "b"]).unwrap();
    /// let tagged = counts
    ///     .combine(&labels, |count, label| format!("{label}{count}"))
    ///     .unwrap();
    /// assert_eq!(tagged.flattened(), vec!["a2", "b5"]);
    ///
    /// let short = Matrix::from_flat(Shape::new(1, 1), vec![1]).unwrap();
    /// let err = counts.combine(&short, |a, b| a + b).unwrap_err();
    /// assert!(matches!(err, MatrixError::ShapeMismatch { .. }));
    /// ```
    pub fn combine<U, V, F>(&self, other: &Matrix<U>, mut op: F) -> Result<Matrix<V>, MatrixError>
    where
        F: FnMut(&T, &U) -> V,
    {
        if self.shape != other.shape {
            return Err(MatrixError::ShapeMismatch {
                lhs: self.shape,
                rhs: other.shape,
            });
        }
        trace!("Combining two {} matrices element-wise", self.shape);
        let cells = self
            .cells
            .iter()
            .zip(other.cells.iter())
            .map(|(lhs, rhs)| op(lhs, rhs))
            .collect();
        Ok(Matrix {
            shape: self.shape,
            cells,
        })
    }
}

/// Generates the element-wise operator impls (owned and borrowed) for one
/// binary operator, each a call-through to [`Matrix::combine`].
macro_rules! elementwise_op {
    ($op_trait:ident, $method:ident, $doc:literal) => {
        #[doc = $doc]
        ///
        /// # Panics
        /// Panics with the [`MatrixError::ShapeMismatch`] message when the
        /// shapes differ; use [`Matrix::combine`] for the fallible form.
        impl<T> $op_trait<&Matrix<T>> for &Matrix<T>
        where
            T: $op_trait<Output = T> + Clone,
        {
            type Output = Matrix<T>;

            fn $method(self, rhs: &Matrix<T>) -> Matrix<T> {
                match self.combine(rhs, |lhs, rhs| lhs.clone().$method(rhs.clone())) {
                    Ok(result) => result,
                    Err(e) => panic!("{e}"),
                }
            }
        }

        #[doc = $doc]
        impl<T> $op_trait for Matrix<T>
        where
            T: $op_trait<Output = T> + Clone,
        {
            type Output = Matrix<T>;

            fn $method(self, rhs: Matrix<T>) -> Matrix<T> {
                (&self).$method(&rhs)
            }
        }
    };
}

elementwise_op!(Add, add, "Element-wise matrix addition.");
elementwise_op!(Sub, sub, "Element-wise matrix subtraction.");
elementwise_op!(Mul, mul, "Element-wise matrix multiplication (not a matrix product).");
elementwise_op!(
    Div,
    div,
    "Element-wise matrix division; a zero divisor follows the element type's own division semantics."
);

/// Element-wise negation.
impl<T> Neg for Matrix<T>
where
    T: Neg<Output = T>,
{
    type Output = Matrix<T>;

    fn neg(self) -> Matrix<T> {
        Matrix {
            shape: self.shape,
            cells: self.cells.into_iter().map(Neg::neg).collect(),
        }
    }
}

/// Element-wise negation, borrowing the operand.
impl<T> Neg for &Matrix<T>
where
    T: Neg<Output = T> + Clone,
{
    type Output = Matrix<T>;

    fn neg(self) -> Matrix<T> {
        self.map(|cell| -cell.clone())
    }
}

/// Multiplies every element by one scalar value.
///
/// # Example
/// ```
/// use gridmat::{Matrix, Shape};
///
/// let m = Matrix::from_flat(Shape::new(1, 3), vec![1, 2, 3]).unwrap();
/// assert_eq!((m * 10).flattened(), vec![10, 20, 30]);
/// ```
impl<T> Mul<T> for Matrix<T>
where
    T: Mul<Output = T> + Clone,
{
    type Output = Matrix<T>;

    fn mul(self, scalar: T) -> Matrix<T> {
        (&self).mul(scalar)
    }
}

/// Multiplies every element by one scalar value, borrowing the matrix.
impl<T> Mul<T> for &Matrix<T>
where
    T: Mul<Output = T> + Clone,
{
    type Output = Matrix<T>;

    fn mul(self, scalar: T) -> Matrix<T> {
        self.map(|cell| cell.clone() * scalar.clone())
    }
}
