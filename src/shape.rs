use crate::MatrixError;
use std::fmt;
use std::iter::FusedIterator;

/// The immutable (rows, columns) extent of a [`Matrix`](crate::Matrix).
///
/// A `Shape` owns the row-major index arithmetic every other component relies
/// on: a coordinate `(row, column)` maps to the flat index
/// `row * columns + column`, and both views are always interconvertible.
///
/// # Example
/// ```
/// use gridmat::Shape;
///
/// let shape = Shape::new(2, 3);
/// assert_eq!(shape.cell_count(), 6);
/// assert_eq!(shape.flat_index(1, 2).unwrap(), 5);
/// assert_eq!(shape.coordinate_of(5).unwrap(), (1, 2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Shape {
    pub rows: usize,
    pub columns: usize,
}

impl Shape {
    /// Creates a new `Shape` with the given dimensions.
    ///
    /// Either dimension may be zero, in which case the shape holds no cells.
    pub fn new(rows: usize, columns: usize) -> Self {
        Self { rows, columns }
    }

    /// Total number of cells, `rows * columns`.
    pub fn cell_count(&self) -> usize {
        self.rows * self.columns
    }

    /// Returns `true` if `(row, column)` lies inside the shape.
    ///
    /// # Example
    /// ```
    /// use gridmat::Shape;
    ///
    /// let shape = Shape::new(2, 3);
    /// assert!(shape.contains(1, 2));
    /// assert!(!shape.contains(2, 0));
    /// ```
    pub fn contains(&self, row: usize, column: usize) -> bool {
        row < self.rows && column < self.columns
    }

    /// Maps a coordinate to its row-major flat index.
    ///
    /// # Errors
    /// Returns [`MatrixError::CoordinateOutOfRange`] when the coordinate lies
    /// outside the shape.
    pub fn flat_index(&self, row: usize, column: usize) -> Result<usize, MatrixError> {
        if self.contains(row, column) {
            Ok(row * self.columns + column)
        } else {
            Err(MatrixError::CoordinateOutOfRange {
                row,
                column,
                shape: *self,
            })
        }
    }

    /// Maps a row-major flat index back to its coordinate.
    ///
    /// # Errors
    /// Returns [`MatrixError::IndexOutOfRange`] when `index >= cell_count()`.
    pub fn coordinate_of(&self, index: usize) -> Result<(usize, usize), MatrixError> {
        if index < self.cell_count() {
            Ok((index / self.columns, index % self.columns))
        } else {
            Err(MatrixError::IndexOutOfRange {
                index,
                shape: *self,
            })
        }
    }

    /// Returns a lazy iterator over every coordinate in row-major order.
    ///
    /// The column varies fastest, wrapping to the next row when it reaches
    /// `columns`; exactly [`cell_count`](Self::cell_count) pairs are produced.
    /// Each call starts fresh at `(0, 0)`, and a zero-sized shape yields
    /// nothing.
    ///
    /// # Example
    /// ```
    /// use gridmat::Shape;
    ///
    /// let coords: Vec<_> = Shape::new(2, 2).coordinates().collect();
    /// assert_eq!(coords, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    /// assert_eq!(Shape::new(0, 5).coordinates().count(), 0);
    /// ```
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            shape: *self,
            index: 0,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.columns)
    }
}

impl From<(usize, usize)> for Shape {
    fn from((rows, columns): (usize, usize)) -> Self {
        Shape::new(rows, columns)
    }
}

/// A lazy row-major producer of `(row, column)` pairs for a [`Shape`].
///
/// Created by [`Shape::coordinates`]. Drives every construction path that
/// needs per-cell initialization as well as coordinate-aware enumeration.
#[derive(Debug, Clone)]
pub struct Coordinates {
    shape: Shape,
    index: usize,
}

impl Iterator for Coordinates {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.shape.cell_count() {
            return None;
        }
        let coordinate = (
            self.index / self.shape.columns,
            self.index % self.shape.columns,
        );
        self.index += 1;
        Some(coordinate)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.shape.cell_count() - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Coordinates {}
impl FusedIterator for Coordinates {}
