use crate::{MatrixError, Shape, SmallVecLine};
use std::convert::Infallible;
use std::ops::{Index, IndexMut};
use tracing::trace;

/// A fixed-shape two-dimensional container over flat, row-major storage.
///
/// A `Matrix<T>` composes a [`Shape`] with a backing `Vec<T>` of exactly
/// `shape.cell_count()` elements; elements of a row are contiguous. The
/// matrix has value semantics: cloning it clones the element collection, and
/// two independent clones never alias (unless `T` itself carries references).
///
/// Two matrices are equal iff their shapes are equal and their flattened
/// element sequences are pairwise equal; matrices of differing shape are
/// always unequal, never an error.
///
/// Not thread-safe by design: no internal synchronization is performed, and
/// concurrent mutation must be prevented by external locking if needed.
///
/// # Example
/// ```
/// use gridmat::{Matrix, Shape};
///
/// let m = Matrix::from_fn(Shape::new(2, 3), |row, column| (row + 1) * (column + 1));
/// assert_eq!(m.flattened(), vec![1, 2, 3, 2, 4, 6]);
/// assert_eq!(m.row(1).unwrap(), &[2, 4, 6]);
/// assert_eq!(m.column(2).unwrap().as_slice(), &[3, 6]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Matrix<T> {
    pub(crate) shape: Shape,
    pub(crate) cells: Vec<T>,
}

impl<T> Matrix<T> {
    /// Creates a matrix with every cell set to `value`.
    ///
    /// If `T` has interior reference semantics, all cells share that state;
    /// this is documented, not prevented.
    ///
    /// # Example
    /// ```
    /// use gridmat::{Matrix, Shape};
    ///
    /// let m = Matrix::filled(Shape::new(2, 2), 7);
    /// assert!(m.iter().all(|&cell| cell == 7));
    /// ```
    pub fn filled(shape: Shape, value: T) -> Self
    where
        T: Clone,
    {
        trace!("Filling {shape} matrix with a single value");
        Self {
            shape,
            cells: vec![value; shape.cell_count()],
        }
    }

    /// Creates a matrix from a flat row-major element sequence.
    ///
    /// # Errors
    /// Returns [`MatrixError::LengthMismatch`] unless the sequence holds
    /// exactly `shape.cell_count()` elements. Nothing is partially applied.
    ///
    /// # Example
    /// ```
    /// use gridmat::{Matrix, MatrixError, Shape};
    ///
    /// let m = Matrix::from_flat(Shape::new(2, 2), vec![1, 2, 3, 4]).unwrap();
    /// assert_eq!(m[(1, 0)], 3);
    ///
    /// let err = Matrix::<i32>::from_flat(Shape::new(2, 2), vec![1, 2, 3]).unwrap_err();
    /// assert!(matches!(err, MatrixError::LengthMismatch { .. }));
    /// ```
    pub fn from_flat(shape: Shape, cells: Vec<T>) -> Result<Self, MatrixError> {
        trace!("Building {shape} matrix from {} flat elements", cells.len());
        if cells.len() != shape.cell_count() {
            return Err(MatrixError::LengthMismatch {
                shape,
                actual: cells.len(),
            });
        }
        Ok(Self { shape, cells })
    }

    /// Creates a matrix from nested rows of elements.
    ///
    /// The rows are flattened row-major and handed to [`from_flat`]; the
    /// shape is taken from the outer length and the first row's length.
    ///
    /// # Errors
    /// Returns [`MatrixError::LengthMismatch`] when the rows are ragged.
    ///
    /// # Example
    /// ```
    /// use gridmat::Matrix;
    ///
    /// let m = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
    /// assert_eq!(m.shape().rows, 2);
    /// assert_eq!(m.flattened(), vec![1, 2, 3, 4]);
    /// ```
    ///
    /// [`from_flat`]: Self::from_flat
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, MatrixError> {
        let shape = Shape::new(rows.len(), rows.first().map_or(0, Vec::len));
        let cells: Vec<T> = rows.into_iter().flatten().collect();
        Self::from_flat(shape, cells)
    }

    /// Creates a matrix by invoking `source` once per coordinate.
    ///
    /// Invocation order is row-major, driven by [`Shape::coordinates`]; that
    /// order is the documented guarantee if `source` has side effects.
    ///
    /// # Example
    /// ```
    /// use gridmat::{Matrix, Shape};
    ///
    /// let m = Matrix::from_fn(Shape::new(2, 2), |row, column| row * 10 + column);
    /// assert_eq!(m.flattened(), vec![0, 1, 10, 11]);
    /// ```
    pub fn from_fn<F>(shape: Shape, mut source: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        match Self::try_from_fn(shape, |row, column| {
            Ok::<T, Infallible>(source(row, column))
        }) {
            Ok(matrix) => matrix,
            Err(absurd) => match absurd {},
        }
    }

    /// Fallible variant of [`from_fn`](Self::from_fn).
    ///
    /// # Errors
    /// A failure from `source` aborts construction and is propagated
    /// unchanged; no partial matrix is observable.
    ///
    /// # Example
    /// ```
    /// use gridmat::{Matrix, Shape};
    ///
    /// let m = Matrix::try_from_fn(Shape::new(2, 2), |row, column| {
    ///     if row == column { Ok(1) } else { Err("off-diagonal") }
    /// });
    /// assert_eq!(m, Err("off-diagonal"));
    /// ```
    pub fn try_from_fn<E, F>(shape: Shape, mut source: F) -> Result<Self, E>
    where
        F: FnMut(usize, usize) -> Result<T, E>,
    {
        trace!("Building {shape} matrix from a data source");
        let cells = shape
            .coordinates()
            .map(|(row, column)| source(row, column))
            .collect::<Result<Vec<T>, E>>()?;
        Ok(Self { shape, cells })
    }

    /// Rebuilds every cell from `source`, preserving the shape.
    ///
    /// Same contract as [`from_fn`](Self::from_fn), but in place.
    pub fn repopulate_with<F>(&mut self, mut source: F)
    where
        F: FnMut(usize, usize) -> T,
    {
        match self.try_repopulate_with(|row, column| Ok::<T, Infallible>(source(row, column))) {
            Ok(()) => (),
            Err(absurd) => match absurd {},
        }
    }

    /// Fallible variant of [`repopulate_with`](Self::repopulate_with).
    ///
    /// # Errors
    /// A failure from `source` is propagated unchanged and leaves the
    /// existing storage untouched; no partially repopulated state is
    /// observable.
    pub fn try_repopulate_with<E, F>(&mut self, mut source: F) -> Result<(), E>
    where
        F: FnMut(usize, usize) -> Result<T, E>,
    {
        trace!("Repopulating {} matrix in place", self.shape);
        // Stage the full replacement first so a failing source commits nothing.
        let cells = self
            .shape
            .coordinates()
            .map(|(row, column)| source(row, column))
            .collect::<Result<Vec<T>, E>>()?;
        self.cells = cells;
        Ok(())
    }

    /// The matrix's [`Shape`].
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.shape.rows
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.shape.columns
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.shape.cell_count()
    }

    /// Returns `true` when the matrix holds no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the element at `(row, column)`.
    ///
    /// # Errors
    /// Returns [`MatrixError::CoordinateOutOfRange`] when the coordinate lies
    /// outside the shape. See [`get`](Self::get) for the non-failing lookup.
    pub fn cell(&self, row: usize, column: usize) -> Result<&T, MatrixError> {
        let index = self.shape.flat_index(row, column)?;
        Ok(&self.cells[index])
    }

    /// Mutable variant of [`cell`](Self::cell).
    pub fn cell_mut(&mut self, row: usize, column: usize) -> Result<&mut T, MatrixError> {
        let index = self.shape.flat_index(row, column)?;
        Ok(&mut self.cells[index])
    }

    /// Replaces the element at `(row, column)`, returning the old value.
    ///
    /// # Errors
    /// Returns [`MatrixError::CoordinateOutOfRange`] on a bad coordinate;
    /// nothing is written in that case.
    ///
    /// # Example
    /// ```
    /// use gridmat::{Matrix, Shape};
    ///
    /// let mut m = Matrix::filled(Shape::new(2, 2), 0);
    /// assert_eq!(m.set(0, 1, 9).unwrap(), 0);
    /// assert_eq!(m[(0, 1)], 9);
    /// // The flat view sees the same write.
    /// assert_eq!(m[1], 9);
    /// ```
    pub fn set(&mut self, row: usize, column: usize, value: T) -> Result<T, MatrixError> {
        let cell = self.cell_mut(row, column)?;
        Ok(std::mem::replace(cell, value))
    }

    /// Returns the element at flat `index`.
    ///
    /// # Errors
    /// Returns [`MatrixError::IndexOutOfRange`] when
    /// `index >= cell_count()`.
    pub fn at(&self, index: usize) -> Result<&T, MatrixError> {
        if index < self.cells.len() {
            Ok(&self.cells[index])
        } else {
            Err(MatrixError::IndexOutOfRange {
                index,
                shape: self.shape,
            })
        }
    }

    /// Mutable variant of [`at`](Self::at).
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, MatrixError> {
        if index < self.cells.len() {
            Ok(&mut self.cells[index])
        } else {
            Err(MatrixError::IndexOutOfRange {
                index,
                shape: self.shape,
            })
        }
    }

    /// Replaces the element at flat `index`, returning the old value.
    ///
    /// # Errors
    /// Returns [`MatrixError::IndexOutOfRange`] on a bad index.
    pub fn set_at(&mut self, index: usize, value: T) -> Result<T, MatrixError> {
        let cell = self.at_mut(index)?;
        Ok(std::mem::replace(cell, value))
    }

    /// Safe coordinate lookup: `None` instead of an error when out of bounds.
    ///
    /// This is the one intentional non-failing access path; the neighbor
    /// connection walk relies on it to yield "no neighbor" at edges and
    /// corners without special-casing boundary logic.
    ///
    /// # Example
    /// ```
    /// use gridmat::{Matrix, Shape};
    ///
    /// let m = Matrix::filled(Shape::new(2, 2), 3);
    /// assert_eq!(m.get(1, 1), Some(&3));
    /// assert_eq!(m.get(2, 0), None);
    /// ```
    pub fn get(&self, row: usize, column: usize) -> Option<&T> {
        self.shape
            .flat_index(row, column)
            .ok()
            .map(|index| &self.cells[index])
    }

    /// Mutable variant of [`get`](Self::get).
    pub fn get_mut(&mut self, row: usize, column: usize) -> Option<&mut T> {
        self.shape
            .flat_index(row, column)
            .ok()
            .map(|index| &mut self.cells[index])
    }

    /// Returns row `n` as a contiguous slice of the backing storage.
    ///
    /// # Errors
    /// Returns [`MatrixError::RowOutOfRange`] unless `n < row_count()`.
    pub fn row(&self, n: usize) -> Result<&[T], MatrixError> {
        if n >= self.shape.rows {
            return Err(MatrixError::RowOutOfRange {
                row: n,
                shape: self.shape,
            });
        }
        let start = n * self.shape.columns;
        Ok(&self.cells[start..start + self.shape.columns])
    }

    /// Returns column `n` as an owned strided gather.
    ///
    /// # Errors
    /// Returns [`MatrixError::ColumnOutOfRange`] unless `n < column_count()`.
    pub fn column(&self, n: usize) -> Result<SmallVecLine<T>, MatrixError>
    where
        T: Clone,
    {
        if n >= self.shape.columns {
            return Err(MatrixError::ColumnOutOfRange {
                column: n,
                shape: self.shape,
            });
        }
        Ok((0..self.shape.rows)
            .map(|row| self.cells[row * self.shape.columns + n].clone())
            .collect())
    }

    /// Materializes every row, in order.
    pub fn rows(&self) -> Vec<SmallVecLine<T>>
    where
        T: Clone,
    {
        (0..self.shape.rows)
            .map(|row| {
                let start = row * self.shape.columns;
                self.cells[start..start + self.shape.columns]
                    .iter()
                    .cloned()
                    .collect()
            })
            .collect()
    }

    /// Materializes every column, in order.
    pub fn columns(&self) -> Vec<SmallVecLine<T>>
    where
        T: Clone,
    {
        (0..self.shape.columns)
            .map(|column| {
                (0..self.shape.rows)
                    .map(|row| self.cells[row * self.shape.columns + column].clone())
                    .collect()
            })
            .collect()
    }

    /// The backing row-major sequence, by value.
    pub fn flattened(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.cells.clone()
    }

    /// The backing row-major sequence, borrowed.
    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    /// Applies `transform` to every element, producing a new matrix of the
    /// same shape.
    ///
    /// Results land at the same positions they were read from; if
    /// `transform` has side effects, row-major evaluation order is the
    /// documented guarantee.
    ///
    /// # Example
    /// ```
    /// use gridmat::{Matrix, Shape};
    ///
    /// let m = Matrix::from_fn(Shape::new(2, 2), |row, _| row as i32);
    /// let doubled = m.map(|&cell| cell * 2);
    /// assert_eq!(doubled.flattened(), vec![0, 0, 2, 2]);
    /// ```
    pub fn map<U, F>(&self, mut transform: F) -> Matrix<U>
    where
        F: FnMut(&T) -> U,
    {
        match self.try_map(|cell| Ok::<U, Infallible>(transform(cell))) {
            Ok(matrix) => matrix,
            Err(absurd) => match absurd {},
        }
    }

    /// Fallible variant of [`map`](Self::map).
    ///
    /// # Errors
    /// A failure from `transform` aborts the traversal and is propagated
    /// unchanged; no partial matrix is observable.
    pub fn try_map<U, E, F>(&self, transform: F) -> Result<Matrix<U>, E>
    where
        F: FnMut(&T) -> Result<U, E>,
    {
        let cells = self
            .cells
            .iter()
            .map(transform)
            .collect::<Result<Vec<U>, E>>()?;
        Ok(Matrix {
            shape: self.shape,
            cells,
        })
    }

    /// Visits every cell in row-major order with its coordinate.
    ///
    /// # Example
    /// ```
    /// use gridmat::{Matrix, Shape};
    ///
    /// let m = Matrix::from_fn(Shape::new(2, 2), |row, column| row + column);
    /// let mut seen = Vec::new();
    /// m.for_each_cell(|coordinate, &cell| seen.push((coordinate, cell)));
    /// assert_eq!(seen[3], ((1, 1), 2));
    /// ```
    pub fn for_each_cell<F>(&self, mut visit: F)
    where
        F: FnMut((usize, usize), &T),
    {
        match self.try_for_each_cell(|coordinate, cell| {
            visit(coordinate, cell);
            Ok::<(), Infallible>(())
        }) {
            Ok(()) => (),
            Err(absurd) => match absurd {},
        }
    }

    /// Fallible variant of [`for_each_cell`](Self::for_each_cell).
    ///
    /// # Errors
    /// A failure from `visit` aborts the remaining enumeration and is
    /// propagated unchanged. Side effects of visits before the failing one
    /// have already occurred.
    pub fn try_for_each_cell<E, F>(&self, mut visit: F) -> Result<(), E>
    where
        F: FnMut((usize, usize), &T) -> Result<(), E>,
    {
        self.shape
            .coordinates()
            .zip(self.cells.iter())
            .try_for_each(|(coordinate, cell)| visit(coordinate, cell))
    }

    /// Iterates the flat storage in index order.
    ///
    /// The iterator is double-ended and exact-size, so forward and backward
    /// traversal by flat index are both supported.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.cells.iter()
    }

    /// Mutable variant of [`iter`](Self::iter).
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.cells.iter_mut()
    }

    /// Swaps the elements at two coordinates.
    ///
    /// # Errors
    /// Returns [`MatrixError::CoordinateOutOfRange`] if either coordinate is
    /// out of bounds; nothing is swapped in that case.
    pub fn swap(&mut self, a: (usize, usize), b: (usize, usize)) -> Result<(), MatrixError> {
        let first = self.shape.flat_index(a.0, a.1)?;
        let second = self.shape.flat_index(b.0, b.1)?;
        self.cells.swap(first, second);
        Ok(())
    }

    /// Returns a new matrix with rows and columns exchanged.
    ///
    /// This is a coordinate remap, not linear algebra: cell `(r, c)` of the
    /// result is cell `(c, r)` of `self`.
    ///
    /// # Example
    /// ```
    /// use gridmat::{Matrix, Shape};
    ///
    /// let m = Matrix::from_flat(Shape::new(2, 3), vec![1, 2, 3, 4, 5, 6]).unwrap();
    /// let t = m.transposed();
    /// assert_eq!(t.shape(), Shape::new(3, 2));
    /// assert_eq!(t.flattened(), vec![1, 4, 2, 5, 3, 6]);
    /// ```
    pub fn transposed(&self) -> Matrix<T>
    where
        T: Clone,
    {
        Matrix::from_fn(Shape::new(self.shape.columns, self.shape.rows), |row, column| {
            self.cells[column * self.shape.columns + row].clone()
        })
    }
}

/// Panicking coordinate access; use [`Matrix::cell`] or [`Matrix::get`] for
/// fallible or safe lookups.
impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, (row, column): (usize, usize)) -> &T {
        match self.shape.flat_index(row, column) {
            Ok(index) => &self.cells[index],
            Err(e) => panic!("{e}"),
        }
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    fn index_mut(&mut self, (row, column): (usize, usize)) -> &mut T {
        match self.shape.flat_index(row, column) {
            Ok(index) => &mut self.cells[index],
            Err(e) => panic!("{e}"),
        }
    }
}

/// Panicking flat access; use [`Matrix::at`] for the fallible lookup.
impl<T> Index<usize> for Matrix<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.cells[index]
    }
}

impl<T> IndexMut<usize> for Matrix<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.cells[index]
    }
}

impl<T> IntoIterator for Matrix<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Matrix<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Matrix<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test]
    fn filled_matrix_reads_back_the_fill_value() {
        let m = Matrix::filled(Shape::new(3, 4), 9);
        assert_eq!(m.cell_count(), 12);
        for (row, column) in m.shape().coordinates() {
            assert_eq!(m[(row, column)], 9);
        }
    }

    #[test]
    fn from_flat_rejects_wrong_length() {
        let err = Matrix::from_flat(Shape::new(2, 2), vec![1, 2, 3]).unwrap_err();
        assert_eq!(
            err,
            MatrixError::LengthMismatch {
                shape: Shape::new(2, 2),
                actual: 3,
            }
        );
    }

    #[test]
    fn from_rows_flattens_row_major() {
        let m = Matrix::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
        assert_eq!(m.shape(), Shape::new(2, 3));
        assert_eq!(m.flattened(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let err = Matrix::from_rows(vec![vec![1, 2], vec![3]]).unwrap_err();
        assert!(matches!(err, MatrixError::LengthMismatch { .. }));
    }

    #[test]
    fn from_fn_invokes_source_in_row_major_order() {
        let mut invocations = Vec::new();
        let m = Matrix::from_fn(Shape::new(2, 3), |row, column| {
            invocations.push((row, column));
            (row + 1) * (column + 1)
        });
        assert_eq!(
            invocations,
            vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]
        );
        assert_eq!(m.flattened(), vec![1, 2, 3, 2, 4, 6]);
    }

    #[test]
    fn try_from_fn_propagates_the_source_failure() {
        let mut calls = 0;
        let result: Result<Matrix<u32>, &str> =
            Matrix::try_from_fn(Shape::new(2, 2), |row, column| {
                calls += 1;
                if (row, column) == (1, 0) {
                    Err("boom")
                } else {
                    Ok(0)
                }
            });
        assert_eq!(result, Err("boom"));
        // Construction aborted at the failing call.
        assert_eq!(calls, 3);
    }

    #[test]
    fn try_repopulate_keeps_old_storage_on_failure() {
        let mut m = Matrix::filled(Shape::new(2, 2), 1);
        let result = m.try_repopulate_with(|row, _| if row == 1 { Err("nope") } else { Ok(5) });
        assert_eq!(result, Err("nope"));
        assert_eq!(m.flattened(), vec![1, 1, 1, 1]);
    }

    #[test]
    fn repopulate_preserves_shape() {
        let mut m = Matrix::filled(Shape::new(2, 3), 0);
        m.repopulate_with(|row, column| row * 3 + column);
        assert_eq!(m.shape(), Shape::new(2, 3));
        assert_eq!(m.flattened(), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn flat_and_coordinate_access_share_storage() {
        let mut m = Matrix::from_flat(Shape::new(2, 3), vec![1, 2, 3, 4, 5, 6]).unwrap();
        for (row, column) in m.shape().coordinates() {
            assert_eq!(m[(row, column)], m[row * 3 + column]);
        }
        m.set_at(4, 50).unwrap();
        assert_eq!(m[(1, 1)], 50);
        m.set(0, 2, 30).unwrap();
        assert_eq!(m[2], 30);
    }

    #[test_case(2, 0; "row past end")]
    #[test_case(0, 3; "column past end")]
    fn cell_rejects_bad_coordinates(row: usize, column: usize) {
        let m = Matrix::filled(Shape::new(2, 3), 0);
        assert_eq!(
            m.cell(row, column).unwrap_err(),
            MatrixError::CoordinateOutOfRange {
                row,
                column,
                shape: Shape::new(2, 3),
            }
        );
        assert_eq!(m.get(row, column), None);
    }

    #[test]
    fn at_rejects_bad_flat_index() {
        let mut m = Matrix::filled(Shape::new(2, 2), 0);
        assert!(matches!(
            m.at(4),
            Err(MatrixError::IndexOutOfRange { index: 4, .. })
        ));
        assert!(m.set_at(4, 1).is_err());
        assert_eq!(m.flattened(), vec![0, 0, 0, 0]);
    }

    #[test]
    fn row_and_column_selectors() {
        let m = Matrix::from_fn(Shape::new(2, 3), |row, column| (row + 1) * (column + 1));
        assert_eq!(m.row(1).unwrap(), &[2, 4, 6]);
        assert_eq!(m.column(2).unwrap().as_slice(), &[3, 6]);
        assert!(matches!(
            m.row(2),
            Err(MatrixError::RowOutOfRange { row: 2, .. })
        ));
        assert!(matches!(
            m.column(3),
            Err(MatrixError::ColumnOutOfRange { column: 3, .. })
        ));
    }

    #[test]
    fn rows_reassemble_the_flattened_sequence() {
        let m = Matrix::from_fn(Shape::new(3, 4), |row, column| row * 4 + column);
        let reassembled: Vec<usize> = m.rows().into_iter().flatten().collect();
        assert_eq!(reassembled, m.flattened());
    }

    #[test]
    fn columns_reassemble_column_major() {
        let m = Matrix::from_flat(Shape::new(2, 3), vec![1, 2, 3, 4, 5, 6]).unwrap();
        let column_major: Vec<i32> = m.columns().into_iter().flatten().collect();
        assert_eq!(column_major, vec![1, 4, 2, 5, 3, 6]);
    }

    #[test]
    fn map_preserves_shape_and_order() {
        let m = Matrix::from_flat(Shape::new(2, 2), vec![1, 2, 3, 4]).unwrap();
        let strings = m.map(|cell| cell.to_string());
        assert_eq!(strings.shape(), m.shape());
        assert_eq!(strings.flattened(), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn try_map_aborts_on_failure() {
        let m = Matrix::from_flat(Shape::new(2, 2), vec![1, 0, 3, 0]).unwrap();
        let result: Result<Matrix<i32>, &str> =
            m.try_map(|&cell| if cell == 0 { Err("zero") } else { Ok(10 / cell) });
        assert_eq!(result, Err("zero"));
    }

    #[test]
    fn for_each_cell_visits_row_major() {
        let m = Matrix::from_fn(Shape::new(2, 2), |row, column| row * 2 + column);
        let mut seen = Vec::new();
        m.for_each_cell(|coordinate, &cell| seen.push((coordinate, cell)));
        assert_eq!(
            seen,
            vec![((0, 0), 0), ((0, 1), 1), ((1, 0), 2), ((1, 1), 3)]
        );
    }

    #[test]
    fn try_for_each_cell_stops_at_the_failing_visit() {
        let m = Matrix::filled(Shape::new(2, 2), 1);
        let mut visited = 0;
        let result = m.try_for_each_cell(|coordinate, _| {
            visited += 1;
            if coordinate == (1, 0) {
                Err("stop")
            } else {
                Ok(())
            }
        });
        assert_eq!(result, Err("stop"));
        assert_eq!(visited, 3);
    }

    #[test]
    fn iteration_is_bidirectional() {
        let m = Matrix::from_flat(Shape::new(2, 2), vec![1, 2, 3, 4]).unwrap();
        let forward: Vec<i32> = m.iter().copied().collect();
        let backward: Vec<i32> = m.iter().rev().copied().collect();
        assert_eq!(forward, vec![1, 2, 3, 4]);
        assert_eq!(backward, vec![4, 3, 2, 1]);
    }

    #[test]
    fn clones_are_independent_values() {
        let original = Matrix::filled(Shape::new(2, 2), 1);
        let mut copy = original.clone();
        copy.set(0, 0, 99).unwrap();
        assert_eq!(original[(0, 0)], 1);
        assert_ne!(original, copy);
    }

    #[test]
    fn swap_exchanges_two_cells() {
        let mut m = Matrix::from_flat(Shape::new(2, 2), vec![1, 2, 3, 4]).unwrap();
        m.swap((0, 0), (1, 1)).unwrap();
        assert_eq!(m.flattened(), vec![4, 2, 3, 1]);
        assert!(m.swap((0, 0), (2, 0)).is_err());
    }

    #[test]
    fn transpose_twice_is_identity() {
        let m = Matrix::from_flat(Shape::new(2, 3), vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(m.transposed().transposed(), m);
    }

    #[test]
    fn zero_sized_matrices_are_well_formed() {
        let m: Matrix<i32> = Matrix::from_flat(Shape::new(0, 5), vec![]).unwrap();
        assert!(m.is_empty());
        assert_eq!(m.rows().len(), 0);
        assert_eq!(m.columns().len(), 5);
        assert!(m.columns().iter().all(|column| column.is_empty()));
    }

    proptest! {
        #[test]
        fn fill_value_is_read_back_everywhere(
            rows in 0usize..12,
            columns in 0usize..12,
            value in any::<i64>(),
        ) {
            let m = Matrix::filled(Shape::new(rows, columns), value);
            prop_assert_eq!(m.cell_count(), rows * columns);
            for (row, column) in m.shape().coordinates() {
                prop_assert_eq!(m[(row, column)], value);
            }
        }

        #[test]
        fn data_source_construction_agrees_with_reads(
            rows in 1usize..10,
            columns in 1usize..10,
        ) {
            let m = Matrix::from_fn(Shape::new(rows, columns), |row, column| (row + 1) * (column + 1));
            for (row, column) in m.shape().coordinates() {
                prop_assert_eq!(m[(row, column)], (row + 1) * (column + 1));
            }
        }

        #[test]
        fn row_roundtrip_reconstructs_the_flattened_sequence(
            rows in 1usize..10,
            columns in 1usize..10,
        ) {
            let m = Matrix::from_fn(Shape::new(rows, columns), |row, column| row * columns + column);
            let reassembled: Vec<usize> = m.rows().into_iter().flatten().collect();
            prop_assert_eq!(reassembled, m.flattened());
        }

        #[test]
        fn writes_through_either_view_agree(
            rows in 1usize..8,
            columns in 1usize..8,
            value in any::<i32>(),
        ) {
            let shape = Shape::new(rows, columns);
            let mut m = Matrix::filled(shape, 0);
            for (row, column) in shape.coordinates() {
                m.set(row, column, value).unwrap();
                prop_assert_eq!(m[row * columns + column], value);
            }
        }
    }
}
