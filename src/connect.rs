//! Neighbor wiring for matrices of connectable elements.
//!
//! Each connectable element carries four directional slots (north, south,
//! west, east). A slot holds a [`CellRef`], a non-owning coordinate handle
//! resolved on demand against the owning matrix; the matrix's storage stays
//! the sole owner of every element, so no retain cycle can form and stale
//! handles can never keep an element alive.

use crate::{Matrix, Shape};

/// A non-owning handle to the cell at a coordinate.
///
/// A `CellRef` is only meaningful against the matrix it was derived from and
/// only while that matrix keeps its current structure; resolve it on demand
/// rather than caching the borrow.
///
/// # Example
/// ```
/// use gridmat::{CellRef, Matrix, Shape};
///
/// let m = Matrix::from_fn(Shape::new(2, 2), |row, column| row * 2 + column);
/// let handle = CellRef::new(1, 0);
/// assert_eq!(handle.resolve(&m), Some(&2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CellRef {
    pub row: usize,
    pub column: usize,
}

impl CellRef {
    /// Creates a handle for `(row, column)`.
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// Creates a handle only if the coordinate lies inside `shape`.
    pub fn clipped(shape: Shape, row: usize, column: usize) -> Option<Self> {
        shape.contains(row, column).then_some(Self { row, column })
    }

    /// Looks up the referenced element in `matrix`.
    ///
    /// Returns `None` when the handle's coordinate is out of bounds for
    /// `matrix` (a stale handle after a structural change, or a handle from
    /// a different matrix).
    pub fn resolve<'m, T>(&self, matrix: &'m Matrix<T>) -> Option<&'m T> {
        matrix.get(self.row, self.column)
    }

    /// Mutable variant of [`resolve`](Self::resolve).
    pub fn resolve_mut<'m, T>(&self, matrix: &'m mut Matrix<T>) -> Option<&'m mut T> {
        matrix.get_mut(self.row, self.column)
    }
}

/// The four grid directions a neighbor slot can point in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Direction {
    North,
    South,
    West,
    East,
}

impl Direction {
    /// All four directions, in slot order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];
}

/// The four directional neighbor slots of a connectable element.
///
/// Slots are a derived, cache-like relation, not authoritative data: they are
/// only valid until the owning matrix's structure or element identities
/// change, after which [`Matrix::connect`] must be re-invoked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Neighbors {
    pub north: Option<CellRef>,
    pub south: Option<CellRef>,
    pub west: Option<CellRef>,
    pub east: Option<CellRef>,
}

impl Neighbors {
    /// Neighbor slots with every direction absent.
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns the slot for `direction`.
    pub fn get(&self, direction: Direction) -> Option<CellRef> {
        match direction {
            Direction::North => self.north,
            Direction::South => self.south,
            Direction::West => self.west,
            Direction::East => self.east,
        }
    }

    /// Number of non-absent slots, in `0..=4`. Recomputed, never stored.
    ///
    /// # Example
    /// ```
    /// use gridmat::{CellRef, Neighbors};
    ///
    /// let mut neighbors = Neighbors::none();
    /// assert_eq!(neighbors.count(), 0);
    /// neighbors.east = CellRef::new(0, 1).into();
    /// assert_eq!(neighbors.count(), 1);
    /// ```
    pub fn count(&self) -> usize {
        Direction::ALL
            .iter()
            .filter(|&&direction| self.get(direction).is_some())
            .count()
    }
}

/// The capability an element type implements to take part in
/// [`Matrix::connect`].
///
/// Implementors expose their [`Neighbors`] slots for reading and for the full
/// overwrite `connect` performs. [`Linked`] is a ready-made wrapper for
/// payload types that have no slot storage of their own.
pub trait Connectable {
    /// The element's neighbor slots.
    fn neighbors(&self) -> &Neighbors;

    /// Mutable access to the element's neighbor slots.
    fn neighbors_mut(&mut self) -> &mut Neighbors;

    /// Number of non-absent neighbor slots.
    fn neighbor_count(&self) -> usize {
        self.neighbors().count()
    }
}

/// Wraps any payload in neighbor slots, making it connectable.
///
/// # Example
/// ```
/// use gridmat::{Connectable, Linked, Matrix, Shape};
///
/// let mut m = Matrix::from_fn(Shape::new(3, 3), |row, column| Linked::new(row * 3 + column));
/// m.connect();
/// assert_eq!(m[(1, 1)].neighbor_count(), 4);
/// assert_eq!(m[(0, 0)].neighbor_count(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Linked<T> {
    pub value: T,
    pub neighbors: Neighbors,
}

impl<T> Linked<T> {
    /// Wraps `value` with all neighbor slots absent.
    pub fn new(value: T) -> Self {
        Self {
            value,
            neighbors: Neighbors::none(),
        }
    }
}

impl<T> Connectable for Linked<T> {
    fn neighbors(&self) -> &Neighbors {
        &self.neighbors
    }

    fn neighbors_mut(&mut self) -> &mut Neighbors {
        &mut self.neighbors
    }
}

impl<T: Connectable> Matrix<T> {
    /// Recomputes every element's four neighbor slots.
    ///
    /// Walks all coordinates in row-major order and overwrites each
    /// element's slots with handles to the cells at `(row - 1, column)`,
    /// `(row + 1, column)`, `(row, column - 1)` and `(row, column + 1)`,
    /// clipped to absent at grid edges and corners. The overwrite is total,
    /// so repeated calls are idempotent and safe.
    ///
    /// Slots go stale on any structural or positional change (repopulate,
    /// element replacement, swap, transpose); call `connect` again
    /// afterwards, stale handles are not invalidated automatically.
    pub fn connect(&mut self) {
        let shape = self.shape;
        tracing::debug!("Connecting neighbors across a {shape} matrix");
        for (row, column) in shape.coordinates() {
            let links = Neighbors {
                north: row
                    .checked_sub(1)
                    .and_then(|north| CellRef::clipped(shape, north, column)),
                south: CellRef::clipped(shape, row + 1, column),
                west: column
                    .checked_sub(1)
                    .and_then(|west| CellRef::clipped(shape, row, west)),
                east: CellRef::clipped(shape, row, column + 1),
            };
            // In-bounds by construction: the coordinate came from the shape.
            *self.cells[row * shape.columns + column].neighbors_mut() = links;
        }
    }
}
