// THEORY:
// The `Grid` module is the fundamental data container of the engine. A raster
// layer arriving from disk, the boolean seed mask and every distance layer we
// produce are all the same shape: a rectangular, row-major buffer.
//
// Key architectural principles:
// 1.  **Checked Shape**: A `Grid` can only be built when `data.len() == width * height`
//     and both dimensions are at least 1. Everything downstream relies on this,
//     which is why the transform itself never has to return an error.
// 2.  **Dumb Container**: Like a pixel chunk, a `Grid` knows how to hand out rows,
//     gather and scatter columns, and map its values. It knows nothing about
//     seeds or distances.
// 3.  **Owned Buffers**: Grids own their storage and are handed downstream by value.
//     There is no shared or aliased ownership anywhere in the engine.

use crate::error::{ProximityError, Result};

/// A rectangular, row-major buffer of values.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    /// Number of columns.
    width: usize,
    /// Number of rows.
    height: usize,
    /// `width * height` values, row after row.
    data: Vec<T>,
}

impl<T: Copy> Grid<T> {
    /// Wraps a row-major buffer, checking that it matches the requested shape.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self> {
        let expected = Self::checked_len(width, height)?;
        if data.len() != expected {
            return Err(ProximityError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Builds a grid with every cell set to `value`.
    pub fn filled(width: usize, height: usize, value: T) -> Result<Self> {
        let len = Self::checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![value; len],
        })
    }

    fn checked_len(width: usize, height: usize) -> Result<usize> {
        if width == 0 || height == 0 {
            return Err(ProximityError::ZeroDimension { width, height });
        }
        width
            .checked_mul(height)
            .ok_or(ProximityError::DimensionOverflow { width, height })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false for a constructed grid; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Returns the value at `(row, col)`, or `None` outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        if row < self.height && col < self.width {
            Some(self.data[row * self.width + col])
        } else {
            None
        }
    }

    /// Borrows one full row.
    pub fn row(&self, row: usize) -> &[T] {
        let start = row * self.width;
        &self.data[start..start + self.width]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [T] {
        let start = row * self.width;
        &mut self.data[start..start + self.width]
    }

    /// Gathers column `col` into `out`, top to bottom. `out` must hold `height` values.
    pub fn read_column(&self, col: usize, out: &mut [T]) {
        assert_eq!(out.len(), self.height, "column buffer must match grid height");
        for (row, slot) in out.iter_mut().enumerate() {
            *slot = self.data[row * self.width + col];
        }
    }

    /// Scatters `values` into column `col`, top to bottom.
    pub fn write_column(&mut self, col: usize, values: &[T]) {
        assert_eq!(values.len(), self.height, "column buffer must match grid height");
        for (row, value) in values.iter().enumerate() {
            self.data[row * self.width + col] = *value;
        }
    }

    /// Produces a new grid of the same shape by applying `f` to every cell.
    pub fn map<U: Copy>(&self, f: impl Fn(T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|v| f(*v)).collect(),
        }
    }
}

impl<T: Copy> std::ops::Index<(usize, usize)> for Grid<T> {
    type Output = T;

    /// Indexes by `(row, col)`.
    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(row < self.height && col < self.width, "cell ({row}, {col}) outside grid");
        &self.data[row * self.width + col]
    }
}
