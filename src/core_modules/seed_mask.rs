// THEORY:
// A seed is a cell distances are measured from. Which raw raster values count as
// seeds is decided by an external classification (the loss layer encodes the year
// tree cover was lost), so the engine treats it as an opaque closed range and
// never reinterprets the codes.

use crate::core_modules::grid::Grid;
use crate::error::{ProximityError, Result};

/// Closed interval `[min, max]` of raw values that mark a seed cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeedPredicate {
    min: f32,
    max: f32,
}

impl SeedPredicate {
    /// Loss-year codes 19 through 23 inclusive.
    pub const LOSS_YEAR: SeedPredicate = SeedPredicate {
        min: 19.0,
        max: 23.0,
    };

    pub fn new(min: f32, max: f32) -> Result<Self> {
        // `!(min <= max)` also catches NaN bounds.
        if !(min <= max) {
            return Err(ProximityError::InvalidSeedRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// NaN is never a seed.
    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Default for SeedPredicate {
    fn default() -> Self {
        Self::LOSS_YEAR
    }
}

/// Boolean grid marking seed cells, plus how many there are.
#[derive(Debug, Clone)]
pub struct SeedMask {
    cells: Grid<bool>,
    seed_count: usize,
}

impl SeedMask {
    /// Classifies every cell of `source` with `predicate`.
    pub fn from_grid(source: &Grid<f32>, predicate: &SeedPredicate) -> Self {
        let cells = source.map(|value| predicate.contains(value));
        let seed_count = cells.as_slice().iter().filter(|seed| **seed).count();
        Self { cells, seed_count }
    }

    pub fn width(&self) -> usize {
        self.cells.width()
    }

    pub fn height(&self) -> usize {
        self.cells.height()
    }

    pub fn seed_count(&self) -> usize {
        self.seed_count
    }

    /// True when no cell is a seed; the transform then takes the degenerate path.
    pub fn is_empty(&self) -> bool {
        self.seed_count == 0
    }

    pub fn is_seed(&self, row: usize, col: usize) -> bool {
        self.cells.get(row, col).unwrap_or(false)
    }

    pub fn cells(&self) -> &Grid<bool> {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loss_year_bounds_are_inclusive() {
        let predicate = SeedPredicate::default();
        assert!(predicate.contains(19.0));
        assert!(predicate.contains(21.5));
        assert!(predicate.contains(23.0));
        assert!(!predicate.contains(18.999));
        assert!(!predicate.contains(23.001));
        assert!(!predicate.contains(0.0));
        assert!(!predicate.contains(f32::NAN));
    }

    #[test]
    fn rejects_inverted_and_nan_ranges() {
        assert!(SeedPredicate::new(5.0, 1.0).is_err());
        assert!(SeedPredicate::new(f32::NAN, 1.0).is_err());
        assert!(SeedPredicate::new(2.0, 2.0).is_ok());
    }

    #[test]
    fn counts_seeds() {
        let grid = Grid::from_vec(3, 2, vec![0.0, 19.0, 25.0, 23.0, 12.0, 20.0]).unwrap();
        let mask = SeedMask::from_grid(&grid, &SeedPredicate::LOSS_YEAR);
        assert_eq!(mask.seed_count(), 3);
        assert!(mask.is_seed(0, 1));
        assert!(mask.is_seed(1, 0));
        assert!(!mask.is_seed(0, 2));
        assert!(!mask.is_seed(5, 5));
        assert!(!mask.is_empty());
    }
}
