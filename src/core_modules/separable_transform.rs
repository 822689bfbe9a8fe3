// THEORY:
// The `SeparableTransform` is the orchestrator of the distance engine. It turns
// a raw loss-indicator grid into a grid of physical distances to the nearest
// seed cell, in the same length unit as the configured pixel size.
//
// Key architectural principles & algorithm steps:
// 1.  **Seed Classification**: Every cell is run through the `SeedPredicate` to
//     build a `SeedMask`. If no cell qualifies the engine returns a grid filled
//     with `UNREACHABLE_DISTANCE` and stops: a documented output, not an error.
// 2.  **Column Pass**: Each column becomes a 1-D cost array (seed rows cost 0,
//     everything else costs `NO_SEED_COST`) and is scanned independently. The
//     result is, per cell, the squared vertical distance to the nearest seed in
//     that same column.
// 3.  **Row Pass**: Each row of that intermediate grid is scanned again, using
//     the per-column minima as costs. Squared Euclidean distance separates:
//
//         min over seeds of (drow^2 + dcol^2)
//           = min over columns of (dcol^2 + min over rows in that column of drow^2)
//
//     so the row pass yields the true global minimum squared distance everywhere.
// 4.  **Scaling**: Square root, then multiply by the pixel size.
//
// Columns are mutually independent, as are rows, which is what lets
// `parallel_pipeline` split both passes into bands. The band helpers here are
// the units of work it schedules; the sequential driver below just runs them
// over the full grid.

use crate::core_modules::grid::Grid;
use crate::core_modules::scanner_1d::Scanner1D;
use crate::core_modules::seed_mask::{SeedMask, SeedPredicate};
use crate::error::{ProximityError, Result};
use std::ops::Range;
use tracing::{debug, info, warn};

/// Cost carried by a non-seed position in the column pass.
///
/// A large finite value stands in for infinity so that the intersection formula
/// never evaluates `inf - inf`. It must exceed any true squared distance the
/// engine can produce: `1e20` covers grids up to roughly 7e9 cells on a side.
/// Two sentinel positions may meet in a column with no seed, but whenever the
/// row pass runs at least one seed exists, so every row holds at least one
/// finite cost and the sentinel never wins.
pub const NO_SEED_COST: f32 = 1e20;

/// Distance reported for every cell when the grid contains no seed at all.
/// It is a fixed value and is not scaled by the pixel size.
pub const UNREACHABLE_DISTANCE: f32 = 999_999.0;

/// Result of one transform: the distance layer plus the number of seeds it was measured from.
#[derive(Debug, Clone)]
pub struct TransformOutput {
    pub distances: Grid<f32>,
    pub seed_count: usize,
}

impl TransformOutput {
    /// True when no seed existed and `distances` is all `UNREACHABLE_DISTANCE`.
    pub fn is_degenerate(&self) -> bool {
        self.seed_count == 0
    }
}

/// Exact Euclidean distance transform from seed cells, in physical units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeparableTransform {
    predicate: SeedPredicate,
    /// Physical length of one pixel edge.
    pixel_size: f32,
}

impl SeparableTransform {
    pub fn new(predicate: SeedPredicate, pixel_size: f32) -> Result<Self> {
        if !pixel_size.is_finite() || pixel_size <= 0.0 {
            return Err(ProximityError::InvalidPixelSize(pixel_size));
        }
        Ok(Self {
            predicate,
            pixel_size,
        })
    }

    pub fn predicate(&self) -> &SeedPredicate {
        &self.predicate
    }

    pub fn pixel_size(&self) -> f32 {
        self.pixel_size
    }

    pub fn seed_mask(&self, grid: &Grid<f32>) -> SeedMask {
        SeedMask::from_grid(grid, &self.predicate)
    }

    /// Runs the full transform on a loss-indicator grid.
    pub fn transform(&self, grid: &Grid<f32>) -> TransformOutput {
        let mask = self.seed_mask(grid);
        info!(
            seeds = mask.seed_count(),
            width = grid.width(),
            height = grid.height(),
            "classified seed cells"
        );

        let distances = match squared_distances(&mask) {
            Some(squared) => self.scale(&squared),
            None => {
                warn!("no seed cells found, distance layer is unreachable everywhere");
                unreachable_grid(&mask)
            }
        };

        TransformOutput {
            distances,
            seed_count: mask.seed_count(),
        }
    }

    /// Converts squared pixel distances into physical distances.
    pub fn scale(&self, squared: &Grid<f32>) -> Grid<f32> {
        let pixel_size = self.pixel_size;
        squared.map(|d| d.sqrt() * pixel_size)
    }
}

/// A grid the shape of `mask` with every cell at `UNREACHABLE_DISTANCE`.
pub fn unreachable_grid(mask: &SeedMask) -> Grid<f32> {
    mask.cells().map(|_| UNREACHABLE_DISTANCE)
}

/// Squared pixel distance from every cell to its nearest seed.
///
/// Returns `None` when the mask has no seed; the caller decides what that means.
pub fn squared_distances(mask: &SeedMask) -> Option<Grid<f32>> {
    if mask.is_empty() {
        return None;
    }
    let mut scanner = Scanner1D::with_capacity(mask.width().max(mask.height()));
    let mut squared = column_pass(mask, &mut scanner);
    row_pass(&mut squared, &mut scanner);
    Some(squared)
}

/// Scans every column of the mask, returning per-column squared vertical distances.
pub fn column_pass(mask: &SeedMask, scanner: &mut Scanner1D) -> Grid<f32> {
    let (width, height) = (mask.width(), mask.height());
    let mut intermediate = mask.cells().map(|_| NO_SEED_COST);
    let mut costs = vec![0.0; height];
    let mut scanned = vec![0.0; height];
    let report_every = (width / 10).max(1);

    for col in 0..width {
        scan_column(mask, col, scanner, &mut costs, &mut scanned);
        intermediate.write_column(col, &scanned);

        let done = col + 1;
        if done % report_every == 0 || done == width {
            debug!(done, total = width, "column pass progress");
        }
    }
    intermediate
}

/// Scans the columns in `cols`, returning them column-major (`height` values per column).
pub fn column_band(mask: &SeedMask, cols: Range<usize>, scanner: &mut Scanner1D) -> Vec<f32> {
    let height = mask.height();
    let mut costs = vec![0.0; height];
    let mut band = vec![0.0; height * cols.len()];
    for (slot, col) in band.chunks_exact_mut(height).zip(cols) {
        scan_column(mask, col, scanner, &mut costs, slot);
    }
    band
}

fn scan_column(
    mask: &SeedMask,
    col: usize,
    scanner: &mut Scanner1D,
    costs: &mut [f32],
    out: &mut [f32],
) {
    for (row, cost) in costs.iter_mut().enumerate() {
        *cost = if mask.is_seed(row, col) { 0.0 } else { NO_SEED_COST };
    }
    scanner.scan(costs, out);
}

/// Scans every row of the column-pass output in place, leaving global squared distances.
pub fn row_pass(intermediate: &mut Grid<f32>, scanner: &mut Scanner1D) {
    let mut costs = vec![0.0; intermediate.width()];
    for row in 0..intermediate.height() {
        costs.copy_from_slice(intermediate.row(row));
        scanner.scan(&costs, intermediate.row_mut(row));
    }
}

/// Scans the rows in `rows` of the column-pass output, returning them row-major.
pub fn row_band(intermediate: &Grid<f32>, rows: Range<usize>, scanner: &mut Scanner1D) -> Vec<f32> {
    let width = intermediate.width();
    let mut band = vec![0.0; width * rows.len()];
    for (slot, row) in band.chunks_exact_mut(width).zip(rows) {
        scanner.scan(intermediate.row(row), slot);
    }
    band
}
