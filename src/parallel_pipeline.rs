// THEORY:
// The parallel pipeline runs the same separable transform as `pipeline`, spread
// over a pool of blocking workers. Column scans are independent of each other and
// so are row scans, so each pass is cut into contiguous bands, one per worker.
//
// The two passes are separated by a barrier: every row scan reads values written
// by every column scan across the full width, so no row band is scheduled until
// all column bands have been joined. Workers own their scratch scanners and write
// into their own band buffers, so nothing is shared mutably; the bands are
// stitched back together on the calling task.
//
// The output is bit-identical to the sequential transform.

use crate::core_modules::grid::Grid;
use crate::core_modules::scanner_1d::Scanner1D;
use crate::core_modules::separable_transform::{
    column_band, row_band, unreachable_grid, SeparableTransform, TransformOutput, NO_SEED_COST,
};
use crate::error::{ProximityError, Result};
use crate::pipeline::{proximity_layer, ProximityConfig, Report};
use futures::future::try_join_all;
use std::ops::Range;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Splits `0..len` into at most `workers` contiguous, non-empty bands.
pub fn split_bands(len: usize, workers: usize) -> Vec<Range<usize>> {
    let band = len.div_ceil(workers.max(1)).max(1);
    (0..len)
        .step_by(band)
        .map(|start| start..(start + band).min(len))
        .collect()
}

/// Runs the separable transform with each pass split across blocking workers.
#[derive(Debug, Clone, Copy)]
pub struct ParallelTransform {
    transform: SeparableTransform,
    workers: usize,
}

impl ParallelTransform {
    pub fn new(transform: SeparableTransform, workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(ProximityError::InvalidWorkerCount);
        }
        Ok(Self { transform, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub async fn transform(&self, grid: &Grid<f32>) -> Result<TransformOutput> {
        let mask = Arc::new(self.transform.seed_mask(grid));
        let seed_count = mask.seed_count();
        info!(seeds = seed_count, workers = self.workers, "classified seed cells");

        if mask.is_empty() {
            warn!("no seed cells found, distance layer is unreachable everywhere");
            return Ok(TransformOutput {
                distances: unreachable_grid(&mask),
                seed_count,
            });
        }

        let (width, height) = (mask.width(), mask.height());

        // --- Column pass ---
        let column_jobs = split_bands(width, self.workers).into_iter().map(|cols| {
            let mask = Arc::clone(&mask);
            tokio::task::spawn_blocking(move || {
                let mut scanner = Scanner1D::with_capacity(mask.height());
                let band = column_band(&mask, cols.clone(), &mut scanner);
                (cols, band)
            })
        });
        // Barrier: all columns must land before any row is scanned.
        let column_bands = try_join_all(column_jobs).await?;
        debug!(bands = column_bands.len(), "column pass complete");

        let mut intermediate = mask.cells().map(|_| NO_SEED_COST);
        for (cols, band) in column_bands {
            for (col, values) in cols.zip(band.chunks_exact(height)) {
                intermediate.write_column(col, values);
            }
        }
        let intermediate = Arc::new(intermediate);

        // --- Row pass ---
        let row_jobs = split_bands(height, self.workers).into_iter().map(|rows| {
            let intermediate = Arc::clone(&intermediate);
            tokio::task::spawn_blocking(move || {
                let mut scanner = Scanner1D::with_capacity(intermediate.width());
                row_band(&intermediate, rows, &mut scanner)
            })
        });
        let row_bands = try_join_all(row_jobs).await?;
        debug!(bands = row_bands.len(), "row pass complete");

        let squared = Grid::from_vec(width, height, row_bands.concat())?;
        Ok(TransformOutput {
            distances: self.transform.scale(&squared),
            seed_count,
        })
    }
}

/// Async counterpart of `ProximityPipeline`, backed by a `ParallelTransform`.
pub struct ParallelPipeline {
    config: ProximityConfig,
    transform: ParallelTransform,
}

impl ParallelPipeline {
    pub fn new(config: ProximityConfig) -> Result<Self> {
        config.validate()?;
        let transform = SeparableTransform::new(config.seed_range, config.pixel_size)?;
        let transform = ParallelTransform::new(transform, config.workers)?;
        Ok(Self { config, transform })
    }

    pub fn config(&self) -> &ProximityConfig {
        &self.config
    }

    pub async fn generate_report(&self, loss_grid: &Grid<f32>) -> Result<Report> {
        Ok(self.transform.transform(loss_grid).await?.into())
    }

    pub fn proximity(&self, report: &Report) -> Grid<f32> {
        proximity_layer(report, self.config.decay_distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::seed_mask::SeedPredicate;
    use crate::pipeline::{ProximityPipeline, UNREACHABLE_DISTANCE};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn config(workers: usize) -> ProximityConfig {
        ProximityConfig {
            workers,
            ..ProximityConfig::default()
        }
    }

    #[test]
    fn bands_cover_every_index_once() {
        for len in 1..40 {
            for workers in 1..10 {
                let bands = split_bands(len, workers);
                assert!(bands.len() <= workers);
                assert!(bands.iter().all(|b| !b.is_empty()));
                let flat: Vec<usize> = bands.into_iter().flatten().collect();
                assert_eq!(flat, (0..len).collect::<Vec<_>>());
            }
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn matches_sequential_transform() {
        let mut rng = StdRng::seed_from_u64(99);
        for workers in [1, 2, 3, 8] {
            let sequential = ProximityPipeline::new(config(workers)).unwrap();
            let parallel = ParallelPipeline::new(config(workers)).unwrap();
            for _ in 0..10 {
                let width = rng.random_range(1..=40);
                let height = rng.random_range(1..=40);
                let values = (0..width * height)
                    .map(|_| if rng.random_bool(0.05) { 21.0 } else { 0.0 })
                    .collect();
                let grid = Grid::from_vec(width, height, values).unwrap();

                let expected = sequential.generate_report(&grid);
                let report = parallel.generate_report(&grid).await.unwrap();
                assert_eq!(report.seed_count(), expected.seed_count());
                assert_eq!(report.distances(), expected.distances());
            }
        }
    }

    #[tokio::test]
    async fn no_seed_grid_is_unreachable() {
        let pipeline = ParallelPipeline::new(config(4)).unwrap();
        let grid = Grid::filled(6, 5, 3.0).unwrap();
        let report = pipeline.generate_report(&grid).await.unwrap();
        assert!(matches!(report, Report::NoSeedsFound { .. }));
        assert!(report
            .distances()
            .as_slice()
            .iter()
            .all(|d| *d == UNREACHABLE_DISTANCE));
    }

    #[tokio::test]
    async fn no_seed_proximity_is_zero_with_long_decay() {
        let pipeline = ParallelPipeline::new(ProximityConfig {
            decay_distance: 2.0 * UNREACHABLE_DISTANCE,
            ..config(2)
        })
        .unwrap();
        let grid = Grid::filled(2, 2, 0.0).unwrap();
        let report = pipeline.generate_report(&grid).await.unwrap();
        assert_eq!(pipeline.proximity(&report).as_slice(), &[0.0; 4]);
    }

    #[tokio::test]
    async fn more_workers_than_columns() {
        let transform = SeparableTransform::new(SeedPredicate::LOSS_YEAR, 30.0).unwrap();
        let parallel = ParallelTransform::new(transform, 16).unwrap();
        let grid = Grid::from_vec(1, 5, vec![0.0, 0.0, 19.0, 0.0, 0.0]).unwrap();
        let output = parallel.transform(&grid).await.unwrap();
        assert_eq!(output.distances.as_slice(), &[60.0, 30.0, 0.0, 30.0, 60.0]);
    }

    #[test]
    fn zero_workers_is_rejected() {
        let transform = SeparableTransform::new(SeedPredicate::LOSS_YEAR, 30.0).unwrap();
        assert!(matches!(
            ParallelTransform::new(transform, 0),
            Err(ProximityError::InvalidWorkerCount)
        ));
    }
}
