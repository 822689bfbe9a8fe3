// THEORY:
// The `pipeline` module is the top-level API of the engine. It bundles the
// configuration, runs the separable transform on a loss-indicator grid and hands
// back a `Report` that always carries a distance layer, so downstream scorers never
// have to special-case a missing grid. Callers that need to treat "no seeds"
// differently can match on the report instead of re-counting seeds themselves.

use crate::core_modules::grid::Grid;
use crate::core_modules::seed_mask::SeedPredicate;
use crate::core_modules::separable_transform::{SeparableTransform, TransformOutput};
use crate::error::{ProximityError, Result};
use std::str::FromStr;

// Re-export key data structures for the public API.
pub use crate::core_modules::separable_transform::{NO_SEED_COST, UNREACHABLE_DISTANCE};

/// Edge length of a Landsat-derived pixel, in metres.
pub const DEFAULT_PIXEL_SIZE: f32 = 30.0;
/// Distance at which the proximity index falls to zero, in the pixel-size unit.
pub const DEFAULT_DECAY_DISTANCE: f32 = 1000.0;

/// Configuration for the proximity engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ProximityConfig {
    /// Physical length of one pixel edge. Output distances use the same unit.
    pub pixel_size: f32,
    /// Raw values that mark a seed cell.
    pub seed_range: SeedPredicate,
    /// Distance beyond which the proximity index is 0.
    pub decay_distance: f32,
    /// Number of blocking workers used by the parallel pipeline.
    pub workers: usize,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            pixel_size: DEFAULT_PIXEL_SIZE,
            seed_range: SeedPredicate::LOSS_YEAR,
            decay_distance: DEFAULT_DECAY_DISTANCE,
            workers: num_cpus::get(),
        }
    }
}

impl ProximityConfig {
    /// Defaults overridden by `LP_PIXEL_SIZE`, `LP_SEED_MIN`, `LP_SEED_MAX`,
    /// `LP_DECAY_DISTANCE` and `LP_WORKERS` when they are set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(pixel_size) = parse_override(&lookup, "LP_PIXEL_SIZE")? {
            config.pixel_size = pixel_size;
        }
        let seed_min = parse_override(&lookup, "LP_SEED_MIN")?.unwrap_or(config.seed_range.min());
        let seed_max = parse_override(&lookup, "LP_SEED_MAX")?.unwrap_or(config.seed_range.max());
        config.seed_range = SeedPredicate::new(seed_min, seed_max)?;
        if let Some(decay_distance) = parse_override(&lookup, "LP_DECAY_DISTANCE")? {
            config.decay_distance = decay_distance;
        }
        if let Some(workers) = parse_override(&lookup, "LP_WORKERS")? {
            config.workers = workers;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.pixel_size.is_finite() || self.pixel_size <= 0.0 {
            return Err(ProximityError::InvalidPixelSize(self.pixel_size));
        }
        if !self.decay_distance.is_finite() || self.decay_distance <= 0.0 {
            return Err(ProximityError::InvalidDecayDistance(self.decay_distance));
        }
        if self.workers == 0 {
            return Err(ProximityError::InvalidWorkerCount);
        }
        Ok(())
    }
}

fn parse_override<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>> {
    match lookup(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ProximityError::InvalidEnv { name, value }),
    }
}

/// The output of the engine for one loss grid.
#[derive(Debug, Clone)]
pub enum Report {
    /// Distances were measured from `seed_count` seed cells.
    Measured {
        distances: Grid<f32>,
        seed_count: usize,
    },
    /// The grid held no seed; every cell is `UNREACHABLE_DISTANCE`.
    NoSeedsFound { distances: Grid<f32> },
}

impl Report {
    pub fn distances(&self) -> &Grid<f32> {
        match self {
            Report::Measured { distances, .. } | Report::NoSeedsFound { distances } => distances,
        }
    }

    pub fn into_distances(self) -> Grid<f32> {
        match self {
            Report::Measured { distances, .. } | Report::NoSeedsFound { distances } => distances,
        }
    }

    pub fn seed_count(&self) -> usize {
        match self {
            Report::Measured { seed_count, .. } => *seed_count,
            Report::NoSeedsFound { .. } => 0,
        }
    }
}

impl From<TransformOutput> for Report {
    fn from(output: TransformOutput) -> Self {
        if output.is_degenerate() {
            Report::NoSeedsFound {
                distances: output.distances,
            }
        } else {
            Report::Measured {
                distances: output.distances,
                seed_count: output.seed_count,
            }
        }
    }
}

/// Linear proximity index: 1 at a seed, falling to 0 at `decay_distance` and beyond.
///
/// A report without seeds is 0 everywhere, whatever the decay distance.
pub fn proximity_layer(report: &Report, decay_distance: f32) -> Grid<f32> {
    match report {
        Report::Measured { distances, .. } => {
            distances.map(|d| (1.0 - d / decay_distance).max(0.0))
        }
        Report::NoSeedsFound { distances } => distances.map(|_| 0.0),
    }
}

/// The main, top-level struct for the proximity engine.
pub struct ProximityPipeline {
    transform: SeparableTransform,
    config: ProximityConfig,
}

impl ProximityPipeline {
    pub fn new(config: ProximityConfig) -> Result<Self> {
        config.validate()?;
        let transform = SeparableTransform::new(config.seed_range, config.pixel_size)?;
        Ok(Self { transform, config })
    }

    pub fn config(&self) -> &ProximityConfig {
        &self.config
    }

    pub fn transform(&self) -> &SeparableTransform {
        &self.transform
    }

    /// Computes the distance layer for `loss_grid`.
    pub fn generate_report(&self, loss_grid: &Grid<f32>) -> Report {
        self.transform.transform(loss_grid).into()
    }

    /// Converts a report's distances into the proximity index using the configured decay.
    pub fn proximity(&self, report: &Report) -> Grid<f32> {
        proximity_layer(report, self.config.decay_distance)
    }
}
