// THEORY:
// Every recoverable failure in the crate funnels into one enum. The distance
// transform itself never fails: grids are shape-checked when they are built and
// configuration is checked when a pipeline is built, so by the time a transform
// runs all of its preconditions already hold.

use thiserror::Error;

/// Errors raised while building grids, configuring the engine or running workers.
#[derive(Debug, Error)]
pub enum ProximityError {
    /// A grid was requested with a zero width or height.
    #[error("grid dimensions must be at least 1x1, got {width}x{height}")]
    ZeroDimension { width: usize, height: usize },

    /// `width * height` does not fit in `usize`.
    #[error("grid dimensions {width}x{height} overflow the addressable cell count")]
    DimensionOverflow { width: usize, height: usize },

    /// The buffer length does not equal `width * height`.
    #[error("grid buffer holds {actual} values, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Pixel size must be a finite, strictly positive length.
    #[error("pixel size must be finite and positive, got {0}")]
    InvalidPixelSize(f32),

    /// The seed range is inverted or has a NaN bound.
    #[error("seed range [{min}, {max}] is empty")]
    InvalidSeedRange { min: f32, max: f32 },

    /// Proximity decay distance must be a finite, strictly positive length.
    #[error("decay distance must be finite and positive, got {0}")]
    InvalidDecayDistance(f32),

    #[error("worker count must be at least 1")]
    InvalidWorkerCount,

    /// An environment override could not be parsed.
    #[error("environment variable {name}={value:?} could not be parsed")]
    InvalidEnv { name: &'static str, value: String },

    /// A blocking transform worker panicked or was cancelled.
    #[error("transform worker failed: {0}")]
    WorkerFailed(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, ProximityError>;
