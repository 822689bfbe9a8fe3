// THEORY:
// This file is the main entry point for the `loss_proximity` library crate.
// It exports the `ProximityPipeline` (and its async twin `ParallelPipeline`)
// together with the `Grid`, `ProximityConfig` and `Report` types as the
// high-level interface of the engine.
//
// The engine answers one question for every cell of a raster: how far, in
// physical units, is the nearest cell marking recent tree-cover loss? It does so
// with an exact, linear-time squared Euclidean distance transform (`core_modules`),
// so it scales to country-sized grids where a per-cell search over all seeds
// would not.

pub mod core_modules;
pub mod error;
pub mod parallel_pipeline;
pub mod pipeline;

pub use core_modules::grid::Grid;
pub use core_modules::seed_mask::{SeedMask, SeedPredicate};
pub use error::{ProximityError, Result};
pub use parallel_pipeline::ParallelPipeline;
pub use pipeline::{ProximityConfig, ProximityPipeline, Report};
