use anyhow::{bail, Context};
use loss_proximity::core_modules::utils::save_distance_heatmap;
use loss_proximity::{Grid, ParallelPipeline, ProximityConfig, Report};
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: visual_tester <loss_grid.bin> <width> <height> <output.png>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // --- 1. Argument Parsing & Setup ---
    let args: Vec<String> = env::args().collect();
    if args.len() < 5 {
        println!("{USAGE}");
        return Ok(());
    }
    let input_path = &args[1];
    let width: usize = args[2].parse().with_context(|| format!("invalid width {:?}", args[2]))?;
    let height: usize = args[3].parse().with_context(|| format!("invalid height {:?}", args[3]))?;
    let output_path = &args[4];

    let config = ProximityConfig::from_env().context("reading LP_* configuration")?;
    info!(?config, "configuration loaded");

    // --- 2. Raster Loading ---
    let grid = load_raw_grid(input_path, width, height)?;
    info!(width, height, path = %input_path, "loss grid loaded");

    // --- 3. Distance Transform ---
    let pipeline = ParallelPipeline::new(config)?;
    let report = pipeline.generate_report(&grid).await?;
    match &report {
        Report::Measured { seed_count, .. } => info!(seed_count, "distance layer measured"),
        Report::NoSeedsFound { .. } => info!("no loss pixels found, distance layer is unreachable"),
    }

    let proximity = pipeline.proximity(&report);
    let close = proximity.as_slice().iter().filter(|p| **p > 0.0).count();
    info!(
        cells_within_decay = close,
        total_cells = proximity.len(),
        "proximity index computed"
    );

    // --- 4. Heatmap Output ---
    save_distance_heatmap(output_path, &report)
        .with_context(|| format!("writing heatmap to {output_path}"))?;

    println!("Processing complete. Output saved to {}", output_path);
    Ok(())
}

/// Reads a raw little-endian f32 raster and checks it against the declared shape.
fn load_raw_grid(path: &str, width: usize, height: usize) -> anyhow::Result<Grid<f32>> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {path}"))?;
    if bytes.len() % 4 != 0 {
        bail!("{path} is {} bytes, not a whole number of f32 values", bytes.len());
    }

    let values: Vec<f32> = bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();

    Grid::from_vec(width, height, values).with_context(|| format!("{path} does not match {width}x{height}"))
}
