pub mod image_helper;

pub use image_helper::image_helper::{render_heatmap, save_distance_heatmap};
