pub mod envelope;
pub mod grid;
pub mod scanner_1d;
pub mod seed_mask;
pub mod separable_transform;
pub mod utils;
