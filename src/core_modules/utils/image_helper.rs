// THEORY:
// Distance layers are easiest to sanity-check by eye. This helper renders a
// distance grid as an RGB heatmap and writes it as a PNG: cells next to a seed
// are red and cells at the farthest measured distance are blue. A grid without
// seeds has no distances to show and is drawn black.

pub mod image_helper {
    use crate::error::Result;
    use crate::pipeline::Report;
    use image::ImageEncoder;
    use std::path::Path;

    const CHANNELS: usize = 3;

    /// Maps a normalised distance in `[0, 1]` onto red -> yellow -> blue.
    fn heat_color(t: f32) -> [u8; CHANNELS] {
        let t = t.clamp(0.0, 1.0);
        if t <= 0.5 {
            // Red to Yellow
            let ratio = t / 0.5;
            [255, (255.0 * ratio) as u8, 0]
        } else {
            // Yellow to Blue
            let ratio = (t - 0.5) / 0.5;
            let warm = (255.0 * (1.0 - ratio)) as u8;
            [warm, warm, (255.0 * ratio) as u8]
        }
    }

    /// Renders a report's distances into a packed RGB8 buffer, row-major.
    ///
    /// A report without seeds renders black everywhere.
    pub fn render_heatmap(report: &Report) -> Vec<u8> {
        let distances = report.distances();
        let mut buffer = Vec::with_capacity(distances.len() * CHANNELS);

        let Report::Measured { .. } = report else {
            buffer.resize(distances.len() * CHANNELS, 0);
            return buffer;
        };

        let max_distance = distances.as_slice().iter().copied().fold(0.0f32, f32::max);
        for distance in distances.as_slice() {
            let t = if max_distance > 0.0 {
                distance / max_distance
            } else {
                0.0
            };
            buffer.extend_from_slice(&heat_color(t));
        }
        buffer
    }

    /// Writes a report's distances to `path` as a PNG heatmap.
    pub fn save_distance_heatmap(path: impl AsRef<Path>, report: &Report) -> Result<()> {
        let distances = report.distances();
        let buffer = render_heatmap(report);
        let output = std::fs::File::create(path.as_ref()).map_err(image::ImageError::IoError)?;
        let encoder = image::codecs::png::PngEncoder::new(output);

        encoder.write_image(
            &buffer,
            distances.width() as u32,
            distances.height() as u32,
            image::ExtendedColorType::Rgb8,
        )?;

        Ok(())
    }
}
