use ia_core::pixel::{BrightnessGrid, PixelBuffer};
use ia_core::settings::ConvertSettings;

/// Row-count correction for non-square monospace cells: a terminal character
/// is roughly twice as tall as wide.
pub const ASPECT_CORRECTION: f32 = 0.5;

/// Target grid dimensions for an image under the given settings.
///
/// `cols = max(1, round(w · width_scale / 100))`,
/// `rows = max(1, round(h · height_scale / 100 · ASPECT_CORRECTION))`.
///
/// # Example
/// ```
/// use ia_ascii::resample::target_dimensions;
/// use ia_core::settings::ConvertSettings;
/// let settings = ConvertSettings::default();
/// assert_eq!(target_dimensions(100, 50, &settings), (100, 25));
/// ```
#[must_use]
pub fn target_dimensions(width: u32, height: u32, settings: &ConvertSettings) -> (u32, u32) {
    let cols = ((width as f32 * settings.width_scale / 100.0).round() as u32).max(1);
    let rows = ((height as f32 * settings.height_scale / 100.0 * ASPECT_CORRECTION).round()
        as u32)
        .max(1);
    (cols, rows)
}

/// Downsample an image to a grid of per-cell luminance samples.
///
/// Block averaging: each cell takes the mean luminance of every source pixel
/// mapping to it, which avoids aliasing artifacts on high-frequency images.
/// Source regions are clamped to at least one pixel so edge cells always
/// have samples. Deterministic for identical input and settings.
///
/// # Example
/// ```
/// use ia_ascii::resample::resample;
/// use ia_core::pixel::PixelBuffer;
/// use ia_core::settings::ConvertSettings;
/// let image = PixelBuffer::new(10, 10);
/// let grid = resample(&image, &ConvertSettings::default());
/// assert_eq!((grid.cols, grid.rows), (10, 5));
/// ```
#[must_use]
pub fn resample(image: &PixelBuffer, settings: &ConvertSettings) -> BrightnessGrid {
    let (cols, rows) = target_dimensions(image.width, image.height, settings);
    let mut grid = BrightnessGrid::new(cols, rows);

    let w = u64::from(image.width);
    let h = u64::from(image.height);

    for cy in 0..rows {
        let y0 = (u64::from(cy) * h / u64::from(rows)) as u32;
        let y1 = ((u64::from(cy) + 1) * h / u64::from(rows)).max(u64::from(y0) + 1) as u32;
        let y1 = y1.min(image.height).max(y0 + 1);

        for cx in 0..cols {
            let x0 = (u64::from(cx) * w / u64::from(cols)) as u32;
            let x1 = ((u64::from(cx) + 1) * w / u64::from(cols)).max(u64::from(x0) + 1) as u32;
            let x1 = x1.min(image.width).max(x0 + 1);

            let mut sum = 0u64;
            for y in y0..y1 {
                for x in x0..x1 {
                    sum += u64::from(image.luminance(x, y));
                }
            }
            let count = u64::from(y1 - y0) * u64::from(x1 - x0);
            grid.set(cx, cy, (sum / count) as u8);
        }
    }

    grid
}
