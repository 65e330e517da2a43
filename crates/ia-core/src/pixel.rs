use crate::settings::CropRegion;

/// Decoded image buffer. RGBA row-major, 4 bytes per pixel.
///
/// Owned by the caller, read-only to the conversion pipeline.
///
/// # Example
/// ```
/// use ia_core::pixel::PixelBuffer;
/// let buf = PixelBuffer::new(10, 10);
/// assert_eq!(buf.data.len(), 400);
/// ```
#[derive(Debug)]
pub struct PixelBuffer {
    /// RGBA pixels, row-major, 4 bytes per pixel.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelBuffer {
    /// Create a zeroed buffer with the given dimensions.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0u8; (width as usize) * (height as usize) * 4],
            width,
            height,
        }
    }

    /// Pixel access (x, y) → (r, g, b, a).
    ///
    /// # Example
    /// ```
    /// use ia_core::pixel::PixelBuffer;
    /// let buf = PixelBuffer::new(4, 4);
    /// assert_eq!(buf.pixel(0, 0), (0, 0, 0, 0));
    /// ```
    #[inline]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8, u8) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let idx = ((y as usize) * (self.width as usize) + x as usize) * 4;
        if idx + 3 >= self.data.len() {
            return (0, 0, 0, 0);
        }
        (
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        )
    }

    /// Perceptual luminance, BT.709 integer weights.
    ///
    /// # Example
    /// ```
    /// use ia_core::pixel::PixelBuffer;
    /// let mut buf = PixelBuffer::new(1, 1);
    /// buf.data.copy_from_slice(&[255, 255, 255, 255]);
    /// assert_eq!(buf.luminance(0, 0), 255);
    /// ```
    #[inline]
    #[must_use]
    pub fn luminance(&self, x: u32, y: u32) -> u8 {
        let (r, g, b, _) = self.pixel(x, y);
        ((u32::from(r) * 2126 + u32::from(g) * 7152 + u32::from(b) * 722) / 10000) as u8
    }

    /// Extract the sub-image described by a percent-of-image crop region.
    ///
    /// Coordinates are converted to pixels and clamped so the result is at
    /// least 1×1. The region is assumed validated (start < end on both axes).
    #[must_use]
    pub fn crop(&self, region: &CropRegion) -> PixelBuffer {
        let x0 = ((f64::from(self.width) * f64::from(region.start_x) / 100.0) as u32)
            .min(self.width.saturating_sub(1));
        let y0 = ((f64::from(self.height) * f64::from(region.start_y) / 100.0) as u32)
            .min(self.height.saturating_sub(1));
        let x1 = ((f64::from(self.width) * f64::from(region.end_x) / 100.0) as u32)
            .clamp(x0 + 1, self.width);
        let y1 = ((f64::from(self.height) * f64::from(region.end_y) / 100.0) as u32)
            .clamp(y0 + 1, self.height);

        let mut out = PixelBuffer::new(x1 - x0, y1 - y0);
        for y in y0..y1 {
            let src_start = ((y as usize) * (self.width as usize) + x0 as usize) * 4;
            let src_end = src_start + ((x1 - x0) as usize) * 4;
            let dst_start = (((y - y0) as usize) * ((x1 - x0) as usize)) * 4;
            out.data[dst_start..dst_start + (src_end - src_start)]
                .copy_from_slice(&self.data[src_start..src_end]);
        }
        out
    }
}

/// Intermediate 2-D array of cell intensities, one per output character.
///
/// # Example
/// ```
/// use ia_core::pixel::BrightnessGrid;
/// let mut grid = BrightnessGrid::new(80, 24);
/// grid.set(0, 0, 128);
/// assert_eq!(grid.get(0, 0), 128);
/// ```
#[derive(Clone)]
pub struct BrightnessGrid {
    /// Flat array of intensities, row-major.
    pub cells: Vec<u8>,
    /// Columns (characters per line).
    pub cols: u32,
    /// Rows (lines).
    pub rows: u32,
}

impl BrightnessGrid {
    /// Create a zeroed grid.
    #[must_use]
    pub fn new(cols: u32, rows: u32) -> Self {
        Self {
            cells: vec![0u8; (cols as usize) * (rows as usize)],
            cols,
            rows,
        }
    }

    /// Set the intensity of cell (x, y).
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: u8) {
        self.cells[(y as usize) * (self.cols as usize) + x as usize] = value;
    }

    /// Intensity of cell (x, y).
    #[inline]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.cells[(y as usize) * (self.cols as usize) + x as usize]
    }
}

/// The output artifact: equal-length text lines, one per grid row.
///
/// `Display` joins the lines with `\n`; there is no trailing newline so the
/// artifact can be embedded verbatim.
///
/// # Example
/// ```
/// use ia_core::pixel::AsciiArt;
/// let art = AsciiArt::new(vec!["##".into(), "..".into()]);
/// assert_eq!(art.cols(), 2);
/// assert_eq!(art.rows(), 2);
/// assert_eq!(art.to_string(), "##\n..");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AsciiArt {
    lines: Vec<String>,
}

impl AsciiArt {
    /// Wrap pre-built lines. Lines are expected to be of equal char length.
    #[must_use]
    pub fn new(lines: Vec<String>) -> Self {
        debug_assert!(
            lines
                .windows(2)
                .all(|w| w[0].chars().count() == w[1].chars().count()),
            "ragged ASCII artifact"
        );
        Self { lines }
    }

    /// The text lines, top to bottom.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Characters per line.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.lines.first().map_or(0, |l| l.chars().count())
    }

    /// Number of lines.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.lines.len()
    }
}

impl std::fmt::Display for AsciiArt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_str(line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luminance_weights_green_heaviest() {
        let mut buf = PixelBuffer::new(3, 1);
        buf.data[0] = 255; // x=0: pure red
        buf.data[5] = 255; // x=1: pure green
        buf.data[10] = 255; // x=2: pure blue
        assert!(buf.luminance(1, 0) > buf.luminance(0, 0));
        assert!(buf.luminance(0, 0) > buf.luminance(2, 0));
    }

    #[test]
    fn crop_extracts_quadrant() {
        let mut buf = PixelBuffer::new(10, 10);
        // Mark pixel (5, 5) white.
        let idx = (5 * 10 + 5) * 4;
        buf.data[idx..idx + 4].copy_from_slice(&[255, 255, 255, 255]);

        let region = CropRegion {
            start_x: 50.0,
            start_y: 50.0,
            end_x: 100.0,
            end_y: 100.0,
        };
        let cropped = buf.crop(&region);
        assert_eq!((cropped.width, cropped.height), (5, 5));
        assert_eq!(cropped.pixel(0, 0), (255, 255, 255, 255));
    }

    #[test]
    fn crop_never_collapses_to_zero() {
        let buf = PixelBuffer::new(3, 3);
        let region = CropRegion {
            start_x: 99.0,
            start_y: 99.0,
            end_x: 100.0,
            end_y: 100.0,
        };
        let cropped = buf.crop(&region);
        assert!(cropped.width >= 1 && cropped.height >= 1);
    }

    #[test]
    fn ascii_art_display_has_no_trailing_newline() {
        let art = AsciiArt::new(vec!["ab".into(), "cd".into()]);
        assert_eq!(format!("{art}"), "ab\ncd");
    }
}
