use std::collections::HashMap;
use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontRef, PxScale, point};
use anyhow::{Context, Result};
use ia_core::pixel::{AsciiArt, PixelBuffer};
use rayon::prelude::*;

/// Colors and glyph size for PNG export.
///
/// # Example
/// ```
/// use ia_export::rasterizer::ExportStyle;
/// let style = ExportStyle::default();
/// assert_eq!(style.font_px, 12.0);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct ExportStyle {
    /// Glyph size in pixels.
    pub font_px: f32,
    /// Background color (RGB).
    pub bg: (u8, u8, u8),
    /// Text color (RGB).
    pub fg: (u8, u8, u8),
}

impl Default for ExportStyle {
    fn default() -> Self {
        Self {
            font_px: 12.0,
            bg: (0, 0, 0),
            fg: (255, 255, 255),
        }
    }
}

impl ExportStyle {
    /// Named color presets: "black", "white", "green".
    #[must_use]
    pub fn color_by_name(name: &str) -> Option<(u8, u8, u8)> {
        match name {
            "black" => Some((0, 0, 0)),
            "white" => Some((255, 255, 255)),
            "green" => Some((0, 255, 0)),
            _ => None,
        }
    }

    /// Build a style from optional user choices, defaults filling the gaps.
    ///
    /// # Errors
    /// Returns an error on an unknown color name or a glyph size outside
    /// [4, 128] pixels.
    pub fn from_options(
        font_px: Option<f32>,
        fg: Option<&str>,
        bg: Option<&str>,
    ) -> Result<Self> {
        let mut style = Self::default();
        if let Some(px) = font_px {
            anyhow::ensure!(
                px.is_finite() && (4.0..=128.0).contains(&px),
                "export font size must be in [4, 128] px, got {px}"
            );
            style.font_px = px;
        }
        if let Some(name) = fg {
            style.fg = Self::color_by_name(name)
                .with_context(|| format!("unknown text color {name:?} (black, white, green)"))?;
        }
        if let Some(name) = bg {
            style.bg = Self::color_by_name(name)
                .with_context(|| format!("unknown background color {name:?} (black, white, green)"))?;
        }
        Ok(style)
    }
}

/// Monospace font candidates, probed in order. Mirrors the usual suspects of
/// each platform; first readable and parseable file wins.
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
    "/usr/share/fonts/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
    "/usr/share/fonts/liberation-mono/LiberationMono-Regular.ttf",
    "C:\\Windows\\Fonts\\consola.ttf",
    "C:\\Windows\\Fonts\\cour.ttf",
    "/System/Library/Fonts/Monaco.ttf",
    "/Library/Fonts/Courier New.ttf",
];

/// Locate a usable monospace font on the host.
///
/// Returns `None` when no candidate exists; PNG export then fails with a
/// user-visible error while text save remains available.
#[must_use]
pub fn find_system_font() -> Option<PathBuf> {
    FONT_CANDIDATES
        .iter()
        .map(Path::new)
        .find(|p| p.is_file())
        .map(Path::to_path_buf)
}

/// Converts an `AsciiArt` into high-resolution RGBA pixels.
///
/// Keeps a glyph atlas cache so rasterization cost is paid once per distinct
/// character, not per cell.
pub struct Rasterizer {
    char_width: u32,
    char_height: u32,
    /// Maps a char to its alpha buffer (size = char_width × char_height).
    glyph_cache: HashMap<char, Vec<u8>>,
    /// Fallback for characters outside the cached ranges.
    empty_glyph: Vec<u8>,
}

impl Rasterizer {
    /// Build the rasterizer from raw TTF bytes, pre-caching every character
    /// the built-in palettes can emit (printable ASCII, shade blocks,
    /// Latin-1 punctuation, geometric shapes).
    ///
    /// # Errors
    /// Returns an error if the font data cannot be parsed.
    pub fn new(font_data: &[u8], scale_px: f32) -> Result<Self> {
        let font = FontRef::try_from_slice(font_data).context("unparseable font data")?;
        let scale = PxScale::from(scale_px);

        let v_advance = font.ascent_unscaled() - font.descent_unscaled() + font.line_gap_unscaled();
        let height = (v_advance * scale.y / font.height_unscaled()).ceil() as u32;

        let m_glyph = font.glyph_id('M');
        let h_advance = font.h_advance_unscaled(m_glyph);
        let width = (h_advance * scale.x / font.height_unscaled()).ceil() as u32;

        let char_width = width.max(1);
        let char_height = height.max(1);

        let mut rasterizer = Self {
            char_width,
            char_height,
            glyph_cache: HashMap::new(),
            empty_glyph: vec![0u8; (char_width * char_height) as usize],
        };

        rasterizer.cache_charset(&font, scale, 32..=126);
        // Shade blocks (PALETTE_BLOCKS)
        rasterizer.cache_charset(&font, scale, 0x2580..=0x259F);
        // Latin-1 Supplement (· from PALETTE_DOTS)
        rasterizer.cache_charset(&font, scale, 0x00A0..=0x00FF);
        // Geometric shapes (● from PALETTE_DOTS)
        rasterizer.cache_charset(&font, scale, 0x25A0..=0x25FF);

        Ok(rasterizer)
    }

    /// Build the rasterizer from a font file on disk.
    ///
    /// # Errors
    /// Returns an error if the file is unreadable or unparseable.
    pub fn from_font_file(path: &Path, scale_px: f32) -> Result<Self> {
        let data = std::fs::read(path)
            .with_context(|| format!("cannot read font {}", path.display()))?;
        Self::new(&data, scale_px)
    }

    fn cache_charset(
        &mut self,
        font: &FontRef,
        scale: PxScale,
        range: std::ops::RangeInclusive<u32>,
    ) {
        for codepoint in range {
            let Some(ch) = std::char::from_u32(codepoint) else {
                continue;
            };
            // Skip characters the font does not cover (glyph_id 0 = .notdef)
            // rather than stamping placeholder boxes into the export.
            let gid = font.glyph_id(ch);
            if gid.0 == 0 {
                continue;
            }

            let mut buffer = vec![0u8; (self.char_width * self.char_height) as usize];
            let ascent_px = font.ascent_unscaled() * scale.y / font.height_unscaled();
            let glyph = gid.with_scale_and_position(scale, point(0.0, ascent_px));

            if let Some(outline) = font.outline_glyph(glyph) {
                let bounds = outline.px_bounds();
                #[allow(clippy::cast_possible_wrap)]
                outline.draw(|x, y, v| {
                    let px = (x as i32 + bounds.min.x as i32).max(0) as u32;
                    let py = (y as i32 + bounds.min.y as i32).max(0) as u32;
                    if px < self.char_width && py < self.char_height {
                        let idx = (py * self.char_width + px) as usize;
                        if idx < buffer.len() {
                            buffer[idx] = (v * 255.0).round() as u8;
                        }
                    }
                });
            }
            self.glyph_cache.insert(ch, buffer);
        }
    }

    /// Pixel dimensions of the export for a given grid size.
    #[must_use]
    pub fn target_dimensions(&self, cols: u32, rows: u32) -> (u32, u32) {
        (cols * self.char_width, rows * self.char_height)
    }

    /// Render the artifact into an RGBA buffer, one character-row band per
    /// rayon task. Alpha-blends glyph coverage between `style.fg` and
    /// `style.bg`.
    #[must_use]
    pub fn render(&self, art: &AsciiArt, style: &ExportStyle) -> PixelBuffer {
        let cols = art.cols() as u32;
        let rows = art.rows() as u32;
        let (out_w, out_h) = self.target_dimensions(cols.max(1), rows.max(1));
        let mut fb = PixelBuffer::new(out_w, out_h);

        let empty_glyph = &self.empty_glyph;
        let stride = (out_w * 4) as usize;
        let band_size = stride * self.char_height as usize;

        fb.data
            .par_chunks_exact_mut(band_size)
            .enumerate()
            .for_each(|(row, band)| {
                let Some(line) = art.lines().get(row) else {
                    return;
                };
                for (col, ch) in line.chars().enumerate() {
                    let alpha_buf = self.glyph_cache.get(&ch).unwrap_or(empty_glyph);
                    let cx_start = col * self.char_width as usize;

                    for gy in 0..(self.char_height as usize) {
                        let band_y_offset = gy * stride;
                        for gx in 0..(self.char_width as usize) {
                            let alpha =
                                f32::from(alpha_buf[gy * self.char_width as usize + gx]) / 255.0;
                            let r = (f32::from(style.fg.0) * alpha
                                + f32::from(style.bg.0) * (1.0 - alpha))
                                as u8;
                            let g = (f32::from(style.fg.1) * alpha
                                + f32::from(style.bg.1) * (1.0 - alpha))
                                as u8;
                            let b = (f32::from(style.fg.2) * alpha
                                + f32::from(style.bg.2) * (1.0 - alpha))
                                as u8;

                            let idx = band_y_offset + (cx_start + gx) * 4;
                            band[idx] = r;
                            band[idx + 1] = g;
                            band[idx + 2] = b;
                            band[idx + 3] = 255;
                        }
                    }
                }
            });

        fb
    }
}

/// Rasterize the artifact with a host monospace font and encode it as PNG.
///
/// # Errors
/// Returns an error if no usable font is found, the artifact is empty, or
/// the file cannot be written.
pub fn export_png(art: &AsciiArt, path: &Path, style: &ExportStyle) -> Result<()> {
    anyhow::ensure!(art.rows() > 0 && art.cols() > 0, "empty artifact");

    let font_path = find_system_font().context("no monospace font found on this system")?;
    log::debug!("rasterizing with {}", font_path.display());

    let rasterizer = Rasterizer::from_font_file(&font_path, style.font_px)?;
    let fb = rasterizer.render(art, style);

    let img = image::RgbaImage::from_raw(fb.width, fb.height, fb.data)
        .context("rasterizer produced a mis-sized buffer")?;
    img.save(path)
        .with_context(|| format!("cannot write {}", path.display()))?;
    log::info!("exported {}×{} px to {}", fb.width, fb.height, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_presets_resolve() {
        assert_eq!(ExportStyle::color_by_name("green"), Some((0, 255, 0)));
        assert_eq!(ExportStyle::color_by_name("magenta"), None);
    }

    #[test]
    fn style_options_override_defaults() {
        let style = ExportStyle::from_options(Some(24.0), Some("green"), Some("white")).unwrap();
        assert_eq!(style.font_px, 24.0);
        assert_eq!(style.fg, (0, 255, 0));
        assert_eq!(style.bg, (255, 255, 255));

        let style = ExportStyle::from_options(None, None, None).unwrap();
        assert_eq!(style.font_px, ExportStyle::default().font_px);
    }

    #[test]
    fn style_options_reject_bad_values() {
        assert!(ExportStyle::from_options(None, Some("magenta"), None).is_err());
        assert!(ExportStyle::from_options(Some(0.5), None, None).is_err());
        assert!(ExportStyle::from_options(Some(f32::NAN), None, None).is_err());
    }

    #[test]
    fn render_dimensions_scale_with_grid() {
        // Skipped silently on hosts without any candidate font.
        let Some(font_path) = find_system_font() else {
            return;
        };
        let rasterizer = Rasterizer::from_font_file(&font_path, 16.0).unwrap();
        let art = AsciiArt::new(vec!["@#".into(), "..".into()]);
        let fb = rasterizer.render(&art, &ExportStyle::default());
        assert_eq!((fb.width, fb.height), rasterizer.target_dimensions(2, 2));
        // Opaque output everywhere.
        assert!(fb.data.chunks_exact(4).all(|px| px[3] == 255));
    }

    #[test]
    fn dense_glyph_is_brighter_than_space_on_black() {
        let Some(font_path) = find_system_font() else {
            return;
        };
        let rasterizer = Rasterizer::from_font_file(&font_path, 16.0).unwrap();
        let style = ExportStyle::default();
        let dark = rasterizer.render(&AsciiArt::new(vec![" ".into()]), &style);
        let bright = rasterizer.render(&AsciiArt::new(vec!["@".into()]), &style);
        let sum = |fb: &PixelBuffer| fb.data.iter().map(|&b| u64::from(b)).sum::<u64>();
        assert!(sum(&bright) > sum(&dark));
    }

    #[test]
    fn export_png_writes_a_decodable_file() {
        let Some(_) = find_system_font() else {
            return;
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("art.png");
        let art = AsciiArt::new(vec!["@#".into(), ".:".into()]);
        export_png(&art, &path, &ExportStyle::default()).unwrap();
        assert!(image::open(&path).is_ok());
    }
}
