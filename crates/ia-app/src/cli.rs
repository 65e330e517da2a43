use std::path::PathBuf;

use clap::Parser;

/// imgscii — image to ASCII art converter with live terminal preview.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Image to load on startup (PNG, JPEG, GIF, BMP, TIFF).
    #[arg(long, short)]
    pub image: Option<PathBuf>,

    /// Settings file (TOML). Default: config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Palette preset: standard, detailed, simple, blocks, dots.
    #[arg(long)]
    pub palette: Option<String>,

    /// Horizontal resampling density, percent [20, 200].
    #[arg(long)]
    pub width_scale: Option<f32>,

    /// Vertical resampling density, percent [20, 200].
    #[arg(long)]
    pub height_scale: Option<f32>,

    /// Reverse the brightness-to-character direction. Accepts an explicit
    /// value (--invert=false) to override a config file.
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub invert: Option<bool>,

    /// Pre-mapping intensity multiplier [0.1, 3.0].
    #[arg(long)]
    pub brightness: Option<f32>,

    /// Headless mode: convert --image and write the text artifact here.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Headless mode: additionally rasterize the artifact to this PNG.
    #[arg(long)]
    pub png: Option<PathBuf>,

    /// Glyph size for PNG export, in pixels [4, 128].
    #[arg(long)]
    pub export_font_px: Option<f32>,

    /// Text color for PNG export: black, white, green.
    #[arg(long)]
    pub export_fg: Option<String>,

    /// Background color for PNG export: black, white, green.
    #[arg(long)]
    pub export_bg: Option<String>,

    /// Log level: error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Headless output targets require an input image.
    ///
    /// # Errors
    /// Returns an error if --out or --png is given without --image.
    pub fn validate(&self) -> anyhow::Result<()> {
        if (self.out.is_some() || self.png.is_some()) && self.image.is_none() {
            anyhow::bail!("--out/--png require --image");
        }
        Ok(())
    }
}
