/// Shared types and configuration for imgscii.
///
/// This crate contains the palette table, conversion settings, error types,
/// and the pixel/grid/artifact value objects used across the workspace.
pub mod error;
pub mod palette;
pub mod pixel;
pub mod settings;

pub use error::ConvertError;
pub use palette::{PaletteId, PaletteLut};
pub use pixel::{AsciiArt, BrightnessGrid, PixelBuffer};
pub use settings::{ConvertSettings, CropRegion};
