/// ASCII conversion engine for imgscii.
///
/// Resamples a pixel buffer to a character grid, maps cell luminance through
/// a palette, and assembles the text artifact. Pure functions throughout:
/// identical inputs always produce identical output.
pub mod convert;
pub mod mapper;
pub mod resample;

pub use convert::convert;
pub use resample::ASPECT_CORRECTION;
