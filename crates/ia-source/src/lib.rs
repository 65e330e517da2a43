/// Image decoding for imgscii.
///
/// The conversion core never parses raw file bytes; everything enters
/// through this crate via the `image` codec library.
pub mod image;

pub use image::{IMAGE_EXTENSIONS, is_supported_image, load_image};
