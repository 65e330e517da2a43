use std::path::Path;

use ia_core::error::ConvertError;
use ia_core::pixel::PixelBuffer;

/// File extensions accepted by the open dialog and the CLI.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "tif", "tiff"];

/// Whether a path looks like a supported raster image.
///
/// # Example
/// ```
/// use ia_source::image::is_supported_image;
/// use std::path::Path;
/// assert!(is_supported_image(Path::new("photo.JPG")));
/// assert!(!is_supported_image(Path::new("clip.mp4")));
/// ```
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
}

/// Decode an image file into an RGBA pixel buffer.
///
/// Animated GIFs decode to their first frame; animation is out of scope.
///
/// # Errors
/// `ConvertError::InvalidImage` on unreadable files or decode failures.
///
/// # Example
/// ```no_run
/// use ia_source::image::load_image;
/// use std::path::Path;
/// let buffer = load_image(Path::new("photo.png")).unwrap();
/// ```
pub fn load_image(path: &Path) -> Result<PixelBuffer, ConvertError> {
    let img = image::open(path)
        .map_err(|e| ConvertError::InvalidImage(format!("{}: {e}", path.display())))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    log::info!("loaded {} ({width}×{height})", path.display());
    Ok(PixelBuffer {
        data: rgba.into_raw(),
        width,
        height,
    })
}
