use ia_core::error::ConvertError;
use ia_core::palette::PaletteLut;
use ia_core::pixel::{AsciiArt, PixelBuffer};
use ia_core::settings::ConvertSettings;

use crate::mapper::map_to_ascii;
use crate::resample::resample;

/// Run the full pipeline: validate → crop → resample → map.
///
/// Straight composition, no retries and no partial artifacts: either a
/// complete artifact is produced or an error is returned. Deterministic for
/// identical inputs.
///
/// # Errors
/// `ConvertError::InvalidSettings` if validation rejects the settings; the
/// image is never touched in that case.
///
/// # Example
/// ```
/// use ia_ascii::convert::convert;
/// use ia_core::pixel::PixelBuffer;
/// use ia_core::settings::ConvertSettings;
/// let image = PixelBuffer::new(10, 10);
/// let art = convert(&image, &ConvertSettings::default()).unwrap();
/// assert_eq!((art.cols(), art.rows()), (10, 5));
/// ```
pub fn convert(image: &PixelBuffer, settings: &ConvertSettings) -> Result<AsciiArt, ConvertError> {
    settings.validate()?;
    let lut = PaletteLut::new(&settings.palette);

    let art = if let Some(ref region) = settings.crop {
        let cropped = image.crop(region);
        log::debug!(
            "crop {}×{} → {}×{}",
            image.width,
            image.height,
            cropped.width,
            cropped.height
        );
        let grid = resample(&cropped, settings);
        map_to_ascii(&grid, &lut, settings.invert, settings.brightness)
    } else {
        let grid = resample(image, settings);
        map_to_ascii(&grid, &lut, settings.invert, settings.brightness)
    };

    log::debug!("converted to {}×{} chars", art.cols(), art.rows());
    Ok(art)
}
