use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConvertError;
use crate::palette::{PALETTE_STANDARD, PaletteId};

/// Width/height scale bounds, in percent of the source dimension.
pub const SCALE_MIN: f32 = 20.0;
/// Upper scale bound.
pub const SCALE_MAX: f32 = 200.0;
/// Brightness multiplier bounds.
pub const BRIGHTNESS_MIN: f32 = 0.1;
/// Upper brightness bound.
pub const BRIGHTNESS_MAX: f32 = 3.0;

/// Percent-of-image crop rectangle.
///
/// All coordinates in [0, 100], start strictly below end on both axes.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct CropRegion {
    /// Left edge, percent of image width.
    pub start_x: f32,
    /// Top edge, percent of image height.
    pub start_y: f32,
    /// Right edge, percent of image width.
    pub end_x: f32,
    /// Bottom edge, percent of image height.
    pub end_y: f32,
}

impl CropRegion {
    fn validate(&self) -> Result<(), ConvertError> {
        let coords = [self.start_x, self.start_y, self.end_x, self.end_y];
        if coords.iter().any(|c| !c.is_finite() || *c < 0.0 || *c > 100.0) {
            return Err(ConvertError::InvalidSettings(format!(
                "crop coordinates must be in [0, 100], got {coords:?}"
            )));
        }
        if self.start_x >= self.end_x || self.start_y >= self.end_y {
            return Err(ConvertError::InvalidSettings(format!(
                "crop region is empty: ({}, {}) → ({}, {})",
                self.start_x, self.start_y, self.end_x, self.end_y
            )));
        }
        Ok(())
    }
}

/// Immutable settings for one conversion.
///
/// Passed by value into each pipeline invocation; the pipeline holds no
/// state of its own beyond the read-only palette table.
///
/// # Example
/// ```
/// use ia_core::settings::ConvertSettings;
/// let settings = ConvertSettings::default();
/// assert_eq!(settings.width_scale, 100.0);
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ConvertSettings {
    /// Horizontal resampling density, percent [20, 200].
    pub width_scale: f32,
    /// Vertical resampling density, percent [20, 200].
    pub height_scale: f32,
    /// Ordered palette characters, darkest → lightest. Length ≥ 2.
    pub palette: String,
    /// Reverse the brightness-to-character direction.
    pub invert: bool,
    /// Pre-mapping intensity multiplier [0.1, 3.0].
    pub brightness: f32,
    /// Optional percent-of-image crop applied before resampling.
    pub crop: Option<CropRegion>,
}

impl Default for ConvertSettings {
    fn default() -> Self {
        Self {
            width_scale: 100.0,
            height_scale: 100.0,
            palette: PALETTE_STANDARD.to_string(),
            invert: false,
            brightness: 1.0,
            crop: None,
        }
    }
}

impl ConvertSettings {
    /// Reject out-of-range or degenerate settings before the pipeline runs.
    ///
    /// Validation is idempotent: re-validating already-valid settings never
    /// fails.
    ///
    /// # Errors
    /// `ConvertError::InvalidSettings` naming the offending field.
    ///
    /// # Example
    /// ```
    /// use ia_core::settings::ConvertSettings;
    /// let mut settings = ConvertSettings::default();
    /// settings.palette = String::new();
    /// assert!(settings.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ConvertError> {
        for (name, value) in [
            ("width_scale", self.width_scale),
            ("height_scale", self.height_scale),
        ] {
            if !value.is_finite() || !(SCALE_MIN..=SCALE_MAX).contains(&value) {
                return Err(ConvertError::InvalidSettings(format!(
                    "{name} must be in [{SCALE_MIN}, {SCALE_MAX}], got {value}"
                )));
            }
        }
        if !self.brightness.is_finite()
            || !(BRIGHTNESS_MIN..=BRIGHTNESS_MAX).contains(&self.brightness)
        {
            return Err(ConvertError::InvalidSettings(format!(
                "brightness must be in [{BRIGHTNESS_MIN}, {BRIGHTNESS_MAX}], got {}",
                self.brightness
            )));
        }
        if self.palette.chars().count() < 2 {
            return Err(ConvertError::InvalidSettings(format!(
                "palette needs at least 2 characters, got {:?}",
                self.palette
            )));
        }
        if let Some(ref crop) = self.crop {
            crop.validate()?;
        }
        Ok(())
    }

    /// Replace the palette with a built-in preset.
    pub fn set_palette(&mut self, id: PaletteId) {
        self.palette = id.chars().to_string();
    }

    /// The preset matching the current palette string, if any.
    #[must_use]
    pub fn palette_id(&self) -> Option<PaletteId> {
        PaletteId::ALL.iter().copied().find(|p| p.chars() == self.palette)
    }
}

/// TOML file layout: one `[convert]` section, every field optional.
#[derive(Deserialize)]
struct SettingsFile {
    convert: ConvertSection,
}

#[derive(Deserialize)]
struct ConvertSection {
    width_scale: Option<f32>,
    height_scale: Option<f32>,
    /// Preset name ("standard", "blocks", …) or a literal character ramp.
    palette: Option<String>,
    invert: Option<bool>,
    brightness: Option<f32>,
    crop: Option<CropRegion>,
}

/// Load a TOML settings file and merge it over the defaults.
///
/// The `palette` field accepts either a preset name or a literal character
/// ramp. The merged result is validated before being returned.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed, or if the merged
/// settings are out of range.
///
/// # Example
/// ```no_run
/// use ia_core::settings::load_settings;
/// use std::path::Path;
/// let settings = load_settings(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_settings(path: &Path) -> Result<ConvertSettings, ConvertError> {
    let content = std::fs::read_to_string(path)?;
    let file: SettingsFile = toml::from_str(&content)
        .map_err(|e| ConvertError::InvalidSettings(format!("{}: {e}", path.display())))?;

    let mut settings = ConvertSettings::default();
    let c = file.convert;
    if let Some(v) = c.width_scale {
        settings.width_scale = v;
    }
    if let Some(v) = c.height_scale {
        settings.height_scale = v;
    }
    if let Some(v) = c.palette {
        settings.palette = PaletteId::from_name(&v).map_or(v, |id| id.chars().to_string());
    }
    if let Some(v) = c.invert {
        settings.invert = v;
    }
    if let Some(v) = c.brightness {
        settings.brightness = v;
    }
    if let Some(v) = c.crop {
        settings.crop = Some(v);
    }

    settings.validate()?;
    log::debug!("loaded settings from {}: {settings:?}", path.display());
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_settings_are_valid() {
        assert!(ConvertSettings::default().validate().is_ok());
    }

    #[test]
    fn validation_is_idempotent() {
        let settings = ConvertSettings::default();
        assert!(settings.validate().is_ok());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn out_of_range_scale_rejected() {
        let mut settings = ConvertSettings {
            width_scale: 19.9,
            ..ConvertSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConvertError::InvalidSettings(_))
        ));
        settings.width_scale = 200.1;
        assert!(settings.validate().is_err());
        settings.width_scale = f32::NAN;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn empty_palette_rejected() {
        let mut settings = ConvertSettings {
            palette: String::new(),
            ..ConvertSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConvertError::InvalidSettings(_))
        ));
        settings.palette = "#".into();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn degenerate_crop_rejected() {
        let settings = ConvertSettings {
            crop: Some(CropRegion {
                start_x: 60.0,
                start_y: 0.0,
                end_x: 40.0,
                end_y: 100.0,
            }),
            ..ConvertSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn palette_id_round_trip() {
        let mut settings = ConvertSettings::default();
        settings.set_palette(PaletteId::Blocks);
        assert_eq!(settings.palette_id(), Some(PaletteId::Blocks));
        settings.palette = "custom~ramp".into();
        assert_eq!(settings.palette_id(), None);
    }

    #[test]
    fn load_merges_partial_file_over_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[convert]\nwidth_scale = 50.0\npalette = \"blocks\"\ninvert = true"
        )
        .unwrap();

        let settings = load_settings(file.path()).unwrap();
        assert_eq!(settings.width_scale, 50.0);
        assert_eq!(settings.height_scale, 100.0); // default retained
        assert_eq!(settings.palette, crate::palette::PALETTE_BLOCKS);
        assert!(settings.invert);
    }

    #[test]
    fn load_rejects_out_of_range_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[convert]\nbrightness = 9.0").unwrap();
        assert!(load_settings(file.path()).is_err());
    }
}
