//! Built-in palette table and the luminance → character lookup.
//!
//! Palettes are ordered darkest-representing → lightest-representing: the
//! first character stands for a black cell, the last for a white one.

/// 10 characters — compact, good contrast.
pub const PALETTE_STANDARD: &str = " .:-=+*#%@";

/// 70 characters — Paul Bourke extended ramp, maximum tonal resolution.
pub const PALETTE_DETAILED: &str =
    " .'`^\",:;Il!i><~+_-?][}{1)(|\\/tfjrxnuvczXYUJCLQ0OZmwqpdbkhao*#MW&8%B@$";

/// 2 characters — binary threshold.
pub const PALETTE_SIMPLE: &str = ".#";

/// Unicode shade blocks — pseudo-pixels.
pub const PALETTE_BLOCKS: &str = " ░▒▓█";

/// Dot weights, middle levels doubled for a coarser ramp.
pub const PALETTE_DOTS: &str = " ··●●";

/// Identifier for one of the five built-in palettes.
///
/// # Example
/// ```
/// use ia_core::palette::PaletteId;
/// assert_eq!(PaletteId::from_name("blocks"), Some(PaletteId::Blocks));
/// assert_eq!(PaletteId::Simple.chars(), ".#");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PaletteId {
    /// 10-step general-purpose ramp.
    #[default]
    Standard,
    /// 70-step extended ramp.
    Detailed,
    /// Two-character threshold.
    Simple,
    /// Unicode shade blocks.
    Blocks,
    /// Dot weights.
    Dots,
}

impl PaletteId {
    /// All built-in palettes, in UI cycling order.
    pub const ALL: [PaletteId; 5] = [
        PaletteId::Standard,
        PaletteId::Detailed,
        PaletteId::Simple,
        PaletteId::Blocks,
        PaletteId::Dots,
    ];

    /// The ordered character sequence of this preset.
    #[must_use]
    pub fn chars(self) -> &'static str {
        match self {
            PaletteId::Standard => PALETTE_STANDARD,
            PaletteId::Detailed => PALETTE_DETAILED,
            PaletteId::Simple => PALETTE_SIMPLE,
            PaletteId::Blocks => PALETTE_BLOCKS,
            PaletteId::Dots => PALETTE_DOTS,
        }
    }

    /// Display name, also the TOML/CLI identifier.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            PaletteId::Standard => "standard",
            PaletteId::Detailed => "detailed",
            PaletteId::Simple => "simple",
            PaletteId::Blocks => "blocks",
            PaletteId::Dots => "dots",
        }
    }

    /// Resolve a preset from its name. `None` for unknown identifiers.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.name() == name)
    }
}

/// Lookup table mapping adjusted luminance [0..255] → palette character.
///
/// Pre-computed once per conversion for O(1) per-cell cost. The mapping is
/// `index = luminance * len / 256`, which is monotonic and hits both palette
/// ends: 0 → first character, 255 → last character (for len ≤ 256).
///
/// # Example
/// ```
/// use ia_core::palette::PaletteLut;
/// let lut = PaletteLut::new(" .:#@");
/// assert_eq!(lut.map(0), ' ');
/// assert_eq!(lut.map(255), '@');
/// ```
pub struct PaletteLut {
    lut: [char; 256],
}

impl PaletteLut {
    /// Build a LUT from a palette ordered darkest → lightest.
    ///
    /// Palettes shorter than 2 characters are a settings error and are
    /// rejected upstream by `ConvertSettings::validate`; this constructor
    /// falls back to `PALETTE_SIMPLE` rather than panicking.
    #[must_use]
    pub fn new(palette: &str) -> Self {
        let chars: Vec<char> = palette.chars().collect();
        if chars.len() < 2 {
            return Self::new(PALETTE_SIMPLE);
        }
        let len = chars.len();
        let mut lut = [' '; 256];
        for (i, slot) in lut.iter_mut().enumerate() {
            *slot = chars[i * len / 256];
        }
        Self { lut }
    }

    /// Map an adjusted luminance value [0..255] to a character.
    ///
    /// # Example
    /// ```
    /// use ia_core::palette::PaletteLut;
    /// let lut = PaletteLut::new(".#");
    /// assert_eq!(lut.map(127), '.');
    /// assert_eq!(lut.map(128), '#');
    /// ```
    #[inline]
    #[must_use]
    pub fn map(&self, luminance: u8) -> char {
        self.lut[luminance as usize]
    }
}
