use crate::error::{ConvertError, Result};

/// 70 caractères — rampe par défaut, du plus clair (espace) au plus dense.
///
/// Exact characters and order are kept stable so existing outputs stay reproducible.
pub const DEFAULT_RAMP: &str =
    " .'`^,:;Il!i><~+_-?][}{1)(|\\/*tfjrxnuvczXYUJCLQ0OZmwqpdbkhao*#MW&8%B@$";

/// 10 caractères — compact, bon contraste.
pub const CHARSET_COMPACT: &str = " .:-=+*#%@";

/// Blocs Unicode — pseudo-pixels.
pub const CHARSET_BLOCKS: &str = " ░▒▓█";

/// Minimal — haut contraste.
pub const CHARSET_MINIMAL: &str = " .:░▒▓█";

/// Named built-in ramps, selectable from config or CLI.
pub const PRESETS: &[(&str, &str)] = &[
    ("standard", DEFAULT_RAMP),
    ("compact", CHARSET_COMPACT),
    ("blocks", CHARSET_BLOCKS),
    ("minimal", CHARSET_MINIMAL),
];

/// Ordered, non-empty glyph sequence mapping brightness to characters.
///
/// Index 0 stands for brightness 0, the last index for brightness 255.
///
/// # Example
/// ```
/// use pa_core::charset::GlyphRamp;
/// let ramp = GlyphRamp::new(" .:#@").unwrap();
/// assert_eq!(ramp.glyph_for(0.0), ' ');
/// assert_eq!(ramp.glyph_for(255.0), '@');
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphRamp {
    chars: Vec<char>,
}

impl GlyphRamp {
    /// Build a ramp from a string, one glyph per `char`.
    ///
    /// # Errors
    /// Returns [`ConvertError::InvalidParameter`] if `charset` is empty.
    pub fn new(charset: &str) -> Result<Self> {
        let chars: Vec<char> = charset.chars().collect();
        if chars.is_empty() {
            return Err(ConvertError::invalid("la rampe de glyphes est vide"));
        }
        Ok(Self { chars })
    }

    /// Look up a built-in ramp by name (see [`PRESETS`]).
    ///
    /// # Errors
    /// Returns [`ConvertError::Config`] for an unknown name.
    ///
    /// # Example
    /// ```
    /// use pa_core::charset::GlyphRamp;
    /// let ramp = GlyphRamp::preset("compact").unwrap();
    /// assert_eq!(ramp.len(), 10);
    /// ```
    pub fn preset(name: &str) -> Result<Self> {
        PRESETS
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, charset)| Self {
                chars: charset.chars().collect(),
            })
            .ok_or_else(|| ConvertError::Config(format!("preset de rampe inconnu : {name}")))
    }

    /// Number of glyphs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Always false: construction rejects empty ramps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Whether `ch` belongs to the ramp.
    #[must_use]
    pub fn contains(&self, ch: char) -> bool {
        self.chars.contains(&ch)
    }

    /// Glyph at `index`, clamped to the last glyph.
    #[must_use]
    pub fn get(&self, index: usize) -> char {
        self.chars[index.min(self.chars.len() - 1)]
    }

    /// Map a brightness in `[0, 255]` to a glyph.
    ///
    /// `index = floor(brightness / 255 * (len - 1))`, clamped to the ramp. Values
    /// outside `[0, 255]` (and NaN) land on the nearest end.
    ///
    /// # Example
    /// ```
    /// use pa_core::charset::GlyphRamp;
    /// let ramp = GlyphRamp::new(" .:#@").unwrap();
    /// assert_eq!(ramp.glyph_for(128.0), '.');
    /// ```
    #[inline]
    #[must_use]
    pub fn glyph_for(&self, brightness: f64) -> char {
        let last = self.chars.len() - 1;
        let scaled = (brightness / 255.0 * last as f64).floor();
        // `as usize` saturates: negatives and NaN become 0.
        self.chars[(scaled as usize).min(last)]
    }
}

impl std::fmt::Display for GlyphRamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.chars.iter().try_for_each(|c| write!(f, "{c}"))
    }
}

impl Default for GlyphRamp {
    fn default() -> Self {
        Self {
            chars: DEFAULT_RAMP.chars().collect(),
        }
    }
}
