use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::charset::{DEFAULT_RAMP, GlyphRamp};
use crate::color::{Rgb, WHITE};
use crate::error::{ConvertError, Result};

/// Configuration complète du rendu.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use pa_core::config::RenderConfig;
/// let config = RenderConfig::default();
/// assert_eq!(config.ascii.target_width, 120);
/// assert_eq!(config.pixel_art.jpeg.quality, 95);
/// ```
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct RenderConfig {
    /// Pixel-art renderer parameters.
    pub pixel_art: PixelArtConfig,
    /// Parameters shared by both ASCII renderers.
    pub ascii: AsciiConfig,
}

/// Paramètres du rendu pixel-art.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct PixelArtConfig {
    /// Downsampling factor, must be `> 0`.
    pub scale_factor: f64,
    /// Fond utilisé pour la composition alpha et le canevas.
    pub background: Rgb,
    /// Options used when the output extension is `.jpg`/`.jpeg`.
    pub jpeg: JpegOptions,
}

impl Default for PixelArtConfig {
    fn default() -> Self {
        Self {
            scale_factor: 0.1,
            background: WHITE,
            jpeg: JpegOptions::default(),
        }
    }
}

/// Options d'encodage JPEG.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct JpegOptions {
    /// Qualité [1, 100].
    pub quality: u8,
    /// Progressive scans.
    pub progressive: bool,
    /// Optimized Huffman tables.
    pub optimize: bool,
    /// Chroma subsampling mode.
    pub subsampling: ChromaSubsampling,
}

impl Default for JpegOptions {
    fn default() -> Self {
        Self {
            quality: 95,
            progressive: true,
            optimize: true,
            subsampling: ChromaSubsampling::Full,
        }
    }
}

/// Chroma subsampling, keyed by its integer mode.
///
/// # Example
/// ```
/// use pa_core::config::ChromaSubsampling;
/// assert_eq!(ChromaSubsampling::try_from(0).unwrap(), ChromaSubsampling::Full);
/// assert!(ChromaSubsampling::try_from(3).is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(try_from = "u8", into = "u8")]
pub enum ChromaSubsampling {
    /// 0 = 4:4:4, bords de pixels nets.
    #[default]
    Full,
    /// 1 = 4:2:2.
    Half,
    /// 2 = 4:2:0.
    Quarter,
}

impl TryFrom<u8> for ChromaSubsampling {
    type Error = ConvertError;

    fn try_from(mode: u8) -> Result<Self> {
        match mode {
            0 => Ok(Self::Full),
            1 => Ok(Self::Half),
            2 => Ok(Self::Quarter),
            _ => Err(ConvertError::Config(format!(
                "sous-échantillonnage inconnu : {mode} (attendu 0, 1 ou 2)"
            ))),
        }
    }
}

impl From<ChromaSubsampling> for u8 {
    fn from(mode: ChromaSubsampling) -> Self {
        match mode {
            ChromaSubsampling::Full => 0,
            ChromaSubsampling::Half => 1,
            ChromaSubsampling::Quarter => 2,
        }
    }
}

/// Paramètres des rendus ASCII (gris et ANSI).
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct AsciiConfig {
    /// Largeur de sortie en caractères.
    pub target_width: u32,
    /// Ratio largeur/hauteur d'une cellule de caractère (0.5 = deux fois plus haute).
    pub char_aspect: f64,
    /// Rampe de glyphes, du plus clair au plus dense.
    pub charset: String,
    /// Fond de composition alpha.
    pub background: Rgb,
}

impl Default for AsciiConfig {
    fn default() -> Self {
        Self {
            target_width: 120,
            char_aspect: 0.5,
            charset: DEFAULT_RAMP.to_string(),
            background: WHITE,
        }
    }
}

impl AsciiConfig {
    /// Build the glyph ramp from `charset`.
    ///
    /// # Errors
    /// Returns [`ConvertError::InvalidParameter`] if the charset is empty.
    pub fn glyph_ramp(&self) -> Result<GlyphRamp> {
        GlyphRamp::new(&self.charset)
    }
}

impl RenderConfig {
    /// Clamp the numeric fields that have a hard range.
    ///
    /// Scale, width and aspect are left alone: renderers reject them explicitly.
    pub fn clamp_all(&mut self) {
        self.pixel_art.jpeg.quality = self.pixel_art.jpeg.quality.clamp(1, 100);
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    pixel_art: Option<PixelArtSection>,
    ascii: Option<AsciiSection>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct PixelArtSection {
    scale_factor: Option<f64>,
    background: Option<Rgb>,
    jpeg: Option<JpegSection>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct JpegSection {
    quality: Option<u8>,
    progressive: Option<bool>,
    optimize: Option<bool>,
    subsampling: Option<ChromaSubsampling>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct AsciiSection {
    target_width: Option<u32>,
    char_aspect: Option<f64>,
    charset: Option<String>,
    charset_preset: Option<String>,
    background: Option<Rgb>,
}

/// Parse TOML text and merge it over the defaults.
///
/// `charset_preset` wins over `charset` when both are present.
///
/// # Errors
/// Returns [`ConvertError::Config`] on malformed TOML, unknown keys or an unknown preset.
///
/// # Example
/// ```
/// use pa_core::config::parse_config;
/// let config = parse_config("[ascii]\ntarget_width = 80\n").unwrap();
/// assert_eq!(config.ascii.target_width, 80);
/// assert_eq!(config.ascii.char_aspect, 0.5);
/// ```
pub fn parse_config(content: &str) -> Result<RenderConfig> {
    let file: ConfigFile = toml::from_str(content)
        .map_err(|e| ConvertError::Config(format!("erreur de parsing TOML : {e}")))?;

    let mut config = RenderConfig::default();

    if let Some(p) = file.pixel_art {
        if let Some(v) = p.scale_factor {
            config.pixel_art.scale_factor = v;
        }
        if let Some(v) = p.background {
            config.pixel_art.background = v;
        }
        if let Some(j) = p.jpeg {
            let jpeg = &mut config.pixel_art.jpeg;
            if let Some(v) = j.quality {
                jpeg.quality = v;
            }
            if let Some(v) = j.progressive {
                jpeg.progressive = v;
            }
            if let Some(v) = j.optimize {
                jpeg.optimize = v;
            }
            if let Some(v) = j.subsampling {
                jpeg.subsampling = v;
            }
        }
    }

    if let Some(a) = file.ascii {
        if let Some(v) = a.target_width {
            config.ascii.target_width = v;
        }
        if let Some(v) = a.char_aspect {
            config.ascii.char_aspect = v;
        }
        if let Some(v) = a.charset {
            if v.is_empty() {
                log::warn!("charset vide dans la configuration, rampe par défaut conservée");
            } else {
                config.ascii.charset = v;
            }
        }
        if let Some(name) = a.charset_preset {
            let ramp = GlyphRamp::preset(&name)?;
            config.ascii.charset = ramp.to_string();
        }
        if let Some(v) = a.background {
            config.ascii.background = v;
        }
    }

    config.clamp_all();
    Ok(config)
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns [`ConvertError::Config`] if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use pa_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("pixascii.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<RenderConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConvertError::Config(format!("impossible de lire {} : {e}", path.display())))?;
    parse_config(&content).map_err(|e| match e {
        ConvertError::Config(msg) => ConvertError::Config(format!("{} : {msg}", path.display())),
        other => other,
    })
}
