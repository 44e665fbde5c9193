use std::path::{Path, PathBuf};

use clap::Parser;
use pa_core::charset::GlyphRamp;
use pa_core::color::parse_rgb;
use pa_core::config::{ChromaSubsampling, RenderConfig};

/// pixascii — pixel-art et ASCII-art à partir d'une image.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Image source (PNG, JPEG, BMP, GIF).
    #[arg(long)]
    pub image: PathBuf,

    /// Sortie pixel-art (.jpg/.jpeg → encodeur JPEG réglable, sinon format de l'extension).
    #[arg(long)]
    pub pixel_art: Option<PathBuf>,

    /// Sortie ASCII niveaux de gris (.txt).
    #[arg(long)]
    pub ascii: Option<PathBuf>,

    /// Sortie ASCII couleur ANSI truecolor (.txt).
    #[arg(long)]
    pub ansi: Option<PathBuf>,

    /// Afficher aussi le rendu ANSI sur stdout.
    #[arg(long, default_value_t = false)]
    pub print: bool,

    /// Fichier de configuration TOML (défaut : pixascii.toml, ignoré s'il est absent).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Facteur de réduction pixel-art (> 0).
    #[arg(long, allow_negative_numbers = true)]
    pub scale: Option<f64>,

    /// Largeur ASCII en caractères.
    #[arg(long)]
    pub width: Option<u32>,

    /// Ratio largeur/hauteur d'une cellule de caractère.
    #[arg(long, allow_negative_numbers = true)]
    pub char_aspect: Option<f64>,

    /// Rampe de glyphes explicite, du plus clair au plus dense.
    #[arg(long, conflicts_with = "preset")]
    pub charset: Option<String>,

    /// Rampe prédéfinie : standard, compact, blocks, minimal.
    #[arg(long)]
    pub preset: Option<String>,

    /// Couleur de fond : "r,g,b" ou "#rrggbb".
    #[arg(long)]
    pub background: Option<String>,

    /// Qualité JPEG [1, 100].
    #[arg(long)]
    pub jpeg_quality: Option<u8>,

    /// Désactiver le JPEG progressif.
    #[arg(long, default_value_t = false)]
    pub no_progressive: bool,

    /// Désactiver l'optimisation des tables de Huffman.
    #[arg(long, default_value_t = false)]
    pub no_optimize: bool,

    /// Sous-échantillonnage chroma : 0 = 4:4:4, 1 = 4:2:2, 2 = 4:2:0.
    #[arg(long)]
    pub subsampling: Option<u8>,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

/// Which artifacts to write.
#[derive(Debug, PartialEq, Eq)]
pub struct Outputs {
    pub pixel_art: Option<PathBuf>,
    pub ascii: Option<PathBuf>,
    pub ansi: Option<PathBuf>,
}

impl Cli {
    /// Apply command-line overrides on top of a loaded config.
    ///
    /// # Errors
    /// Returns an error for a malformed colour, unknown preset or subsampling mode.
    pub fn apply_overrides(&self, config: &mut RenderConfig) -> anyhow::Result<()> {
        if let Some(v) = self.scale {
            config.pixel_art.scale_factor = v;
        }
        if let Some(v) = self.width {
            config.ascii.target_width = v;
        }
        if let Some(v) = self.char_aspect {
            config.ascii.char_aspect = v;
        }
        if let Some(ref v) = self.charset {
            config.ascii.charset.clone_from(v);
        }
        if let Some(ref name) = self.preset {
            config.ascii.charset = GlyphRamp::preset(name)?.to_string();
        }
        if let Some(ref v) = self.background {
            let color = parse_rgb(v)?;
            config.pixel_art.background = color;
            config.ascii.background = color;
        }
        let jpeg = &mut config.pixel_art.jpeg;
        if let Some(v) = self.jpeg_quality {
            jpeg.quality = v;
        }
        if self.no_progressive {
            jpeg.progressive = false;
        }
        if self.no_optimize {
            jpeg.optimize = false;
        }
        if let Some(v) = self.subsampling {
            jpeg.subsampling = ChromaSubsampling::try_from(v)?;
        }
        config.clamp_all();
        Ok(())
    }

    /// Requested outputs; with none given, all three are written next to the input.
    #[must_use]
    pub fn outputs(&self) -> Outputs {
        if self.pixel_art.is_some() || self.ascii.is_some() || self.ansi.is_some() {
            return Outputs {
                pixel_art: self.pixel_art.clone(),
                ascii: self.ascii.clone(),
                ansi: self.ansi.clone(),
            };
        }
        default_outputs(&self.image)
    }
}

/// `<stem>_pixel_art.jpg`, `<stem>_ascii_grayscale.txt`, `<stem>_ascii_ansi.txt`.
#[must_use]
pub fn default_outputs(image: &Path) -> Outputs {
    let stem = image
        .file_stem()
        .map_or_else(|| "image".into(), |s| s.to_string_lossy());
    let dir = image.parent().unwrap_or_else(|| Path::new(""));
    Outputs {
        pixel_art: Some(dir.join(format!("{stem}_pixel_art.jpg"))),
        ascii: Some(dir.join(format!("{stem}_ascii_grayscale.txt"))),
        ansi: Some(dir.join(format!("{stem}_ascii_ansi.txt"))),
    }
}
