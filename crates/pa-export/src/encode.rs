use std::path::Path;

use image::{ImageError, RgbImage};
use jpeg_encoder::{ColorType, Encoder, SamplingFactor};
use pa_core::config::{ChromaSubsampling, JpegOptions};
use pa_core::error::{ConvertError, Result};
use pa_core::frame::Bitmap;

/// Encodeur choisi d'après l'extension de sortie.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// `.jpg` / `.jpeg`, any case: tuned JPEG encoder.
    Jpeg,
    /// Anything else: format implied by the extension, default settings.
    Inferred,
}

impl OutputFormat {
    /// # Example
    /// ```
    /// use pa_export::encode::OutputFormat;
    /// use std::path::Path;
    /// assert_eq!(OutputFormat::from_path(Path::new("a.JPEG")), OutputFormat::Jpeg);
    /// assert_eq!(OutputFormat::from_path(Path::new("a.png")), OutputFormat::Inferred);
    /// ```
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg") => {
                Self::Jpeg
            }
            _ => Self::Inferred,
        }
    }
}

fn sampling_factor(mode: ChromaSubsampling) -> SamplingFactor {
    match mode {
        ChromaSubsampling::Full => SamplingFactor::R_4_4_4,
        ChromaSubsampling::Half => SamplingFactor::R_4_2_2,
        ChromaSubsampling::Quarter => SamplingFactor::R_4_2_0,
    }
}

fn io_err(path: &Path, source: std::io::Error) -> ConvertError {
    ConvertError::Io {
        path: path.display().to_string(),
        source,
    }
}

fn encode_err(path: &Path, reason: impl ToString) -> ConvertError {
    ConvertError::Encode {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Écrit `bitmap` vers `path`, encodeur choisi par extension.
///
/// # Errors
/// [`ConvertError::Io`] if the file cannot be created or written,
/// [`ConvertError::Encode`] for unsupported extensions or encoder failures.
pub fn save_bitmap(bitmap: &Bitmap, path: &Path, jpeg: &JpegOptions) -> Result<()> {
    match OutputFormat::from_path(path) {
        OutputFormat::Jpeg => save_jpeg(bitmap, path, jpeg),
        OutputFormat::Inferred => save_inferred(bitmap, path),
    }
}

fn save_jpeg(bitmap: &Bitmap, path: &Path, opts: &JpegOptions) -> Result<()> {
    let (Ok(width), Ok(height)) = (u16::try_from(bitmap.width), u16::try_from(bitmap.height))
    else {
        return Err(encode_err(
            path,
            format!(
                "{}×{} dépasse la limite JPEG de 65535 px",
                bitmap.width, bitmap.height
            ),
        ));
    };

    // encodé en mémoire : un échec d'encodage ne laisse aucun fichier partiel
    let mut bytes: Vec<u8> = Vec::new();
    let mut encoder = Encoder::new(&mut bytes, opts.quality.clamp(1, 100));
    encoder.set_progressive(opts.progressive);
    encoder.set_optimized_huffman_tables(opts.optimize);
    encoder.set_sampling_factor(sampling_factor(opts.subsampling));
    encoder
        .encode(&bitmap.data, width, height, ColorType::Rgb)
        .map_err(|e| encode_err(path, e))?;

    std::fs::write(path, &bytes).map_err(|e| io_err(path, e))
}

fn save_inferred(bitmap: &Bitmap, path: &Path) -> Result<()> {
    let img = RgbImage::from_raw(bitmap.width, bitmap.height, bitmap.data.clone())
        .ok_or_else(|| encode_err(path, "taille de tampon incohérente"))?;
    img.save(path).map_err(|e| match e {
        ImageError::IoError(source) => io_err(path, source),
        other => encode_err(path, other),
    })
}

/// Écrit un texte UTF-8.
///
/// # Errors
/// Returns [`ConvertError::Io`] if the file cannot be written.
pub fn write_text(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text.as_bytes()).map_err(|e| io_err(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(w: u32, h: u32) -> Bitmap {
        let mut bmp = Bitmap::new(w, h);
        for y in 0..h {
            for x in 0..w {
                bmp.set_pixel(x, y, ((x * 8) as u8, (y * 8) as u8, 64));
            }
        }
        bmp
    }

    #[test]
    fn png_is_lossless() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let bmp = gradient(12, 7);
        save_bitmap(&bmp, &path, &JpegOptions::default()).unwrap();
        let back = image::open(&path).unwrap().to_rgb8();
        assert_eq!(back.dimensions(), (12, 7));
        assert_eq!(back.into_raw(), bmp.data);
    }

    #[test]
    fn jpeg_options_are_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let bmp = gradient(16, 16);
        for (name, opts) in [
            ("a.jpg", JpegOptions::default()),
            (
                "b.JPEG",
                JpegOptions {
                    quality: 50,
                    progressive: false,
                    optimize: false,
                    subsampling: ChromaSubsampling::Quarter,
                },
            ),
        ] {
            let path = dir.path().join(name);
            save_bitmap(&bmp, &path, &opts).unwrap();
            let back = image::open(&path).unwrap();
            assert_eq!((back.width(), back.height()), (16, 16));
        }
    }

    #[test]
    fn webp_and_tiff_use_their_default_encoders() {
        let dir = tempfile::tempdir().unwrap();
        let bmp = gradient(9, 5);
        for name in ["out.webp", "out.tiff"] {
            let path = dir.path().join(name);
            save_bitmap(&bmp, &path, &JpegOptions::default()).unwrap();
            let back = image::open(&path).unwrap().to_rgb8();
            assert_eq!(back.into_raw(), bmp.data, "{name}");
        }
    }

    #[test]
    fn failed_jpeg_encode_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.jpg");
        // buffer plus court que width * height * 3
        let bmp = Bitmap {
            data: vec![0; 10],
            width: 4,
            height: 4,
        };
        assert!(matches!(
            save_bitmap(&bmp, &path, &JpegOptions::default()),
            Err(ConvertError::Encode { .. })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn oversized_jpeg_is_encode_error() {
        let dir = tempfile::tempdir().unwrap();
        let bmp = Bitmap::new(70_000, 1);
        let path = dir.path().join("wide.jpg");
        assert!(matches!(
            save_bitmap(&bmp, &path, &JpegOptions::default()),
            Err(ConvertError::Encode { .. })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn unknown_extension_is_encode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.nope");
        assert!(matches!(
            save_bitmap(&gradient(2, 2), &path, &JpegOptions::default()),
            Err(ConvertError::Encode { .. })
        ));
    }

    #[test]
    fn unwritable_paths_are_io_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no/such/dir");
        assert!(matches!(
            write_text(&missing.join("a.txt"), "x"),
            Err(ConvertError::Io { .. })
        ));
        assert!(matches!(
            save_bitmap(&gradient(2, 2), &missing.join("a.jpg"), &JpegOptions::default()),
            Err(ConvertError::Io { .. })
        ));
    }
}
