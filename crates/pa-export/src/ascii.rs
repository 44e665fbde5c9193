use std::path::{Path, PathBuf};

use pa_ascii::{sample_grid, to_ansi_text, to_plain_text, validate_grid_params};
use pa_core::config::AsciiConfig;
use pa_core::error::Result;
use pa_source::image::load_normalized;

use crate::encode::write_text;

/// Encodage du texte ASCII.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextEncoding {
    /// Glyphs and newlines only.
    Plain,
    /// Truecolor escape before each glyph, reset at each line end.
    Ansi,
}

/// Load, normalize, sample and encode `source` as text, without writing anything.
///
/// Parameters and ramp are validated before the source is opened.
///
/// # Errors
/// [`pa_core::ConvertError::InvalidParameter`] or [`pa_core::ConvertError::Load`].
pub fn render_ascii_text(
    source: &Path,
    config: &AsciiConfig,
    encoding: TextEncoding,
) -> Result<String> {
    let ramp = config.glyph_ramp()?;
    validate_grid_params(config.target_width, config.char_aspect)?;

    let bitmap = load_normalized(source, config.background)?;
    let grid = sample_grid(&bitmap, config.target_width, config.char_aspect, &ramp)?;
    Ok(match encoding {
        TextEncoding::Plain => to_plain_text(&grid),
        TextEncoding::Ansi => to_ansi_text(&grid),
    })
}

fn render_to_file(
    source: &Path,
    output: &Path,
    config: &AsciiConfig,
    encoding: TextEncoding,
) -> Result<PathBuf> {
    let text = render_ascii_text(source, config, encoding)?;
    write_text(output, &text)?;
    log::info!("ASCII {encoding:?} écrit dans {}", output.display());
    Ok(output.to_path_buf())
}

/// Rendu ASCII en niveaux de gris vers un fichier texte UTF-8.
///
/// # Errors
/// Fails on invalid parameters, unreadable source, or unwritable output.
///
/// # Example
/// ```no_run
/// use pa_core::config::AsciiConfig;
/// use pa_export::image_to_ascii_grayscale;
/// use std::path::Path;
/// image_to_ascii_grayscale(Path::new("lucy.png"), Path::new("lucy.txt"), &AsciiConfig::default()).unwrap();
/// ```
pub fn image_to_ascii_grayscale(
    source: &Path,
    output: &Path,
    config: &AsciiConfig,
) -> Result<PathBuf> {
    render_to_file(source, output, config, TextEncoding::Plain)
}

/// Rendu ASCII couleur (ANSI truecolor) vers un fichier texte UTF-8.
///
/// # Errors
/// Fails on invalid parameters, unreadable source, or unwritable output.
pub fn image_to_ascii_ansi(source: &Path, output: &Path, config: &AsciiConfig) -> Result<PathBuf> {
    render_to_file(source, output, config, TextEncoding::Ansi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use pa_core::charset::GlyphRamp;
    use pa_core::error::ConvertError;

    fn strip_ansi(s: &str) -> String {
        let mut out = String::new();
        let mut rest = s;
        while let Some(start) = rest.find('\x1b') {
            out.push_str(&rest[..start]);
            let end = rest[start..].find('m').map_or(rest.len(), |i| start + i + 1);
            rest = &rest[end..];
        }
        out.push_str(rest);
        out
    }

    fn write_gradient(dir: &Path) -> PathBuf {
        let path = dir.join("gradient.png");
        RgbImage::from_fn(80, 60, |x, y| {
            Rgb([(x * 3) as u8, (y * 4) as u8, ((x + y) * 2) as u8])
        })
        .save(&path)
        .unwrap();
        path
    }

    #[test]
    fn two_pixel_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("two.png");
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(1, 0, Rgb([255, 255, 255]));
        img.save(&src).unwrap();

        let out = dir.path().join("two.txt");
        let config = AsciiConfig {
            target_width: 2,
            ..AsciiConfig::default()
        };
        image_to_ascii_grayscale(&src, &out, &config).unwrap();

        let ramp = GlyphRamp::default();
        let expected: String = [ramp.get(0), ramp.get(ramp.len() - 1)].iter().collect();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), expected);
    }

    #[test]
    fn grayscale_grid_shape_and_alphabet() {
        let dir = tempfile::tempdir().unwrap();
        let src = write_gradient(dir.path());
        let out = dir.path().join("g.txt");
        let config = AsciiConfig {
            target_width: 40,
            charset: " .:-=+*#%@".into(),
            ..AsciiConfig::default()
        };
        image_to_ascii_grayscale(&src, &out, &config).unwrap();

        let text = std::fs::read_to_string(&out).unwrap();
        let lines: Vec<&str> = text.split('\n').collect();
        // 60 * (40 / 80) * 0.5 = 15
        assert_eq!(lines.len(), 15);
        for line in &lines {
            assert_eq!(line.chars().count(), 40);
            assert!(line.chars().all(|c| config.charset.contains(c)));
        }
    }

    #[test]
    fn ansi_matches_grayscale_once_stripped() {
        let dir = tempfile::tempdir().unwrap();
        let src = write_gradient(dir.path());
        let config = AsciiConfig {
            target_width: 33,
            char_aspect: 0.7,
            ..AsciiConfig::default()
        };
        let plain_out = dir.path().join("plain.txt");
        let ansi_out = dir.path().join("ansi.txt");
        image_to_ascii_grayscale(&src, &plain_out, &config).unwrap();
        image_to_ascii_ansi(&src, &ansi_out, &config).unwrap();

        let plain = std::fs::read_to_string(&plain_out).unwrap();
        let ansi = std::fs::read_to_string(&ansi_out).unwrap();
        assert!(ansi.contains("\x1b[38;2;"));
        assert!(ansi.lines().all(|l| l.ends_with("\x1b[0m")));
        assert_eq!(strip_ansi(&ansi), plain);
    }

    #[test]
    fn transparent_source_uses_configured_background() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("clear.png");
        RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 0]))
            .save(&src)
            .unwrap();

        // same-size grid: no resampling involved
        let config = AsciiConfig {
            target_width: 4,
            char_aspect: 1.0,
            ..AsciiConfig::default()
        };
        let text = render_ascii_text(&src, &config, TextEncoding::Ansi).unwrap();
        assert!(text.starts_with("\x1b[38;2;255;255;255m$"));
    }

    #[test]
    fn invalid_parameters_fail_before_loading() {
        let missing = Path::new("/nonexistent/source.png");
        for config in [
            AsciiConfig {
                target_width: 0,
                ..AsciiConfig::default()
            },
            AsciiConfig {
                char_aspect: 0.0,
                ..AsciiConfig::default()
            },
            AsciiConfig {
                charset: String::new(),
                ..AsciiConfig::default()
            },
        ] {
            assert!(matches!(
                render_ascii_text(missing, &config, TextEncoding::Plain),
                Err(ConvertError::InvalidParameter(_))
            ));
        }
    }
}
