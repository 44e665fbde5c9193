use std::path::Path;

use ::image::{ColorType, DynamicImage, ImageDecoder, ImageReader, RgbaImage};
use pa_core::color::{Rgb, blend_over};
use pa_core::error::{ConvertError, Result};
use pa_core::frame::Bitmap;

/// Disposition des pixels telle que livrée par le décodeur.
///
/// Paletted sources (PNG `PLTE`/`tRNS`, GIF) are expanded by the decoder, so they
/// arrive here as [`PixelLayout::Rgb`] or [`PixelLayout::Rgba`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelLayout {
    /// Single luminance channel.
    Luma,
    /// Luminance + alpha.
    LumaAlpha,
    /// Direct RGB.
    Rgb,
    /// RGB + alpha.
    Rgba,
}

impl PixelLayout {
    /// Classify a decoded image. Bit depth is ignored.
    ///
    /// # Example
    /// ```
    /// use image::{DynamicImage, GrayAlphaImage};
    /// use pa_source::PixelLayout;
    /// let img = DynamicImage::ImageLumaA8(GrayAlphaImage::new(1, 1));
    /// assert_eq!(PixelLayout::of(&img), PixelLayout::LumaAlpha);
    /// ```
    #[must_use]
    pub fn of(img: &DynamicImage) -> Self {
        match img.color() {
            ColorType::L8 | ColorType::L16 => Self::Luma,
            ColorType::La8 | ColorType::La16 => Self::LumaAlpha,
            ColorType::Rgba8 | ColorType::Rgba16 | ColorType::Rgba32F => Self::Rgba,
            ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => Self::Rgb,
            other if other.has_alpha() => Self::Rgba,
            _ => Self::Rgb,
        }
    }

    /// Whether the layout carries an alpha channel.
    #[must_use]
    pub fn has_alpha(self) -> bool {
        matches!(self, Self::LumaAlpha | Self::Rgba)
    }
}

/// Charge une image, applique l'orientation EXIF et la normalise en RGB opaque.
///
/// # Errors
/// Returns [`ConvertError::Load`] if the file is missing, unreadable or corrupt.
///
/// # Example
/// ```no_run
/// use pa_source::load_normalized;
/// use std::path::Path;
/// let bmp = load_normalized(Path::new("lucy.png"), (255, 255, 255)).unwrap();
/// ```
pub fn load_normalized(path: &Path, background: Rgb) -> Result<Bitmap> {
    let load_err = |reason: String| ConvertError::Load {
        path: path.display().to_string(),
        reason,
    };

    let reader = ImageReader::open(path)
        .map_err(|e| load_err(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| load_err(e.to_string()))?;
    let mut decoder = reader.into_decoder().map_err(|e| load_err(e.to_string()))?;
    let orientation = decoder
        .orientation()
        .map_err(|e| load_err(e.to_string()))?;
    let mut img = DynamicImage::from_decoder(decoder).map_err(|e| load_err(e.to_string()))?;
    img.apply_orientation(orientation);

    log::debug!(
        "{} décodée : {}×{} {:?}, orientation {orientation:?}",
        path.display(),
        img.width(),
        img.height(),
        img.color()
    );

    Ok(normalize(&img, background))
}

/// Normalise une image décodée en [`Bitmap`] RGB opaque.
///
/// Alpha layouts are composited over `background`; opaque layouts are converted
/// to RGB directly.
///
/// # Example
/// ```
/// use image::{DynamicImage, Rgba, RgbaImage};
/// use pa_source::normalize;
/// let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, Rgba([9, 9, 9, 0])));
/// assert_eq!(normalize(&img, (1, 2, 3)).pixel(0, 0), (1, 2, 3));
/// ```
#[must_use]
pub fn normalize(img: &DynamicImage, background: Rgb) -> Bitmap {
    let layout = PixelLayout::of(img);
    if layout.has_alpha() {
        return composite(&img.to_rgba8(), background);
    }
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    Bitmap {
        data: rgb.into_raw(),
        width,
        height,
    }
}

fn composite(rgba: &RgbaImage, background: Rgb) -> Bitmap {
    let (width, height) = rgba.dimensions();
    let mut data = Vec::with_capacity(width as usize * height as usize * 3);
    for px in rgba.pixels() {
        let [r, g, b, a] = px.0;
        let (r, g, b) = blend_over((r, g, b), background, a);
        data.extend_from_slice(&[r, g, b]);
    }
    Bitmap {
        data,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::image::{GrayAlphaImage, GrayImage, LumaA, Rgb as ImgRgb, RgbImage, Rgba};

    const BG: Rgb = (12, 200, 77);

    #[test]
    fn alpha_extremes_give_background_or_source() {
        let img = RgbaImage::from_fn(16, 16, |x, y| {
            let a = if (x + y) % 2 == 0 { 0 } else { 255 };
            Rgba([(x * 16) as u8, (y * 16) as u8, 99, a])
        });
        let bmp = normalize(&DynamicImage::ImageRgba8(img), BG);
        for y in 0..16 {
            for x in 0..16 {
                let expected = if (x + y) % 2 == 0 {
                    BG
                } else {
                    ((x * 16) as u8, (y * 16) as u8, 99)
                };
                assert_eq!(bmp.pixel(x, y), expected, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn partial_alpha_interpolates() {
        let img = RgbaImage::from_fn(256, 1, |x, _| Rgba([255, 0, 128, x as u8]));
        let bmp = normalize(&DynamicImage::ImageRgba8(img), (0, 255, 0));
        for x in 0..256u32 {
            let t = f64::from(x) / 255.0;
            let (r, g, b) = bmp.pixel(x, 0);
            assert!((f64::from(r) - 255.0 * t).abs() <= 1.0);
            assert!((f64::from(g) - 255.0 * (1.0 - t)).abs() <= 1.0);
            assert!((f64::from(b) - 128.0 * t).abs() <= 1.0);
        }
    }

    #[test]
    fn gray_alpha_is_composited() {
        let img = GrayAlphaImage::from_pixel(2, 2, LumaA([200, 0]));
        let bmp = normalize(&DynamicImage::ImageLumaA8(img), BG);
        assert_eq!(bmp.pixel(1, 1), BG);
    }

    #[test]
    fn opaque_layouts_pass_through() {
        let gray = GrayImage::from_pixel(3, 2, ::image::Luma([42]));
        let bmp = normalize(&DynamicImage::ImageLuma8(gray), BG);
        assert_eq!((bmp.width, bmp.height), (3, 2));
        assert_eq!(bmp.pixel(2, 1), (42, 42, 42));

        let rgb = RgbImage::from_pixel(1, 1, ImgRgb([1, 2, 3]));
        assert_eq!(normalize(&DynamicImage::ImageRgb8(rgb), BG).pixel(0, 0), (1, 2, 3));
    }

    #[test]
    fn load_reads_png_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.png");
        RgbaImage::from_pixel(4, 3, Rgba([10, 20, 30, 0]))
            .save(&path)
            .unwrap();
        let bmp = load_normalized(&path, (255, 255, 255)).unwrap();
        assert_eq!((bmp.width, bmp.height), (4, 3));
        assert_eq!(bmp.pixel(3, 2), (255, 255, 255));
    }

    // TIFF little-endian, un seul IFD : Orientation (0x0112) = 6, rotation 90° horaire.
    fn exif_rotate_90() -> Vec<u8> {
        let mut exif = b"Exif\0\0II\x2a\0".to_vec();
        exif.extend_from_slice(&8u32.to_le_bytes());
        exif.extend_from_slice(&1u16.to_le_bytes());
        exif.extend_from_slice(&0x0112u16.to_le_bytes());
        exif.extend_from_slice(&3u16.to_le_bytes());
        exif.extend_from_slice(&1u32.to_le_bytes());
        exif.extend_from_slice(&[6, 0, 0, 0]);
        exif.extend_from_slice(&0u32.to_le_bytes());
        exif
    }

    #[test]
    fn exif_orientation_is_applied() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rotated.jpg");
        let pixels = vec![128u8; 32 * 16 * 3];
        let mut encoder = jpeg_encoder::Encoder::new_file(&path, 90).unwrap();
        encoder.add_app_segment(1, &exif_rotate_90()).unwrap();
        encoder
            .encode(&pixels, 32, 16, jpeg_encoder::ColorType::Rgb)
            .unwrap();

        let bmp = load_normalized(&path, BG).unwrap();
        assert_eq!((bmp.width, bmp.height), (16, 32));
    }

    #[test]
    fn paletted_transparency_is_composited() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("indexed.png");
        {
            let file = std::fs::File::create(&path).unwrap();
            let mut encoder = png::Encoder::new(std::io::BufWriter::new(file), 2, 1);
            encoder.set_color(png::ColorType::Indexed);
            encoder.set_depth(png::BitDepth::Eight);
            encoder.set_palette(vec![10, 20, 30, 200, 100, 50]);
            encoder.set_trns(vec![0, 255]);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&[0, 1]).unwrap();
            writer.finish().unwrap();
        }

        let bmp = load_normalized(&path, (1, 2, 3)).unwrap();
        assert_eq!(bmp.pixel(0, 0), (1, 2, 3));
        assert_eq!(bmp.pixel(1, 0), (200, 100, 50));
    }

    #[test]
    fn missing_or_corrupt_files_are_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.png");
        assert!(matches!(
            load_normalized(&missing, BG),
            Err(ConvertError::Load { .. })
        ));

        let corrupt = dir.path().join("corrupt.png");
        std::fs::write(&corrupt, b"definitely not a png").unwrap();
        assert!(matches!(
            load_normalized(&corrupt, BG),
            Err(ConvertError::Load { .. })
        ));
    }
}
