use std::path::{Path, PathBuf};

use pa_core::color::Rgb;
use pa_core::config::PixelArtConfig;
use pa_core::error::{ConvertError, Result};
use pa_core::frame::Bitmap;
use pa_source::image::load_normalized;
use pa_source::resize::{Sampling, resize_bitmap};

use crate::encode::save_bitmap;

/// Géométrie du rendu pixel-art.
///
/// The grid size and the block size are rounded independently, so the canvas
/// can differ from the source size by a few pixels. That drift is kept on
/// purpose to reproduce reference outputs pixel for pixel.
///
/// # Example
/// ```
/// use pa_export::PixelGeometry;
/// let g = PixelGeometry::compute(10, 10, 0.5).unwrap();
/// assert_eq!((g.grid_w, g.grid_h, g.block_w, g.block_h), (5, 5, 2, 2));
/// assert_eq!(g.canvas_size(), (10, 10));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelGeometry {
    /// Sampled grid width.
    pub grid_w: u32,
    /// Sampled grid height.
    pub grid_h: u32,
    /// Block width in output pixels.
    pub block_w: u32,
    /// Block height in output pixels.
    pub block_h: u32,
}

/// Reject non-positive and non-finite factors.
///
/// # Errors
/// Returns [`ConvertError::InvalidParameter`] unless `scale_factor > 0` and finite.
pub fn validate_scale(scale_factor: f64) -> Result<()> {
    if scale_factor.is_finite() && scale_factor > 0.0 {
        Ok(())
    } else {
        Err(ConvertError::invalid(format!(
            "scale_factor doit être > 0 (reçu {scale_factor})"
        )))
    }
}

/// `max(1, round_half_even(v))` as `u32`, or `None` past `u32::MAX`.
fn round_dim(v: f64) -> Option<u32> {
    let r = v.round_ties_even().max(1.0);
    (r <= f64::from(u32::MAX)).then_some(r as u32)
}

impl PixelGeometry {
    /// Compute grid and block sizes for a `width × height` source.
    ///
    /// # Errors
    /// Returns [`ConvertError::InvalidParameter`] for an invalid factor, an empty
    /// source, or a canvas that does not fit in `u32`.
    pub fn compute(width: u32, height: u32, scale_factor: f64) -> Result<Self> {
        validate_scale(scale_factor)?;
        if width == 0 || height == 0 {
            return Err(ConvertError::invalid(format!(
                "image source vide ({width}×{height})"
            )));
        }

        let too_big = || ConvertError::invalid(format!("facteur {scale_factor} trop grand"));
        let (w, h) = (f64::from(width), f64::from(height));
        let grid_w = round_dim(w * scale_factor).ok_or_else(too_big)?;
        let grid_h = round_dim(h * scale_factor).ok_or_else(too_big)?;
        let block_w = round_dim(w / f64::from(grid_w)).ok_or_else(too_big)?;
        let block_h = round_dim(h / f64::from(grid_h)).ok_or_else(too_big)?;

        let geometry = Self {
            grid_w,
            grid_h,
            block_w,
            block_h,
        };
        if grid_w.checked_mul(block_w).is_none() || grid_h.checked_mul(block_h).is_none() {
            return Err(too_big());
        }
        Ok(geometry)
    }

    /// Output canvas `(grid_w * block_w, grid_h * block_h)`.
    #[must_use]
    pub fn canvas_size(&self) -> (u32, u32) {
        (self.grid_w * self.block_w, self.grid_h * self.block_h)
    }
}

/// Paint each sampled pixel of `small` as a solid block on a `background` canvas.
#[must_use]
pub fn render_blocks(small: &Bitmap, geometry: &PixelGeometry, background: Rgb) -> Bitmap {
    let (out_w, out_h) = geometry.canvas_size();
    let mut out = Bitmap::filled(out_w, out_h, background);
    for y in 0..geometry.grid_h.min(small.height) {
        for x in 0..geometry.grid_w.min(small.width) {
            out.fill_rect(
                x * geometry.block_w,
                y * geometry.block_h,
                geometry.block_w,
                geometry.block_h,
                small.pixel(x, y),
            );
        }
    }
    out
}

/// In-memory pixel-art: nearest-neighbour downsample, then block re-expansion.
///
/// # Errors
/// Returns [`ConvertError::InvalidParameter`] for invalid factors or sizes.
///
/// # Example
/// ```
/// use pa_core::frame::Bitmap;
/// use pa_export::pixelate;
/// let src = Bitmap::filled(10, 10, (255, 255, 255));
/// let out = pixelate(&src, 0.5, (0, 0, 0)).unwrap();
/// assert_eq!((out.width, out.height), (10, 10));
/// ```
pub fn pixelate(src: &Bitmap, scale_factor: f64, background: Rgb) -> Result<Bitmap> {
    let geometry = PixelGeometry::compute(src.width, src.height, scale_factor)?;
    log::debug!(
        "pixel-art : grille {}×{}, blocs {}×{}, canevas {:?}",
        geometry.grid_w,
        geometry.grid_h,
        geometry.block_w,
        geometry.block_h,
        geometry.canvas_size()
    );
    let small = resize_bitmap(src, geometry.grid_w, geometry.grid_h, Sampling::Nearest)?;
    Ok(render_blocks(&small, &geometry, background))
}

/// Convertit une image en pixel-art et l'écrit dans `output`.
///
/// The factor is validated before any file is opened. `.jpg`/`.jpeg` outputs use
/// the JPEG options of `config`; other extensions use their default encoder.
///
/// # Errors
/// [`ConvertError::InvalidParameter`], [`ConvertError::Load`],
/// [`ConvertError::Encode`] or [`ConvertError::Io`] depending on the failing stage.
///
/// # Example
/// ```no_run
/// use pa_core::config::PixelArtConfig;
/// use pa_export::convert_image_to_pixel_art;
/// use std::path::Path;
/// let config = PixelArtConfig { scale_factor: 0.12, ..Default::default() };
/// convert_image_to_pixel_art(Path::new("lucy.png"), Path::new("lucy_pixel_art.jpg"), &config).unwrap();
/// ```
pub fn convert_image_to_pixel_art(
    source: &Path,
    output: &Path,
    config: &PixelArtConfig,
) -> Result<PathBuf> {
    validate_scale(config.scale_factor)?;

    let bitmap = load_normalized(source, config.background)?;
    let out = pixelate(&bitmap, config.scale_factor, config.background)?;
    save_bitmap(&out, output, &config.jpeg)?;

    log::info!(
        "pixel-art {}×{} écrit dans {}",
        out.width,
        out.height,
        output.display()
    );
    Ok(output.to_path_buf())
}
