use pa_core::charset::GlyphRamp;
use pa_core::error::{ConvertError, Result};
use pa_core::frame::{AsciiCell, AsciiGrid, Bitmap};
use pa_source::resize::{Sampling, resize_bitmap};

/// Check the caller-supplied grid parameters without touching any image.
///
/// # Errors
/// Returns [`ConvertError::InvalidParameter`] for a zero width or a non-positive
/// or non-finite aspect.
pub fn validate_grid_params(target_width: u32, char_aspect: f64) -> Result<()> {
    if target_width == 0 {
        return Err(ConvertError::invalid("target_width doit être > 0"));
    }
    if !(char_aspect.is_finite() && char_aspect > 0.0) {
        return Err(ConvertError::invalid(format!(
            "char_aspect doit être > 0 (reçu {char_aspect})"
        )));
    }
    Ok(())
}

/// Compute the character grid for a source of `src_w × src_h` pixels.
///
/// `height = max(1, round(src_h * (target_width / src_w) * char_aspect))`, rounding
/// half to even.
///
/// # Errors
/// Returns [`ConvertError::InvalidParameter`] for a zero width, a non-positive or
/// non-finite aspect, or an empty source.
///
/// # Example
/// ```
/// use pa_ascii::ascii_dimensions;
/// assert_eq!(ascii_dimensions(200, 100, 120, 0.5).unwrap(), (120, 30));
/// assert_eq!(ascii_dimensions(2, 1, 2, 0.5).unwrap(), (2, 1));
/// ```
pub fn ascii_dimensions(
    src_w: u32,
    src_h: u32,
    target_width: u32,
    char_aspect: f64,
) -> Result<(u32, u32)> {
    validate_grid_params(target_width, char_aspect)?;
    if src_w == 0 || src_h == 0 {
        return Err(ConvertError::invalid(format!(
            "image source vide ({src_w}×{src_h})"
        )));
    }

    let scale = f64::from(target_width) / f64::from(src_w);
    let height = (f64::from(src_h) * scale * char_aspect)
        .round_ties_even()
        .max(1.0);
    if height > f64::from(u32::MAX) {
        return Err(ConvertError::invalid(format!(
            "hauteur de grille hors limites ({height})"
        )));
    }
    Ok((target_width, height as u32))
}

/// Fill `grid` from `frame`, one glyph per cell.
///
/// Each cell reads the pixel under it, maps its BT.709 luminance through `ramp`
/// and keeps the pixel colour for coloured encodings.
///
/// # Example
/// ```
/// use pa_core::frame::{Bitmap, AsciiGrid};
/// use pa_core::charset::GlyphRamp;
/// use pa_ascii::process_luminance;
///
/// let frame = Bitmap::filled(4, 2, (255, 255, 255));
/// let mut grid = AsciiGrid::new(4, 2);
/// process_luminance(&frame, &GlyphRamp::new(" #").unwrap(), &mut grid);
/// assert_eq!(grid.get(3, 1).ch, '#');
/// ```
pub fn process_luminance(frame: &Bitmap, ramp: &GlyphRamp, grid: &mut AsciiGrid) {
    for cy in 0..grid.height {
        for cx in 0..grid.width {
            // Map grid coords to pixel coords
            let px = (u64::from(cx) * u64::from(frame.width) / u64::from(grid.width.max(1))) as u32;
            let py =
                (u64::from(cy) * u64::from(frame.height) / u64::from(grid.height.max(1))) as u32;

            let px = px.min(frame.width.saturating_sub(1));
            let py = py.min(frame.height.saturating_sub(1));

            let fg = frame.pixel(px, py);
            let ch = ramp.glyph_for(frame.luminance(px, py));
            grid.set(cx, cy, AsciiCell { ch, fg });
        }
    }
}

/// Resample `src` bilinearly to the character grid and map every cell.
///
/// # Errors
/// Propagates [`ascii_dimensions`] validation failures.
///
/// # Example
/// ```
/// use pa_core::frame::Bitmap;
/// use pa_core::charset::GlyphRamp;
/// use pa_ascii::sample_grid;
///
/// let src = Bitmap::filled(40, 40, (0, 0, 0));
/// let grid = sample_grid(&src, 10, 0.5, &GlyphRamp::default()).unwrap();
/// assert_eq!((grid.width, grid.height), (10, 5));
/// ```
pub fn sample_grid(
    src: &Bitmap,
    target_width: u32,
    char_aspect: f64,
    ramp: &GlyphRamp,
) -> Result<AsciiGrid> {
    let (width, height) = ascii_dimensions(src.width, src.height, target_width, char_aspect)?;
    log::debug!(
        "grille ASCII {width}×{height} depuis {}×{} (aspect {char_aspect})",
        src.width,
        src.height
    );

    let small = resize_bitmap(src, width, height, Sampling::Bilinear)?;
    let mut grid = AsciiGrid::new(width, height);
    process_luminance(&small, ramp, &mut grid);
    Ok(grid)
}
