use fast_image_resize::images::Image;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer as FirResizer};
use pa_core::error::{ConvertError, Result};
use pa_core::frame::Bitmap;

/// Stratégie d'échantillonnage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sampling {
    /// Each output pixel copies exactly one source pixel.
    Nearest,
    /// Blends neighbouring source pixels (antialiased when downscaling).
    Bilinear,
}

impl Sampling {
    fn options(self) -> ResizeOptions {
        let alg = match self {
            Self::Nearest => ResizeAlg::Nearest,
            Self::Bilinear => ResizeAlg::Convolution(FilterType::Bilinear),
        };
        ResizeOptions::new().resize_alg(alg)
    }
}

/// Resizer réutilisable wrappant fast_image_resize.
///
/// # Example
/// ```
/// use pa_source::resize::{Resizer, Sampling};
/// use pa_core::frame::Bitmap;
/// let mut r = Resizer::new();
/// let src = Bitmap::filled(100, 100, (7, 7, 7));
/// let mut dst = Bitmap::new(50, 50);
/// r.resize_into(&src, &mut dst, Sampling::Nearest).unwrap();
/// assert_eq!(dst.pixel(10, 10), (7, 7, 7));
/// ```
pub struct Resizer {
    inner: FirResizer,
    /// Scratch image for source (owned buffer to avoid the mut borrow issue).
    src_buf: Vec<u8>,
}

impl Resizer {
    /// Create a new resizer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: FirResizer::new(),
            src_buf: Vec::new(),
        }
    }

    /// Resize `src` into `dst`. Dimensions of `dst` determine output size.
    ///
    /// # Errors
    /// Returns [`ConvertError::InvalidParameter`] if either bitmap has a zero dimension.
    pub fn resize_into(&mut self, src: &Bitmap, dst: &mut Bitmap, sampling: Sampling) -> Result<()> {
        if src.width == 0 || src.height == 0 || dst.width == 0 || dst.height == 0 {
            return Err(ConvertError::invalid(format!(
                "redimensionnement {}×{} → {}×{} : dimension nulle",
                src.width, src.height, dst.width, dst.height
            )));
        }

        if src.width == dst.width && src.height == dst.height {
            dst.data.copy_from_slice(&src.data);
            return Ok(());
        }

        // fast_image_resize wants a mutable source slice
        self.src_buf.clear();
        self.src_buf.extend_from_slice(&src.data);

        let src_image =
            Image::from_slice_u8(src.width, src.height, &mut self.src_buf, PixelType::U8x3)
                .map_err(|e| ConvertError::invalid(format!("source invalide : {e}")))?;

        let mut dst_image =
            Image::from_slice_u8(dst.width, dst.height, &mut dst.data, PixelType::U8x3)
                .map_err(|e| ConvertError::invalid(format!("destination invalide : {e}")))?;

        self.inner
            .resize(&src_image, &mut dst_image, &sampling.options())
            .map_err(|e| ConvertError::invalid(format!("redimensionnement échoué : {e}")))?;

        Ok(())
    }
}

impl Default for Resizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience for one-shot usage.
///
/// # Errors
/// Returns [`ConvertError::InvalidParameter`] on zero dimensions.
///
/// # Example
/// ```
/// use pa_source::resize::{resize_bitmap, Sampling};
/// use pa_core::frame::Bitmap;
/// let src = Bitmap::new(100, 100);
/// let dst = resize_bitmap(&src, 50, 20, Sampling::Bilinear).unwrap();
/// assert_eq!((dst.width, dst.height), (50, 20));
/// ```
pub fn resize_bitmap(src: &Bitmap, width: u32, height: u32, sampling: Sampling) -> Result<Bitmap> {
    let mut dst = Bitmap::new(width, height);
    Resizer::new().resize_into(src, &mut dst, sampling)?;
    Ok(dst)
}
