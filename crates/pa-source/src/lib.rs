//! Image sources for pixascii: decoding, normalization and resampling.

pub mod image;
pub mod resize;

pub use crate::image::{PixelLayout, load_normalized, normalize};
pub use crate::resize::{Resizer, Sampling, resize_bitmap};
