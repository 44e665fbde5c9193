//! Output stage for pixascii: pixel-art images and ASCII text files.

pub mod ascii;
pub mod encode;
pub mod pixel_art;

pub use ascii::{TextEncoding, image_to_ascii_ansi, image_to_ascii_grayscale, render_ascii_text};
pub use pixel_art::{PixelGeometry, convert_image_to_pixel_art, pixelate};
