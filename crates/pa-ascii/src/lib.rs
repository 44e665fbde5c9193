//! ASCII conversion engine for pixascii.
//!
//! Samples bitmaps onto character grids and encodes them as text.

pub mod luminance;
pub mod text;

pub use luminance::{ascii_dimensions, process_luminance, sample_grid, validate_grid_params};
pub use text::{to_ansi_text, to_plain_text};
