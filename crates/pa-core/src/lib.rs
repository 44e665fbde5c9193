//! Configuration, types, and shared structures for pixascii.
//!
//! This crate contains the bitmap and grid types, the glyph ramp and
//! brightness mapping, colour helpers, errors and TOML configuration
//! used across the pixascii workspace.

pub mod charset;
pub mod color;
pub mod config;
pub mod error;
pub mod frame;

pub use charset::GlyphRamp;
pub use config::RenderConfig;
pub use error::{ConvertError, Result};
pub use frame::{AsciiCell, AsciiGrid, Bitmap};
