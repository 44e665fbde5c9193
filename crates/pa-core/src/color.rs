use crate::error::{ConvertError, Result};

/// RGB triple, 0–255 per channel.
pub type Rgb = (u8, u8, u8);

/// Blanc — fond par défaut du normaliseur.
pub const WHITE: Rgb = (255, 255, 255);

/// Séquence de réinitialisation ANSI.
pub const ANSI_RESET: &str = "\x1b[0m";

/// Luminance perceptuelle BT.709, dans `[0.0, 255.0]`.
///
/// Weights are applied as integers (`2126`, `7152`, `722` over `10000`) so both
/// extremes come out exact.
///
/// # Example
/// ```
/// use pa_core::color::luminance;
/// assert_eq!(luminance((255, 255, 255)), 255.0);
/// assert_eq!(luminance((0, 0, 0)), 0.0);
/// ```
#[inline]
#[must_use]
pub fn luminance((r, g, b): Rgb) -> f64 {
    let weighted = u32::from(r) * 2126 + u32::from(g) * 7152 + u32::from(b) * 722;
    f64::from(weighted) / 10_000.0
}

/// Truecolor foreground escape: `ESC[38;2;R;G;Bm`.
///
/// # Example
/// ```
/// use pa_core::color::ansi_fg;
/// assert_eq!(ansi_fg((1, 2, 3)), "\x1b[38;2;1;2;3m");
/// ```
#[must_use]
pub fn ansi_fg((r, g, b): Rgb) -> String {
    format!("\x1b[38;2;{r};{g};{b}m")
}

/// Parse a colour from `"r,g,b"` or `"#rrggbb"`.
///
/// # Errors
/// Returns [`ConvertError::InvalidParameter`] on malformed input.
///
/// # Example
/// ```
/// use pa_core::color::parse_rgb;
/// assert_eq!(parse_rgb("#ff8000").unwrap(), (255, 128, 0));
/// assert_eq!(parse_rgb("10, 20, 30").unwrap(), (10, 20, 30));
/// ```
pub fn parse_rgb(s: &str) -> Result<Rgb> {
    let s = s.trim();
    let bad = || ConvertError::invalid(format!("couleur invalide : {s:?}"));

    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(bad());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| bad());
        return Ok((channel(0)?, channel(2)?, channel(4)?));
    }

    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [r, g, b] = parts.as_slice() else {
        return Err(bad());
    };
    let channel = |p: &str| p.parse::<u8>().map_err(|_| bad());
    Ok((channel(*r)?, channel(*g)?, channel(*b)?))
}

/// Alpha-composite `src` over `bg`. `alpha = 0` gives `bg`, `255` gives `src`.
///
/// # Example
/// ```
/// use pa_core::color::blend_over;
/// assert_eq!(blend_over((200, 0, 0), (0, 0, 255), 0), (0, 0, 255));
/// assert_eq!(blend_over((200, 0, 0), (0, 0, 255), 255), (200, 0, 0));
/// ```
#[inline]
#[must_use]
pub fn blend_over(src: Rgb, bg: Rgb, alpha: u8) -> Rgb {
    let a = u32::from(alpha);
    let mix = |s: u8, b: u8| ((u32::from(s) * a + u32::from(b) * (255 - a) + 127) / 255) as u8;
    (mix(src.0, bg.0), mix(src.1, bg.1), mix(src.2, bg.2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luminance_extremes_are_exact() {
        assert_eq!(luminance((255, 255, 255)).to_bits(), 255.0f64.to_bits());
        assert_eq!(luminance((0, 0, 0)).to_bits(), 0.0f64.to_bits());
    }

    #[test]
    fn luminance_weights_green_most() {
        let r = luminance((255, 0, 0));
        let g = luminance((0, 255, 0));
        let b = luminance((0, 0, 255));
        assert!(g > r && r > b);
        assert!((r - 54.213).abs() < 1e-9);
    }

    #[test]
    fn blend_is_linear_within_one() {
        let src = (200, 100, 0);
        let bg = (0, 50, 255);
        for a in 0..=255u8 {
            let (r, g, b) = blend_over(src, bg, a);
            let t = f64::from(a) / 255.0;
            let expect = |s: u8, b: u8| f64::from(s) * t + f64::from(b) * (1.0 - t);
            assert!((f64::from(r) - expect(src.0, bg.0)).abs() <= 1.0);
            assert!((f64::from(g) - expect(src.1, bg.1)).abs() <= 1.0);
            assert!((f64::from(b) - expect(src.2, bg.2)).abs() <= 1.0);
        }
    }

    #[test]
    fn parse_rgb_rejects_garbage() {
        assert!(parse_rgb("#12345").is_err());
        assert!(parse_rgb("#gg0000").is_err());
        assert!(parse_rgb("1,2").is_err());
        assert!(parse_rgb("1,2,300").is_err());
        assert_eq!(parse_rgb("#FFFFFF").unwrap(), WHITE);
    }
}
