use pa_core::color::{ANSI_RESET, ansi_fg};
use pa_core::frame::AsciiGrid;

/// Rows of glyphs joined by `\n`, no trailing newline.
///
/// # Example
/// ```
/// use pa_core::frame::{AsciiGrid, AsciiCell};
/// use pa_ascii::to_plain_text;
/// let mut grid = AsciiGrid::new(2, 2);
/// grid.set(1, 1, AsciiCell { ch: '@', fg: (0, 0, 0) });
/// assert_eq!(to_plain_text(&grid), "  \n @");
/// ```
#[must_use]
pub fn to_plain_text(grid: &AsciiGrid) -> String {
    let mut out = String::with_capacity((grid.width as usize + 1) * grid.height as usize);
    for (i, row) in grid.rows().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.extend(row.iter().map(|cell| cell.ch));
    }
    out
}

/// Like [`to_plain_text`], with a truecolor escape before every glyph and a
/// reset at the end of each row.
///
/// # Example
/// ```
/// use pa_core::frame::{AsciiGrid, AsciiCell};
/// use pa_ascii::to_ansi_text;
/// let mut grid = AsciiGrid::new(1, 1);
/// grid.set(0, 0, AsciiCell { ch: '@', fg: (1, 2, 3) });
/// assert_eq!(to_ansi_text(&grid), "\x1b[38;2;1;2;3m@\x1b[0m");
/// ```
#[must_use]
pub fn to_ansi_text(grid: &AsciiGrid) -> String {
    // ~20 bytes per escaped glyph
    let mut out = String::with_capacity(grid.cells.len() * 20 + grid.height as usize * 5);
    for (i, row) in grid.rows().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        for cell in row {
            out.push_str(&ansi_fg(cell.fg));
            out.push(cell.ch);
        }
        out.push_str(ANSI_RESET);
    }
    out
}
