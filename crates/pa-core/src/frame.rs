use crate::color::{Rgb, luminance};

/// Bitmap RGB opaque, row-major, 3 octets par pixel.
///
/// Produced by the normalizer: never carries alpha nor palette indirection.
///
/// # Example
/// ```
/// use pa_core::frame::Bitmap;
/// let bmp = Bitmap::new(10, 10);
/// assert_eq!(bmp.data.len(), 300);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    /// Pixels RGB, row-major, 3 bytes par pixel.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Bitmap {
    /// Black bitmap of the given size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0u8; width as usize * height as usize * 3],
            width,
            height,
        }
    }

    /// Bitmap filled with a single colour.
    ///
    /// # Example
    /// ```
    /// use pa_core::frame::Bitmap;
    /// let bmp = Bitmap::filled(2, 3, (1, 2, 3));
    /// assert_eq!(bmp.pixel(1, 2), (1, 2, 3));
    /// ```
    #[must_use]
    pub fn filled(width: u32, height: u32, color: Rgb) -> Self {
        let data = [color.0, color.1, color.2].repeat(width as usize * height as usize);
        Self {
            data,
            width,
            height,
        }
    }

    /// Wrap an existing RGB buffer. Returns `None` if the length does not match.
    #[must_use]
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        (data.len() == width as usize * height as usize * 3).then_some(Self {
            data,
            width,
            height,
        })
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        (y as usize * self.width as usize + x as usize) * 3
    }

    /// Pixel (x, y) → (r, g, b).
    #[inline]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        let idx = self.offset(x, y);
        (self.data[idx], self.data[idx + 1], self.data[idx + 2])
    }

    /// Overwrite pixel (x, y).
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, (r, g, b): Rgb) {
        let idx = self.offset(x, y);
        self.data[idx..idx + 3].copy_from_slice(&[r, g, b]);
    }

    /// Paint a solid rectangle, clipped to the bitmap.
    ///
    /// # Example
    /// ```
    /// use pa_core::frame::Bitmap;
    /// let mut bmp = Bitmap::new(4, 4);
    /// bmp.fill_rect(2, 2, 5, 5, (9, 9, 9));
    /// assert_eq!(bmp.pixel(3, 3), (9, 9, 9));
    /// assert_eq!(bmp.pixel(1, 1), (0, 0, 0));
    /// ```
    pub fn fill_rect(&mut self, x0: u32, y0: u32, w: u32, h: u32, color: Rgb) {
        let x1 = x0.saturating_add(w).min(self.width);
        let y1 = y0.saturating_add(h).min(self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                self.set_pixel(x, y, color);
            }
        }
    }

    /// Luminance BT.709 du pixel (x, y).
    #[inline]
    #[must_use]
    pub fn luminance(&self, x: u32, y: u32) -> f64 {
        luminance(self.pixel(x, y))
    }
}

/// Grille de sortie ASCII, row-major.
///
/// # Example
/// ```
/// use pa_core::frame::{AsciiGrid, AsciiCell};
/// let mut grid = AsciiGrid::new(80, 24);
/// grid.set(0, 0, AsciiCell { ch: '@', fg: (255, 0, 0) });
/// assert_eq!(grid.get(0, 0).ch, '@');
/// ```
#[derive(Clone, Debug)]
pub struct AsciiGrid {
    /// Flat array of cells, row-major.
    pub cells: Vec<AsciiCell>,
    /// Width in characters.
    pub width: u32,
    /// Height in characters.
    pub height: u32,
}

/// Single cell in the ASCII grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AsciiCell {
    /// Caractère à afficher.
    pub ch: char,
    /// Couleur du pixel échantillonné.
    pub fg: Rgb,
}

impl Default for AsciiCell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: (0, 0, 0),
        }
    }
}

impl AsciiGrid {
    /// Crée une grille pré-allouée.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            cells: vec![AsciiCell::default(); width as usize * height as usize],
            width,
            height,
        }
    }

    /// Set a cell at position (x, y).
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, cell: AsciiCell) {
        self.cells[y as usize * self.width as usize + x as usize] = cell;
    }

    /// Get a cell reference at position (x, y).
    #[inline]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> &AsciiCell {
        &self.cells[y as usize * self.width as usize + x as usize]
    }

    /// Iterate rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[AsciiCell]> {
        self.cells.chunks(self.width.max(1) as usize)
    }
}
