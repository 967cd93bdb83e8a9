use crate::color::Rgb;
use crate::error::{CoreError, Result};
use crate::palette::SymbolPalette;

/// Upper bound on `width * height` for a conversion grid (4096 × 4096).
pub const MAX_GRID_CELLS: u64 = 1 << 24;

/// Buffer de pixels RGB, row-major, 3 bytes par pixel.
///
/// Chaque étape du pipeline consomme un buffer et en produit un nouveau.
///
/// # Example
/// ```
/// use gs_core::frame::RasterBuffer;
/// let fb = RasterBuffer::new(10, 10);
/// assert_eq!(fb.data.len(), 300);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterBuffer {
    /// Pixels RGB, row-major, 3 bytes par pixel.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl RasterBuffer {
    /// Crée un buffer noir aux dimensions données.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0u8; width as usize * height as usize * 3],
            width,
            height,
        }
    }

    /// Like [`new`](Self::new), but refuses sizes whose byte count overflows.
    ///
    /// # Errors
    /// `InvalidDimension` if `width * height * 3` does not fit in `usize`.
    ///
    /// # Example
    /// ```
    /// use gs_core::frame::RasterBuffer;
    /// assert!(RasterBuffer::try_new(u32::MAX, u32::MAX).is_err());
    /// ```
    pub fn try_new(width: u32, height: u32) -> Result<Self> {
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(3))
            .ok_or(CoreError::InvalidDimension { width, height })?;
        Ok(Self {
            data: vec![0u8; len],
            width,
            height,
        })
    }

    /// Wrap raw RGB bytes.
    ///
    /// # Errors
    /// `InvalidDimension` if `data.len() != width * height * 3`.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        if data.len() != width as usize * height as usize * 3 {
            return Err(CoreError::InvalidDimension { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Build a buffer by evaluating `f(x, y)` for every pixel.
    ///
    /// # Example
    /// ```
    /// use gs_core::color::Rgb;
    /// use gs_core::frame::RasterBuffer;
    /// let fb = RasterBuffer::from_fn(4, 1, |x, _| Rgb::new((x * 85) as u8, 0, 0));
    /// assert_eq!(fb.pixel(3, 0).r, 255);
    /// ```
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Rgb) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize * 3);
        for y in 0..height {
            for x in 0..width {
                let c = f(x, y);
                data.extend_from_slice(&[c.r, c.g, c.b]);
            }
        }
        Self {
            data,
            width,
            height,
        }
    }

    /// True if either dimension is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Accès au pixel (x, y).
    #[inline(always)]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        Rgb::new(self.data[idx], self.data[idx + 1], self.data[idx + 2])
    }

    /// Pixel with coordinates clamped to the buffer edges.
    #[inline(always)]
    #[must_use]
    pub fn pixel_clamped(&self, x: i64, y: i64) -> Rgb {
        let x = x.clamp(0, i64::from(self.width) - 1) as u32;
        let y = y.clamp(0, i64::from(self.height) - 1) as u32;
        self.pixel(x, y)
    }

    #[inline(always)]
    pub fn set_pixel(&mut self, x: u32, y: u32, c: Rgb) {
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        self.data[idx] = c.r;
        self.data[idx + 1] = c.g;
        self.data[idx + 2] = c.b;
    }

    /// Luma BT.601 of every pixel.
    #[must_use]
    pub fn to_gray(&self) -> GrayBuffer {
        GrayBuffer {
            data: self
                .data
                .chunks_exact(3)
                .map(|p| Rgb::new(p[0], p[1], p[2]).luma())
                .collect(),
            width: self.width,
            height: self.height,
        }
    }
}

/// Single-channel intensity buffer (luma or edge map).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayBuffer {
    /// Intensities, row-major.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl GrayBuffer {
    #[inline(always)]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Intensity with coordinates clamped to the buffer edges.
    #[inline(always)]
    #[must_use]
    pub fn get_clamped(&self, x: i64, y: i64) -> u8 {
        let x = x.clamp(0, i64::from(self.width) - 1) as u32;
        let y = y.clamp(0, i64::from(self.height) - 1) as u32;
        self.get(x, y)
    }
}

/// Single cell in the symbol grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SymbolCell {
    /// Index dans la palette de la grille.
    pub index: u16,
    /// Couleur foreground, si annotée.
    pub fg: Option<Rgb>,
    /// Couleur background, si annotée.
    pub bg: Option<Rgb>,
}

/// Grille de symboles, row-major, liée à sa palette.
///
/// # Example
/// ```
/// use gs_core::frame::{SymbolCell, SymbolGrid};
/// use gs_core::palette::SymbolPalette;
/// let palette = SymbolPalette::from_glyphs("@ ").unwrap();
/// let mut grid = SymbolGrid::new(3, 2, palette);
/// grid.set(1, 1, SymbolCell { index: 1, fg: None, bg: None });
/// assert_eq!(grid.symbol(1, 1), " ");
/// assert_eq!(grid.symbol(0, 0), "@");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolGrid {
    /// Flat array of cells, row-major.
    pub cells: Vec<SymbolCell>,
    /// Width in cells.
    pub width: u32,
    /// Height in cells.
    pub height: u32,
    palette: SymbolPalette,
}

impl SymbolGrid {
    /// Crée une grille remplie du symbole d'index 0, sans couleur.
    #[must_use]
    pub fn new(width: u32, height: u32, palette: SymbolPalette) -> Self {
        Self {
            cells: vec![SymbolCell::default(); width as usize * height as usize],
            width,
            height,
            palette,
        }
    }

    #[inline(always)]
    pub fn set(&mut self, x: u32, y: u32, cell: SymbolCell) {
        self.cells[y as usize * self.width as usize + x as usize] = cell;
    }

    #[inline(always)]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> &SymbolCell {
        &self.cells[y as usize * self.width as usize + x as usize]
    }

    /// Symbol string of cell (x, y).
    #[inline]
    #[must_use]
    pub fn symbol(&self, x: u32, y: u32) -> &str {
        self.palette.symbol(usize::from(self.get(x, y).index))
    }

    #[must_use]
    pub fn palette(&self) -> &SymbolPalette {
        &self.palette
    }

    /// Iterate rows as slices of cells.
    pub fn rows(&self) -> impl Iterator<Item = &[SymbolCell]> {
        self.cells.chunks(self.width.max(1) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_new_checks_byte_count() {
        assert_eq!(RasterBuffer::try_new(4, 2).unwrap(), RasterBuffer::new(4, 2));
        assert!(matches!(
            RasterBuffer::try_new(u32::MAX, u32::MAX),
            Err(CoreError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn from_raw_checks_length() {
        assert!(RasterBuffer::from_raw(2, 2, vec![0; 12]).is_ok());
        assert!(matches!(
            RasterBuffer::from_raw(2, 2, vec![0; 11]),
            Err(CoreError::InvalidDimension { width: 2, height: 2 })
        ));
    }

    #[test]
    fn set_then_get_pixel() {
        let mut fb = RasterBuffer::new(3, 3);
        fb.set_pixel(2, 1, Rgb::new(1, 2, 3));
        assert_eq!(fb.pixel(2, 1), Rgb::new(1, 2, 3));
        assert_eq!(fb.pixel(1, 2), Rgb::BLACK);
    }

    #[test]
    fn clamped_access_stays_in_bounds() {
        let fb = RasterBuffer::from_fn(2, 2, |x, y| Rgb::new(x as u8, y as u8, 0));
        assert_eq!(fb.pixel_clamped(-5, 9), Rgb::new(0, 1, 0));
        let gray = fb.to_gray();
        assert_eq!(gray.get_clamped(7, -1), gray.get(1, 0));
    }

    #[test]
    fn grid_rows_match_width() {
        let palette = SymbolPalette::from_glyphs("ab").unwrap();
        let grid = SymbolGrid::new(4, 3, palette);
        let rows: Vec<_> = grid.rows().collect();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.len() == 4));
    }
}
