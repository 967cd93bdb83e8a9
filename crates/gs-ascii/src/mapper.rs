use gs_core::color::{Rgb, rgb_to_hsv};
use gs_core::frame::{GrayBuffer, RasterBuffer, SymbolCell, SymbolGrid};
use gs_core::palette::SymbolPalette;
use gs_core::traits::{Mapper, Sample};

use crate::dither;

/// Bucket of intensity `v` among `levels`: `min(v * levels / 256, levels - 1)`.
///
/// # Example
/// ```
/// use gs_ascii::mapper::quantize;
/// assert_eq!(quantize(0, 10), 0);
/// assert_eq!(quantize(255, 10), 9);
/// assert_eq!(quantize(128, 2), 1);
/// ```
#[inline]
#[must_use]
pub fn quantize(v: u8, levels: usize) -> usize {
    let levels = levels.max(1);
    (usize::from(v) * levels / 256).min(levels - 1)
}

/// Intensité → index, via une LUT de 256 entrées.
///
/// # Example
/// ```
/// use gs_ascii::mapper::BrightnessMapper;
/// let m = BrightnessMapper::new(10, false);
/// let inv = BrightnessMapper::new(10, true);
/// assert_eq!(m.lookup(0), 0);
/// assert_eq!(inv.lookup(0), 9);
/// ```
#[derive(Clone, Debug)]
pub struct BrightnessMapper {
    lut: [u16; 256],
    levels: usize,
    dither: bool,
}

impl BrightnessMapper {
    /// `invert` reflects each bucket: `levels - 1 - idx`.
    #[must_use]
    pub fn new(levels: usize, invert: bool) -> Self {
        let levels = levels.clamp(1, usize::from(u16::MAX));
        let mut lut = [0u16; 256];
        for (v, slot) in lut.iter_mut().enumerate() {
            let idx = quantize(v as u8, levels);
            let idx = if invert { levels - 1 - idx } else { idx };
            *slot = idx as u16;
        }
        Self {
            lut,
            levels,
            dither: false,
        }
    }

    /// Active le tramage Bayer 8×8 avant la lecture de la LUT.
    #[must_use]
    pub fn with_dither(mut self, dither: bool) -> Self {
        self.dither = dither;
        self
    }

    /// Index for a raw intensity, no dithering.
    #[inline(always)]
    #[must_use]
    pub fn lookup(&self, v: u8) -> usize {
        usize::from(self.lut[usize::from(v)])
    }
}

impl Mapper for BrightnessMapper {
    #[inline]
    fn index(&self, sample: &Sample) -> usize {
        let v = if self.dither {
            dither::apply_bayer_8x8(sample.intensity, sample.x, sample.y, self.levels)
        } else {
            sample.intensity
        };
        self.lookup(v)
    }

    fn levels(&self) -> usize {
        self.levels
    }

    fn name(&self) -> &'static str {
        "brightness"
    }
}

/// Familles de couleur, dans l'ordre des emoji sets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorFamily {
    Black,
    Brown,
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    White,
}

impl ColorFamily {
    pub const ALL: [Self; 9] = [
        Self::Black,
        Self::Brown,
        Self::Red,
        Self::Orange,
        Self::Yellow,
        Self::Green,
        Self::Blue,
        Self::Purple,
        Self::White,
    ];

    /// Classify a color by HSV thresholds.
    ///
    /// # Example
    /// ```
    /// use gs_ascii::mapper::ColorFamily;
    /// use gs_core::Rgb;
    /// assert_eq!(ColorFamily::classify(Rgb::new(220, 20, 20)), ColorFamily::Red);
    /// assert_eq!(ColorFamily::classify(Rgb::new(20, 20, 20)), ColorFamily::Black);
    /// assert_eq!(ColorFamily::classify(Rgb::new(200, 200, 200)), ColorFamily::White);
    /// ```
    #[must_use]
    pub fn classify(rgb: Rgb) -> Self {
        let (h, s, v) = rgb_to_hsv(rgb.r, rgb.g, rgb.b);
        if v < 0.12 {
            return Self::Black;
        }
        if s < 0.15 {
            return if v >= 0.5 { Self::White } else { Self::Black };
        }
        let deg = h * 360.0;
        if deg < 15.0 {
            Self::Red
        } else if deg < 45.0 {
            if v < 0.55 { Self::Brown } else { Self::Orange }
        } else if deg < 70.0 {
            Self::Yellow
        } else if deg < 170.0 {
            Self::Green
        } else if deg < 260.0 {
            Self::Blue
        } else if deg < 330.0 {
            Self::Purple
        } else {
            Self::Red
        }
    }

    /// Position in [`ColorFamily::ALL`].
    #[must_use]
    pub fn ordinal(self) -> usize {
        self as usize
    }
}

/// Couleur → index de palette, pour le mode emoji coloré.
///
/// `idx = family * levels / 9`, clamped to the last bucket.
#[derive(Clone, Copy, Debug)]
pub struct HueMapper {
    levels: usize,
}

impl HueMapper {
    #[must_use]
    pub fn new(levels: usize) -> Self {
        Self {
            levels: levels.max(1),
        }
    }
}

impl Mapper for HueMapper {
    fn index(&self, sample: &Sample) -> usize {
        let family = ColorFamily::classify(sample.rgb).ordinal();
        (family * self.levels / ColorFamily::ALL.len()).min(self.levels - 1)
    }

    fn levels(&self) -> usize {
        self.levels
    }

    fn name(&self) -> &'static str {
        "hue"
    }
}

/// Map every resampled pixel to a palette index. Cells carry no color yet.
///
/// `colors` and `intensity` must share dimensions.
#[must_use]
pub fn map_grid(
    mapper: &dyn Mapper,
    colors: &RasterBuffer,
    intensity: &GrayBuffer,
    palette: SymbolPalette,
) -> SymbolGrid {
    debug_assert_eq!(
        (colors.width, colors.height),
        (intensity.width, intensity.height)
    );
    let mut grid = SymbolGrid::new(colors.width, colors.height, palette);
    let last = grid.palette().len().saturating_sub(1);
    for y in 0..colors.height {
        for x in 0..colors.width {
            let sample = Sample {
                intensity: intensity.get(x, y),
                rgb: colors.pixel(x, y),
                x,
                y,
            };
            let index = mapper.index(&sample).min(last);
            grid.set(
                x,
                y,
                SymbolCell {
                    index: u16::try_from(index).unwrap_or(u16::MAX),
                    fg: None,
                    bg: None,
                },
            );
        }
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_in_range_and_monotonic() {
        for levels in [2usize, 5, 10, 70] {
            let m = BrightnessMapper::new(levels, false);
            let inv = BrightnessMapper::new(levels, true);
            let mut prev = 0;
            let mut prev_inv = levels - 1;
            for v in 0..=255u8 {
                let i = m.lookup(v);
                let j = inv.lookup(v);
                assert!(i < levels && j < levels);
                assert!(i >= prev, "non monotone à v={v}");
                assert!(j <= prev_inv);
                prev = i;
                prev_inv = j;
            }
        }
    }

    #[test]
    fn invert_pairs_with_plain() {
        for levels in [2usize, 6, 10, 17, 70] {
            let m = BrightnessMapper::new(levels, false);
            let inv = BrightnessMapper::new(levels, true);
            for v in 0..=255u8 {
                assert_eq!(inv.lookup(v), levels - 1 - m.lookup(v));
            }
        }
    }

    #[test]
    fn extremes_hit_first_and_last_bucket() {
        let m = BrightnessMapper::new(70, false);
        assert_eq!(m.lookup(0), 0);
        assert_eq!(m.lookup(255), 69);
    }

    #[test]
    fn dither_keeps_pure_black_and_white() {
        let m = BrightnessMapper::new(10, false).with_dither(true);
        for (x, y) in [(0, 0), (3, 7), (5, 2)] {
            let s = |v| Sample {
                intensity: v,
                rgb: Rgb::BLACK,
                x,
                y,
            };
            assert_eq!(m.index(&s(0)), 0);
            assert_eq!(m.index(&s(255)), 9);
        }
    }

    #[test]
    fn families_follow_hue_wheel() {
        let cases = [
            (Rgb::new(0, 0, 0), ColorFamily::Black),
            (Rgb::new(120, 70, 20), ColorFamily::Brown),
            (Rgb::new(255, 140, 0), ColorFamily::Orange),
            (Rgb::new(240, 230, 20), ColorFamily::Yellow),
            (Rgb::new(30, 200, 40), ColorFamily::Green),
            (Rgb::new(30, 60, 220), ColorFamily::Blue),
            (Rgb::new(160, 40, 200), ColorFamily::Purple),
            (Rgb::new(230, 20, 120), ColorFamily::Red),
            (Rgb::new(250, 250, 250), ColorFamily::White),
            (Rgb::new(90, 90, 90), ColorFamily::Black),
        ];
        for (rgb, expected) in cases {
            assert_eq!(ColorFamily::classify(rgb), expected, "{rgb}");
        }
    }

    #[test]
    fn hue_mapper_spreads_families_over_palette() {
        let m = HueMapper::new(9);
        let s = |rgb| Sample {
            intensity: 0,
            rgb,
            x: 0,
            y: 0,
        };
        assert_eq!(m.index(&s(Rgb::BLACK)), 0);
        assert_eq!(m.index(&s(Rgb::new(220, 20, 20))), 2);
        assert_eq!(m.index(&s(Rgb::WHITE)), 8);

        let small = HueMapper::new(3);
        assert_eq!(small.index(&s(Rgb::WHITE)), 2);
        assert_eq!(small.index(&s(Rgb::new(30, 60, 220))), 2);
    }

    #[test]
    fn map_grid_uses_intensity_buffer() {
        let colors = RasterBuffer::new(3, 1);
        let gray = GrayBuffer {
            data: vec![0, 128, 255],
            width: 3,
            height: 1,
        };
        let palette = SymbolPalette::from_glyphs("@+ ").unwrap();
        let grid = map_grid(&BrightnessMapper::new(3, false), &colors, &gray, palette);
        let row: String = (0..3).map(|x| grid.symbol(x, 0)).collect();
        assert_eq!(row, "@+ ");
        assert!(grid.cells.iter().all(|c| c.fg.is_none()));
    }
}
