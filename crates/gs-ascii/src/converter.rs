use std::path::Path;
use std::time::Instant;

use gs_core::config::ConversionSettings;
use gs_core::error::{CoreError, Result};
use gs_core::frame::{RasterBuffer, SymbolGrid};
use gs_core::traits::Mapper;
use gs_render::ArtResult;
use gs_source::resize::{Resampler, grid_dimensions};

use crate::mapper::{BrightnessMapper, HueMapper};
use crate::{color_map, mapper, preprocess};

/// Orchestre le pipeline image → grille → texte.
///
/// Settings are validated when built; the converter only resolves the mapper.
/// A converter is immutable and can be shared across threads.
///
/// # Example
/// ```
/// use gs_core::config::ConversionSettings;
/// use gs_core::frame::RasterBuffer;
/// use gs_ascii::AsciiConverter;
///
/// let settings = ConversionSettings::builder()
///     .width(2)
///     .charset("blocks")
///     .aspect_ratio(Some(1.0))
///     .build()
///     .unwrap();
/// let art = AsciiConverter::new(settings).convert(&RasterBuffer::new(2, 2)).unwrap();
/// assert_eq!(art.text(), "██\n██");
/// ```
pub struct AsciiConverter {
    settings: ConversionSettings,
    mapper: Box<dyn Mapper>,
}

impl AsciiConverter {
    #[must_use]
    pub fn new(settings: ConversionSettings) -> Self {
        let levels = settings.palette().len();
        let mapper: Box<dyn Mapper> = if settings.color_emoji() {
            Box::new(HueMapper::new(levels))
        } else {
            Box::new(BrightnessMapper::new(levels, settings.invert()).with_dither(settings.dither()))
        };
        log::debug!(
            "Converter prêt : {} ({} niveaux, mapper {})",
            settings.symbols(),
            levels,
            mapper.name()
        );
        Self { settings, mapper }
    }

    #[must_use]
    pub fn settings(&self) -> &ConversionSettings {
        &self.settings
    }

    /// Run preprocessing, resampling, mapping and color annotation.
    ///
    /// # Errors
    /// `InvalidDimension` if the image is empty.
    pub fn convert_grid(&self, image: &RasterBuffer) -> Result<SymbolGrid> {
        let s = &self.settings;
        if image.is_empty() {
            return Err(CoreError::InvalidDimension {
                width: image.width,
                height: image.height,
            });
        }
        let (width, height) = grid_dimensions(
            image.width,
            image.height,
            s.width(),
            s.height(),
            s.aspect_ratio(),
        )?;

        let t0 = Instant::now();
        let adjusted = preprocess::adjust(image, s);
        let t_adjust = t0.elapsed();

        let small = Resampler::new().resample(&adjusted, width, Some(height), s.aspect_ratio())?;
        let gray = preprocess::intensity(&small, s.edge_detection());
        let grid = mapper::map_grid(self.mapper.as_ref(), &small, &gray, s.palette().clone());
        let grid = color_map::annotate(&grid, &small, s.color_mode(), s.bg_style());

        log::debug!(
            "{}×{} → {width}×{height} : ajustement {t_adjust:?}, total {:?}",
            image.width,
            image.height,
            t0.elapsed()
        );
        Ok(grid)
    }

    /// Convert a decoded image into rendered text.
    ///
    /// # Errors
    /// `InvalidDimension` if the image is empty.
    pub fn convert(&self, image: &RasterBuffer) -> Result<ArtResult> {
        let grid = self.convert_grid(image)?;
        let mode = self.settings.color_mode();
        let text = gs_render::render(&grid, mode);
        Ok(ArtResult::new(
            text,
            grid.width,
            grid.height,
            mode,
            self.settings.is_emoji(),
        ))
    }

    /// Decode `path` then [`convert`](Self::convert) it.
    ///
    /// # Errors
    /// `Io` or `ImageDecode` from loading, then as [`convert`](Self::convert).
    pub fn convert_path(&self, path: &Path) -> Result<ArtResult> {
        let raster = gs_source::load_raster(path)?;
        self.convert(&raster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gs_core::Rgb;
    use gs_core::config::{BgStyle, ColorMode};

    fn gradient(width: u32, height: u32) -> RasterBuffer {
        RasterBuffer::from_fn(width, height, |x, _| {
            let v = (x * 255 / (width - 1)) as u8;
            Rgb::new(v, v, v)
        })
    }

    fn strip_ansi(s: &str) -> String {
        let mut out = String::new();
        let mut in_seq = false;
        for c in s.chars() {
            match c {
                '\x1b' => in_seq = true,
                'm' if in_seq => in_seq = false,
                c if !in_seq => out.push(c),
                _ => {}
            }
        }
        out
    }

    #[test]
    fn black_square_in_blocks() {
        let settings = ConversionSettings::builder()
            .width(2)
            .charset("blocks")
            .color_mode(ColorMode::None)
            .aspect_ratio(Some(1.0))
            .build()
            .unwrap();
        let art = AsciiConverter::new(settings)
            .convert(&RasterBuffer::new(2, 2))
            .unwrap();
        assert_eq!(art.text(), "██\n██");
        assert_eq!((art.width(), art.height()), (2, 2));
        assert!(!art.is_emoji());
    }

    #[test]
    fn gradient_indices_non_decreasing() {
        let settings = ConversionSettings::builder()
            .width(10)
            .charset("standard")
            .build()
            .unwrap();
        let conv = AsciiConverter::new(settings);
        let grid = conv.convert_grid(&gradient(100, 10)).unwrap();
        assert_eq!((grid.width, grid.height), (10, 1));
        let indices: Vec<u16> = grid.cells.iter().map(|c| c.index).collect();
        assert!(indices.windows(2).all(|w| w[0] <= w[1]), "{indices:?}");
        assert_eq!(indices[0], 0);
        assert_eq!(indices[9], 9);
    }

    #[test]
    fn invert_flips_extremes() {
        let settings = ConversionSettings::builder()
            .width(10)
            .charset("standard")
            .invert(true)
            .build()
            .unwrap();
        let grid = AsciiConverter::new(settings)
            .convert_grid(&gradient(100, 10))
            .unwrap();
        assert_eq!(grid.cells[0].index, 9);
        assert_eq!(grid.cells[9].index, 0);
    }

    #[test]
    fn conversion_is_deterministic() {
        let img = RasterBuffer::from_fn(37, 23, |x, y| {
            Rgb::new((x * 7) as u8, (y * 11) as u8, ((x * y) % 256) as u8)
        });
        let settings = ConversionSettings::builder()
            .width(20)
            .color_mode(ColorMode::AnsiFgBg)
            .sharpen(0.8)
            .dither(true)
            .build()
            .unwrap();
        let conv = AsciiConverter::new(settings);
        assert_eq!(conv.convert(&img).unwrap(), conv.convert(&img).unwrap());
    }

    #[test]
    fn ansi_stripped_equals_plain() {
        let img = gradient(64, 32);
        let build = |mode| {
            ConversionSettings::builder()
                .width(16)
                .color_mode(mode)
                .bg_style(BgStyle::Complement)
                .build()
                .unwrap()
        };
        let plain = AsciiConverter::new(build(ColorMode::None)).convert(&img).unwrap();
        for mode in [ColorMode::AnsiFg, ColorMode::AnsiFgBg] {
            let colored = AsciiConverter::new(build(mode)).convert(&img).unwrap();
            assert_eq!(strip_ansi(colored.text()), plain.text());
            assert_eq!(colored.color_mode(), mode);
        }
    }

    #[test]
    fn color_emoji_follows_hue() {
        let settings = ConversionSettings::builder()
            .width(3)
            .emoji_set("squares")
            .color_emoji(true)
            .build()
            .unwrap();
        let red = RasterBuffer::from_fn(9, 9, |_, _| Rgb::new(220, 20, 20));
        let art = AsciiConverter::new(settings).convert(&red).unwrap();
        assert!(art.is_emoji());
        assert_eq!(art.height(), 3);
        assert_eq!(art.text(), "🟥🟥🟥\n🟥🟥🟥\n🟥🟥🟥");
    }

    #[test]
    fn edge_mode_on_flat_image_is_blank() {
        let settings = ConversionSettings::builder()
            .width(4)
            .charset("simple")
            .edge_detection(true)
            .build()
            .unwrap();
        let flat = RasterBuffer::from_fn(8, 8, |_, _| Rgb::new(90, 140, 30));
        let art = AsciiConverter::new(settings).convert(&flat).unwrap();
        assert!(art.text().lines().all(|l| l == "    "));
    }

    #[test]
    fn explicit_height_override() {
        let settings = ConversionSettings::builder()
            .width(5)
            .height(Some(7))
            .build()
            .unwrap();
        let art = AsciiConverter::new(settings).convert(&gradient(50, 10)).unwrap();
        assert_eq!(art.height(), 7);
        assert_eq!(art.text().lines().count(), 7);
    }

    #[test]
    fn empty_image_rejected() {
        let conv = AsciiConverter::new(ConversionSettings::builder().build().unwrap());
        let empty = RasterBuffer::new(0, 0);
        assert!(matches!(
            conv.convert(&empty),
            Err(CoreError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn invalid_settings_fail_before_conversion() {
        assert!(matches!(
            ConversionSettings::builder().width(0).build(),
            Err(CoreError::InvalidDimension { width: 0, .. })
        ));
        assert!(matches!(
            ConversionSettings::builder().charset("nonexistent").build(),
            Err(CoreError::UnknownSymbolSet { .. })
        ));
    }

    #[test]
    fn convert_path_reads_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("white.png");
        image::RgbImage::from_pixel(4, 4, image::Rgb([255, 255, 255]))
            .save(&path)
            .unwrap();
        let settings = ConversionSettings::builder()
            .width(4)
            .charset("simple")
            .aspect_ratio(Some(2.0))
            .build()
            .unwrap();
        let art = AsciiConverter::new(settings).convert_path(&path).unwrap();
        assert_eq!(art.text(), "    \n    ");
    }
}
