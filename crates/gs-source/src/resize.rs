use fast_image_resize::images::Image;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer as FirResizer};
use gs_core::error::{CoreError, Result};
use gs_core::frame::{MAX_GRID_CELLS, RasterBuffer};

/// Grid size for a source image: `H = round(W * srcH / srcW / aspect)`, at least 1.
///
/// An explicit `height` bypasses the aspect computation.
///
/// # Errors
/// `InvalidDimension` if `width` is zero, `height` is `Some(0)`, the source is
/// empty, or the grid exceeds [`MAX_GRID_CELLS`].
///
/// # Example
/// ```
/// use gs_source::resize::grid_dimensions;
/// assert_eq!(grid_dimensions(200, 100, 80, None, 2.0).unwrap(), (80, 20));
/// assert_eq!(grid_dimensions(10, 1, 5, None, 2.0).unwrap(), (5, 1));
/// ```
pub fn grid_dimensions(
    src_width: u32,
    src_height: u32,
    width: u32,
    height: Option<u32>,
    aspect: f32,
) -> Result<(u32, u32)> {
    if width == 0 || height == Some(0) || src_width == 0 || src_height == 0 {
        return Err(CoreError::InvalidDimension {
            width,
            height: height.unwrap_or(0),
        });
    }
    let raw = match height {
        Some(h) => f64::from(h),
        None => {
            f64::from(width) * f64::from(src_height) / f64::from(src_width) / f64::from(aspect)
        }
    };
    let raw = raw.round().max(1.0);
    let cells = f64::from(width) * raw;
    if !cells.is_finite() || cells > MAX_GRID_CELLS as f64 {
        log::warn!("Grille {width}×{raw} hors limite ({MAX_GRID_CELLS} cellules)");
        return Err(CoreError::InvalidDimension {
            width,
            height: height.unwrap_or(u32::MAX),
        });
    }
    Ok((width, raw as u32))
}

/// Resampler réutilisable wrappant fast_image_resize.
///
/// Box-filter convolution: chaque pixel de sortie moyenne la zone source
/// correspondante.
///
/// # Example
/// ```
/// use gs_source::resize::Resampler;
/// let r = Resampler::new();
/// ```
pub struct Resampler {
    inner: FirResizer,
    options: ResizeOptions,
    /// Scratch copy of the source (fast_image_resize wants a mutable slice).
    src_buf: Vec<u8>,
}

impl Resampler {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: FirResizer::new(),
            options: ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Box)),
            src_buf: Vec::new(),
        }
    }

    /// Resize `src` into `dst`. Dimensions of `dst` determine output size.
    ///
    /// # Errors
    /// `InvalidDimension` if either buffer is empty or inconsistent.
    pub fn resize_into(&mut self, src: &RasterBuffer, dst: &mut RasterBuffer) -> Result<()> {
        if src.is_empty() || dst.is_empty() {
            return Err(CoreError::InvalidDimension {
                width: dst.width,
                height: dst.height,
            });
        }
        if src.width == dst.width && src.height == dst.height {
            dst.data.copy_from_slice(&src.data);
            return Ok(());
        }

        self.src_buf.clear();
        self.src_buf.extend_from_slice(&src.data);

        let invalid = |_| CoreError::InvalidDimension {
            width: dst.width,
            height: dst.height,
        };
        let src_image =
            Image::from_slice_u8(src.width, src.height, &mut self.src_buf, PixelType::U8x3)
                .map_err(invalid)?;
        let (dst_w, dst_h) = (dst.width, dst.height);
        let mut dst_image = Image::from_slice_u8(dst_w, dst_h, &mut dst.data, PixelType::U8x3)
            .map_err(|_| CoreError::InvalidDimension {
                width: dst_w,
                height: dst_h,
            })?;

        self.inner
            .resize(&src_image, &mut dst_image, Some(&self.options))
            .map_err(|e| {
                log::warn!("Resize {dst_w}×{dst_h} échoué : {e}");
                CoreError::InvalidDimension {
                    width: dst_w,
                    height: dst_h,
                }
            })
    }

    /// Resample to `width` cells, deriving the height from `aspect` unless given.
    ///
    /// # Errors
    /// `InvalidDimension` as [`grid_dimensions`].
    ///
    /// # Example
    /// ```
    /// use gs_core::frame::RasterBuffer;
    /// use gs_source::resize::Resampler;
    /// let src = RasterBuffer::new(100, 100);
    /// let dst = Resampler::new().resample(&src, 50, None, 2.0).unwrap();
    /// assert_eq!((dst.width, dst.height), (50, 25));
    /// ```
    pub fn resample(
        &mut self,
        src: &RasterBuffer,
        width: u32,
        height: Option<u32>,
        aspect: f32,
    ) -> Result<RasterBuffer> {
        let (w, h) = grid_dimensions(src.width, src.height, width, height, aspect)?;
        let mut dst = RasterBuffer::try_new(w, h)?;
        self.resize_into(src, &mut dst)?;
        Ok(dst)
    }
}

impl Default for Resampler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gs_core::color::Rgb;

    #[test]
    fn width_is_exact_and_height_at_least_one() {
        let src = RasterBuffer::new(7, 3);
        let mut r = Resampler::new();
        for w in [1, 2, 7, 31, 200] {
            let dst = r.resample(&src, w, None, 2.5).unwrap();
            assert_eq!(dst.width, w);
            assert!(dst.height >= 1);
        }
    }

    #[test]
    fn zero_width_rejected() {
        let src = RasterBuffer::new(4, 4);
        assert!(matches!(
            Resampler::new().resample(&src, 0, None, 2.0),
            Err(CoreError::InvalidDimension { width: 0, .. })
        ));
        assert!(grid_dimensions(0, 4, 4, None, 2.0).is_err());
    }

    #[test]
    fn oversized_grids_are_rejected() {
        // 1×1 source at u32::MAX columns would need 2^31 rows.
        assert!(matches!(
            grid_dimensions(1, 1, u32::MAX, None, 2.0),
            Err(CoreError::InvalidDimension { .. })
        ));
        assert!(grid_dimensions(1, 1, 10, None, 1e-30).is_err());
        assert!(grid_dimensions(1, 1, 4096, Some(4097), 2.0).is_err());
        assert_eq!(grid_dimensions(1, 1, 4096, Some(4096), 2.0).unwrap(), (4096, 4096));

        let src = RasterBuffer::new(1, 1);
        assert!(Resampler::new().resample(&src, u32::MAX, None, 2.0).is_err());
    }

    #[test]
    fn explicit_height_wins() {
        assert_eq!(grid_dimensions(100, 10, 20, Some(30), 2.0).unwrap(), (20, 30));
    }

    #[test]
    fn solid_color_survives_averaging() {
        let src = RasterBuffer::from_fn(64, 64, |_, _| Rgb::new(10, 200, 30));
        let dst = Resampler::new().resample(&src, 8, None, 2.0).unwrap();
        assert_eq!(dst.height, 4);
        for y in 0..dst.height {
            for x in 0..dst.width {
                let p = dst.pixel(x, y);
                assert!(p.r.abs_diff(10) <= 1 && p.g.abs_diff(200) <= 1 && p.b.abs_diff(30) <= 1);
            }
        }
    }

    #[test]
    fn area_average_of_checkerboard_is_gray() {
        let src = RasterBuffer::from_fn(16, 16, |x, y| {
            if (x + y) % 2 == 0 { Rgb::WHITE } else { Rgb::BLACK }
        });
        let dst = Resampler::new().resample(&src, 2, Some(2), 1.0).unwrap();
        let p = dst.pixel(0, 0);
        assert!((120..=135).contains(&p.r), "moyenne attendue ≈127, obtenu {p}");
    }

    #[test]
    fn same_size_is_a_copy() {
        let src = RasterBuffer::from_fn(5, 5, |x, y| Rgb::new(x as u8, y as u8, 1));
        let dst = Resampler::new().resample(&src, 5, Some(5), 2.0).unwrap();
        assert_eq!(dst, src);
    }
}
