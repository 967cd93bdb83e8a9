use gs_core::color::Rgb;
use gs_core::config::ConversionSettings;
use gs_core::frame::{GrayBuffer, RasterBuffer};

use crate::edge;

/// Ajustements couleur à pleine résolution.
///
/// Order: 3×3 median denoise, brightness, contrast, auto-enhance, sharpen.
/// Returns a new buffer with the source dimensions.
///
/// # Example
/// ```
/// use gs_core::config::ConversionSettings;
/// use gs_core::frame::RasterBuffer;
/// use gs_ascii::preprocess::adjust;
///
/// let settings = ConversionSettings::builder().contrast(1.0).build().unwrap();
/// let src = RasterBuffer::new(4, 4);
/// let out = adjust(&src, &settings);
/// assert_eq!(out, src);
/// ```
#[must_use]
pub fn adjust(src: &RasterBuffer, settings: &ConversionSettings) -> RasterBuffer {
    let mut buf = if settings.denoise() {
        median_3x3(src)
    } else {
        src.clone()
    };

    let lut = tone_lut(settings.brightness(), settings.contrast());
    for v in &mut buf.data {
        *v = lut[usize::from(*v)];
    }

    if settings.auto_enhance() {
        stretch_channels(&mut buf);
    }
    if settings.sharpen() > 0.0 {
        buf = unsharp_mask(&buf, settings.sharpen());
    }
    buf
}

/// Intensité par pixel : luma BT.601, ou carte de contours inversée.
#[must_use]
pub fn intensity(buf: &RasterBuffer, edge_detection: bool) -> GrayBuffer {
    let gray = buf.to_gray();
    if edge_detection {
        edge::edge_map(&gray)
    } else {
        gray
    }
}

/// [`adjust`] then [`intensity`], both at the same resolution.
#[must_use]
pub fn process(src: &RasterBuffer, settings: &ConversionSettings) -> (RasterBuffer, GrayBuffer) {
    let adjusted = adjust(src, settings);
    let gray = intensity(&adjusted, settings.edge_detection());
    (adjusted, gray)
}

/// Brightness (multiply) then contrast (around 128), clamped at each step.
fn tone_lut(brightness: f32, contrast: f32) -> [u8; 256] {
    let mut lut = [0u8; 256];
    for (v, out) in lut.iter_mut().enumerate() {
        let b = (v as f32 * brightness).clamp(0.0, 255.0);
        let c = ((b - 128.0) * contrast + 128.0).clamp(0.0, 255.0);
        *out = c.round() as u8;
    }
    lut
}

/// Offsets du voisinage 3×3.
const NEIGHBOURS: [(i64, i64); 9] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (0, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Median of each channel over the 3×3 neighbourhood, edges clamped.
#[must_use]
pub fn median_3x3(src: &RasterBuffer) -> RasterBuffer {
    let mut out = RasterBuffer::new(src.width, src.height);
    let mut window = [[0u8; 9]; 3];
    for y in 0..src.height {
        for x in 0..src.width {
            for (k, (dx, dy)) in NEIGHBOURS.iter().enumerate() {
                let p = src.pixel_clamped(i64::from(x) + dx, i64::from(y) + dy);
                window[0][k] = p.r;
                window[1][k] = p.g;
                window[2][k] = p.b;
            }
            for channel in &mut window {
                channel.sort_unstable();
            }
            out.set_pixel(
                x,
                y,
                Rgb::new(window[0][4], window[1][4], window[2][4]),
            );
        }
    }
    out
}

/// Étire chaque canal sur [0, 255]. Un canal constant reste inchangé.
pub fn stretch_channels(buf: &mut RasterBuffer) {
    for c in 0..3 {
        let (mut lo, mut hi) = (u8::MAX, u8::MIN);
        for p in buf.data.chunks_exact(3) {
            lo = lo.min(p[c]);
            hi = hi.max(p[c]);
        }
        if hi <= lo {
            continue;
        }
        let range = f32::from(hi - lo);
        for p in buf.data.chunks_exact_mut(3) {
            p[c] = (f32::from(p[c] - lo) * 255.0 / range).round() as u8;
        }
    }
}

/// `p + factor * (p - box3x3(p))`, clamped per channel.
#[must_use]
pub fn unsharp_mask(src: &RasterBuffer, factor: f32) -> RasterBuffer {
    let mut out = RasterBuffer::new(src.width, src.height);
    for y in 0..src.height {
        for x in 0..src.width {
            let mut sum = [0u32; 3];
            for (dx, dy) in NEIGHBOURS {
                let p = src.pixel_clamped(i64::from(x) + dx, i64::from(y) + dy);
                sum[0] += u32::from(p.r);
                sum[1] += u32::from(p.g);
                sum[2] += u32::from(p.b);
            }
            let p = src.pixel(x, y);
            let sharpen = |v: u8, s: u32| {
                let v = f32::from(v);
                let blur = s as f32 / 9.0;
                (v + factor * (v - blur)).clamp(0.0, 255.0).round() as u8
            };
            out.set_pixel(
                x,
                y,
                Rgb::new(
                    sharpen(p.r, sum[0]),
                    sharpen(p.g, sum[1]),
                    sharpen(p.b, sum[2]),
                ),
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neutral() -> gs_core::config::SettingsBuilder {
        ConversionSettings::builder()
            .contrast(1.0)
            .brightness(1.0)
            .denoise(false)
    }

    #[test]
    fn neutral_settings_are_identity() {
        let src = RasterBuffer::from_fn(5, 3, |x, y| {
            Rgb::new(x as u8 * 40, y as u8 * 70, 9)
        });
        let out = adjust(&src, &neutral().build().unwrap());
        assert_eq!(out, src);
    }

    #[test]
    fn brightness_multiplies_and_clamps() {
        let src = RasterBuffer::from_fn(2, 1, |x, _| {
            if x == 0 { Rgb::new(100, 100, 100) } else { Rgb::new(200, 200, 200) }
        });
        let out = adjust(&src, &neutral().brightness(1.5).build().unwrap());
        assert_eq!(out.pixel(0, 0), Rgb::new(150, 150, 150));
        assert_eq!(out.pixel(1, 0), Rgb::new(255, 255, 255));
    }

    #[test]
    fn contrast_pivots_on_mid_gray() {
        let src = RasterBuffer::from_fn(3, 1, |x, _| {
            let v = [128u8, 100, 200][x as usize];
            Rgb::new(v, v, v)
        });
        let out = adjust(&src, &neutral().contrast(2.0).build().unwrap());
        assert_eq!(out.pixel(0, 0).r, 128);
        assert_eq!(out.pixel(1, 0).r, 72);
        assert_eq!(out.pixel(2, 0).r, 255);
    }

    #[test]
    fn median_removes_salt_noise() {
        let mut src = RasterBuffer::from_fn(5, 5, |_, _| Rgb::new(50, 50, 50));
        src.set_pixel(2, 2, Rgb::WHITE);
        let out = median_3x3(&src);
        assert_eq!(out.pixel(2, 2), Rgb::new(50, 50, 50));
        assert_eq!((out.width, out.height), (5, 5));
    }

    #[test]
    fn stretch_spans_full_range() {
        let mut buf = RasterBuffer::from_fn(2, 1, |x, _| {
            if x == 0 { Rgb::new(100, 7, 7) } else { Rgb::new(150, 7, 7) }
        });
        stretch_channels(&mut buf);
        assert_eq!(buf.pixel(0, 0), Rgb::new(0, 7, 7));
        assert_eq!(buf.pixel(1, 0), Rgb::new(255, 7, 7));
    }

    #[test]
    fn sharpen_increases_local_contrast() {
        let src = RasterBuffer::from_fn(6, 1, |x, _| {
            if x < 3 { Rgb::new(80, 80, 80) } else { Rgb::new(160, 160, 160) }
        });
        let out = unsharp_mask(&src, 1.0);
        assert!(out.pixel(2, 0).r < 80);
        assert!(out.pixel(3, 0).r > 160);
        // flat interior untouched
        assert_eq!(out.pixel(0, 0).r, 80);
    }

    #[test]
    fn edge_mode_marks_boundaries_dark() {
        let src = RasterBuffer::from_fn(8, 4, |x, _| {
            if x < 4 { Rgb::BLACK } else { Rgb::WHITE }
        });
        let (adjusted, gray) = process(&src, &neutral().edge_detection(true).build().unwrap());
        assert_eq!(adjusted, src);
        assert_eq!(gray.get(0, 0), 255);
        assert!(gray.get(4, 1) < gray.get(0, 1));
    }
}
