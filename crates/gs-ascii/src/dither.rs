//! Tramage ordonné (Bayer 8×8) appliqué avant la quantification.

/// Matrice de Bayer 8x8, seuils 0..63.
pub const BAYER_8X8: [[u8; 8]; 8] = [
    [0, 32, 8, 40, 2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44, 4, 36, 14, 46, 6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [3, 35, 11, 43, 1, 33, 9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47, 7, 39, 13, 45, 5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

/// Décale l'intensité `v` d'au plus un demi-palier selon la position (x, y).
///
/// `levels` is the palette length: the offset spans one quantization step
/// (`256 / levels`). Values at the extremes (`< 2`, `> 253`) are left alone so
/// pure black and pure white stay stable.
///
/// # Example
/// ```
/// use gs_ascii::dither::apply_bayer_8x8;
/// assert_eq!(apply_bayer_8x8(0, 3, 5, 10), 0);
/// assert_eq!(apply_bayer_8x8(255, 3, 5, 10), 255);
/// // top-left threshold is the lowest: pushes down by half a step
/// assert!(apply_bayer_8x8(128, 0, 0, 10) < 128);
/// ```
#[must_use]
#[inline(always)]
pub fn apply_bayer_8x8(v: u8, x: u32, y: u32, levels: usize) -> u8 {
    if !(2..=253).contains(&v) {
        return v;
    }
    let step = 256 / levels.clamp(2, 256) as i32;
    let threshold = i32::from(BAYER_8X8[(y % 8) as usize][(x % 8) as usize]) - 32;
    let offset = threshold * step / 64;
    (i32::from(v) + offset).clamp(0, 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_stays_within_half_step() {
        for levels in [2usize, 5, 10, 70] {
            let half = 256 / levels as i32 / 2;
            for y in 0..8 {
                for x in 0..8 {
                    let d = i32::from(apply_bayer_8x8(128, x, y, levels)) - 128;
                    assert!(d.abs() <= half, "levels={levels} d={d}");
                }
            }
        }
    }

    #[test]
    fn pattern_repeats_every_eight_cells() {
        for v in [40u8, 100, 200] {
            assert_eq!(apply_bayer_8x8(v, 1, 2, 9), apply_bayer_8x8(v, 9, 10, 9));
        }
    }

    #[test]
    fn matrix_is_a_permutation() {
        let mut seen = [false; 64];
        for row in BAYER_8X8 {
            for v in row {
                seen[v as usize] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
    }
}
