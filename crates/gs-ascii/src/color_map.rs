use gs_core::color::Rgb;
use gs_core::config::{BgStyle, ColorMode};
use gs_core::frame::{RasterBuffer, SymbolGrid};

/// Couleur de fond dérivée d'un pixel source.
///
/// # Example
/// ```
/// use gs_ascii::color_map::background;
/// use gs_core::config::BgStyle;
/// use gs_core::Rgb;
/// let px = Rgb::new(200, 100, 40);
/// assert_eq!(background(px, BgStyle::Black), Rgb::BLACK);
/// assert_eq!(background(px, BgStyle::Complement), Rgb::new(55, 155, 215));
/// assert_eq!(background(px, BgStyle::SourceDim), Rgb::new(50, 25, 10));
/// ```
#[must_use]
pub fn background(rgb: Rgb, style: BgStyle) -> Rgb {
    match style {
        BgStyle::Black => Rgb::BLACK,
        BgStyle::Complement => rgb.complement(),
        BgStyle::SourceDim => rgb.dimmed(),
    }
}

/// Pair each cell with the color of its resampled source pixel.
///
/// `fg` is set for every colored mode, `bg` only for the `*FgBg` modes.
/// With [`ColorMode::None`] the grid is returned unchanged.
#[must_use]
pub fn annotate(
    grid: &SymbolGrid,
    colors: &RasterBuffer,
    mode: ColorMode,
    bg_style: BgStyle,
) -> SymbolGrid {
    let mut out = grid.clone();
    if mode == ColorMode::None {
        return out;
    }
    let with_bg = mode.has_background();
    for y in 0..grid.height {
        for x in 0..grid.width {
            let rgb = colors.pixel(x, y);
            let mut cell = *grid.get(x, y);
            cell.fg = Some(rgb);
            cell.bg = with_bg.then(|| background(rgb, bg_style));
            out.set(x, y, cell);
        }
    }
    out
}
