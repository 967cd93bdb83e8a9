use gs_core::color::Rgb;
use gs_core::frame::SymbolGrid;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};

fn tui_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

/// Écrit directement une `SymbolGrid` dans un `ratatui::Buffer`.
///
/// Emoji occupy two columns. Anything past `area` is clipped.
///
/// # Example
/// ```
/// use gs_core::frame::SymbolGrid;
/// use gs_core::palette::SymbolPalette;
/// use gs_render::canvas::render_grid;
/// use ratatui::buffer::Buffer;
/// use ratatui::layout::Rect;
///
/// let grid = SymbolGrid::new(3, 1, SymbolPalette::from_glyphs("#.").unwrap());
/// let area = Rect::new(0, 0, 3, 1);
/// let mut buf = Buffer::empty(area);
/// render_grid(&mut buf, area, &grid);
/// assert_eq!(buf[(2, 0)].symbol(), "#");
/// ```
pub fn render_grid(buf: &mut Buffer, area: Rect, grid: &SymbolGrid) {
    let palette = grid.palette();
    let step = palette.kind().cell_columns();
    let rows = u16::try_from(grid.height).unwrap_or(u16::MAX).min(area.height);

    for (cy, row) in grid.rows().take(usize::from(rows)).enumerate() {
        let buf_y = area.y + cy as u16;
        let mut offset = 0u16;
        for cell in row {
            if offset + step > area.width {
                break;
            }
            let mut style = Style::default();
            if let Some(fg) = cell.fg {
                style = style.fg(tui_color(fg));
            }
            if let Some(bg) = cell.bg {
                style = style.bg(tui_color(bg));
            }
            buf.set_string(
                area.x + offset,
                buf_y,
                palette.symbol(usize::from(cell.index)),
                style,
            );
            offset += step;
        }
    }
}

/// Terminal cells needed to show the whole grid.
#[must_use]
pub fn grid_extent(grid: &SymbolGrid) -> (u16, u16) {
    let step = u32::from(grid.palette().kind().cell_columns());
    let w = u16::try_from(grid.width.saturating_mul(step)).unwrap_or(u16::MAX);
    let h = u16::try_from(grid.height).unwrap_or(u16::MAX);
    (w, h)
}
