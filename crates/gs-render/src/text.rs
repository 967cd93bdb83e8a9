use std::fmt::Write as _;

use crossterm::style::{Color, ResetColor, SetBackgroundColor, SetForegroundColor};
use gs_core::color::Rgb;
use gs_core::config::ColorMode;
use gs_core::frame::SymbolGrid;
use gs_core::palette::SymbolKind;

/// Sérialise la grille selon le mode couleur.
///
/// # Example
/// ```
/// use gs_core::config::ColorMode;
/// use gs_core::frame::SymbolGrid;
/// use gs_core::palette::SymbolPalette;
/// use gs_render::render;
///
/// let grid = SymbolGrid::new(2, 2, SymbolPalette::from_glyphs("#.").unwrap());
/// assert_eq!(render(&grid, ColorMode::None), "##\n##");
/// ```
#[must_use]
pub fn render(grid: &SymbolGrid, mode: ColorMode) -> String {
    if mode.is_html() {
        render_html(grid)
    } else if mode.is_ansi() {
        render_ansi(grid)
    } else {
        render_plain(grid)
    }
}

/// Rows joined by `\n`, no trailing newline, no escapes.
#[must_use]
pub fn render_plain(grid: &SymbolGrid) -> String {
    let palette = grid.palette();
    grid.rows()
        .map(|row| {
            row.iter()
                .map(|c| palette.symbol(usize::from(c.index)))
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn term_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Séquences 24-bit par cellule, reset en fin de ligne.
#[must_use]
pub fn render_ansi(grid: &SymbolGrid) -> String {
    let palette = grid.palette();
    let mut lines = Vec::with_capacity(grid.height as usize);
    for row in grid.rows() {
        let mut line = String::with_capacity(row.len() * 24);
        for cell in row {
            if let Some(fg) = cell.fg {
                let _ = write!(line, "{}", SetForegroundColor(term_color(fg)));
            }
            if let Some(bg) = cell.bg {
                let _ = write!(line, "{}", SetBackgroundColor(term_color(bg)));
            }
            line.push_str(palette.symbol(usize::from(cell.index)));
        }
        let _ = write!(line, "{}", ResetColor);
        lines.push(line);
    }
    lines.join("\n")
}

/// Échappe `& < > " '` pour l'HTML.
///
/// # Example
/// ```
/// use gs_render::text::escape_html;
/// assert_eq!(escape_html("<a & 'b'>"), "&lt;a &amp; &#39;b&#39;&gt;");
/// ```
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

const HTML_HEAD: &str = "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>glyphsmith</title>\n<style>\n";

/// Complete HTML document, one `<span>` per colored cell.
#[must_use]
pub fn render_html(grid: &SymbolGrid) -> String {
    let palette = grid.palette();
    let (font_size, line_height) = match palette.kind() {
        SymbolKind::Emoji => ("16px", "1.2"),
        SymbolKind::Glyph => ("10px", "1.0"),
    };

    let mut out = String::from(HTML_HEAD);
    out.push_str("body { background-color: #000000; margin: 0; padding: 16px; }\n");
    let _ = writeln!(
        out,
        ".art {{ font-family: 'Courier New', Consolas, monospace; font-size: {font_size}; \
         line-height: {line_height}; white-space: pre; color: #ffffff; margin: 0; }}"
    );
    out.push_str("</style>\n</head>\n<body>\n<pre class=\"art\">");

    for (y, row) in grid.rows().enumerate() {
        if y > 0 {
            out.push('\n');
        }
        for cell in row {
            let symbol = escape_html(palette.symbol(usize::from(cell.index)));
            match (cell.fg, cell.bg) {
                (Some(fg), Some(bg)) => {
                    let _ = write!(
                        out,
                        "<span style=\"color:{};background-color:{}\">{symbol}</span>",
                        fg.to_hex(),
                        bg.to_hex()
                    );
                }
                (Some(fg), None) => {
                    let _ = write!(out, "<span style=\"color:{}\">{symbol}</span>", fg.to_hex());
                }
                _ => out.push_str(&symbol),
            }
        }
    }
    out.push_str("</pre>\n</body>\n</html>\n");
    out
}
