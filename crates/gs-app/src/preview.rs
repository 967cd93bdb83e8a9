use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use gs_core::frame::SymbolGrid;
use gs_render::canvas::{grid_extent, render_grid};
use ratatui::DefaultTerminal;
use ratatui::layout::Rect;
use ratatui::widgets::Block;

/// Largeur de grille utilisable dans un terminal de `cols` colonnes.
///
/// Keeps room for the preview border; emoji take two columns.
#[must_use]
pub fn fit_width(cols: u16, emoji: bool, bordered: bool) -> u32 {
    let usable = if bordered { cols.saturating_sub(2) } else { cols.saturating_sub(1) };
    let usable = if emoji { usable / 2 } else { usable };
    u32::from(usable.max(1))
}

/// Terminal width, or 80 columns if it cannot be queried.
#[must_use]
pub fn terminal_columns() -> u16 {
    match crossterm::terminal::size() {
        Ok((cols, _)) => cols,
        Err(e) => {
            log::warn!("Taille du terminal inconnue ({e}), 80 colonnes.");
            80
        }
    }
}

/// Cadre ajusté à la grille (bordure comprise), rogné à l'écran.
fn preview_area(screen: Rect, grid: &SymbolGrid) -> Rect {
    let (w, h) = grid_extent(grid);
    Rect::new(
        screen.x,
        screen.y,
        w.saturating_add(2).min(screen.width),
        h.saturating_add(2).min(screen.height),
    )
}

fn should_quit(event: &Event) -> bool {
    matches!(
        event,
        Event::Key(KeyEvent {
            code: KeyCode::Char('q') | KeyCode::Esc,
            kind: KeyEventKind::Press,
            ..
        })
    )
}

/// Affiche la grille jusqu'à `q` ou `Esc`.
///
/// # Errors
/// Returns an error if terminal operations fail.
pub fn run_preview(grid: &SymbolGrid, title: &str) -> Result<()> {
    let terminal = ratatui::init();
    let result = event_loop(terminal, grid, title);
    // Restaurer le terminal même en cas d'erreur
    ratatui::restore();
    result
}

fn event_loop(mut terminal: DefaultTerminal, grid: &SymbolGrid, title: &str) -> Result<()> {
    let title = format!(" {title} | {}×{} | q pour quitter ", grid.width, grid.height);
    loop {
        terminal.draw(|frame| {
            let area = preview_area(frame.area(), grid);
            let block = Block::bordered().title(title.as_str());
            let inner = block.inner(area);
            frame.render_widget(block, area);
            render_grid(frame.buffer_mut(), inner, grid);
        })?;

        if event::poll(Duration::from_millis(250))? && should_quit(&event::read()?) {
            break;
        }
    }
    Ok(())
}
