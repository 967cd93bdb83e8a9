/// Output stage for glyphsmith.
///
/// Serializes symbol grids to plain text, ANSI-escaped text or HTML, and
/// draws them into a ratatui buffer for the terminal preview.
pub mod art;
pub mod canvas;
pub mod text;

pub use art::ArtResult;
pub use text::render;
