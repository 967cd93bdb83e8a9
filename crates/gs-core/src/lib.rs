/// Configuration, types, and shared structures for glyphsmith.
///
/// This crate contains all shared types, traits, palettes and configuration
/// logic used across the glyphsmith workspace.

pub mod color;
pub mod config;
pub mod error;
pub mod frame;
pub mod palette;
pub mod traits;

pub use color::Rgb;
pub use config::{ColorMode, ConversionSettings, SymbolSetId};
pub use error::CoreError;
pub use frame::{GrayBuffer, RasterBuffer, SymbolCell, SymbolGrid};
pub use palette::SymbolPalette;
