/// Conversion engine for glyphsmith.
///
/// Preprocesses a raster, resamples it to the grid, maps each cell to a
/// palette symbol and annotates colors.
pub mod color_map;
pub mod converter;
pub mod dither;
pub mod edge;
pub mod mapper;
pub mod preprocess;

pub use converter::AsciiConverter;
