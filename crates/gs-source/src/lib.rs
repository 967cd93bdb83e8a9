/// Image input for glyphsmith: decoding, probing, resampling, and folder scans.

pub mod folder_batch;
pub mod image;
pub mod resize;

pub use image::{ImageInfo, load_raster, probe};
pub use resize::{Resampler, grid_dimensions};
