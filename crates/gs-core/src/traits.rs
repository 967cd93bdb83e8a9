use crate::color::Rgb;

/// One resampled pixel as seen by a [`Mapper`].
#[derive(Clone, Copy, Debug)]
pub struct Sample {
    /// Luma, or inverted edge magnitude in edge mode.
    pub intensity: u8,
    /// Adjusted source color.
    pub rgb: Rgb,
    /// Column in the grid.
    pub x: u32,
    /// Row in the grid.
    pub y: u32,
}

/// Transforme un pixel échantillonné en index de palette.
///
/// Implémenté par : `BrightnessMapper`, `HueMapper`.
///
/// # Example
/// ```
/// use gs_core::traits::{Mapper, Sample};
///
/// struct Threshold;
/// impl Mapper for Threshold {
///     fn index(&self, s: &Sample) -> usize { usize::from(s.intensity >= 128) }
///     fn levels(&self) -> usize { 2 }
///     fn name(&self) -> &'static str { "threshold" }
/// }
/// ```
pub trait Mapper: Send + Sync {
    /// Index in `[0, levels())`.
    fn index(&self, sample: &Sample) -> usize;

    /// Nombre de buckets (longueur de la palette).
    fn levels(&self) -> usize;

    /// Nom lisible pour le debug.
    fn name(&self) -> &'static str;
}
