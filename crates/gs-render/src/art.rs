use std::fmt;
use std::path::Path;

use gs_core::config::ColorMode;
use gs_core::error::{CoreError, Result};

/// Résultat d'une conversion : texte rendu et ses métadonnées.
///
/// # Example
/// ```
/// use gs_core::config::ColorMode;
/// use gs_render::ArtResult;
/// let art = ArtResult::new("#.\n.#".into(), 2, 2, ColorMode::None, false);
/// assert_eq!(art.to_string(), "#.\n.#");
/// assert_eq!(art.height(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtResult {
    text: String,
    width: u32,
    height: u32,
    color_mode: ColorMode,
    is_emoji: bool,
}

impl ArtResult {
    #[must_use]
    pub fn new(text: String, width: u32, height: u32, color_mode: ColorMode, is_emoji: bool) -> Self {
        Self {
            text,
            width,
            height,
            color_mode,
            is_emoji,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Grid width in cells.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in rows.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    #[must_use]
    pub fn is_emoji(&self) -> bool {
        self.is_emoji
    }

    /// Écrit le texte tel quel (UTF-8) dans `path`.
    ///
    /// # Errors
    /// `Io` if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.text.as_bytes()).map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Art sauvegardé : {} ({} octets)", path.display(), self.text.len());
        Ok(())
    }
}

impl fmt::Display for ArtResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_writes_bytes_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("art.txt");
        let art = ArtResult::new("🟥⬜\n\x1b[0m".into(), 2, 1, ColorMode::AnsiFg, true);
        art.save(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), art.text());
    }

    #[test]
    fn save_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let art = ArtResult::new("x".into(), 1, 1, ColorMode::None, false);
        let err = art.save(&dir.path().join("nope/art.txt")).unwrap_err();
        assert!(matches!(err, CoreError::Io { .. }));
    }
}
