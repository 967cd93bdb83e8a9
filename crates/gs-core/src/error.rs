use std::path::PathBuf;

use thiserror::Error;

/// Errors originating from the conversion core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Out-of-range or non-finite settings value.
    #[error("Paramètre invalide : {name} = {value}")]
    InvalidParameter {
        /// Name of the offending setting.
        name: &'static str,
        /// Offending value, formatted.
        value: String,
    },

    /// Invalid width/height dimensions.
    #[error("Dimensions invalides : {width}×{height}")]
    InvalidDimension {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Symbol set key absent from the registry.
    #[error("Jeu de symboles inconnu ({kind}) : '{key}'")]
    UnknownSymbolSet {
        /// "charset" or "emoji".
        kind: &'static str,
        /// The key that was looked up.
        key: String,
    },

    /// Color mode string that does not name a known mode.
    #[error("Mode couleur non supporté : '{value}' (attendu : none, ansi, ansi_bg, html, html_bg)")]
    UnsupportedColorMode {
        /// The rejected value.
        value: String,
    },

    /// The image decoder could not read the file.
    #[error("Impossible de décoder l'image {}", path.display())]
    ImageDecode {
        /// Path of the image.
        path: PathBuf,
        /// Decoder error, surfaced unchanged.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Filesystem failure while reading config or writing output.
    #[error("Erreur d'E/S sur {}", path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration file structure.
    #[error("Configuration invalide : {0}")]
    Config(String),
}

/// Shorthand used across the workspace.
pub type Result<T> = std::result::Result<T, CoreError>;
