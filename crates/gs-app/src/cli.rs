use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use gs_core::config::{ColorMode, SettingsBuilder, SymbolSetId};

/// glyphsmith : images en art ASCII et emoji.
#[derive(Parser, Debug)]
#[command(name = "glyphsmith", version, about, long_about = None)]
pub struct Cli {
    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(long, global = true, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convertir une image en art ASCII.
    Convert(ConvertArgs),
    /// Convertir une image en art emoji.
    Emoji(EmojiArgs),
    /// Afficher la conversion dans une vue terminal (q / Esc pour quitter).
    Preview(PreviewArgs),
    /// Lister les jeux de caractères.
    Charsets,
    /// Lister les jeux d'emoji.
    Emojisets,
    /// Format, dimensions et taille d'une image.
    Info {
        image: PathBuf,
    },
    /// Convertir toutes les images d'un dossier.
    Batch(BatchArgs),
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    pub image: PathBuf,

    /// Largeur en caractères.
    #[arg(short, long)]
    pub width: Option<u32>,

    /// Hauteur explicite (ignore le ratio d'aspect).
    #[arg(long)]
    pub height: Option<u32>,

    /// Jeu de caractères : standard, detailed, simple, blocks, numbers, letters.
    #[arg(short, long, conflicts_with = "glyphs")]
    pub charset: Option<String>,

    /// Palette ad hoc, du plus sombre au plus clair.
    #[arg(long)]
    pub glyphs: Option<String>,

    /// Mode couleur : none, ansi, ansi_bg, html, html_bg.
    #[arg(long)]
    pub color: Option<String>,

    /// Inverser la luminosité.
    #[arg(short, long)]
    pub invert: bool,

    /// Fichier de sortie. Une extension .html active le mode html.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long)]
    pub contrast: Option<f32>,

    #[arg(long)]
    pub brightness: Option<f32>,

    /// Détection de contours (Sobel).
    #[arg(long)]
    pub edge: bool,

    /// Désactiver le filtre médian.
    #[arg(long)]
    pub no_denoise: bool,

    /// Netteté (0 = aucune).
    #[arg(long)]
    pub sharpen: Option<f32>,

    /// Tramage Bayer 8×8.
    #[arg(long)]
    pub dither: bool,

    /// Étirement automatique des canaux.
    #[arg(long)]
    pub auto_enhance: bool,

    /// Correction du ratio des cellules (hauteur / largeur).
    #[arg(long)]
    pub aspect: Option<f32>,

    /// Fond des modes *_bg : black, complement, source_dim.
    #[arg(long)]
    pub bg_style: Option<String>,

    /// Largeur ajustée au terminal.
    #[arg(long, conflicts_with = "width")]
    pub fit: bool,
}

#[derive(Args, Debug)]
pub struct EmojiArgs {
    pub image: PathBuf,

    /// Largeur en emoji.
    #[arg(short, long)]
    pub width: Option<u32>,

    /// Jeu d'emoji (voir `emojisets`).
    #[arg(short, long, default_value = "brightness")]
    pub emoji_set: String,

    /// Choisir l'emoji selon la teinte plutôt que la luminosité.
    #[arg(long)]
    pub color_emoji: bool,

    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long)]
    pub contrast: Option<f32>,

    #[arg(short, long)]
    pub invert: bool,

    /// Sortie HTML.
    #[arg(long)]
    pub html: bool,
}

#[derive(Args, Debug)]
pub struct PreviewArgs {
    pub image: PathBuf,

    /// Largeur ; défaut : largeur du terminal.
    #[arg(short, long)]
    pub width: Option<u32>,

    #[arg(short, long, conflicts_with = "emoji_set")]
    pub charset: Option<String>,

    #[arg(short, long)]
    pub emoji_set: Option<String>,

    /// Couleurs de la source.
    #[arg(long)]
    pub color: bool,

    #[arg(short, long)]
    pub invert: bool,

    #[arg(long)]
    pub edge: bool,
}

#[derive(Args, Debug)]
pub struct BatchArgs {
    pub dir: PathBuf,

    #[arg(short, long)]
    pub width: Option<u32>,

    /// Dossier de sortie.
    #[arg(short, long, default_value = "ascii_output")]
    pub output_dir: PathBuf,

    /// Art emoji plutôt qu'ASCII.
    #[arg(long)]
    pub emoji: bool,

    #[arg(long, default_value = "brightness")]
    pub emoji_set: String,

    #[arg(short, long, conflicts_with = "emoji")]
    pub charset: Option<String>,

    /// Mode couleur : none, ansi, ansi_bg, html, html_bg.
    #[arg(long)]
    pub color: Option<String>,

    /// Threads ; défaut : un par cœur.
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Parcourir les sous-dossiers.
    #[arg(short, long)]
    pub recursive: bool,
}

fn is_html_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("html") || e.eq_ignore_ascii_case("htm"))
}

fn parse_color(value: &str) -> Result<ColorMode> {
    value
        .parse()
        .with_context(|| format!("--color {value}"))
}

impl ConvertArgs {
    /// Surcharge `base` avec les flags fournis.
    ///
    /// # Errors
    /// Returns an error on an unknown color mode or background style.
    pub fn apply(&self, base: SettingsBuilder, fit_width: Option<u32>) -> Result<SettingsBuilder> {
        let mut b = base;
        if let Some(w) = self.width.or(fit_width) {
            b = b.width(w);
        }
        if self.height.is_some() {
            b = b.height(self.height);
        }
        if let Some(ref key) = self.charset {
            b = b.charset(key);
        }
        if let Some(ref glyphs) = self.glyphs {
            b = b.symbols(SymbolSetId::Custom(glyphs.clone()));
        }
        if let Some(ref color) = self.color {
            b = b.color_mode(parse_color(color)?);
        } else if self.output.as_deref().is_some_and(is_html_path) {
            b = b.color_mode(ColorMode::HtmlFg);
        }
        if self.invert {
            b = b.invert(true);
        }
        if let Some(v) = self.contrast {
            b = b.contrast(v);
        }
        if let Some(v) = self.brightness {
            b = b.brightness(v);
        }
        if self.edge {
            b = b.edge_detection(true);
        }
        if self.no_denoise {
            b = b.denoise(false);
        }
        if let Some(v) = self.sharpen {
            b = b.sharpen(v);
        }
        if self.dither {
            b = b.dither(true);
        }
        if self.auto_enhance {
            b = b.auto_enhance(true);
        }
        if self.aspect.is_some() {
            b = b.aspect_ratio(self.aspect);
        }
        if let Some(ref style) = self.bg_style {
            b = b.bg_style(style.parse().with_context(|| format!("--bg-style {style}"))?);
        }
        Ok(b)
    }
}

impl EmojiArgs {
    #[must_use]
    pub fn apply(&self, base: SettingsBuilder) -> SettingsBuilder {
        let mut b = base.emoji_set(&self.emoji_set).color_emoji(self.color_emoji);
        if let Some(w) = self.width {
            b = b.width(w);
        }
        if let Some(v) = self.contrast {
            b = b.contrast(v);
        }
        if self.invert {
            b = b.invert(true);
        }
        if self.html || self.output.as_deref().is_some_and(is_html_path) {
            b = b.color_mode(ColorMode::HtmlFg);
        }
        b
    }
}

impl PreviewArgs {
    #[must_use]
    pub fn apply(&self, base: SettingsBuilder, fit_width: u32) -> SettingsBuilder {
        let mut b = base
            .width(self.width.unwrap_or(fit_width))
            .color_mode(if self.color { ColorMode::AnsiFg } else { ColorMode::None });
        if let Some(ref key) = self.charset {
            b = b.charset(key);
        }
        if let Some(ref key) = self.emoji_set {
            b = b.emoji_set(key);
        }
        if self.invert {
            b = b.invert(true);
        }
        if self.edge {
            b = b.edge_detection(true);
        }
        b
    }
}

impl BatchArgs {
    /// # Errors
    /// Returns an error on an unknown color mode.
    pub fn apply(&self, base: SettingsBuilder) -> Result<SettingsBuilder> {
        let mut b = base;
        if self.emoji {
            b = b.emoji_set(&self.emoji_set);
        } else if let Some(ref key) = self.charset {
            b = b.charset(key);
        }
        if let Some(w) = self.width {
            b = b.width(w);
        }
        if let Some(ref color) = self.color {
            b = b.color_mode(parse_color(color)?);
        }
        Ok(b)
    }
}
