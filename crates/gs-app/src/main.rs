use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use gs_ascii::AsciiConverter;
use gs_core::config::{ConversionSettings, SettingsBuilder};
use gs_core::palette::{PaletteEntry, list_character_sets, list_emoji_sets};
use gs_render::ArtResult;
use gs_source::image::format_file_size;

pub mod batch;
pub mod cli;
pub mod preview;

use cli::{Cli, Command};

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    match &cli.command {
        Command::Convert(args) => {
            let fit = args
                .fit
                .then(|| preview::fit_width(preview::terminal_columns(), false, false));
            let settings = args.apply(resolve_config(&cli.config)?, fit)?.build()?;
            let art = convert(&args.image, settings)?;
            emit(&art, args.output.as_deref())
        }
        Command::Emoji(args) => {
            let settings = args.apply(resolve_config(&cli.config)?).build()?;
            let art = convert(&args.image, settings)?;
            emit(&art, args.output.as_deref())
        }
        Command::Preview(args) => {
            let emoji = args.emoji_set.is_some();
            let fit = preview::fit_width(preview::terminal_columns(), emoji, true);
            let settings = args.apply(resolve_config(&cli.config)?, fit).build()?;
            let grid = AsciiConverter::new(settings)
                .convert_grid(&load(&args.image)?)
                .with_context(|| format!("Conversion de {}", args.image.display()))?;
            let title = args
                .image
                .file_name()
                .map_or_else(|| "glyphsmith".into(), |n| n.to_string_lossy().into_owned());
            preview::run_preview(&grid, &title)
        }
        Command::Charsets => {
            print_registry("Jeux de caractères", list_character_sets());
            Ok(())
        }
        Command::Emojisets => {
            print_registry("Jeux d'emoji", list_emoji_sets());
            Ok(())
        }
        Command::Info { image } => print_info(image),
        Command::Batch(args) => {
            let settings = args.apply(resolve_config(&cli.config)?)?.build()?;
            let files = gs_source::folder_batch::list_images(&args.dir, args.recursive)
                .with_context(|| format!("Lecture du dossier {}", args.dir.display()))?;
            if files.is_empty() {
                anyhow::bail!("Aucune image trouvée dans {}", args.dir.display());
            }
            let report = batch::run_batch(
                &files,
                &args.dir,
                &args.output_dir,
                &AsciiConverter::new(settings),
                args.jobs,
            )?;
            println!("{}", report.summary());
            if !report.is_success() {
                anyhow::bail!("{} fichier(s) en échec", report.failed.len());
            }
            Ok(())
        }
    }
}

/// Config fichier si présent, sinon défauts.
fn resolve_config(path: &Path) -> Result<SettingsBuilder> {
    if path.exists() {
        gs_core::config::load_config(path)
            .with_context(|| format!("Chargement de la config {}", path.display()))
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            path.display()
        );
        Ok(ConversionSettings::builder())
    }
}

fn load(path: &Path) -> Result<gs_core::frame::RasterBuffer> {
    gs_source::load_raster(path).with_context(|| format!("Lecture de {}", path.display()))
}

fn convert(path: &Path, settings: ConversionSettings) -> Result<ArtResult> {
    let raster = load(path)?;
    AsciiConverter::new(settings)
        .convert(&raster)
        .with_context(|| format!("Conversion de {}", path.display()))
}

/// Écrit dans `output` si fourni, sinon sur stdout.
fn emit(art: &ArtResult, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            art.save(path)?;
            eprintln!(
                "✓ {} ({}×{}, {})",
                path.display(),
                art.width(),
                art.height(),
                art.color_mode()
            );
        }
        None => println!("{art}"),
    }
    Ok(())
}

fn format_registry(title: &str, entries: &[PaletteEntry]) -> String {
    let mut out = format!("{title} :\n");
    for entry in entries {
        out.push_str(&format!(
            "  {:<10} {:<36} {}\n",
            entry.key,
            entry.description,
            entry.preview()
        ));
    }
    out
}

fn print_registry(title: &str, entries: &[PaletteEntry]) {
    print!("{}", format_registry(title, entries));
}

fn print_info(path: &Path) -> Result<()> {
    let info = gs_source::probe(path).with_context(|| format!("Lecture de {}", path.display()))?;
    println!("Fichier    : {}", info.path.display());
    println!("Format     : {}", info.format.as_deref().unwrap_or("inconnu"));
    println!("Dimensions : {} × {}", info.width, info.height);
    println!("Taille     : {}", format_file_size(info.file_size));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_config_parses() {
        let builder = gs_core::config::parse_config(include_str!("../../../config/default.toml"))
            .unwrap();
        let settings = builder.build().unwrap();
        assert_eq!(settings.width(), 100);
        assert!(settings.denoise());
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = resolve_config(&dir.path().join("absent.toml"))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(settings.width(), 100);
    }

    #[test]
    fn broken_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[conversion]\nwidth = \"wide\"").unwrap();
        let err = resolve_config(&path).unwrap_err();
        assert!(format!("{err:#}").contains("bad.toml"));
    }

    #[test]
    fn registry_listing_names_every_set() {
        let text = format_registry("Jeux d'emoji", list_emoji_sets());
        for key in ["brightness", "hearts", "geometric"] {
            assert!(text.contains(key));
        }
        assert_eq!(text.lines().count(), 1 + list_emoji_sets().len());
    }

    #[test]
    fn emit_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let art = ArtResult::new("ab\ncd".into(), 2, 2, gs_core::ColorMode::None, false);
        emit(&art, Some(&path)).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "ab\ncd");
    }
}
