use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use gs_ascii::AsciiConverter;
use gs_source::folder_batch::plan_outputs;
use rayon::prelude::*;

/// Bilan d'un traitement par lots.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// (entrée, sortie) des conversions réussies.
    pub converted: Vec<(PathBuf, PathBuf)>,
    /// (entrée, message d'erreur).
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchReport {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Human-readable summary, one line per failure.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut out = format!(
            "{} converti(s), {} échec(s)",
            self.converted.len(),
            self.failed.len()
        );
        for (path, err) in &self.failed {
            out.push_str(&format!("\n  ✗ {} : {err}", path.display()));
        }
        out
    }
}

/// Extension de sortie selon le mode couleur.
fn output_extension(converter: &AsciiConverter) -> &'static str {
    if converter.settings().color_mode().is_html() {
        "html"
    } else {
        "txt"
    }
}

/// Convertit `files` (trouvés sous `root`) en parallèle dans `out_dir`.
///
/// Sub-directories of `root` are mirrored under `out_dir`. A failing file
/// never aborts its siblings; it is recorded in the report, as is an input
/// whose target is already claimed by an earlier one.
///
/// # Errors
/// Returns an error only if `out_dir` cannot be created or the thread pool
/// cannot be built.
pub fn run_batch(
    files: &[PathBuf],
    root: &Path,
    out_dir: &Path,
    converter: &AsciiConverter,
    jobs: Option<usize>,
) -> Result<BatchReport> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Création du dossier {}", out_dir.display()))?;

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = jobs {
        builder = builder.num_threads(n.max(1));
    }
    let pool = builder.build().context("Construction du pool rayon")?;

    let ext = output_extension(converter);
    let start = Instant::now();
    log::info!(
        "Lot : {} fichier(s) → {} ({} threads)",
        files.len(),
        out_dir.display(),
        pool.current_num_threads()
    );

    let mut report = BatchReport::default();
    let mut seen = HashSet::new();
    let mut pending = Vec::with_capacity(files.len());
    for (input, out) in files.iter().zip(plan_outputs(files, root, out_dir, ext)) {
        if seen.insert(out.clone()) {
            pending.push((input, out));
        } else {
            log::warn!("Cible déjà utilisée {} : {}", out.display(), input.display());
            report
                .failed
                .push((input.clone(), format!("cible en double {}", out.display())));
        }
    }

    let results: Vec<(PathBuf, Result<PathBuf>)> = pool.install(|| {
        pending
            .into_par_iter()
            .map(|(input, out)| {
                let res = convert_one(converter, input, &out).map(|()| out);
                (input.clone(), res)
            })
            .collect()
    });

    for (input, res) in results {
        match res {
            Ok(out) => {
                log::info!("✓ {} → {}", input.display(), out.display());
                report.converted.push((input, out));
            }
            Err(e) => {
                log::warn!("Fichier ignoré {} : {e:#}", input.display());
                report.failed.push((input, format!("{e:#}")));
            }
        }
    }
    log::info!("Lot terminé en {:?}", start.elapsed());
    Ok(report)
}

fn convert_one(converter: &AsciiConverter, input: &Path, out: &Path) -> Result<()> {
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Création du dossier {}", parent.display()))?;
    }
    let art = converter.convert_path(input)?;
    art.save(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gs_core::config::{ColorMode, ConversionSettings};

    fn write_png(path: &Path, shade: u8) {
        image::RgbImage::from_pixel(8, 8, image::Rgb([shade, shade, shade]))
            .save(path)
            .unwrap();
    }

    #[test]
    fn failures_do_not_abort_siblings() {
        let input = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let a = input.path().join("a.png");
        let b = input.path().join("b.png");
        let bad = input.path().join("broken.png");
        write_png(&a, 0);
        write_png(&b, 255);
        std::fs::write(&bad, b"not an image").unwrap();

        let settings = ConversionSettings::builder()
            .width(4)
            .charset("simple")
            .build()
            .unwrap();
        let converter = AsciiConverter::new(settings);
        let files = vec![a, bad.clone(), b];
        let report = run_batch(&files, input.path(), out.path(), &converter, Some(2)).unwrap();

        assert_eq!(report.converted.len(), 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, bad);
        assert!(!report.is_success());
        assert!(report.summary().contains("broken.png"));

        let white = std::fs::read_to_string(out.path().join("b.txt")).unwrap();
        assert_eq!(white, "    \n    ");
        let black = std::fs::read_to_string(out.path().join("a.txt")).unwrap();
        assert_eq!(black, "@@@@\n@@@@");
    }

    #[test]
    fn html_mode_writes_html_files() {
        let input = tempfile::tempdir().unwrap();
        let out = input.path().join("nested/out");
        let a = input.path().join("pic.png");
        write_png(&a, 128);
        let settings = ConversionSettings::builder()
            .width(2)
            .color_mode(ColorMode::HtmlFg)
            .build()
            .unwrap();
        let report =
            run_batch(&[a], input.path(), &out, &AsciiConverter::new(settings), None).unwrap();
        assert!(report.is_success());
        let doc = std::fs::read_to_string(out.join("pic.html")).unwrap();
        assert!(doc.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn shared_stems_do_not_overwrite_each_other() {
        let input = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let sub = input.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        write_png(&input.path().join("cat.png"), 0);
        write_png(&sub.join("cat.png"), 255);
        write_png(&sub.join("cat.bmp"), 0);

        let settings = ConversionSettings::builder()
            .width(4)
            .charset("simple")
            .build()
            .unwrap();
        let files = gs_source::folder_batch::list_images(input.path(), true).unwrap();
        assert_eq!(files.len(), 3);
        let report = run_batch(
            &files,
            input.path(),
            out.path(),
            &AsciiConverter::new(settings),
            Some(2),
        )
        .unwrap();
        assert!(report.is_success(), "{}", report.summary());

        let outputs: HashSet<_> = report.converted.iter().map(|(_, o)| o.clone()).collect();
        assert_eq!(outputs.len(), 3);
        let read = |p: &str| std::fs::read_to_string(out.path().join(p)).unwrap();
        assert_eq!(read("cat.txt"), "@@@@\n@@@@");
        assert_eq!(read("sub/cat.png.txt"), "    \n    ");
        assert_eq!(read("sub/cat.bmp.txt"), "@@@@\n@@@@");
    }

    #[test]
    fn repeated_input_is_reported_not_overwritten() {
        let input = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let a = input.path().join("a.png");
        write_png(&a, 0);
        let settings = ConversionSettings::builder().width(2).build().unwrap();
        let files = vec![a.clone(), a];
        let report = run_batch(
            &files,
            input.path(),
            out.path(),
            &AsciiConverter::new(settings),
            None,
        )
        .unwrap();
        assert_eq!(report.converted.len(), 1);
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].1.contains("double"));
    }
}
