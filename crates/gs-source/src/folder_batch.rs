use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use gs_core::error::{CoreError, Result};

use crate::image::is_supported;

/// Liste les images d'un dossier, triées par chemin.
///
/// With `recursive`, sub-directories are walked as well.
///
/// # Errors
/// `Io` if `dir` (or a sub-directory) cannot be read.
pub fn list_images(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    scan_dir(dir, recursive, &mut files)?;
    files.sort();
    log::info!("{} image(s) trouvée(s) dans {}", files.len(), dir.display());
    Ok(files)
}

fn scan_dir(dir: &Path, recursive: bool, files: &mut Vec<PathBuf>) -> Result<()> {
    let io_err = |source| CoreError::Io {
        path: dir.to_path_buf(),
        source,
    };
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_dir() {
            if recursive {
                scan_dir(&path, recursive, files)?;
            }
        } else if is_supported(&path) {
            files.push(path);
        }
    }
    Ok(())
}

/// Output path for `input` inside `out_dir`.
///
/// The path relative to `root` is mirrored under `out_dir` (sub-directories
/// included) and the extension replaced. Inputs outside `root` keep only
/// their file name.
///
/// # Example
/// ```
/// use gs_source::folder_batch::output_path;
/// use std::path::Path;
/// let p = output_path(Path::new("in/sub/cat.png"), Path::new("in"), Path::new("out"), "txt");
/// assert_eq!(p, Path::new("out/sub/cat.txt"));
/// ```
#[must_use]
pub fn output_path(input: &Path, root: &Path, out_dir: &Path, extension: &str) -> PathBuf {
    let rel = input
        .strip_prefix(root)
        .ok()
        .filter(|r| !r.as_os_str().is_empty())
        .unwrap_or_else(|| input.file_name().map_or(input, Path::new));
    out_dir.join(rel).with_extension(extension)
}

/// Output paths for a whole batch, one per input, in order.
///
/// Inputs whose mirrored targets collide (`cat.png` / `cat.jpg`) keep their
/// source extension: `cat.png.txt`, `cat.jpg.txt`.
///
/// # Example
/// ```
/// use gs_source::folder_batch::plan_outputs;
/// use std::path::{Path, PathBuf};
/// let files = [PathBuf::from("in/cat.png"), PathBuf::from("in/cat.jpg"), PathBuf::from("in/dog.png")];
/// let out = plan_outputs(&files, Path::new("in"), Path::new("out"), "txt");
/// assert_eq!(out, [
///     PathBuf::from("out/cat.png.txt"),
///     PathBuf::from("out/cat.jpg.txt"),
///     PathBuf::from("out/dog.txt"),
/// ]);
/// ```
#[must_use]
pub fn plan_outputs(
    files: &[PathBuf],
    root: &Path,
    out_dir: &Path,
    extension: &str,
) -> Vec<PathBuf> {
    let mut targets: Vec<PathBuf> = files
        .iter()
        .map(|f| output_path(f, root, out_dir, extension))
        .collect();
    let mut counts: HashMap<PathBuf, usize> = HashMap::new();
    for t in &targets {
        *counts.entry(t.clone()).or_default() += 1;
    }
    for (target, input) in targets.iter_mut().zip(files) {
        let Some(src_ext) = input.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if counts.get(target).copied().unwrap_or(0) > 1 {
            log::debug!("Cible en double {}, extension source conservée", target.display());
            *target = target.with_extension(format!("{src_ext}.{extension}"));
        }
    }
    targets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("b.PNG"));
        touch(&dir.path().join("a.jpg"));
        touch(&dir.path().join("readme.md"));
        let files = list_images(dir.path(), false).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.jpg", "b.PNG"]);
    }

    #[test]
    fn recursion_is_opt_in() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        touch(&sub.join("deep.gif"));
        assert!(list_images(dir.path(), false).unwrap().is_empty());
        assert_eq!(list_images(dir.path(), true).unwrap().len(), 1);
    }

    #[test]
    fn missing_dir_errors() {
        assert!(matches!(
            list_images(Path::new("/no/such/dir"), false),
            Err(CoreError::Io { .. })
        ));
    }

    #[test]
    fn output_mirrors_sub_directories() {
        let root = Path::new("/data/in");
        let out = Path::new("/data/out");
        assert_eq!(
            output_path(&root.join("sub/cat.png"), root, out, "html"),
            Path::new("/data/out/sub/cat.html")
        );
        assert_eq!(
            output_path(Path::new("/elsewhere/dog.gif"), root, out, "txt"),
            Path::new("/data/out/dog.txt")
        );
    }

    #[test]
    fn shared_stems_get_distinct_targets() {
        let root = Path::new("in");
        let files = [
            root.join("cat.png"),
            root.join("sub/cat.png"),
            root.join("sub/cat.jpg"),
        ];
        let targets = plan_outputs(&files, root, Path::new("out"), "txt");
        assert_eq!(
            targets,
            [
                PathBuf::from("out/cat.txt"),
                PathBuf::from("out/sub/cat.png.txt"),
                PathBuf::from("out/sub/cat.jpg.txt"),
            ]
        );
    }
}
