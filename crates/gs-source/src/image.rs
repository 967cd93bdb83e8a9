use std::path::{Path, PathBuf};

use gs_core::error::{CoreError, Result};
use gs_core::frame::RasterBuffer;
use image::{DynamicImage, ImageError, ImageReader};

/// Extensions image reconnues.
pub const IMAGE_EXTS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp", "tiff", "tif", "ico"];

/// True if the path carries a supported image extension.
///
/// # Example
/// ```
/// use gs_source::image::is_supported;
/// use std::path::Path;
/// assert!(is_supported(Path::new("photo.JPG")));
/// assert!(!is_supported(Path::new("notes.txt")));
/// ```
#[must_use]
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| IMAGE_EXTS.contains(&ext.to_ascii_lowercase().as_str()))
}

fn decode_error(path: &Path, err: ImageError) -> CoreError {
    match err {
        ImageError::IoError(source) => CoreError::Io {
            path: path.to_path_buf(),
            source,
        },
        other => CoreError::ImageDecode {
            path: path.to_path_buf(),
            source: Box::new(other),
        },
    }
}

/// Convert any decoded image to an RGB raster (alpha dropped).
#[must_use]
pub fn from_dynamic(img: &DynamicImage) -> RasterBuffer {
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    RasterBuffer {
        data: rgb.into_raw(),
        width,
        height,
    }
}

/// Load an image from disk into an RGB raster.
///
/// # Errors
/// `Io` if the file cannot be read, `ImageDecode` if the decoder rejects it.
///
/// # Example
/// ```no_run
/// use gs_source::image::load_raster;
/// use std::path::Path;
/// let raster = load_raster(Path::new("photo.png")).unwrap();
/// ```
pub fn load_raster(path: &Path) -> Result<RasterBuffer> {
    let img = image::open(path).map_err(|e| decode_error(path, e))?;
    let raster = from_dynamic(&img);
    log::debug!(
        "Image chargée : {} ({}×{})",
        path.display(),
        raster.width,
        raster.height
    );
    Ok(raster)
}

/// Basic facts about an image file, read from its header.
#[derive(Clone, Debug)]
pub struct ImageInfo {
    pub path: PathBuf,
    /// Detected container format, e.g. "Png".
    pub format: Option<String>,
    pub width: u32,
    pub height: u32,
    /// Size on disk in bytes.
    pub file_size: u64,
}

/// Read format and dimensions without decoding pixels.
///
/// # Errors
/// `Io` if the file cannot be opened, `ImageDecode` if the header is unreadable.
pub fn probe(path: &Path) -> Result<ImageInfo> {
    let io_err = |source| CoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file_size = std::fs::metadata(path).map_err(io_err)?.len();
    let reader = ImageReader::open(path)
        .and_then(ImageReader::with_guessed_format)
        .map_err(io_err)?;
    let format = reader.format().map(|f| format!("{f:?}"));
    let (width, height) = reader.into_dimensions().map_err(|e| decode_error(path, e))?;
    Ok(ImageInfo {
        path: path.to_path_buf(),
        format,
        width,
        height,
        file_size,
    })
}

/// Human-readable byte count.
///
/// # Example
/// ```
/// use gs_source::image::format_file_size;
/// assert_eq!(format_file_size(512), "512.0 B");
/// assert_eq!(format_file_size(2048), "2.0 KB");
/// ```
#[must_use]
pub fn format_file_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if size < 1024.0 {
            return format!("{size:.1} {unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.1} TB")
}
