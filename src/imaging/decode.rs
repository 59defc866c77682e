//! Decoding encoded images from memory and disk.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode bytes | `image::load_from_memory` |
//! | Sniff format | `image::guess_format` |
//! | Load file | `image::ImageReader` with guessed format |
//! | Identify | `image::image_dimensions` (header only) |

use super::error::{Dimensions, ImagingError, Result};
use image::{DynamicImage, ImageFormat, ImageReader};
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

/// Extensions whose decoders may be compiled in.
const INPUT_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    INPUT_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Whether `path` has one of the [`supported_input_extensions`].
pub fn is_supported_input(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .is_some_and(|e| supported_input_extensions().contains(&e.as_str()))
}

/// Guess the container format from magic bytes.
pub fn sniff_format(bytes: &[u8]) -> Option<ImageFormat> {
    image::guess_format(bytes).ok()
}

/// Decode an in-memory encoded image.
///
/// Empty input and data no compiled-in decoder accepts both come back as
/// [`ImagingError::Decode`].
pub fn decode_bytes(bytes: &[u8]) -> Result<DynamicImage> {
    if bytes.is_empty() {
        return Err(ImagingError::Decode("empty input".into()));
    }
    let img = image::load_from_memory(bytes).map_err(|e| ImagingError::Decode(e.to_string()))?;
    debug!(
        width = img.width(),
        height = img.height(),
        len = bytes.len(),
        "decoded image bytes"
    );
    Ok(img)
}

/// Load and decode an image from disk, sniffing the format from content.
pub fn load_file(path: &Path) -> Result<DynamicImage> {
    ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| ImagingError::Decode(format!("{}: {}", path.display(), e)))
}

/// Read image dimensions from the file header without decoding pixels.
pub fn identify(path: &Path) -> Result<Dimensions> {
    let (width, height) = image::image_dimensions(path).map_err(|e| match e {
        image::ImageError::IoError(io) => ImagingError::Io(io),
        other => ImagingError::Decode(format!("{}: {}", path.display(), other)),
    })?;
    Ok(Dimensions { width, height })
}
