//! Shared test utilities for the double-avatar test suite.
//!
//! Synthetic images only: nothing here reads fixtures from disk, so tests
//! stay hermetic and fast.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let src = gradient_rgba(40, 30);
//! let bytes = encode_png(&src);
//! assert_eq!(decode_bytes(&bytes).unwrap().width(), 40);
//! ```

use image::{ImageEncoder, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::Path;

// =========================================================================
// In-memory rasters
// =========================================================================

/// Opaque image with `x` in the red channel and `y` in the green channel.
pub fn gradient_rgba(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
    })
}

/// Image filled with a single color.
pub fn solid_rgba(width: u32, height: u32, color: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_pixel(width, height, color)
}

// =========================================================================
// Encoders
// =========================================================================

/// Encode a raster as PNG bytes.
pub fn encode_png(img: &RgbaImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    image::codecs::png::PngEncoder::new(Cursor::new(&mut bytes))
        .write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgba8,
        )
        .unwrap();
    bytes
}

/// Encode an RGB gradient of the given size as JPEG bytes.
pub fn encode_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut bytes = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(Cursor::new(&mut bytes))
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    bytes
}

// =========================================================================
// Files
// =========================================================================

/// Create a small valid JPEG file with the given dimensions.
pub fn write_test_jpeg(path: &Path, width: u32, height: u32) {
    std::fs::write(path, encode_jpeg(width, height)).unwrap();
}

/// Create a small valid PNG file from a raster.
pub fn write_test_png(path: &Path, img: &RgbaImage) {
    std::fs::write(path, encode_png(img)).unwrap();
}
