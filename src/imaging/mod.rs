//! Image processing in pure Rust, built on the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::load_from_memory`, `ImageReader` |
//! | **Identify** | `image::image_dimensions` |
//! | **Circle crop** | `resize_exact` (nearest) + sub-pixel coverage mask |
//! | **Center crop** | `DynamicImage::crop_imm` |
//! | **Double avatar** | two circle crops + `imageops::overlay` |
//! | **Save** | PNG / lossless WebP / TIFF encoders |
//!
//! The module is split into:
//! - **Calculations**: Pure geometry (unit testable)
//! - **Parameters**: Validated descriptions of an operation
//! - **Decode**: Bytes and files to [`image::DynamicImage`]
//! - **Operations**: Pixel work combining calculations and parameters

pub mod calculations;
pub mod decode;
mod error;
pub mod operations;
mod params;

pub use decode::{decode_bytes, identify, load_file, sniff_format, supported_input_extensions};
pub use error::{Dimensions, ImagingError, Result};
pub use operations::{circle_crop, circle_crop_to, compose_double_avatar, crop_center, save_image};
pub use params::{CircleCropParams, Diameter, DoubleAvatarParams, MAX_DIAMETER, parse_hex_color};
