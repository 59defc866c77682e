//! Error and shared result types for imaging operations.

use super::params::MAX_DIAMETER;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImagingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unsupported or corrupt image data: {0}")]
    Decode(String),
    #[error("Invalid dimension {0}: size must be between 1 and {max}", max = MAX_DIAMETER)]
    InvalidDimension(i64),
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Source image has zero width or height")]
    EmptyImage,
    #[error("Unsupported output format: {0}")]
    UnsupportedOutput(String),
    #[error("Encoding failed: {0}")]
    Encode(String),
}

/// Result type for imaging operations.
pub type Result<T> = std::result::Result<T, ImagingError>;

/// Width and height of a raster, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
