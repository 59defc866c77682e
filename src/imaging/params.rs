//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. Validation
//! happens on construction, so the pixel code in
//! [`operations`](super::operations) never sees a bad size.
//!
//! ## Types
//!
//! - [`Diameter`]: output side of a circular avatar, in `1..=MAX_DIAMETER`.
//! - [`CircleCropParams`]: diameter plus anti-aliasing switch.
//! - [`DoubleAvatarParams`]: diameter, overlap fraction, separating border.

use super::error::{ImagingError, Result};
use image::Rgba;

/// Largest accepted avatar side. A 16384×16384 RGBA buffer is 1 GiB, and
/// a double avatar at this size is still well inside `u32` widths.
pub const MAX_DIAMETER: u32 = 16_384;

/// Side length of a square avatar, in pixels. Always in `1..=MAX_DIAMETER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Diameter(u32);

impl Diameter {
    /// Validate a requested size.
    ///
    /// Takes a signed value so callers can hand over untrusted input
    /// (CLI arguments, config values) and get a descriptive error for
    /// zero, negative or oversized values instead of a wrapped-around
    /// `u32` or an allocation failure.
    pub fn new(value: i64) -> Result<Self> {
        if value <= 0 || value > MAX_DIAMETER as i64 {
            return Err(ImagingError::InvalidDimension(value));
        }
        Ok(Self(value as u32))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for Diameter {
    type Error = ImagingError;

    fn try_from(value: u32) -> Result<Self> {
        Self::new(value as i64)
    }
}

/// Parameters for a circular crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircleCropParams {
    pub diameter: Diameter,
    /// Blend the circle edge over sub-pixel samples instead of a hard cut.
    pub antialias: bool,
}

impl CircleCropParams {
    pub fn new(diameter: Diameter) -> Self {
        Self {
            diameter,
            antialias: true,
        }
    }
}

/// Parameters for composing two overlapping circular avatars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoubleAvatarParams {
    pub diameter: Diameter,
    /// Fraction of the diameter the two avatars share, in `[0, 1)`.
    pub overlap: f32,
    /// Width of the ring painted around the front avatar.
    pub border_width: u32,
    /// Ring color. Painted as a replacement, so a transparent color cuts a gap.
    pub border_color: Rgba<u8>,
    pub antialias: bool,
}

impl DoubleAvatarParams {
    pub fn new(diameter: Diameter) -> Self {
        Self {
            diameter,
            overlap: 0.3,
            border_width: 4,
            border_color: Rgba([255, 255, 255, 255]),
            antialias: true,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.overlap) {
            return Err(ImagingError::InvalidParameter(format!(
                "overlap must be in [0, 1), got {}",
                self.overlap
            )));
        }
        if self.border_width >= self.diameter.get() {
            return Err(ImagingError::InvalidParameter(format!(
                "border_width {} must be smaller than the diameter {}",
                self.border_width,
                self.diameter.get()
            )));
        }
        Ok(())
    }
}

/// Parse `#rrggbb` or `#rrggbbaa` into an RGBA color.
pub fn parse_hex_color(value: &str) -> Result<Rgba<u8>> {
    let invalid = || ImagingError::InvalidParameter(format!("invalid color '{value}'"));

    let hex = value.strip_prefix('#').ok_or_else(invalid)?;
    if !matches!(hex.len(), 6 | 8) || !hex.is_ascii() {
        return Err(invalid());
    }

    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
    let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
    Ok(Rgba([channel(0)?, channel(2)?, channel(4)?, alpha]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diameter_rejects_zero_and_negative() {
        assert!(matches!(
            Diameter::new(0),
            Err(ImagingError::InvalidDimension(0))
        ));
        assert!(matches!(
            Diameter::new(-12),
            Err(ImagingError::InvalidDimension(-12))
        ));
    }

    #[test]
    fn diameter_rejects_oversized() {
        for big in [MAX_DIAMETER as i64 + 1, 4_000_000_000, u32::MAX as i64 + 1] {
            assert!(matches!(
                Diameter::new(big),
                Err(ImagingError::InvalidDimension(v)) if v == big
            ));
        }
        assert!(Diameter::try_from(u32::MAX).is_err());
    }

    #[test]
    fn diameter_accepts_maximum() {
        assert_eq!(Diameter::new(MAX_DIAMETER as i64).unwrap().get(), MAX_DIAMETER);
    }

    #[test]
    fn diameter_accepts_positive() {
        assert_eq!(Diameter::new(1).unwrap().get(), 1);
        assert_eq!(Diameter::try_from(256u32).unwrap().get(), 256);
    }

    #[test]
    fn circle_params_default_to_antialias() {
        let params = CircleCropParams::new(Diameter::new(10).unwrap());
        assert!(params.antialias);
    }

    #[test]
    fn double_params_defaults_validate() {
        let params = DoubleAvatarParams::new(Diameter::new(128).unwrap());
        assert!(params.validate().is_ok());
        assert_eq!(params.overlap, 0.3);
    }

    #[test]
    fn double_params_reject_out_of_range_overlap() {
        let mut params = DoubleAvatarParams::new(Diameter::new(128).unwrap());
        params.overlap = 1.0;
        assert!(params.validate().is_err());
        params.overlap = -0.1;
        assert!(params.validate().is_err());
        params.overlap = f32::NAN;
        assert!(params.validate().is_err());
    }

    #[test]
    fn double_params_reject_oversized_border() {
        let mut params = DoubleAvatarParams::new(Diameter::new(8).unwrap());
        params.border_width = 8;
        assert!(params.validate().is_err());
    }

    #[test]
    fn parse_hex_color_rgb_and_rgba() {
        assert_eq!(parse_hex_color("#ff8000").unwrap(), Rgba([255, 128, 0, 255]));
        assert_eq!(parse_hex_color("#00000000").unwrap(), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn parse_hex_color_rejects_garbage() {
        for bad in ["ff8000", "#ff80", "#gg0000", "#ff80000", "", "#ééé"] {
            assert!(parse_hex_color(bad).is_err(), "accepted {bad:?}");
        }
    }
}
