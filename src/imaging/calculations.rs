//! Pure geometry functions for cropping and masking.
//!
//! All functions here are pure and testable without any I/O or images.

/// Sub-pixel samples per axis used for anti-aliased coverage (4×4 = 16 levels).
const SAMPLES_PER_AXIS: u32 = 4;

/// A rectangular region inside a source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Calculate the centered square region of an image.
///
/// The side is the shorter edge. When the leftover on the longer edge is
/// odd, the extra pixel is left on the right/bottom.
///
/// # Arguments
/// * `width` - Source width in pixels
/// * `height` - Source height in pixels
///
/// # Returns
/// * The square crop region
///
/// # Examples
/// ```
/// # use double_avatar::imaging::calculations::{center_square_rect, CropRect};
/// assert_eq!(
///     center_square_rect(800, 600),
///     CropRect { x: 100, y: 0, width: 600, height: 600 }
/// );
/// ```
pub fn center_square_rect(width: u32, height: u32) -> CropRect {
    let side = width.min(height);
    CropRect {
        x: (width - side) / 2,
        y: (height - side) / 2,
        width: side,
        height: side,
    }
}

/// An axis-aligned ellipse in pixel space.
///
/// Pixel `(x, y)` covers the area `[x, x+1) × [y, y+1)`, so the inscribed
/// circle of a D×D square is centered at `(D/2, D/2)` with radius `D/2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    pub cx: f64,
    pub cy: f64,
    pub rx: f64,
    pub ry: f64,
}

impl Ellipse {
    pub fn circle(cx: f64, cy: f64, radius: f64) -> Self {
        Self {
            cx,
            cy,
            rx: radius,
            ry: radius,
        }
    }

    /// The circle inscribed in a `size`×`size` square at the origin.
    pub fn inscribed(size: u32) -> Self {
        let r = size as f64 / 2.0;
        Self::circle(r, r, r)
    }

    /// The ellipse inscribed in a `width`×`height` rectangle at the origin.
    pub fn inscribed_rect(width: u32, height: u32) -> Self {
        let rx = width as f64 / 2.0;
        let ry = height as f64 / 2.0;
        Self {
            cx: rx,
            cy: ry,
            rx,
            ry,
        }
    }

    /// Normalized squared distance: < 1 inside, 1 on the boundary, > 1 outside.
    fn norm_sq(&self, x: f64, y: f64) -> f64 {
        if self.rx <= 0.0 || self.ry <= 0.0 {
            return f64::INFINITY;
        }
        let dx = (x - self.cx) / self.rx;
        let dy = (y - self.cy) / self.ry;
        dx * dx + dy * dy
    }

    /// True when the ellipse center lies in the area of pixel `(px, py)`.
    fn center_in_pixel(&self, px: u32, py: u32) -> bool {
        let (x, y) = (px as f64, py as f64);
        self.rx > 0.0
            && self.ry > 0.0
            && (x..x + 1.0).contains(&self.cx)
            && (y..y + 1.0).contains(&self.cy)
    }

    /// Fraction of pixel `(px, py)` covered by the ellipse, in `0.0..=1.0`.
    ///
    /// With `antialias`, a 4×4 grid of interior sample points is tested
    /// against the open ellipse, so a pixel whose area does not meet the
    /// ellipse always yields 0. Without it, the pixel is fully in when its
    /// center lies inside or on the boundary.
    ///
    /// The pixel holding the ellipse center is always fully covered, even
    /// when the ellipse is smaller than the sample grid.
    pub fn coverage(&self, px: u32, py: u32, antialias: bool) -> f32 {
        if self.center_in_pixel(px, py) {
            return 1.0;
        }
        if !antialias {
            let inside = self.norm_sq(px as f64 + 0.5, py as f64 + 0.5) <= 1.0;
            return if inside { 1.0 } else { 0.0 };
        }

        let step = 1.0 / SAMPLES_PER_AXIS as f64;
        let mut hits = 0u32;
        for sy in 0..SAMPLES_PER_AXIS {
            for sx in 0..SAMPLES_PER_AXIS {
                let x = px as f64 + (sx as f64 + 0.5) * step;
                let y = py as f64 + (sy as f64 + 0.5) * step;
                if self.norm_sq(x, y) < 1.0 {
                    hits += 1;
                }
            }
        }
        hits as f32 / (SAMPLES_PER_AXIS * SAMPLES_PER_AXIS) as f32
    }
}

/// Scale an 8-bit alpha value by a coverage fraction.
pub fn apply_coverage(alpha: u8, coverage: f32) -> u8 {
    (alpha as f32 * coverage.clamp(0.0, 1.0)).round() as u8
}

/// How many pixels two avatars of `diameter` share horizontally.
///
/// `overlap` is a fraction of the diameter and must already be validated
/// to lie in `[0, 1)`.
pub fn overlap_pixels(diameter: u32, overlap: f32) -> u32 {
    let px = (diameter as f64 * overlap as f64).round() as u32;
    // Keep at least one column of the back avatar visible.
    px.min(diameter.saturating_sub(1))
}

/// Canvas dimensions for two overlapping avatars.
///
/// # Returns
/// * `(width, height)` - `2D - overlap_px` wide, `D` tall
pub fn double_avatar_canvas(diameter: u32, overlap_px: u32) -> (u32, u32) {
    (diameter * 2 - overlap_px, diameter)
}
