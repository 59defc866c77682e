//! Drawables and their rasterization into bitmaps.
//!
//! A [`Drawable`] is anything that can paint itself into a rectangular
//! canvas. Some drawables already *are* a bitmap ([`BitmapDrawable`]); others
//! only know how to paint ([`ColorDrawable`], [`OvalDrawable`]).
//! [`to_bitmap`] turns any of them into an [`RgbaImage`], borrowing when a
//! bitmap is already there.
//!
//! ```
//! use double_avatar::drawable::{ColorDrawable, to_bitmap};
//! use image::Rgba;
//!
//! // No intrinsic size: rendered as a single pixel
//! let drawable = ColorDrawable::new(Rgba([255, 0, 0, 255]));
//! let bitmap = to_bitmap(&drawable);
//! assert_eq!(bitmap.dimensions(), (1, 1));
//! ```

use crate::imaging::calculations::{Ellipse, apply_coverage};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use std::borrow::Cow;

/// Something that can paint itself into a canvas.
pub trait Drawable {
    /// Natural size in pixels, or `None` when the drawable has no size of
    /// its own (e.g. a flat color).
    fn intrinsic_size(&self) -> Option<(u32, u32)>;

    /// Paint into `canvas`, filling its full bounds.
    fn draw(&self, canvas: &mut RgbaImage);

    /// The backing bitmap, for drawables that hold one.
    fn as_bitmap(&self) -> Option<&RgbaImage> {
        None
    }
}

/// Rasterize a drawable.
///
/// A drawable that holds a bitmap is returned borrowed. Otherwise a
/// transparent canvas of the intrinsic size is allocated (1×1 when the
/// drawable has no usable size) and the drawable paints into it.
pub fn to_bitmap(drawable: &dyn Drawable) -> Cow<'_, RgbaImage> {
    if let Some(bitmap) = drawable.as_bitmap() {
        return Cow::Borrowed(bitmap);
    }

    let (width, height) = match drawable.intrinsic_size() {
        Some((w, h)) if w > 0 && h > 0 => (w, h),
        _ => (1, 1),
    };
    let mut canvas = RgbaImage::new(width, height);
    drawable.draw(&mut canvas);
    Cow::Owned(canvas)
}

/// A drawable wrapping an optional bitmap.
///
/// An empty `BitmapDrawable` has no intrinsic size and paints nothing.
#[derive(Debug, Clone, Default)]
pub struct BitmapDrawable {
    bitmap: Option<RgbaImage>,
}

impl BitmapDrawable {
    pub fn new(bitmap: RgbaImage) -> Self {
        Self {
            bitmap: Some(bitmap),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

impl Drawable for BitmapDrawable {
    fn intrinsic_size(&self) -> Option<(u32, u32)> {
        self.bitmap.as_ref().map(|b| b.dimensions())
    }

    fn draw(&self, canvas: &mut RgbaImage) {
        let Some(bitmap) = &self.bitmap else {
            return;
        };
        if bitmap.dimensions() == canvas.dimensions() {
            imageops::overlay(canvas, bitmap, 0, 0);
        } else {
            let scaled = imageops::resize(
                bitmap,
                canvas.width(),
                canvas.height(),
                FilterType::Triangle,
            );
            imageops::overlay(canvas, &scaled, 0, 0);
        }
    }

    fn as_bitmap(&self) -> Option<&RgbaImage> {
        self.bitmap.as_ref()
    }
}

/// A flat color filling whatever bounds it is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorDrawable {
    pub color: Rgba<u8>,
}

impl ColorDrawable {
    pub fn new(color: Rgba<u8>) -> Self {
        Self { color }
    }
}

impl Drawable for ColorDrawable {
    fn intrinsic_size(&self) -> Option<(u32, u32)> {
        None
    }

    fn draw(&self, canvas: &mut RgbaImage) {
        for px in canvas.pixels_mut() {
            *px = self.color;
        }
    }
}

/// A filled ellipse inscribed in its bounds, edge anti-aliased.
///
/// Useful as an avatar placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OvalDrawable {
    pub color: Rgba<u8>,
    pub width: u32,
    pub height: u32,
}

impl OvalDrawable {
    pub fn circle(color: Rgba<u8>, diameter: u32) -> Self {
        Self {
            color,
            width: diameter,
            height: diameter,
        }
    }
}

impl Drawable for OvalDrawable {
    fn intrinsic_size(&self) -> Option<(u32, u32)> {
        Some((self.width, self.height))
    }

    fn draw(&self, canvas: &mut RgbaImage) {
        let oval = Ellipse::inscribed_rect(canvas.width(), canvas.height());
        for (x, y, px) in canvas.enumerate_pixels_mut() {
            let coverage = oval.coverage(x, y, true);
            if coverage > 0.0 {
                let mut color = self.color;
                color[3] = apply_coverage(color[3], coverage);
                *px = color;
            }
        }
    }
}
