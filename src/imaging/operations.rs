//! High-level image operations.
//!
//! These functions combine the geometry in [`calculations`](super::calculations)
//! with pixel work on `image` buffers. Every operation returns a freshly
//! allocated RGBA raster owned by the caller.

use super::calculations::{
    Ellipse, apply_coverage, center_square_rect, double_avatar_canvas, overlap_pixels,
};
use super::error::{ImagingError, Result};
use super::params::{CircleCropParams, Diameter, DoubleAvatarParams};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::path::Path;
use tracing::debug;

/// Cut the inscribed circle out of an image.
///
/// The source is scaled to D×D ignoring its aspect ratio (nearest
/// neighbour, no filtering), then every pixel's alpha is multiplied by its
/// coverage of the circle. Pixels outside the circle end up fully
/// transparent; color channels are left as scaled.
pub fn circle_crop(img: &DynamicImage, params: &CircleCropParams) -> RgbaImage {
    let d = params.diameter.get();
    let mut out = img.resize_exact(d, d, FilterType::Nearest).into_rgba8();
    mask_inscribed_circle(&mut out, params.antialias);

    debug!(
        source_width = img.width(),
        source_height = img.height(),
        diameter = d,
        antialias = params.antialias,
        "circle crop"
    );
    out
}

/// [`circle_crop`] with an unchecked size and default anti-aliasing.
///
/// Fails with [`ImagingError::InvalidDimension`] when `size` is not positive.
pub fn circle_crop_to(img: &DynamicImage, size: i64) -> Result<RgbaImage> {
    let params = CircleCropParams::new(Diameter::new(size)?);
    Ok(circle_crop(img, &params))
}

/// Apply the inscribed-circle mask of a square buffer in place.
fn mask_inscribed_circle(buf: &mut RgbaImage, antialias: bool) {
    let circle = Ellipse::inscribed(buf.width());
    for (x, y, px) in buf.enumerate_pixels_mut() {
        let coverage = circle.coverage(x, y, antialias);
        px[3] = apply_coverage(px[3], coverage);
    }
}

/// Cut the centered square out of an image, side `min(width, height)`.
pub fn crop_center(img: &DynamicImage) -> Result<RgbaImage> {
    let (w, h) = (img.width(), img.height());
    if w == 0 || h == 0 {
        return Err(ImagingError::EmptyImage);
    }
    let rect = center_square_rect(w, h);
    let square = img.crop_imm(rect.x, rect.y, rect.width, rect.height);

    debug!(width = w, height = h, side = rect.width, "center crop");
    Ok(square.into_rgba8())
}

/// Compose two circular avatars side by side, the front one overlapping the back one.
///
/// The front avatar sits at the left edge. The back avatar is shifted right
/// by `D - overlap_px`. A ring of `border_width` around the front avatar is
/// painted with `border_color` before the front avatar is drawn on top.
pub fn compose_double_avatar(
    front: &DynamicImage,
    back: &DynamicImage,
    params: &DoubleAvatarParams,
) -> Result<RgbaImage> {
    params.validate()?;

    let d = params.diameter.get();
    let crop = CircleCropParams {
        diameter: params.diameter,
        antialias: params.antialias,
    };
    let overlap_px = overlap_pixels(d, params.overlap);
    let (width, height) = double_avatar_canvas(d, overlap_px);
    let back_x = d - overlap_px;

    let mut canvas = RgbaImage::new(width, height);
    imageops::overlay(&mut canvas, &circle_crop(back, &crop), back_x as i64, 0);

    if params.border_width > 0 {
        let r = d as f64 / 2.0;
        let ring = Ellipse::circle(r, r, r + params.border_width as f64);
        paint_replace(&mut canvas, &ring, params.border_color, params.antialias);
    }

    imageops::overlay(&mut canvas, &circle_crop(front, &crop), 0, 0);

    debug!(
        diameter = d,
        overlap_px,
        border_width = params.border_width,
        width,
        height,
        "double avatar"
    );
    Ok(canvas)
}

/// Paint `color` into the pixels covered by `shape`, replacing what is there.
///
/// Partially covered pixels are interpolated between the existing value
/// and `color` on all four channels.
fn paint_replace(canvas: &mut RgbaImage, shape: &Ellipse, color: Rgba<u8>, antialias: bool) {
    let x_end = ((shape.cx + shape.rx).ceil() as u32).min(canvas.width());
    let y_end = ((shape.cy + shape.ry).ceil() as u32).min(canvas.height());
    let x_start = (shape.cx - shape.rx).floor().max(0.0) as u32;
    let y_start = (shape.cy - shape.ry).floor().max(0.0) as u32;

    for y in y_start..y_end {
        for x in x_start..x_end {
            let coverage = shape.coverage(x, y, antialias);
            if coverage == 0.0 {
                continue;
            }
            let px = canvas.get_pixel_mut(x, y);
            for c in 0..4 {
                let old = px[c] as f32;
                let new = color[c] as f32;
                px[c] = (old + (new - old) * coverage).round() as u8;
            }
        }
    }
}

/// Save a raster to `path`, choosing the encoder from the extension.
///
/// Only formats that keep the alpha channel are accepted: PNG, WebP
/// (lossless) and TIFF.
pub fn save_image(img: &RgbaImage, path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let format = match ext.as_str() {
        "png" => ImageFormat::Png,
        "webp" => ImageFormat::WebP,
        "tif" | "tiff" => ImageFormat::Tiff,
        other => return Err(ImagingError::UnsupportedOutput(other.to_string())),
    };

    img.save_with_format(path, format).map_err(|e| match e {
        image::ImageError::IoError(io) => ImagingError::Io(io),
        other => ImagingError::Encode(format!("{}: {}", path.display(), other)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{gradient_rgba, solid_rgba};

    fn opaque_red(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(solid_rgba(w, h, Rgba([255, 0, 0, 255])))
    }

    /// True when the pixel square `[x, x+1) × [y, y+1)` does not meet the
    /// open inscribed disk of a `d`×`d` square.
    fn strictly_outside(x: u32, y: u32, d: u32) -> bool {
        let r = d as f64 / 2.0;
        let nearest_x = r.clamp(x as f64, x as f64 + 1.0);
        let nearest_y = r.clamp(y as f64, y as f64 + 1.0);
        let dx = nearest_x - r;
        let dy = nearest_y - r;
        dx * dx + dy * dy >= r * r
    }

    // =========================================================================
    // circle_crop tests
    // =========================================================================

    #[test]
    fn circle_crop_output_is_d_by_d() {
        let src = DynamicImage::ImageRgba8(gradient_rgba(120, 80));
        for d in [1, 2, 3, 17, 64, 101] {
            let out = circle_crop_to(&src, d).unwrap();
            assert_eq!(out.dimensions(), (d as u32, d as u32));
        }
    }

    #[test]
    fn circle_crop_outside_pixels_transparent() {
        let src = opaque_red(50, 70);
        for antialias in [true, false] {
            for d in [1u32, 2, 5, 16, 33] {
                let params = CircleCropParams {
                    diameter: Diameter::try_from(d).unwrap(),
                    antialias,
                };
                let out = circle_crop(&src, &params);
                for (x, y, px) in out.enumerate_pixels() {
                    if strictly_outside(x, y, d) {
                        assert_eq!(px[3], 0, "d={d} aa={antialias} pixel ({x}, {y})");
                    }
                }
            }
        }
    }

    #[test]
    fn circle_crop_center_opaque() {
        let src = opaque_red(40, 40);
        for d in [1u32, 2, 3, 4, 9, 64, 255] {
            let out = circle_crop_to(&src, d as i64).unwrap();
            assert_eq!(out.get_pixel(d / 2, d / 2)[3], 255, "d={d}");
        }
    }

    #[test]
    fn circle_crop_center_opaque_aliased_any_size() {
        let src = opaque_red(40, 40);
        for d in [1u32, 2, 3, 10] {
            let params = CircleCropParams {
                diameter: Diameter::try_from(d).unwrap(),
                antialias: false,
            };
            let out = circle_crop(&src, &params);
            assert_eq!(out.get_pixel(d / 2, d / 2)[3], 255, "d={d}");
        }
    }

    #[test]
    fn circle_crop_keeps_source_color_inside() {
        let out = circle_crop_to(&opaque_red(10, 10), 20).unwrap();
        assert_eq!(*out.get_pixel(10, 10), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn circle_crop_antialiased_edge_has_partial_alpha() {
        let out = circle_crop_to(&opaque_red(64, 64), 64).unwrap();
        assert!(out.pixels().any(|p| p[3] > 0 && p[3] < 255));
    }

    #[test]
    fn circle_crop_aliased_alpha_is_binary() {
        let params = CircleCropParams {
            diameter: Diameter::new(64).unwrap(),
            antialias: false,
        };
        let out = circle_crop(&opaque_red(64, 64), &params);
        assert!(out.pixels().all(|p| p[3] == 0 || p[3] == 255));
    }

    #[test]
    fn circle_crop_preserves_source_transparency() {
        let src = DynamicImage::ImageRgba8(solid_rgba(8, 8, Rgba([0, 0, 255, 128])));
        let out = circle_crop_to(&src, 16).unwrap();
        assert_eq!(out.get_pixel(8, 8)[3], 128);
    }

    #[test]
    fn circle_crop_ignores_aspect_ratio() {
        // Left half black, right half white, in a wide source. After an
        // exact 2:1 squash the split stays in the middle column.
        let src = RgbaImage::from_fn(200, 50, |x, _| {
            if x < 100 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        });
        let out = circle_crop_to(&DynamicImage::ImageRgba8(src), 20).unwrap();
        assert_eq!(out.get_pixel(5, 10)[0], 0);
        assert_eq!(out.get_pixel(14, 10)[0], 255);
    }

    #[test]
    fn circle_crop_to_rejects_non_positive() {
        let src = opaque_red(4, 4);
        assert!(matches!(
            circle_crop_to(&src, 0),
            Err(ImagingError::InvalidDimension(0))
        ));
        assert!(matches!(
            circle_crop_to(&src, -5),
            Err(ImagingError::InvalidDimension(-5))
        ));
    }

    // =========================================================================
    // crop_center tests
    // =========================================================================

    #[test]
    fn crop_center_is_square_of_short_edge() {
        for (w, h) in [(800, 600), (300, 500), (64, 64), (1, 9)] {
            let out = crop_center(&DynamicImage::ImageRgba8(gradient_rgba(w, h))).unwrap();
            let side = w.min(h);
            assert_eq!(out.dimensions(), (side, side), "source {w}x{h}");
        }
    }

    #[test]
    fn crop_center_takes_middle_pixels() {
        // gradient_rgba encodes x in red, y in green
        let src = DynamicImage::ImageRgba8(gradient_rgba(100, 60));
        let out = crop_center(&src).unwrap();
        assert_eq!(out.get_pixel(0, 0)[0], 20);
        assert_eq!(out.get_pixel(0, 0)[1], 0);
    }

    #[test]
    fn crop_center_empty_source_errors() {
        let src = DynamicImage::ImageRgba8(RgbaImage::new(0, 10));
        assert!(matches!(crop_center(&src), Err(ImagingError::EmptyImage)));
    }

    // =========================================================================
    // compose_double_avatar tests
    // =========================================================================

    fn double_params(d: i64, overlap: f32, border: u32, color: Rgba<u8>) -> DoubleAvatarParams {
        DoubleAvatarParams {
            diameter: Diameter::new(d).unwrap(),
            overlap,
            border_width: border,
            border_color: color,
            antialias: true,
        }
    }

    #[test]
    fn double_avatar_canvas_size() {
        let params = double_params(100, 0.3, 4, Rgba([255, 255, 255, 255]));
        let out = compose_double_avatar(&opaque_red(10, 10), &opaque_red(10, 10), &params).unwrap();
        assert_eq!(out.dimensions(), (170, 100));
    }

    #[test]
    fn double_avatar_front_over_back() {
        let front = opaque_red(10, 10);
        let back = DynamicImage::ImageRgba8(solid_rgba(10, 10, Rgba([0, 0, 255, 255])));
        let params = double_params(100, 0.5, 0, Rgba([0, 0, 0, 0]));
        let out = compose_double_avatar(&front, &back, &params).unwrap();

        assert_eq!(out.dimensions(), (150, 100));
        // Inside both circles: front wins
        assert_eq!(*out.get_pixel(70, 50), Rgba([255, 0, 0, 255]));
        // Back only
        assert_eq!(*out.get_pixel(130, 50), Rgba([0, 0, 255, 255]));
        // Outside both
        assert_eq!(out.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn double_avatar_transparent_border_cuts_gap() {
        let front = opaque_red(10, 10);
        let back = DynamicImage::ImageRgba8(solid_rgba(10, 10, Rgba([0, 0, 255, 255])));
        let params = double_params(100, 0.5, 6, Rgba([0, 0, 0, 0]));
        let out = compose_double_avatar(&front, &back, &params).unwrap();

        // 53.5px from the front center: past the front avatar, inside the ring
        assert_eq!(out.get_pixel(103, 50)[3], 0);
        assert_eq!(*out.get_pixel(130, 50), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn double_avatar_colored_border() {
        let front = opaque_red(10, 10);
        let back = DynamicImage::ImageRgba8(solid_rgba(10, 10, Rgba([0, 0, 255, 255])));
        let params = double_params(100, 0.5, 6, Rgba([0, 255, 0, 255]));
        let out = compose_double_avatar(&front, &back, &params).unwrap();

        assert_eq!(*out.get_pixel(103, 50), Rgba([0, 255, 0, 255]));
    }

    #[test]
    fn double_avatar_rejects_bad_overlap() {
        let params = double_params(100, 1.5, 4, Rgba([0, 0, 0, 0]));
        let result = compose_double_avatar(&opaque_red(2, 2), &opaque_red(2, 2), &params);
        assert!(matches!(result, Err(ImagingError::InvalidParameter(_))));
    }

    // =========================================================================
    // save_image tests
    // =========================================================================

    #[test]
    fn save_png_roundtrips_alpha() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("avatar.png");
        let out = circle_crop_to(&opaque_red(32, 32), 32).unwrap();
        save_image(&out, &path).unwrap();

        let reloaded = image::open(&path).unwrap().into_rgba8();
        assert_eq!(reloaded.dimensions(), (32, 32));
        assert_eq!(reloaded.get_pixel(0, 0)[3], 0);
        assert_eq!(reloaded.get_pixel(16, 16)[3], 255);
    }

    #[test]
    fn save_webp_writes_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("avatar.webp");
        save_image(&solid_rgba(8, 8, Rgba([1, 2, 3, 4])), &path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn save_jpeg_is_unsupported() {
        let tmp = tempfile::TempDir::new().unwrap();
        let result = save_image(&solid_rgba(8, 8, Rgba([0; 4])), &tmp.path().join("a.jpg"));
        assert!(matches!(result, Err(ImagingError::UnsupportedOutput(ext)) if ext == "jpg"));
    }
}
