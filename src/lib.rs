//! # double-avatar
//!
//! Small raster utilities around circular avatars: decode image bytes, cut
//! the inscribed circle out of a picture, take its centered square, compose
//! two overlapping avatars into one "double avatar", and rasterize simple
//! drawables. Two toolkit-agnostic UI adapters (a user-only seek-bar filter
//! and a one-shot post-layout callback) round it off.
//!
//! ```
//! use double_avatar::imaging::{circle_crop_to, crop_center, decode_bytes};
//! # fn sample_png() -> Vec<u8> {
//! #     let img = image::RgbaImage::from_pixel(64, 48, image::Rgba([200, 10, 10, 255]));
//! #     let mut out = std::io::Cursor::new(Vec::new());
//! #     img.write_to(&mut out, image::ImageFormat::Png).unwrap();
//! #     out.into_inner()
//! # }
//!
//! let photo = decode_bytes(&sample_png())?;
//! let square = crop_center(&photo)?;
//! assert_eq!(square.dimensions(), (48, 48));
//!
//! let avatar = circle_crop_to(&photo, 32)?;
//! assert_eq!(avatar.get_pixel(0, 0)[3], 0);     // corner: transparent
//! assert_eq!(avatar.get_pixel(16, 16)[3], 255); // center: opaque
//! # Ok::<(), double_avatar::imaging::ImagingError>(())
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Decode, circle crop, center crop, double-avatar composition, save |
//! | [`drawable`] | `Drawable` trait and rasterization into bitmaps |
//! | [`events`] | Seek-bar user filter, post-layout one-shot callback |
//! | [`batch`] | Parallel circle-cropping of a directory tree |
//! | [`config`] | `double-avatar.toml` loading, merging, and validation |
//! | [`logging`] | `tracing` subscriber setup and the `log_value` helper |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Validated sizes
//!
//! A circular crop to a non-positive size has no meaning. Sizes enter the
//! crate as [`imaging::Diameter`], which can only be built from a value in
//! `1..=MAX_DIAMETER`, so the pixel code never has to handle zero or an
//! unallocatable buffer. Untrusted sizes (CLI,
//! config) go through `Diameter::new(i64)` and fail with a descriptive
//! [`imaging::ImagingError::InvalidDimension`].
//!
//! ## Coverage, not a rasterizer
//!
//! The circle mask is computed per pixel from a 4×4 grid of sub-pixel
//! samples. A pixel whose area misses the circle never receives a sample
//! inside it, so "outside means transparent" holds exactly, and the edge
//! still gets 16 levels of smoothing. The pixel holding the circle center
//! is always fully covered, which keeps tiny avatars opaque in the middle.
//!
//! ## No UI runtime
//!
//! The [`events`] and [`drawable`] modules model the listener and drawable
//! shapes as plain Rust types. There is no window, widget tree, or event
//! loop; the host drives them.

pub mod batch;
pub mod config;
pub mod drawable;
pub mod events;
pub mod imaging;
pub mod logging;
pub mod output;

#[cfg(test)]
pub(crate) mod test_helpers;
