//! # EXIF Slicer
//!
//! A photograph toolkit with three jobs: show an image's EXIF data, cut a
//! wide image into a swipeable Instagram carousel, and frame an image in a
//! border with a one-line camera-settings caption.
//!
//! # Architecture: Plan, Then Paint
//!
//! Every render goes through the same two steps:
//!
//! ```text
//! 1. Plan    dimensions + settings  →  geometry      (pure arithmetic)
//! 2. Paint   geometry + surface     →  encoded JPEG  (DrawingSurface ops)
//! ```
//!
//! Geometry lives in [`imaging`]'s calculation functions and never touches
//! pixels. Painting goes through the [`imaging::DrawingSurface`] trait, so
//! the compositing logic can be tested against a recording mock and the
//! pixels produced by [`imaging::RustBackend`] in production.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Geometry, drawing surfaces, full-view and bordered compositing |
//! | [`caption`] | Caption line composition and shrink-to-fit font sizing |
//! | [`slices`] | The carousel pipeline: full view + tiles, ZIP or directory output |
//! | [`metadata`] | EXIF decoding, display formatting, GPS links, file info |
//! | [`session`] | One loaded image, its overlay settings and the render gate |
//! | [`config`] | `config.toml` loading and validation |
//! | [`naming`] | Output filename conventions |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Full View First
//!
//! A carousel always starts with `slice_00_full_view.jpg`, the whole image
//! centered on one tile, followed by `slice_1_of_N.jpg` … in order. Viewers
//! see the complete picture before swiping through the pieces, and the names
//! sort correctly in any file browser.
//!
//! ## At Least Two Tiles
//!
//! An image narrower than one tile is still cut in two. A single-tile
//! "carousel" is just a crop, which is not what the slicer is for.
//!
//! ## Missing Metadata Is Not An Error
//!
//! Files without EXIF, or with only some fields, decode to a partial
//! [`metadata::MetadataRecord`]. Display omits what is absent, and the
//! caption falls back to sample values only when no image is loaded at all.

pub mod caption;
pub mod config;
pub mod imaging;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod session;
pub mod slices;

#[cfg(test)]
pub(crate) mod test_helpers;
