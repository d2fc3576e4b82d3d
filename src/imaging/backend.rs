//! Drawing-surface trait and shared imaging types.
//!
//! The [`DrawingSurface`] trait is the capability every compositor operation
//! paints through: fill, blit, stroke, text and JPEG encoding. A
//! [`SurfaceBackend`] creates surfaces of a requested size, so the slice
//! pipeline can allocate one per tile without knowing the implementation.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), which rasterizes into an
//! `image::RgbaImage`.

use super::calculations::GeometryError;
use super::params::{Color, Quality, Rect};
use image::RgbaImage;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not decode image: {0}")]
    Decode(String),
    #[error("Could not encode image: {0}")]
    Encode(String),
    #[error("Font error: {0}")]
    Font(String),
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Decoded, immutable pixel data.
///
/// Cloning is cheap: clones share the same buffer.
#[derive(Debug, Clone)]
pub struct ImageSource {
    pixels: Arc<RgbaImage>,
}

impl ImageSource {
    /// Wrap decoded pixels. Both dimensions must be non-zero.
    pub fn from_rgba(pixels: RgbaImage) -> Result<Self, BackendError> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(BackendError::Decode(format!(
                "image has no pixels ({}x{})",
                pixels.width(),
                pixels.height()
            )));
        }
        Ok(Self {
            pixels: Arc::new(pixels),
        })
    }

    /// Flat-coloured stand-in used before a real image is loaded.
    pub fn placeholder(width: u32, height: u32) -> Result<Self, BackendError> {
        Self::from_rgba(RgbaImage::from_pixel(
            width,
            height,
            Color::PLACEHOLDER.to_rgba(),
        ))
    }

    pub fn natural_width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn natural_height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.natural_width(),
            height: self.natural_height(),
        }
    }

    /// Native width-to-height ratio.
    pub fn aspect(&self) -> f64 {
        self.natural_width() as f64 / self.natural_height() as f64
    }

    /// Whole-image source rectangle.
    pub fn bounds(&self) -> Rect {
        Rect::sized(self.natural_width() as f64, self.natural_height() as f64)
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// 2D drawing capability.
///
/// Rectangles are in surface pixels and may be fractional; implementations
/// decide how to snap them. Text is always anchored at its centre.
pub trait DrawingSurface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Scale the `src` region of `image` into `dest`.
    fn draw_image(&mut self, image: &ImageSource, src: Rect, dest: Rect)
    -> Result<(), BackendError>;

    /// Stroke a band of `line_width` just inside `rect`.
    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f64);

    /// Rendered width of `text` at `font_size` pixels.
    fn measure_text(&self, text: &str, font_size: f32) -> f32;

    /// Draw `text` centred horizontally and vertically on `(center_x, center_y)`.
    fn fill_text(
        &mut self,
        text: &str,
        center_x: f64,
        center_y: f64,
        font_size: f32,
        color: Color,
    ) -> Result<(), BackendError>;

    fn encode_jpeg(&self, quality: Quality) -> Result<Vec<u8>, BackendError>;
}

/// Factory for drawing surfaces.
pub trait SurfaceBackend {
    type Surface: DrawingSurface;

    fn create_surface(&self, width: u32, height: u32) -> Result<Self::Surface, BackendError>;
}
