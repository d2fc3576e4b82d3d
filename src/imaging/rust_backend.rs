//! Pure Rust drawing surface on top of the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::load_from_memory` |
//! | Blit with scaling | `image::imageops::crop_imm` + `resize` (`Lanczos3`) + `overlay` |
//! | Text measure / draw | `rusttype` glyph layout and coverage rasterization |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |
//!
//! Fill and stroke snap rectangle edges to the nearest pixel.

use super::backend::{BackendError, DrawingSurface, ImageSource, SurfaceBackend};
use super::calculations::GeometryError;
use super::fonts::{FontOrigin, LoadedFont, bundled_font, font_from_file, resolve_caption_font};
use super::params::{Color, Quality, Rect};
use crate::config::OverlayConfig;
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, ImageEncoder, Rgba, RgbaImage};
use rusttype::{Font, Scale, point};
use std::path::Path;
use std::sync::Arc;

/// Decode an encoded image (JPEG, PNG, TIFF, WebP) into an [`ImageSource`].
pub fn decode_image(bytes: &[u8]) -> Result<ImageSource, BackendError> {
    let decoded = image::load_from_memory(bytes).map_err(|e| BackendError::Decode(e.to_string()))?;
    ImageSource::from_rgba(decoded.to_rgba8())
}

/// Backend producing [`RasterSurface`]s that carry the caption font.
#[derive(Clone)]
pub struct RustBackend {
    font: Arc<Font<'static>>,
    origin: FontOrigin,
}

impl RustBackend {
    /// Backend with the bundled caption font.
    pub fn new() -> Result<Self, BackendError> {
        Ok(Self::from_loaded(bundled_font()?))
    }

    /// Backend with the font an overlay config asks for: `font_path`, else
    /// the first installed `font_family`, else the bundled face.
    pub fn for_overlay(config: &OverlayConfig) -> Result<Self, BackendError> {
        Ok(Self::from_loaded(resolve_caption_font(
            config.font_family(),
            config.font_path(),
        )?))
    }

    /// Load a TrueType/OpenType font for captions.
    pub fn with_font_file(path: &Path) -> Result<Self, BackendError> {
        Ok(Self::from_loaded(font_from_file(path)?))
    }

    fn from_loaded(loaded: LoadedFont) -> Self {
        Self {
            font: Arc::new(loaded.font),
            origin: loaded.origin,
        }
    }

    /// Where the caption font came from.
    pub fn font_origin(&self) -> &FontOrigin {
        &self.origin
    }
}

impl SurfaceBackend for RustBackend {
    type Surface = RasterSurface;

    fn create_surface(&self, width: u32, height: u32) -> Result<RasterSurface, BackendError> {
        if width == 0 || height == 0 {
            return Err(GeometryError::invalid("surface size", 0.0).into());
        }
        Ok(RasterSurface {
            canvas: RgbaImage::new(width, height),
            font: Arc::clone(&self.font),
        })
    }
}

/// In-memory RGBA canvas with the backend's caption font.
pub struct RasterSurface {
    canvas: RgbaImage,
    font: Arc<Font<'static>>,
}

impl RasterSurface {
    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    /// Snap a rectangle to pixel bounds clipped to the canvas.
    fn clip(&self, rect: Rect) -> Option<(u32, u32, u32, u32)> {
        let x0 = rect.x.round().max(0.0) as u32;
        let y0 = rect.y.round().max(0.0) as u32;
        let x1 = (rect.right().round().max(0.0) as u32).min(self.canvas.width());
        let y1 = (rect.bottom().round().max(0.0) as u32).min(self.canvas.height());
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }

    fn fill_px(&mut self, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgba<u8>) {
        for y in y0..y1 {
            for x in x0..x1 {
                self.canvas.put_pixel(x, y, color);
            }
        }
    }
}

/// Blend `color` over `pixel` with coverage `alpha` in `[0, 1]`.
fn blend(pixel: &mut Rgba<u8>, color: Color, alpha: f32) {
    let a = alpha.clamp(0.0, 1.0);
    let mix = |dst: u8, src: u8| (dst as f32 * (1.0 - a) + src as f32 * a).round() as u8;
    pixel.0 = [
        mix(pixel.0[0], color.r),
        mix(pixel.0[1], color.g),
        mix(pixel.0[2], color.b),
        0xff,
    ];
}

fn text_width(font: &Font<'static>, text: &str, font_size: f32) -> f32 {
    let scale = Scale::uniform(font_size);
    font.layout(text, scale, point(0.0, 0.0))
        .last()
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0)
}

impl DrawingSurface for RasterSurface {
    fn width(&self) -> u32 {
        self.canvas.width()
    }

    fn height(&self) -> u32 {
        self.canvas.height()
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        if let Some((x0, y0, x1, y1)) = self.clip(rect) {
            self.fill_px(x0, y0, x1, y1, color.to_rgba());
        }
    }

    fn draw_image(
        &mut self,
        image: &ImageSource,
        src: Rect,
        dest: Rect,
    ) -> Result<(), BackendError> {
        let pixels = image.pixels();
        // Fractional source edges widen to whole pixels.
        let sx0 = src.x.floor().max(0.0) as u32;
        let sy0 = src.y.floor().max(0.0) as u32;
        let sx1 = (src.right().ceil().max(0.0) as u32).min(pixels.width());
        let sy1 = (src.bottom().ceil().max(0.0) as u32).min(pixels.height());
        if sx0 >= sx1 || sy0 >= sy1 {
            return Err(GeometryError::invalid("source rect width", src.width).into());
        }

        let dest_w = dest.width.round() as u32;
        let dest_h = dest.height.round() as u32;
        if dest_w == 0 || dest_h == 0 {
            return Err(GeometryError::invalid("destination size", dest.width.min(dest.height)).into());
        }

        let band = imageops::crop_imm(pixels, sx0, sy0, sx1 - sx0, sy1 - sy0).to_image();
        let scaled = if band.dimensions() == (dest_w, dest_h) {
            band
        } else {
            imageops::resize(&band, dest_w, dest_h, FilterType::Lanczos3)
        };
        imageops::overlay(
            &mut self.canvas,
            &scaled,
            dest.x.round() as i64,
            dest.y.round() as i64,
        );
        Ok(())
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f64) {
        let Some((x0, y0, x1, y1)) = self.clip(rect) else {
            return;
        };
        let lw = (line_width.round().max(1.0) as u32).min((x1 - x0).min(y1 - y0));
        let c = color.to_rgba();
        self.fill_px(x0, y0, x1, y0 + lw, c);
        self.fill_px(x0, y1 - lw, x1, y1, c);
        self.fill_px(x0, y0, x0 + lw, y1, c);
        self.fill_px(x1 - lw, y0, x1, y1, c);
    }

    fn measure_text(&self, text: &str, font_size: f32) -> f32 {
        text_width(&self.font, text, font_size)
    }

    fn fill_text(
        &mut self,
        text: &str,
        center_x: f64,
        center_y: f64,
        font_size: f32,
        color: Color,
    ) -> Result<(), BackendError> {
        let font = Arc::clone(&self.font);
        let scale = Scale::uniform(font_size);
        let v_metrics = font.v_metrics(scale);
        let width = text_width(&font, text, font_size);
        // Middle baseline: centre the ascent/descent box on center_y.
        let origin = point(
            center_x as f32 - width / 2.0,
            center_y as f32 + (v_metrics.ascent + v_metrics.descent) / 2.0,
        );

        let (cw, ch) = self.canvas.dimensions();
        for glyph in font.layout(text, scale, origin) {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, coverage| {
                let x = bb.min.x + gx as i32;
                let y = bb.min.y + gy as i32;
                if x >= 0 && y >= 0 && (x as u32) < cw && (y as u32) < ch {
                    blend(self.canvas.get_pixel_mut(x as u32, y as u32), color, coverage);
                }
            });
        }
        Ok(())
    }

    fn encode_jpeg(&self, quality: Quality) -> Result<Vec<u8>, BackendError> {
        let rgb = image::DynamicImage::ImageRgba8(self.canvas.clone()).to_rgb8();
        let mut bytes = Vec::new();
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut bytes, quality.value() as u8)
            .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
            .map_err(|e| BackendError::Encode(e.to_string()))?;
        Ok(bytes)
    }
}
