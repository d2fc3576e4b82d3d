//! High-level compositing operations.
//!
//! These functions combine calculations with surface execution. Each one
//! plans pixel rectangles with the pure geometry functions, then paints onto
//! a [`DrawingSurface`]. Preview and export share the same paint path; only
//! the frame size and the scaled border/font differ.

use super::backend::{BackendError, Dimensions, DrawingSurface, ImageSource, SurfaceBackend};
use super::calculations::{
    GeometryError, Placement, compute_centered_fit, compute_export_frame, compute_framed_fit,
    compute_preview_frame,
};
use super::params::{Color, Rect};
use crate::caption::{CaptionLayout, DEFAULT_MIN_FONT_SIZE, compose_overlay_line, fit_text_to_width};
use crate::config::OverlayConfig;
use crate::metadata::MetadataRecord;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Size of the placeholder painted before an image is loaded.
pub const SAMPLE_PREVIEW_SIZE: Dimensions = Dimensions {
    width: 400,
    height: 300,
};

/// Caption width as a fraction of the frame width.
const CAPTION_WIDTH_FRACTION: f64 = 0.95;

/// Settings for the full-view composite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FullViewParams {
    pub width: u32,
    pub height: u32,
    pub margin_fraction: f64,
    pub background: Color,
    pub stroke: Color,
}

impl Default for FullViewParams {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1350,
            margin_fraction: 0.08,
            background: Color::WHITE,
            stroke: Color::FRAME_STROKE,
        }
    }
}

/// Layout of a bordered overlay canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderedPlan {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Where the image is drawn, in canvas pixels.
    pub content: Rect,
    /// Centre of the caption, in the middle of the bottom border band.
    pub caption_center: (f64, f64),
    pub caption_max_width: f64,
}

/// Plan a bordered overlay without painting it.
///
/// The canvas is the frame plus the border on every side. The image is
/// fitted (never cropped) into the frame using the configured target aspect,
/// or its own aspect when none is set.
pub fn plan_bordered(
    image: Dimensions,
    config: &OverlayConfig,
    frame_width: f64,
    frame_height: f64,
) -> std::result::Result<BorderedPlan, GeometryError> {
    let native = image.width as f64 / image.height as f64;
    let target = config.aspect_ratio().map_or(native, |a| a.ratio());
    let border = config.border_width() as f64;

    let placement = compute_framed_fit(native, target, frame_width, frame_height)?;

    Ok(BorderedPlan {
        canvas_width: (frame_width + 2.0 * border).round() as u32,
        canvas_height: (frame_height + 2.0 * border).round() as u32,
        content: placement.translate(border, border).rect(),
        caption_center: (
            (frame_width + 2.0 * border) / 2.0,
            border + frame_height + border / 2.0,
        ),
        caption_max_width: CAPTION_WIDTH_FRACTION * frame_width,
    })
}

/// Paint a bordered overlay from its plan: border fill, fitted image, caption.
///
/// The surface must be at least the planned canvas size. Returns the
/// caption that was drawn, or `None` when the caption is empty or there is
/// no border band to put it in.
pub fn paint_bordered<S: DrawingSurface>(
    surface: &mut S,
    image: &ImageSource,
    record: Option<&MetadataRecord>,
    config: &OverlayConfig,
    plan: &BorderedPlan,
) -> Result<Option<CaptionLayout>> {
    surface.fill_rect(
        Rect::sized(surface.width() as f64, surface.height() as f64),
        config.border_color(),
    );
    surface.draw_image(image, image.bounds(), plan.content)?;

    let text = compose_overlay_line(config.selected_fields(), record, config.separator());
    if text.is_empty() || config.border_width() == 0 {
        return Ok(None);
    }

    let font_size = fit_text_to_width(
        &text,
        config.font_size() as f32,
        plan.caption_max_width as f32,
        |t, size| surface.measure_text(t, size),
        DEFAULT_MIN_FONT_SIZE,
    );
    let (cx, cy) = plan.caption_center;
    surface.fill_text(&text, cx, cy, font_size, config.text_color())?;

    Ok(Some(CaptionLayout { text, font_size }))
}

/// Paint one carousel tile: the `source` band scaled onto the whole surface.
pub fn paint_slice<S: DrawingSurface>(
    surface: &mut S,
    image: &ImageSource,
    source: Rect,
    dest_width: u32,
    dest_height: u32,
) -> Result<()> {
    surface.draw_image(
        image,
        source,
        Rect::sized(dest_width as f64, dest_height as f64),
    )
}

/// Paint the full-view composite: the whole image centred inside a margin,
/// outlined by a 1px stroke just outside it.
pub fn paint_full_view<S: DrawingSurface>(
    surface: &mut S,
    image: &ImageSource,
    params: &FullViewParams,
) -> Result<Placement> {
    let placement = compute_centered_fit(
        image.aspect(),
        params.width as f64,
        params.height as f64,
        params.margin_fraction,
    )?;
    let placement = Placement {
        offset_x: placement.offset_x.round(),
        offset_y: placement.offset_y.round(),
        ..placement
    };

    surface.fill_rect(
        Rect::sized(params.width as f64, params.height as f64),
        params.background,
    );
    surface.draw_image(image, image.bounds(), placement.rect())?;
    surface.stroke_rect(placement.rect().inflate(1.0), params.stroke, 1.0);

    Ok(placement)
}

/// An encoded overlay and what was drawn on it.
#[derive(Debug, Clone)]
pub struct OverlayImage {
    pub encoded: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub caption: Option<CaptionLayout>,
}

fn render_bordered<B: SurfaceBackend>(
    backend: &B,
    image: &ImageSource,
    record: Option<&MetadataRecord>,
    config: &OverlayConfig,
    frame: (f64, f64),
) -> Result<OverlayImage> {
    let (frame_width, frame_height) = frame;
    let plan = plan_bordered(image.dimensions(), config, frame_width, frame_height)?;
    let mut surface = backend.create_surface(plan.canvas_width, plan.canvas_height)?;
    let caption = paint_bordered(&mut surface, image, record, config, &plan)?;
    let encoded = surface.encode_jpeg(config.export_quality())?;

    Ok(OverlayImage {
        encoded,
        width: plan.canvas_width,
        height: plan.canvas_height,
        caption,
    })
}

/// Interactive-size overlay: the frame's longer edge is `max_size`.
pub fn render_overlay_preview<B: SurfaceBackend>(
    backend: &B,
    image: &ImageSource,
    record: Option<&MetadataRecord>,
    config: &OverlayConfig,
    max_size: u32,
) -> Result<OverlayImage> {
    let aspect = config.aspect_ratio().map_or(image.aspect(), |a| a.ratio());
    let frame = compute_preview_frame(aspect, max_size)?;
    render_bordered(backend, image, record, config, frame)
}

/// Full-resolution overlay. Border and font scale with the image relative
/// to `reference_size`.
pub fn render_overlay_export<B: SurfaceBackend>(
    backend: &B,
    image: &ImageSource,
    record: Option<&MetadataRecord>,
    config: &OverlayConfig,
    reference_size: u32,
) -> Result<OverlayImage> {
    let Dimensions { width, height } = image.dimensions();
    let (frame_width, frame_height) = compute_export_frame(width, height, config.aspect_ratio())?;
    let scaled = config.scaled_for_export(width, height, reference_size)?;
    render_bordered(
        backend,
        image,
        record,
        &scaled,
        (frame_width as f64, frame_height as f64),
    )
}

/// Preview shown before any image is loaded: the placeholder with sample
/// caption values.
pub fn paint_sample_preview<B: SurfaceBackend>(
    backend: &B,
    config: &OverlayConfig,
    max_size: u32,
) -> Result<OverlayImage> {
    let placeholder =
        ImageSource::placeholder(SAMPLE_PREVIEW_SIZE.width, SAMPLE_PREVIEW_SIZE.height)?;
    render_overlay_preview(backend, &placeholder, None, config, max_size)
}
