//! Image geometry and compositing in pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::load_from_memory` |
//! | **Scaled blit** | `crop_imm` + Lanczos3 `resize` + `overlay` |
//! | **Caption font** | `overlay.font_path`, else `fontdb` family lookup, else bundled DejaVu Sans |
//! | **Caption text** | `rusttype` layout and glyph coverage |
//! | **Encode → JPEG** | `image::codecs::jpeg::JpegEncoder` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for slice and fit geometry (unit testable)
//! - **Parameters**: Value types describing what to draw
//! - **Backend**: [`DrawingSurface`] / [`SurfaceBackend`] traits + [`RustBackend`]
//! - **Operations**: Compositing functions combining calculations + surface

pub mod backend;
mod calculations;
pub mod fonts;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, DrawingSurface, ImageSource, SurfaceBackend};
pub use calculations::{
    FitDimensions, FitParams, GeometryError, MIN_SLICES, Placement, SliceSpec,
    compute_centered_fit, compute_export_frame, compute_fit_dimensions, compute_framed_fit,
    compute_preview_frame, compute_slice_spec, scale_for_export,
};
pub use fonts::{FontOrigin, LoadedFont, resolve_caption_font};
pub use operations::{
    BorderedPlan, FullViewParams, OverlayImage, paint_bordered, paint_full_view,
    paint_sample_preview, paint_slice, plan_bordered, render_overlay_export,
    render_overlay_preview,
};
pub use params::{AspectRatio, BorderWidth, Color, Quality, Rect};
pub use rust_backend::{RasterSurface, RustBackend, decode_image};
