//! Pure calculation functions for carousel and overlay geometry.
//!
//! All functions here are pure and testable without any I/O or images.
//! Every input dimension must be positive and finite; anything else is a
//! caller bug and is reported as [`GeometryError::InvalidDimension`] rather
//! than clamped.

use super::params::AspectRatio;
use thiserror::Error;

/// Carousels always have at least this many tiles.
pub const MIN_SLICES: u32 = 2;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("invalid dimension: {name} must be positive, got {value}")]
    InvalidDimension { name: &'static str, value: f64 },
}

impl GeometryError {
    pub(crate) fn invalid(name: &'static str, value: f64) -> Self {
        Self::InvalidDimension { name, value }
    }
}

fn positive(name: &'static str, value: f64) -> Result<f64, GeometryError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(GeometryError::invalid(name, value))
    }
}

fn positive_px(name: &'static str, value: u32) -> Result<u32, GeometryError> {
    if value == 0 {
        Err(GeometryError::invalid(name, 0.0))
    } else {
        Ok(value)
    }
}

/// Output frame settings for carousel tiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitParams {
    /// Tile width in standard mode.
    pub standard_width: u32,
    /// Tile aspect ratio (Instagram portrait by default).
    pub aspect: AspectRatio,
    /// Tallest tile produced in high-resolution mode.
    pub max_high_res_height: u32,
}

impl Default for FitParams {
    fn default() -> Self {
        Self {
            standard_width: 1080,
            aspect: AspectRatio::PORTRAIT,
            max_high_res_height: 1350,
        }
    }
}

/// Target tile size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitDimensions {
    pub target_width: u32,
    pub target_height: u32,
}

/// Compute the tile size for a source image.
///
/// In high-resolution mode the tile is as tall as the source allows (capped
/// at `max_high_res_height`); if the resulting width would exceed the source
/// width, the width becomes binding instead. In standard mode the tile is
/// always `standard_width` wide.
///
/// # Examples
/// ```
/// # use exif_slicer::imaging::{compute_fit_dimensions, FitParams};
/// let fit = compute_fit_dimensions(3000, 1000, true, &FitParams::default()).unwrap();
/// assert_eq!((fit.target_width, fit.target_height), (800, 1000));
///
/// let fit = compute_fit_dimensions(500, 500, false, &FitParams::default()).unwrap();
/// assert_eq!((fit.target_width, fit.target_height), (1080, 1350));
/// ```
pub fn compute_fit_dimensions(
    natural_width: u32,
    natural_height: u32,
    high_res: bool,
    params: &FitParams,
) -> Result<FitDimensions, GeometryError> {
    positive_px("natural width", natural_width)?;
    positive_px("natural height", natural_height)?;
    positive_px("standard width", params.standard_width)?;
    positive_px("max high-res height", params.max_high_res_height)?;
    let aspect = params.aspect.ratio();

    if !high_res {
        return Ok(FitDimensions {
            target_width: params.standard_width,
            target_height: (params.standard_width as f64 / aspect).round() as u32,
        });
    }

    let mut target_height = natural_height.min(params.max_high_res_height);
    let mut target_width = (target_height as f64 * aspect).round() as u32;
    if target_width > natural_width {
        target_width = natural_width;
        target_height = (target_width as f64 / aspect).round() as u32;
    }

    // A 1px-wide source would otherwise round to a zero-height tile.
    Ok(FitDimensions {
        target_width: target_width.max(1),
        target_height: target_height.max(1),
    })
}

/// How a source image is cut into carousel tiles.
///
/// Only produced by [`compute_slice_spec`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceSpec {
    pub target_width: u32,
    pub target_height: u32,
    pub num_slices: u32,
    /// Width of each source band. Fractional in general.
    pub slice_source_width: f64,
    natural_height: u32,
}

impl SliceSpec {
    /// Source band for tile `index` (0-based): full height, starting at
    /// `index * slice_source_width`.
    pub fn source_rect(&self, index: u32) -> super::params::Rect {
        super::params::Rect::new(
            index as f64 * self.slice_source_width,
            0.0,
            self.slice_source_width,
            self.natural_height as f64,
        )
    }

    /// All source bands in tile order.
    pub fn source_rects(&self) -> impl Iterator<Item = super::params::Rect> + '_ {
        (0..self.num_slices).map(|i| self.source_rect(i))
    }
}

/// Compute the carousel layout for a source image.
///
/// `num_slices = max(MIN_SLICES, ceil(natural_width / target_width))`. An
/// image narrower than one tile still yields [`MIN_SLICES`] tiles so the
/// output is always a swipeable carousel.
pub fn compute_slice_spec(
    natural_width: u32,
    natural_height: u32,
    high_res: bool,
    params: &FitParams,
) -> Result<SliceSpec, GeometryError> {
    let fit = compute_fit_dimensions(natural_width, natural_height, high_res, params)?;
    let num_slices = natural_width.div_ceil(fit.target_width).max(MIN_SLICES);

    Ok(SliceSpec {
        target_width: fit.target_width,
        target_height: fit.target_height,
        num_slices,
        slice_source_width: natural_width as f64 / num_slices as f64,
        natural_height,
    })
}

/// Where content lands inside a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub draw_width: f64,
    pub draw_height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Placement {
    pub fn rect(&self) -> super::params::Rect {
        super::params::Rect::new(
            self.offset_x,
            self.offset_y,
            self.draw_width,
            self.draw_height,
        )
    }

    /// Same placement shifted by `(dx, dy)`.
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            offset_x: self.offset_x + dx,
            offset_y: self.offset_y + dy,
            ..*self
        }
    }
}

/// Fit content of `content_aspect` inside a frame shrunk by a margin.
///
/// The margin is `round(frame_width * margin_fraction)` and is applied on all
/// four sides. When the content is relatively wider than the available area,
/// width binds; otherwise height binds. The result is centered in the full
/// frame.
pub fn compute_centered_fit(
    content_aspect: f64,
    frame_width: f64,
    frame_height: f64,
    margin_fraction: f64,
) -> Result<Placement, GeometryError> {
    positive("content aspect", content_aspect)?;
    positive("frame width", frame_width)?;
    positive("frame height", frame_height)?;
    if !(margin_fraction.is_finite() && margin_fraction >= 0.0) {
        return Err(GeometryError::invalid("margin fraction", margin_fraction));
    }

    let margin = (frame_width * margin_fraction).round();
    let available_width = positive("available width", frame_width - 2.0 * margin)?;
    let available_height = positive("available height", frame_height - 2.0 * margin)?;

    let (draw_width, draw_height) = if content_aspect > available_width / available_height {
        (available_width, available_width / content_aspect)
    } else {
        (available_height * content_aspect, available_height)
    };

    Ok(Placement {
        draw_width,
        draw_height,
        offset_x: (frame_width - draw_width) / 2.0,
        offset_y: (frame_height - draw_height) / 2.0,
    })
}

/// Fit content of `original_aspect` into a frame sized for `target_aspect`.
///
/// No margin. Content wider than the target spans the frame width and is
/// centered vertically; otherwise it spans the frame height and is centered
/// horizontally. Nothing is cropped.
pub fn compute_framed_fit(
    original_aspect: f64,
    target_aspect: f64,
    frame_width: f64,
    frame_height: f64,
) -> Result<Placement, GeometryError> {
    positive("original aspect", original_aspect)?;
    positive("target aspect", target_aspect)?;
    positive("frame width", frame_width)?;
    positive("frame height", frame_height)?;

    let (draw_width, draw_height) = if original_aspect > target_aspect {
        (frame_width, frame_width / original_aspect)
    } else {
        (frame_height * original_aspect, frame_height)
    };

    Ok(Placement {
        draw_width,
        draw_height,
        offset_x: (frame_width - draw_width) / 2.0,
        offset_y: (frame_height - draw_height) / 2.0,
    })
}

/// Interactive preview frame: the longer edge is `max_size`.
pub fn compute_preview_frame(aspect: f64, max_size: u32) -> Result<(f64, f64), GeometryError> {
    positive("preview aspect", aspect)?;
    let max = positive_px("preview size", max_size)? as f64;
    if aspect > 1.0 {
        Ok((max, max / aspect))
    } else {
        Ok((max * aspect, max))
    }
}

/// Export frame: the smallest frame of `target_aspect` containing the image
/// at native size, or the native size itself.
pub fn compute_export_frame(
    natural_width: u32,
    natural_height: u32,
    target_aspect: Option<AspectRatio>,
) -> Result<(u32, u32), GeometryError> {
    positive_px("natural width", natural_width)?;
    positive_px("natural height", natural_height)?;
    let Some(target) = target_aspect else {
        return Ok((natural_width, natural_height));
    };

    let native = natural_width as f64 / natural_height as f64;
    if native > target.ratio() {
        let height = (natural_width as f64 / target.ratio()).round() as u32;
        Ok((natural_width, height.max(natural_height)))
    } else {
        let width = (natural_height as f64 * target.ratio()).round() as u32;
        Ok((width.max(natural_width), natural_height))
    }
}

/// Scale a preview-sized length (border, font size) up for an export of a
/// `natural_width × natural_height` image.
///
/// The factor is `max(w, h) / reference_size`, floored at 1: exports never
/// get a smaller border or font than configured.
pub fn scale_for_export(
    value: f64,
    natural_width: u32,
    natural_height: u32,
    reference_size: u32,
) -> Result<f64, GeometryError> {
    positive_px("natural width", natural_width)?;
    positive_px("natural height", natural_height)?;
    let reference = positive_px("reference size", reference_size)? as f64;
    let factor = natural_width.max(natural_height) as f64 / reference;
    Ok((value * factor).max(value))
}
