//! Tool configuration module.
//!
//! Handles loading and validating a `config.toml`. Every value has a stock
//! default, so a config file only needs the keys it wants to change and the
//! tool runs without one.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [slices]
//! high_res = true            # Use native height (capped) instead of 1080 wide
//! standard_width = 1080      # Tile width in standard mode
//! aspect_ratio = [4, 5]      # Tile aspect ratio
//! max_high_res_height = 1350 # Tallest tile in high-res mode
//! slice_quality = 90         # JPEG quality of tiles
//! full_view_quality = 95     # JPEG quality of the full-view composite
//!
//! [full_view]
//! width = 1080
//! height = 1350
//! margin = 0.08              # Fraction of the width kept clear on every side
//! background = "#ffffff"
//! stroke = "#eeeeee"
//!
//! [overlay]
//! border_width = 40
//! border_color = "#ffffff"
//! font_size = 16
//! text_color = "#000000"
//! font_family = "Roboto, sans-serif"
//! # font_path = "/usr/share/fonts/truetype/roboto/Roboto-Regular.ttf"
//! separator = " • "
//! selected_fields = ["FNumber", "ExposureTime", "ISOSpeedRatings", "FocalLength"]
//! # aspect_ratio = [1, 1]   # Pad the export to this ratio; omit to keep native
//! export_quality = 95
//!
//! [preview]
//! max_size = 400             # Longer edge of the interactive preview
//! reference_size = 800       # Image edge at which export scaling is 1x
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{
    AspectRatio, Color, FitParams, GeometryError, Quality, scale_for_export,
};
use crate::imaging::operations::FullViewParams;
use crate::metadata::ExifField;
use crate::slices::SliceParams;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Carousel tile settings.
    pub slices: SlicesConfig,
    /// Full-view composite settings.
    pub full_view: FullViewConfig,
    /// Bordered caption overlay settings.
    pub overlay: OverlayConfig,
    /// Preview sizing and export scaling.
    pub preview: PreviewConfig,
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slices.standard_width == 0 {
            return Err(ConfigError::Validation(
                "slices.standard_width must be non-zero".into(),
            ));
        }
        if self.slices.max_high_res_height == 0 {
            return Err(ConfigError::Validation(
                "slices.max_high_res_height must be non-zero".into(),
            ));
        }
        if self.full_view.width == 0 || self.full_view.height == 0 {
            return Err(ConfigError::Validation(
                "full_view.width and full_view.height must be non-zero".into(),
            ));
        }
        if !(0.0..0.5).contains(&self.full_view.margin) {
            return Err(ConfigError::Validation(
                "full_view.margin must be in [0, 0.5)".into(),
            ));
        }
        if self.preview.max_size == 0 || self.preview.reference_size == 0 {
            return Err(ConfigError::Validation(
                "preview.max_size and preview.reference_size must be non-zero".into(),
            ));
        }
        self.overlay.validate()
    }

    /// Everything the slice pipeline needs.
    pub fn slice_params(&self) -> SliceParams {
        SliceParams {
            fit: self.slices.fit_params(),
            full_view: self.full_view.params(),
            slice_quality: self.slices.slice_quality,
            full_view_quality: self.slices.full_view_quality,
        }
    }
}

/// Carousel tile settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SlicesConfig {
    /// Size tiles from the source height instead of the standard width.
    pub high_res: bool,
    pub standard_width: u32,
    /// Tile aspect ratio as `[width, height]`.
    pub aspect_ratio: AspectRatio,
    pub max_high_res_height: u32,
    pub slice_quality: Quality,
    pub full_view_quality: Quality,
}

impl Default for SlicesConfig {
    fn default() -> Self {
        let fit = FitParams::default();
        Self {
            high_res: true,
            standard_width: fit.standard_width,
            aspect_ratio: fit.aspect,
            max_high_res_height: fit.max_high_res_height,
            slice_quality: Quality::new(90),
            full_view_quality: Quality::new(95),
        }
    }
}

impl SlicesConfig {
    pub fn fit_params(&self) -> FitParams {
        FitParams {
            standard_width: self.standard_width,
            aspect: self.aspect_ratio,
            max_high_res_height: self.max_high_res_height,
        }
    }
}

/// Full-view composite settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FullViewConfig {
    pub width: u32,
    pub height: u32,
    /// Fraction of the width kept clear on every side.
    pub margin: f64,
    pub background: Color,
    pub stroke: Color,
}

impl Default for FullViewConfig {
    fn default() -> Self {
        let params = FullViewParams::default();
        Self {
            width: params.width,
            height: params.height,
            margin: params.margin_fraction,
            background: params.background,
            stroke: params.stroke,
        }
    }
}

impl FullViewConfig {
    pub fn params(&self) -> FullViewParams {
        FullViewParams {
            width: self.width,
            height: self.height,
            margin_fraction: self.margin,
            background: self.background,
            stroke: self.stroke,
        }
    }
}

/// Preview sizing and export scaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewConfig {
    /// Longer edge of the interactive preview, in pixels.
    pub max_size: u32,
    /// Image edge length at which export border and font scale 1:1.
    pub reference_size: u32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            max_size: 400,
            reference_size: 800,
        }
    }
}

// =============================================================================
// Overlay
// =============================================================================

/// Bordered caption overlay settings.
///
/// Fields are private: every change goes through a setter that validates
/// it, so a constructed config is always paintable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverlayConfig {
    border_width: u32,
    border_color: Color,
    font_size: u32,
    text_color: Color,
    font_family: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    font_path: Option<PathBuf>,
    separator: String,
    selected_fields: Vec<ExifField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    aspect_ratio: Option<AspectRatio>,
    export_quality: Quality,
}

/// Largest border accepted, in pixels.
pub const MAX_BORDER_WIDTH: u32 = 1000;

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            border_width: 40,
            border_color: Color::WHITE,
            font_size: 16,
            text_color: Color::BLACK,
            font_family: "Roboto, sans-serif".to_string(),
            font_path: None,
            separator: " • ".to_string(),
            selected_fields: ExifField::OVERLAY_FIELDS
                .into_iter()
                .filter(|f| f.selected_by_default())
                .collect(),
            aspect_ratio: None,
            export_quality: Quality::new(95),
        }
    }
}

impl OverlayConfig {
    pub fn border_width(&self) -> u32 {
        self.border_width
    }

    pub fn border_color(&self) -> Color {
        self.border_color
    }

    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    pub fn text_color(&self) -> Color {
        self.text_color
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_path(&self) -> Option<&Path> {
        self.font_path.as_deref()
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn selected_fields(&self) -> &[ExifField] {
        &self.selected_fields
    }

    pub fn is_selected(&self, field: ExifField) -> bool {
        self.selected_fields.contains(&field)
    }

    pub fn aspect_ratio(&self) -> Option<AspectRatio> {
        self.aspect_ratio
    }

    pub fn export_quality(&self) -> Quality {
        self.export_quality
    }

    pub fn set_border_width(&mut self, px: u32) -> Result<(), ConfigError> {
        if px > MAX_BORDER_WIDTH {
            return Err(ConfigError::Validation(format!(
                "overlay.border_width must be at most {MAX_BORDER_WIDTH}, got {px}"
            )));
        }
        self.border_width = px;
        Ok(())
    }

    pub fn set_border_color(&mut self, color: Color) {
        self.border_color = color;
    }

    pub fn set_font_size(&mut self, px: u32) -> Result<(), ConfigError> {
        if px == 0 {
            return Err(ConfigError::Validation(
                "overlay.font_size must be non-zero".into(),
            ));
        }
        self.font_size = px;
        Ok(())
    }

    pub fn set_text_color(&mut self, color: Color) {
        self.text_color = color;
    }

    pub fn set_font_family(&mut self, family: impl Into<String>) {
        self.font_family = family.into();
    }

    pub fn set_font_path(&mut self, path: Option<PathBuf>) {
        self.font_path = path;
    }

    pub fn set_separator(&mut self, separator: impl Into<String>) {
        self.separator = separator.into();
    }

    /// Replace the caption fields. Duplicates are dropped, order is kept.
    pub fn set_selected_fields(
        &mut self,
        fields: impl IntoIterator<Item = ExifField>,
    ) -> Result<(), ConfigError> {
        let mut selected = Vec::new();
        for field in fields {
            check_overlay_field(field)?;
            if !selected.contains(&field) {
                selected.push(field);
            }
        }
        self.selected_fields = selected;
        Ok(())
    }

    /// Turn one caption field on or off. Newly enabled fields go last.
    pub fn set_field_selected(&mut self, field: ExifField, on: bool) -> Result<(), ConfigError> {
        check_overlay_field(field)?;
        if on {
            if !self.is_selected(field) {
                self.selected_fields.push(field);
            }
        } else {
            self.selected_fields.retain(|f| *f != field);
        }
        Ok(())
    }

    pub fn set_aspect_ratio(&mut self, aspect: Option<AspectRatio>) {
        self.aspect_ratio = aspect;
    }

    pub fn set_export_quality(&mut self, quality: Quality) {
        self.export_quality = quality;
    }

    /// Restore every setting to its default.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.border_width > MAX_BORDER_WIDTH {
            return Err(ConfigError::Validation(format!(
                "overlay.border_width must be at most {MAX_BORDER_WIDTH}"
            )));
        }
        if self.font_size == 0 {
            return Err(ConfigError::Validation(
                "overlay.font_size must be non-zero".into(),
            ));
        }
        for field in &self.selected_fields {
            check_overlay_field(*field)?;
        }
        Ok(())
    }

    /// Copy with border and font size scaled up for a full-size export.
    pub fn scaled_for_export(
        &self,
        natural_width: u32,
        natural_height: u32,
        reference_size: u32,
    ) -> Result<Self, GeometryError> {
        let scale = |value: u32| {
            scale_for_export(value as f64, natural_width, natural_height, reference_size)
                .map(|v| v.round() as u32)
        };
        Ok(Self {
            border_width: scale(self.border_width)?,
            font_size: scale(self.font_size)?,
            ..self.clone()
        })
    }
}

fn check_overlay_field(field: ExifField) -> Result<(), ConfigError> {
    if field.overlay_label().is_none() {
        return Err(ConfigError::Validation(format!(
            "{field} cannot be shown in the overlay caption"
        )));
    }
    Ok(())
}

// =============================================================================
// Config loading
// =============================================================================

/// Load and validate a config file.
///
/// Missing keys take their defaults; unknown keys are rejected.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Load `path` if given, otherwise the stock defaults.
pub fn load_config_or_default(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => Ok(AppConfig::default()),
    }
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# exif-slicer configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Carousel tiles
# ---------------------------------------------------------------------------
[slices]
# Size tiles from the source height (capped at max_high_res_height) instead
# of the fixed standard width. `slice --standard` overrides this per run.
high_res = true

# Tile width in standard mode.
standard_width = 1080

# Tile aspect ratio as [width, height]. Instagram portrait is [4, 5].
aspect_ratio = [4, 5]

# Tallest tile produced in high-res mode.
max_high_res_height = 1350

# JPEG quality (1-100) of the tiles and of the full-view composite.
slice_quality = 90
full_view_quality = 95

# ---------------------------------------------------------------------------
# Full-view composite (the whole image on one tile)
# ---------------------------------------------------------------------------
[full_view]
width = 1080
height = 1350

# Fraction of the width kept clear on every side.
margin = 0.08

background = "#ffffff"

# 1px frame drawn just outside the image.
stroke = "#eeeeee"

# ---------------------------------------------------------------------------
# Bordered caption overlay
# ---------------------------------------------------------------------------
[overlay]
# Border width in pixels. Presets: thin 25, medium 50, thick 80, polaroid 100.
border_width = 40

# Colours take #rrggbb, #rgb or a swatch name: white, black, cream, gray.
border_color = "#ffffff"
font_size = 16
text_color = "#000000"

# Caption font families, first installed match wins. Falls back to the
# bundled DejaVu Sans when none is installed.
font_family = "Roboto, sans-serif"

# TrueType/OpenType file used instead of a family lookup.
# font_path = "/usr/share/fonts/truetype/roboto/Roboto-Regular.ttf"

separator = " • "

# Caption fields, in order. Available: FNumber, ExposureTime,
# ISOSpeedRatings, FocalLength, Make, Model, LensModel.
selected_fields = ["FNumber", "ExposureTime", "ISOSpeedRatings", "FocalLength"]

# Pad the export to this aspect ratio. Omit to keep the native ratio.
# aspect_ratio = [1, 1]

export_quality = 95

# ---------------------------------------------------------------------------
# Preview
# ---------------------------------------------------------------------------
[preview]
# Longer edge of the preview, in pixels.
max_size = 400

# Exports of images larger than this scale border and font up
# proportionally. Smaller images keep the configured sizes.
reference_size = 800
"##
}
