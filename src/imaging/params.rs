//! Value types shared by the geometry engine, the compositor and the surface.
//!
//! These describe *what* to draw, not *how*. They are the interface between
//! the high-level [`operations`](super::operations) (which decide where pixels
//! go) and a [`DrawingSurface`](super::backend::DrawingSurface) (which puts
//! them there). A mock surface can be swapped in for testing without changing
//! any layout logic.
//!
//! ## Types
//!
//! - [`Quality`]: JPEG quality (1–100, default 90). Clamped on construction.
//! - [`AspectRatio`]: a `width:height` pair with the Instagram presets.
//! - [`BorderWidth`]: overlay border width, a preset name or pixels.
//! - [`Color`]: an opaque sRGB colour parsed from a swatch name, `#rrggbb` or `#rgb`.
//! - [`Rect`]: a rectangle in (possibly fractional) pixel units.

use super::calculations::GeometryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

impl From<u32> for Quality {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<Quality> for u32 {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}

/// Width-to-height ratio expressed as two non-zero integers.
///
/// Serialized as `[width, height]`, the same shape the config file uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[u32; 2]", into = "[u32; 2]")]
pub struct AspectRatio {
    width: u32,
    height: u32,
}

impl AspectRatio {
    pub const SQUARE: AspectRatio = AspectRatio { width: 1, height: 1 };
    pub const PORTRAIT: AspectRatio = AspectRatio { width: 4, height: 5 };
    pub const STORY: AspectRatio = AspectRatio { width: 9, height: 16 };
    pub const LANDSCAPE: AspectRatio = AspectRatio { width: 16, height: 9 };

    /// Named presets, in the order the overlay controls list them.
    pub const PRESETS: [(&'static str, AspectRatio); 4] = [
        ("square", Self::SQUARE),
        ("portrait", Self::PORTRAIT),
        ("story", Self::STORY),
        ("landscape", Self::LANDSCAPE),
    ];

    pub fn new(width: u32, height: u32) -> Result<Self, GeometryError> {
        if width == 0 {
            return Err(GeometryError::invalid("aspect width", 0.0));
        }
        if height == 0 {
            return Err(GeometryError::invalid("aspect height", 0.0));
        }
        Ok(Self { width, height })
    }

    pub fn width(self) -> u32 {
        self.width
    }

    pub fn height(self) -> u32 {
        self.height
    }

    /// The ratio as a float. Always > 0.
    pub fn ratio(self) -> f64 {
        self.width as f64 / self.height as f64
    }

    pub fn preset_name(self) -> Option<&'static str> {
        Self::PRESETS
            .iter()
            .find(|(_, preset)| *preset == self)
            .map(|(name, _)| *name)
    }
}

impl TryFrom<[u32; 2]> for AspectRatio {
    type Error = GeometryError;

    fn try_from([width, height]: [u32; 2]) -> Result<Self, Self::Error> {
        Self::new(width, height)
    }
}

impl From<AspectRatio> for [u32; 2] {
    fn from(aspect: AspectRatio) -> Self {
        [aspect.width, aspect.height]
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

/// Parses a preset name (`portrait`) or an explicit `W:H` pair (`4:5`).
impl FromStr for AspectRatio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some((_, preset)) = Self::PRESETS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
        {
            return Ok(*preset);
        }
        let (w, h) = s
            .split_once(':')
            .ok_or_else(|| format!("expected a preset name or W:H, got '{s}'"))?;
        let w: u32 = w.trim().parse().map_err(|_| format!("bad width in '{s}'"))?;
        let h: u32 = h.trim().parse().map_err(|_| format!("bad height in '{s}'"))?;
        Self::new(w, h).map_err(|e| e.to_string())
    }
}

/// Border width in pixels, parsed from a preset name or a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderWidth(pub u32);

impl BorderWidth {
    pub const THIN: BorderWidth = BorderWidth(25);
    pub const MEDIUM: BorderWidth = BorderWidth(50);
    pub const THICK: BorderWidth = BorderWidth(80);
    pub const POLAROID: BorderWidth = BorderWidth(100);

    pub const PRESETS: [(&'static str, BorderWidth); 4] = [
        ("thin", Self::THIN),
        ("medium", Self::MEDIUM),
        ("thick", Self::THICK),
        ("polaroid", Self::POLAROID),
    ];

    pub fn px(self) -> u32 {
        self.0
    }

    pub fn preset_name(self) -> Option<&'static str> {
        Self::PRESETS
            .iter()
            .find(|(_, preset)| *preset == self)
            .map(|(name, _)| *name)
    }
}

impl fmt::Display for BorderWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px", self.0)
    }
}

/// Parses a preset name (`thick`), `80` or `80px`.
impl FromStr for BorderWidth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some((_, preset)) = Self::PRESETS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
        {
            return Ok(*preset);
        }
        s.trim_end_matches("px")
            .trim()
            .parse()
            .map(BorderWidth)
            .map_err(|_| format!("expected thin, medium, thick, polaroid or a width in px, got '{s}'"))
    }
}

/// Opaque sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const CREAM: Color = Color::rgb(0xf5, 0xf5, 0xdc);
    pub const GRAY: Color = Color::rgb(0x66, 0x66, 0x66);
    /// Border stroked around the full-view composite.
    pub const FRAME_STROKE: Color = Color::rgb(0xee, 0xee, 0xee);
    /// Fill of the placeholder shown before an image is loaded.
    pub const PLACEHOLDER: Color = Color::rgb(0xf0, 0xf0, 0xf0);

    /// Named swatches offered for border and caption colours.
    pub const PRESETS: [(&'static str, Color); 4] = [
        ("white", Self::WHITE),
        ("black", Self::BLACK),
        ("cream", Self::CREAM),
        ("gray", Self::GRAY),
    ];

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `#rgb` (the leading `#` is optional).
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().trim_start_matches('#');
        let channel = |i: usize, len: usize| u8::from_str_radix(hex.get(i..i + len)?, 16).ok();
        match hex.len() {
            6 => Some(Self::rgb(channel(0, 2)?, channel(2, 2)?, channel(4, 2)?)),
            3 => {
                let (r, g, b) = (channel(0, 1)?, channel(1, 1)?, channel(2, 1)?);
                Some(Self::rgb(r * 17, g * 17, b * 17))
            }
            _ => None,
        }
    }

    /// Parse a swatch name (`cream`, any case) or a hex colour.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::PRESETS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
            .map(|(_, color)| *color)
            .or_else(|| Self::from_hex(s))
    }

    pub fn preset_name(self) -> Option<&'static str> {
        Self::PRESETS
            .iter()
            .find(|(_, preset)| *preset == self)
            .map(|(name, _)| *name)
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, 0xff])
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| {
            format!("invalid colour '{value}', expected a swatch name or #rrggbb")
        })
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_string())
    }
}

/// Axis-aligned rectangle in pixel units.
///
/// Coordinates stay fractional until a surface rasterizes them: slice source
/// bands start at `i * slice_source_width`, which is rarely integral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle anchored at the origin.
    pub fn sized(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Grow by `amount` on every side.
    pub fn inflate(&self, amount: f64) -> Self {
        Self::new(
            self.x - amount,
            self.y - amount,
            self.width + 2.0 * amount,
            self.height + 2.0 * amount,
        )
    }
}
