//! EXIF metadata extraction and presentation.
//!
//! ## Raw record
//!
//! [`read_metadata`] turns file bytes into a [`MetadataRecord`]: a map from
//! tag key (`"FNumber"`, `"ExposureTime"`, ...) to a [`RawValue`]. Decoding is
//! delegated to `kamadak-exif`. Files without EXIF, or that are not images at
//! all, produce an empty record; absence of metadata is a normal state, not
//! an error.
//!
//! Rationals arrive in two shapes. Aperture and focal length are reduced to
//! a float (`2.8`), exposure time keeps its `[numerator, denominator]` pair
//! so `1/125` survives exactly. Every formatter accepts both.
//!
//! ## Field catalog
//!
//! [`ExifField`] is the fixed set of fields the tool knows how to present.
//! Each field carries its tag key, a display label, and two formatters:
//!
//! | Field | Display (`info`) | Overlay caption |
//! |---|---|---|
//! | Aperture | `f/2.8` | `ƒ/2.8` |
//! | Shutter speed | `1/125s`, `2s` | `1/125s`, `2"` |
//! | Focal length | `85mm` | `85mm` |
//! | ISO | `400` | `ISO 400` |
//! | Pixel dimensions | `6000px` | — |
//!
//! The overlay variant uses the typographic florin `ƒ` and the seconds mark
//! `"` that photographers print on their frames; the display variant stays
//! plain ASCII.
//!
//! ## Location
//!
//! GPS coordinates are stored as degree/minute/second triples plus a
//! hemisphere reference. [`gps_position`] converts them to signed decimal
//! degrees and [`GpsPosition::map_links`] builds the links the map panel
//! offers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// A single decoded tag value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    Text(String),
    Number(f64),
    /// `[numerator, denominator]`.
    Rational(i64, i64),
    List(Vec<RawValue>),
}

impl RawValue {
    /// Numeric value, if the raw value is (or spells) a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RawValue::Number(n) => Some(*n),
            RawValue::Rational(_, 0) => None,
            RawValue::Rational(num, den) => Some(*num as f64 / *den as f64),
            RawValue::Text(s) => s.trim().parse().ok(),
            RawValue::List(_) => None,
        }
    }

    /// Numbers as floats, lists as comma-joined values.
    pub fn to_plain_string(&self) -> String {
        match self {
            RawValue::Text(s) => s.clone(),
            RawValue::List(items) => items
                .iter()
                .map(RawValue::to_plain_string)
                .collect::<Vec<_>>()
                .join(", "),
            other => other
                .as_f64()
                .map(|n| n.to_string())
                .unwrap_or_else(|| "?".to_string()),
        }
    }
}

/// All tags decoded from one file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MetadataRecord {
    fields: BTreeMap<String, RawValue>,
}

impl MetadataRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: RawValue) {
        self.fields.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.fields.get(key)
    }

    pub fn field(&self, field: ExifField) -> Option<&RawValue> {
        self.get(field.key())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, RawValue)> for MetadataRecord {
    fn from_iter<I: IntoIterator<Item = (K, RawValue)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

/// The catalog of EXIF fields the tool presents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ExifField {
    Make,
    Model,
    LensModel,
    DateTime,
    FNumber,
    ExposureTime,
    IsoSpeed,
    FocalLength,
    FocalLength35mm,
    Flash,
    WhiteBalance,
    ExposureMode,
    MeteringMode,
    ColorSpace,
    PixelXDimension,
    PixelYDimension,
}

impl ExifField {
    /// Fields shown by the metadata display, in display order.
    pub const DISPLAY_FIELDS: [ExifField; 16] = [
        ExifField::Make,
        ExifField::Model,
        ExifField::LensModel,
        ExifField::DateTime,
        ExifField::FNumber,
        ExifField::ExposureTime,
        ExifField::IsoSpeed,
        ExifField::FocalLength,
        ExifField::FocalLength35mm,
        ExifField::Flash,
        ExifField::WhiteBalance,
        ExifField::ExposureMode,
        ExifField::MeteringMode,
        ExifField::ColorSpace,
        ExifField::PixelXDimension,
        ExifField::PixelYDimension,
    ];

    /// Fields offered for the overlay caption, in control order.
    pub const OVERLAY_FIELDS: [ExifField; 7] = [
        ExifField::FNumber,
        ExifField::ExposureTime,
        ExifField::IsoSpeed,
        ExifField::FocalLength,
        ExifField::Make,
        ExifField::Model,
        ExifField::LensModel,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ExifField::Make => "Make",
            ExifField::Model => "Model",
            ExifField::LensModel => "LensModel",
            ExifField::DateTime => "DateTime",
            ExifField::FNumber => "FNumber",
            ExifField::ExposureTime => "ExposureTime",
            ExifField::IsoSpeed => "ISOSpeedRatings",
            ExifField::FocalLength => "FocalLength",
            ExifField::FocalLength35mm => "FocalLengthIn35mmFilm",
            ExifField::Flash => "Flash",
            ExifField::WhiteBalance => "WhiteBalance",
            ExifField::ExposureMode => "ExposureMode",
            ExifField::MeteringMode => "MeteringMode",
            ExifField::ColorSpace => "ColorSpace",
            ExifField::PixelXDimension => "PixelXDimension",
            ExifField::PixelYDimension => "PixelYDimension",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExifField::Make => "Camera Make",
            ExifField::Model => "Camera Model",
            ExifField::LensModel => "Lens Model",
            ExifField::DateTime => "Date Taken",
            ExifField::FNumber => "Aperture",
            ExifField::ExposureTime => "Shutter Speed",
            ExifField::IsoSpeed => "ISO Speed",
            ExifField::FocalLength => "Focal Length",
            ExifField::FocalLength35mm => "Focal Length (35mm equiv.)",
            ExifField::Flash => "Flash",
            ExifField::WhiteBalance => "White Balance",
            ExifField::ExposureMode => "Exposure Mode",
            ExifField::MeteringMode => "Metering Mode",
            ExifField::ColorSpace => "Color Space",
            ExifField::PixelXDimension => "Image Width",
            ExifField::PixelYDimension => "Image Height",
        }
    }

    /// Label of the caption toggle; `None` for fields not offered there.
    pub fn overlay_label(self) -> Option<&'static str> {
        match self {
            ExifField::FNumber => Some("Aperture (f/)"),
            ExifField::ExposureTime => Some("Shutter Speed"),
            ExifField::IsoSpeed => Some("ISO"),
            ExifField::FocalLength => Some("Focal Length"),
            ExifField::Make => Some("Camera Brand"),
            ExifField::Model => Some("Camera Model"),
            ExifField::LensModel => Some("Lens"),
            _ => None,
        }
    }

    /// Caption value shown before a real image is loaded.
    pub fn sample_value(self) -> Option<&'static str> {
        match self {
            ExifField::FNumber => Some("ƒ/2.8"),
            ExifField::ExposureTime => Some("1/125s"),
            ExifField::IsoSpeed => Some("ISO 400"),
            ExifField::FocalLength => Some("85mm"),
            ExifField::Make => Some("Canon"),
            ExifField::Model => Some("EOS R5"),
            ExifField::LensModel => Some("RF 85mm f/2 Macro IS STM"),
            _ => None,
        }
    }

    /// Exposure fields start selected; camera and gear fields do not.
    pub fn selected_by_default(self) -> bool {
        self.overlay_label().is_some()
            && !matches!(
                self,
                ExifField::Make | ExifField::Model | ExifField::LensModel
            )
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::DISPLAY_FIELDS.into_iter().find(|f| f.key() == key)
    }

    /// Human-readable value for the metadata display.
    pub fn format_display(self, value: &RawValue) -> String {
        let plain = value.to_plain_string();
        match self {
            ExifField::FNumber if plain.starts_with("f/") => plain,
            ExifField::FNumber => format!("f/{plain}"),
            ExifField::ExposureTime => match value.as_f64() {
                Some(secs) if secs > 0.0 && secs < 1.0 => {
                    format!("1/{}s", (1.0 / secs).round())
                }
                _ => format!("{plain}s"),
            },
            ExifField::FocalLength | ExifField::FocalLength35mm => format!("{plain}mm"),
            ExifField::PixelXDimension | ExifField::PixelYDimension => format!("{plain}px"),
            _ => plain,
        }
    }

    /// Caption value for the bordered overlay.
    pub fn format_overlay(self, value: &RawValue) -> String {
        let display = self.format_display(value);
        match self {
            ExifField::FNumber => {
                let bare = display.strip_prefix("f/").unwrap_or(&display);
                if bare.starts_with("ƒ/") {
                    bare.to_string()
                } else {
                    format!("ƒ/{bare}")
                }
            }
            ExifField::ExposureTime => overlay_shutter(&display),
            ExifField::FocalLength if !display.ends_with("mm") => format!("{display}mm"),
            ExifField::IsoSpeed => {
                let iso = strip_count_suffix(&display);
                if iso.starts_with("ISO") {
                    iso.to_string()
                } else {
                    format!("ISO {iso}")
                }
            }
            _ => display,
        }
    }
}

/// Shutter speed: fractions keep the `s` suffix, whole seconds get `"`.
fn overlay_shutter(display: &str) -> String {
    let value = display.strip_suffix('s').unwrap_or(display);
    let numeric = value.parse::<f64>().ok();
    if value.contains('/') {
        format!("{value}s")
    } else if value.contains('.') {
        match numeric {
            Some(secs) if secs >= 1.0 => format!("{secs}\""),
            Some(secs) if secs > 0.0 => format!("1/{}s", (1.0 / secs).round()),
            _ => value.to_string(),
        }
    } else if numeric.is_some_and(|secs| secs >= 1.0) {
        format!("{value}\"")
    } else {
        value.to_string()
    }
}

/// Drop a trailing parenthetical count: `"160 (160)"` → `"160"`.
fn strip_count_suffix(s: &str) -> &str {
    let Some(inner) = s.strip_suffix(')') else {
        return s;
    };
    match inner.rfind('(') {
        Some(open)
            if open + 1 < inner.len()
                && inner[open + 1..].bytes().all(|b| b.is_ascii_digit()) =>
        {
            inner[..open].trim_end()
        }
        _ => s,
    }
}

impl fmt::Display for ExifField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ExifField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        // "ISO" is accepted as shorthand on the command line.
        if s.eq_ignore_ascii_case("iso") {
            return Ok(ExifField::IsoSpeed);
        }
        Self::DISPLAY_FIELDS
            .into_iter()
            .find(|f| f.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown EXIF field '{s}'"))
    }
}

impl TryFrom<String> for ExifField {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ExifField> for String {
    fn from(field: ExifField) -> Self {
        field.key().to_string()
    }
}

/// `(label, value)` pairs for every catalogued field present in `record`.
pub fn display_entries(record: &MetadataRecord) -> Vec<(&'static str, String)> {
    ExifField::DISPLAY_FIELDS
        .into_iter()
        .filter_map(|field| {
            record
                .field(field)
                .map(|value| (field.label(), field.format_display(value)))
        })
        .collect()
}

// =============================================================================
// Decoding
// =============================================================================

/// How a tag's value is carried into the record.
#[derive(Clone, Copy)]
enum Kind {
    /// ASCII tags verbatim; enumerated tags via their descriptive text.
    Text,
    Number,
    Rational,
    /// Degree/minute/second triple.
    Dms,
}

const TAGS: &[(&str, exif::Tag, Kind)] = &[
    ("Make", exif::Tag::Make, Kind::Text),
    ("Model", exif::Tag::Model, Kind::Text),
    ("LensModel", exif::Tag::LensModel, Kind::Text),
    ("DateTime", exif::Tag::DateTimeOriginal, Kind::Text),
    ("FNumber", exif::Tag::FNumber, Kind::Number),
    ("ExposureTime", exif::Tag::ExposureTime, Kind::Rational),
    ("ISOSpeedRatings", exif::Tag::PhotographicSensitivity, Kind::Number),
    ("FocalLength", exif::Tag::FocalLength, Kind::Number),
    ("FocalLengthIn35mmFilm", exif::Tag::FocalLengthIn35mmFilm, Kind::Number),
    ("Flash", exif::Tag::Flash, Kind::Text),
    ("WhiteBalance", exif::Tag::WhiteBalance, Kind::Text),
    ("ExposureMode", exif::Tag::ExposureMode, Kind::Text),
    ("MeteringMode", exif::Tag::MeteringMode, Kind::Text),
    ("ColorSpace", exif::Tag::ColorSpace, Kind::Text),
    ("PixelXDimension", exif::Tag::PixelXDimension, Kind::Number),
    ("PixelYDimension", exif::Tag::PixelYDimension, Kind::Number),
    ("GPSLatitude", exif::Tag::GPSLatitude, Kind::Dms),
    ("GPSLatitudeRef", exif::Tag::GPSLatitudeRef, Kind::Text),
    ("GPSLongitude", exif::Tag::GPSLongitude, Kind::Dms),
    ("GPSLongitudeRef", exif::Tag::GPSLongitudeRef, Kind::Text),
];

/// Read EXIF tags from raw file bytes.
///
/// Never fails: bytes without a readable EXIF block yield an empty record.
pub fn read_metadata(bytes: &[u8]) -> MetadataRecord {
    let mut cursor = std::io::Cursor::new(bytes);
    let Ok(exif) = exif::Reader::new().read_from_container(&mut cursor) else {
        return MetadataRecord::new();
    };

    let mut record = MetadataRecord::new();
    for &(key, tag, kind) in TAGS {
        let field = exif.get_field(tag, exif::In::PRIMARY).or_else(|| {
            // Older cameras only write the modification timestamp.
            (tag == exif::Tag::DateTimeOriginal)
                .then(|| exif.get_field(exif::Tag::DateTime, exif::In::PRIMARY))
                .flatten()
        });
        if let Some(value) = field.and_then(|f| convert(f, kind)) {
            record.insert(key, value);
        }
    }
    record
}

fn convert(field: &exif::Field, kind: Kind) -> Option<RawValue> {
    use exif::Value;

    match (kind, &field.value) {
        (Kind::Text, Value::Ascii(parts)) => parts
            .first()
            .map(|bytes| String::from_utf8_lossy(bytes).trim_matches('\0').trim().to_string())
            .filter(|s| !s.is_empty())
            .map(RawValue::Text),
        (Kind::Text, _) => Some(RawValue::Text(
            field.display_value().to_string().trim_matches('"').to_string(),
        )),
        (Kind::Rational, Value::Rational(v)) => v
            .first()
            .filter(|r| r.denom != 0)
            .map(|r| RawValue::Rational(r.num as i64, r.denom as i64)),
        (Kind::Number | Kind::Rational, Value::Rational(v)) => v
            .first()
            .filter(|r| r.denom != 0)
            .map(|r| RawValue::Number(r.to_f64())),
        (Kind::Number | Kind::Rational, Value::SRational(v)) => v
            .first()
            .filter(|r| r.denom != 0)
            .map(|r| RawValue::Number(r.to_f64())),
        (Kind::Number | Kind::Rational, value) => {
            value.get_uint(0).map(|n| RawValue::Number(n as f64))
        }
        (Kind::Dms, Value::Rational(v)) if v.len() == 3 && v.iter().all(|r| r.denom != 0) => {
            Some(RawValue::List(
                v.iter().map(|r| RawValue::Number(r.to_f64())).collect(),
            ))
        }
        (Kind::Dms, _) => None,
    }
}

// =============================================================================
// Location
// =============================================================================

/// Signed decimal-degree position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GpsPosition {
    pub latitude: f64,
    pub longitude: f64,
}

/// Degrees + minutes/60 + seconds/3600, negated for the southern and
/// western hemispheres.
pub fn convert_dms_to_dd(dms: [f64; 3], reference: &str) -> f64 {
    let dd = dms[0] + dms[1] / 60.0 + dms[2] / 3600.0;
    match reference.trim() {
        "S" | "W" => -dd,
        _ => dd,
    }
}

fn dms(value: &RawValue) -> Option<[f64; 3]> {
    match value {
        RawValue::List(items) if items.len() == 3 => Some([
            items[0].as_f64()?,
            items[1].as_f64()?,
            items[2].as_f64()?,
        ]),
        _ => None,
    }
}

/// Position from the GPS tags, when both coordinates are present.
pub fn gps_position(record: &MetadataRecord) -> Option<GpsPosition> {
    let reference = |key: &str| {
        record
            .get(key)
            .map(RawValue::to_plain_string)
            .unwrap_or_default()
    };
    let latitude = dms(record.get("GPSLatitude")?)?;
    let longitude = dms(record.get("GPSLongitude")?)?;
    Some(GpsPosition {
        latitude: convert_dms_to_dd(latitude, &reference("GPSLatitudeRef")),
        longitude: convert_dms_to_dd(longitude, &reference("GPSLongitudeRef")),
    })
}

impl GpsPosition {
    /// `"lat, lng"` with six decimals, for copying.
    pub fn coordinates_text(&self) -> String {
        format!("{:.6}, {:.6}", self.latitude, self.longitude)
    }

    /// External map services that can show this position.
    pub fn map_links(&self) -> Vec<(&'static str, String)> {
        let (lat, lng) = (self.latitude, self.longitude);
        vec![
            ("Google Maps", format!("https://www.google.com/maps?q={lat},{lng}")),
            ("Apple Maps", format!("https://maps.apple.com/?q={lat},{lng}")),
            ("What3Words", format!("https://what3words.com/{lat},{lng}")),
        ]
    }
}

// =============================================================================
// File information
// =============================================================================

/// MIME type guessed from the file extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "tif" | "tiff" => "image/tiff",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// `(label, value)` rows describing the loaded file.
pub fn format_file_info(name: &str, size_bytes: u64, mime: &str) -> Vec<(&'static str, String)> {
    vec![
        ("File Name", name.to_string()),
        (
            "File Size",
            format!("{:.2} MB", size_bytes as f64 / 1024.0 / 1024.0),
        ),
        ("File Type", mime.to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: f64) -> RawValue {
        RawValue::Number(n)
    }

    fn text(s: &str) -> RawValue {
        RawValue::Text(s.to_string())
    }

    // =========================================================================
    // Display formatting
    // =========================================================================

    #[test]
    fn aperture_display_and_overlay_prefixes_differ() {
        assert_eq!(ExifField::FNumber.format_display(&num(2.8)), "f/2.8");
        assert_eq!(ExifField::FNumber.format_overlay(&num(2.8)), "ƒ/2.8");
    }

    #[test]
    fn aperture_never_double_prefixed() {
        assert_eq!(ExifField::FNumber.format_display(&text("f/4")), "f/4");
        assert_eq!(ExifField::FNumber.format_overlay(&text("f/4")), "ƒ/4");
        assert_eq!(ExifField::FNumber.format_overlay(&text("ƒ/4")), "ƒ/4");
    }

    #[test]
    fn shutter_display_handles_float_and_pair() {
        assert_eq!(ExifField::ExposureTime.format_display(&num(0.008)), "1/125s");
        assert_eq!(
            ExifField::ExposureTime.format_display(&RawValue::Rational(1, 125)),
            "1/125s"
        );
        assert_eq!(ExifField::ExposureTime.format_display(&num(2.0)), "2s");
        assert_eq!(ExifField::ExposureTime.format_display(&num(1.5)), "1.5s");
    }

    #[test]
    fn shutter_overlay_uses_quote_for_long_exposures() {
        let f = ExifField::ExposureTime;
        assert_eq!(f.format_overlay(&RawValue::Rational(1, 125)), "1/125s");
        assert_eq!(f.format_overlay(&num(0.5)), "1/2s");
        assert_eq!(f.format_overlay(&num(2.0)), "2\"");
        assert_eq!(f.format_overlay(&num(2.5)), "2.5\"");
        assert_eq!(f.format_overlay(&RawValue::Rational(30, 1)), "30\"");
    }

    #[test]
    fn shutter_overlay_keeps_text_fraction() {
        assert_eq!(
            ExifField::ExposureTime.format_overlay(&text("1/60")),
            "1/60s"
        );
    }

    #[test]
    fn focal_length_gets_mm_once() {
        assert_eq!(ExifField::FocalLength.format_display(&num(85.0)), "85mm");
        assert_eq!(ExifField::FocalLength.format_overlay(&num(85.0)), "85mm");
        assert_eq!(ExifField::FocalLength35mm.format_display(&num(50.0)), "50mm");
    }

    #[test]
    fn iso_overlay_prefix_and_duplicate_cleanup() {
        assert_eq!(ExifField::IsoSpeed.format_display(&num(400.0)), "400");
        assert_eq!(ExifField::IsoSpeed.format_overlay(&num(400.0)), "ISO 400");
        assert_eq!(
            ExifField::IsoSpeed.format_overlay(&text("160 (160)")),
            "ISO 160"
        );
        assert_eq!(ExifField::IsoSpeed.format_overlay(&text("ISO 800")), "ISO 800");
    }

    #[test]
    fn pixel_dimensions_get_px() {
        assert_eq!(
            ExifField::PixelXDimension.format_display(&num(6000.0)),
            "6000px"
        );
    }

    #[test]
    fn text_fields_pass_through() {
        assert_eq!(ExifField::Make.format_display(&text("Canon")), "Canon");
        assert_eq!(ExifField::Make.format_overlay(&text("Canon")), "Canon");
    }

    #[test]
    fn strip_count_suffix_only_strips_digits() {
        assert_eq!(strip_count_suffix("160 (160)"), "160");
        assert_eq!(strip_count_suffix("Auto (high)"), "Auto (high)");
        assert_eq!(strip_count_suffix("400"), "400");
        assert_eq!(strip_count_suffix("()"), "()");
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    #[test]
    fn keys_round_trip_through_from_key() {
        for field in ExifField::DISPLAY_FIELDS {
            assert_eq!(ExifField::from_key(field.key()), Some(field));
        }
        assert_eq!(ExifField::from_key("GPSLatitude"), None);
    }

    #[test]
    fn parse_accepts_keys_case_insensitively() {
        assert_eq!("fnumber".parse::<ExifField>().unwrap(), ExifField::FNumber);
        assert_eq!("ISO".parse::<ExifField>().unwrap(), ExifField::IsoSpeed);
        assert!("Nope".parse::<ExifField>().is_err());
    }

    #[test]
    fn overlay_fields_all_have_labels_and_samples() {
        for field in ExifField::OVERLAY_FIELDS {
            assert!(field.overlay_label().is_some(), "{field}");
            assert!(field.sample_value().is_some(), "{field}");
        }
        let defaults: Vec<_> = ExifField::OVERLAY_FIELDS
            .into_iter()
            .filter(|f| f.selected_by_default())
            .collect();
        assert_eq!(
            defaults,
            [
                ExifField::FNumber,
                ExifField::ExposureTime,
                ExifField::IsoSpeed,
                ExifField::FocalLength
            ]
        );
    }

    #[test]
    fn display_entries_follow_catalog_order() {
        let record: MetadataRecord = [
            ("FNumber", num(1.8)),
            ("Make", text("Fujifilm")),
            ("GPSLatitude", RawValue::List(vec![num(1.0), num(2.0), num(3.0)])),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            display_entries(&record),
            vec![
                ("Camera Make", "Fujifilm".to_string()),
                ("Aperture", "f/1.8".to_string())
            ]
        );
    }

    #[test]
    fn record_serializes_rationals_as_pairs() {
        let record: MetadataRecord = [("ExposureTime", RawValue::Rational(1, 250))]
            .into_iter()
            .collect();
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"ExposureTime":[1,250]}"#
        );
    }

    // =========================================================================
    // Decoding
    // =========================================================================

    #[test]
    fn read_metadata_without_exif_is_empty() {
        let bytes = crate::test_helpers::jpeg_bytes(16, 16);
        assert!(read_metadata(&bytes).is_empty());
    }

    fn tagged_jpeg() -> Vec<u8> {
        use crate::test_helpers::{exif_ascii, exif_field, exif_rationals, jpeg_with_exif};
        use exif::{Tag, Value};

        let fields = [
            exif_field(Tag::Make, exif_ascii("Canon")),
            exif_field(Tag::DateTime, exif_ascii("2024:05:01 10:30:00")),
            exif_field(Tag::FNumber, exif_rationals(&[(28, 10)])),
            exif_field(Tag::ExposureTime, exif_rationals(&[(1, 125)])),
            exif_field(Tag::PhotographicSensitivity, Value::Short(vec![400])),
            exif_field(Tag::GPSLatitudeRef, exif_ascii("S")),
            exif_field(Tag::GPSLatitude, exif_rationals(&[(33, 1), (52, 1), (48, 10)])),
            exif_field(Tag::GPSLongitudeRef, exif_ascii("E")),
            exif_field(Tag::GPSLongitude, exif_rationals(&[(151, 1), (12, 1), (36, 1)])),
        ];
        jpeg_with_exif(32, 24, &fields)
    }

    #[test]
    fn read_metadata_decodes_camera_tags() {
        let record = read_metadata(&tagged_jpeg());

        assert_eq!(record.get("Make"), Some(&text("Canon")));
        assert_eq!(record.get("FNumber"), Some(&num(2.8)));
        assert_eq!(record.get("ExposureTime"), Some(&RawValue::Rational(1, 125)));
        assert_eq!(record.get("ISOSpeedRatings"), Some(&num(400.0)));
        // DateTimeOriginal is absent, so the modification time stands in.
        assert_eq!(record.get("DateTime"), Some(&text("2024:05:01 10:30:00")));
        assert_eq!(record.get("GPSLatitudeRef"), Some(&text("S")));
        assert_eq!(
            record.get("GPSLongitude"),
            Some(&RawValue::List(vec![num(151.0), num(12.0), num(36.0)]))
        );
        assert_eq!(record.get("Model"), None);
    }

    #[test]
    fn decoded_tags_flow_into_display_and_caption() {
        let record = read_metadata(&tagged_jpeg());

        assert_eq!(
            display_entries(&record),
            vec![
                ("Camera Make", "Canon".to_string()),
                ("Date Taken", "2024:05:01 10:30:00".to_string()),
                ("Aperture", "f/2.8".to_string()),
                ("Shutter Speed", "1/125s".to_string()),
                ("ISO Speed", "400".to_string()),
            ]
        );

        let fields = [
            ExifField::FNumber,
            ExifField::ExposureTime,
            ExifField::IsoSpeed,
            ExifField::FocalLength,
            ExifField::Make,
        ];
        assert_eq!(
            crate::caption::compose_overlay_line(&fields, Some(&record), " • "),
            "ƒ/2.8 • 1/125s • ISO 400 • Canon"
        );
    }

    #[test]
    fn decoded_gps_gives_signed_position() {
        let position = gps_position(&read_metadata(&tagged_jpeg())).unwrap();
        assert!((position.latitude + 33.868).abs() < 1e-9);
        assert!((position.longitude - 151.21).abs() < 1e-9);
        assert_eq!(position.coordinates_text(), "-33.868000, 151.210000");
    }

    #[test]
    fn read_metadata_of_garbage_is_empty() {
        assert!(read_metadata(b"not a jpeg").is_empty());
        assert!(read_metadata(&[]).is_empty());
    }

    // =========================================================================
    // Location
    // =========================================================================

    #[test]
    fn dms_conversion_respects_hemisphere() {
        let dd = convert_dms_to_dd([48.0, 51.0, 29.76], "N");
        assert!((dd - 48.858_266_666).abs() < 1e-6);
        assert!((convert_dms_to_dd([2.0, 17.0, 40.2], "W") + 2.294_5).abs() < 1e-6);
        assert!(convert_dms_to_dd([33.0, 52.0, 0.0], "S") < 0.0);
    }

    #[test]
    fn gps_position_needs_both_coordinates() {
        let mut record = MetadataRecord::new();
        record.insert(
            "GPSLatitude",
            RawValue::List(vec![num(35.0), num(30.0), num(0.0)]),
        );
        record.insert("GPSLatitudeRef", text("N"));
        assert_eq!(gps_position(&record), None);

        record.insert(
            "GPSLongitude",
            RawValue::List(vec![num(139.0), num(45.0), num(0.0)]),
        );
        record.insert("GPSLongitudeRef", text("E"));
        let pos = gps_position(&record).unwrap();
        assert_eq!(pos.latitude, 35.5);
        assert_eq!(pos.longitude, 139.75);
        assert_eq!(pos.coordinates_text(), "35.500000, 139.750000");
    }

    #[test]
    fn map_links_embed_coordinates() {
        let pos = GpsPosition {
            latitude: 35.5,
            longitude: -0.25,
        };
        let links = pos.map_links();
        assert_eq!(links.len(), 3);
        assert_eq!(links[0].1, "https://www.google.com/maps?q=35.5,-0.25");
        assert_eq!(links[2].1, "https://what3words.com/35.5,-0.25");
    }

    // =========================================================================
    // File info
    // =========================================================================

    #[test]
    fn file_info_formats_size_in_megabytes() {
        let rows = format_file_info("dawn.jpg", 3 * 1024 * 1024 + 512 * 1024, "image/jpeg");
        assert_eq!(rows[1], ("File Size", "3.50 MB".to_string()));
        assert_eq!(mime_for_path(Path::new("a/B.JPG")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("notes")), "application/octet-stream");
    }
}
