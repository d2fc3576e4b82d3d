//! Caption composition and fitting.
//!
//! The overlay caption is a single line such as `ƒ/2.8 • 1/125s • ISO 400`,
//! built from the selected [`ExifField`]s and shrunk until it fits the frame
//! width. Measuring is injected, so layout runs the same against a real
//! font, a mock surface, or a plain closure in tests.

use crate::metadata::{ExifField, MetadataRecord};

/// Smallest font size [`fit_text_to_width`] will shrink to.
pub const DEFAULT_MIN_FONT_SIZE: f32 = 8.0;

/// Build the caption line.
///
/// With a record, each selected field contributes its overlay-formatted
/// value and fields missing from the record are skipped. Without one (no
/// image loaded yet) the sample values stand in.
///
/// ```
/// # use exif_slicer::caption::compose_overlay_line;
/// # use exif_slicer::metadata::ExifField;
/// let line = compose_overlay_line(&[ExifField::FNumber, ExifField::ExposureTime], None, " • ");
/// assert_eq!(line, "ƒ/2.8 • 1/125s");
/// ```
pub fn compose_overlay_line(
    selected: &[ExifField],
    record: Option<&MetadataRecord>,
    separator: &str,
) -> String {
    selected
        .iter()
        .filter_map(|&field| match record {
            Some(record) => record.field(field).map(|raw| field.format_overlay(raw)),
            None => field.sample_value().map(str::to_string),
        })
        .filter(|value| !value.trim().is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Largest font size in `[min_font_size, initial_font_size]`, stepping down
/// by one, at which `measure(text, size)` fits `max_width`.
///
/// Returns `min_font_size` when even that overflows; the caller draws it
/// anyway. An `initial_font_size` below the minimum is returned unchanged.
pub fn fit_text_to_width<F>(
    text: &str,
    initial_font_size: f32,
    max_width: f32,
    mut measure: F,
    min_font_size: f32,
) -> f32
where
    F: FnMut(&str, f32) -> f32,
{
    let mut size = initial_font_size;
    while size > min_font_size && measure(text, size) > max_width {
        size = (size - 1.0).max(min_font_size);
    }
    size
}

/// A caption ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionLayout {
    pub text: String,
    pub font_size: f32,
}
