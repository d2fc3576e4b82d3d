//! CLI output formatting for every command.
//!
//! # Output Format
//!
//! ## Info
//!
//! ```text
//! File
//!     File Name: pano.jpg
//!     File Size: 3.50 MB
//!     File Type: image/jpeg
//!
//! EXIF
//!     Camera Make: Canon
//!     Aperture: f/2.8
//!     Shutter Speed: 1/125s
//!
//! Location
//!     35.500000, 139.750000
//!     Google Maps: https://www.google.com/maps?q=35.5,139.75
//! ```
//!
//! ## Slice
//!
//! ```text
//! Slicing into 4 tiles of 800 × 1000
//!     000 full view → slice_00_full_view.jpg (212 KB)
//!     001 slice_1_of_4.jpg (180 KB)
//!     ...
//! Wrote 5 files (0.93 MB) → out/instagram_slices.zip
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions do no I/O.

use crate::imaging::{Dimensions, FontOrigin, OverlayImage, SliceSpec};
use crate::metadata::{display_entries, format_file_info, gps_position};
use crate::session::LoadedImage;
use crate::slices::{SliceEvent, SliceSet};
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a positional index as 3-digit zero-padded.
fn format_index(pos: u32) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Human-readable byte count: KB below one megabyte, MB with two decimals above.
fn format_bytes(bytes: usize) -> String {
    const MB: f64 = 1024.0 * 1024.0;
    if (bytes as f64) < MB {
        format!("{} KB", (bytes as f64 / 1024.0).round())
    } else {
        format!("{:.2} MB", bytes as f64 / MB)
    }
}

fn format_dims(width: u32, height: u32) -> String {
    format!("{} × {}", width, height)
}

// ============================================================================
// Info
// ============================================================================

/// Format file information, the EXIF table and the GPS links.
pub fn format_info(image: &LoadedImage) -> Vec<String> {
    let mut lines = vec!["File".to_string()];
    for (label, value) in format_file_info(&image.name, image.size_bytes, &image.mime) {
        lines.push(format!("{}{}: {}", indent(1), label, value));
    }
    lines.push(format!(
        "{}Dimensions: {}",
        indent(1),
        format_dims(image.source.natural_width(), image.source.natural_height())
    ));

    lines.push(String::new());
    lines.push("EXIF".to_string());
    let entries = display_entries(&image.metadata);
    if entries.is_empty() {
        lines.push(format!("{}No EXIF data found in this image.", indent(1)));
    }
    for (label, value) in entries {
        lines.push(format!("{}{}: {}", indent(1), label, value));
    }

    if let Some(position) = gps_position(&image.metadata) {
        lines.push(String::new());
        lines.push("Location".to_string());
        lines.push(format!("{}{}", indent(1), position.coordinates_text()));
        for (service, url) in position.map_links() {
            lines.push(format!("{}{}: {}", indent(1), service, url));
        }
    }

    lines
}

/// Machine-readable counterpart of [`format_info`].
pub fn info_json(image: &LoadedImage) -> serde_json::Value {
    let display: serde_json::Map<String, serde_json::Value> = display_entries(&image.metadata)
        .into_iter()
        .map(|(label, value)| (label.to_string(), serde_json::Value::String(value)))
        .collect();
    let location = gps_position(&image.metadata).map(|p| {
        serde_json::json!({
            "latitude": p.latitude,
            "longitude": p.longitude,
            "links": p.map_links()
                .into_iter()
                .map(|(service, url)| serde_json::json!({ "service": service, "url": url }))
                .collect::<Vec<_>>(),
        })
    });

    serde_json::json!({
        "file": {
            "name": image.name,
            "size_bytes": image.size_bytes,
            "type": image.mime,
            "width": image.source.natural_width(),
            "height": image.source.natural_height(),
        },
        "exif": image.metadata,
        "display": display,
        "location": location,
    })
}

pub fn print_info(image: &LoadedImage) {
    for line in format_info(image) {
        println!("{}", line);
    }
}

// ============================================================================
// Slice plan
// ============================================================================

/// Format the image details panel: sizes and slice count.
pub fn format_slice_plan(original: Dimensions, spec: &SliceSpec, high_res: bool) -> Vec<String> {
    let mode = if high_res { "high resolution" } else { "standard" };
    vec![
        "Image Details".to_string(),
        format!(
            "{}Original Size: {}",
            indent(1),
            format_dims(original.width, original.height)
        ),
        format!(
            "{}Scaled Size: {}",
            indent(1),
            format_dims(spec.target_width, spec.target_height)
        ),
        format!("{}Number of Slices: {}", indent(1), spec.num_slices),
        format!(
            "{}Slice Resolution: {}",
            indent(1),
            format_dims(spec.target_width, spec.target_height)
        ),
        format!("{}Mode: {}", indent(1), mode),
    ]
}

pub fn print_slice_plan(original: Dimensions, spec: &SliceSpec, high_res: bool) {
    for line in format_slice_plan(original, spec, high_res) {
        println!("{}", line);
    }
}

// ============================================================================
// Slice progress and results
// ============================================================================

/// Format a single slice progress event as display lines.
pub fn format_slice_event(event: &SliceEvent) -> Vec<String> {
    match event {
        SliceEvent::Planned {
            num_slices,
            target_width,
            target_height,
            ..
        } => vec![format!(
            "Slicing into {} tiles of {}",
            num_slices,
            format_dims(*target_width, *target_height)
        )],
        SliceEvent::FullViewRendered { filename, bytes } => vec![format!(
            "{}{} full view → {} ({})",
            indent(1),
            format_index(0),
            filename,
            format_bytes(*bytes)
        )],
        SliceEvent::SliceRendered {
            index,
            filename,
            bytes,
            ..
        } => vec![format!(
            "{}{} {} ({})",
            indent(1),
            format_index(index + 1),
            filename,
            format_bytes(*bytes)
        )],
    }
}

/// Format the summary line after a carousel was written to `destination`.
pub fn format_slice_output(set: &SliceSet, destination: &Path) -> Vec<String> {
    vec![format!(
        "Wrote {} files ({}) → {}",
        set.file_count(),
        format_bytes(set.total_bytes()),
        destination.display()
    )]
}

pub fn print_slice_output(set: &SliceSet, destination: &Path) {
    for line in format_slice_output(set, destination) {
        println!("{}", line);
    }
}

// ============================================================================
// Overlay
// ============================================================================

/// Format the result of an overlay render.
///
/// The font line is only printed when there is a caption to draw.
pub fn format_overlay_output(image: &OverlayImage, path: &Path, font: &FontOrigin) -> Vec<String> {
    let mut lines = vec![format!(
        "Overlay {} → {} ({})",
        format_dims(image.width, image.height),
        path.display(),
        format_bytes(image.encoded.len())
    )];
    match &image.caption {
        Some(caption) => {
            lines.push(format!(
                "{}Caption: {} ({}px)",
                indent(1),
                caption.text,
                caption.font_size
            ));
            lines.push(format!("{}Font: {}", indent(1), font));
        }
        None => lines.push(format!("{}Caption: none", indent(1))),
    }
    lines
}

pub fn print_overlay_output(image: &OverlayImage, path: &Path, font: &FontOrigin) {
    for line in format_overlay_output(image, path, font) {
        println!("{}", line);
    }
}
