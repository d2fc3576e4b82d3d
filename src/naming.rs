//! Output filename conventions.
//!
//! All generated files follow fixed patterns so that a carousel sorts
//! correctly in any file browser and uploads in the intended order:
//!
//! - `slice_00_full_view.jpg`: the full-view composite, always first
//! - `slice_1_of_4.jpg` … `slice_4_of_4.jpg`: the tiles, 1-based
//! - `exif-overlay-1718000000000.jpg`: an overlay export, stamped with the
//!   export time in Unix milliseconds

use std::time::{SystemTime, UNIX_EPOCH};

/// Filename of the full-view composite.
pub const FULL_VIEW_FILENAME: &str = "slice_00_full_view.jpg";

/// Name of the ZIP archive holding a whole carousel.
pub const ARCHIVE_FILENAME: &str = "instagram_slices.zip";

/// Filename of tile `index` (0-based) out of `total`.
///
/// - `slice_filename(0, 4)` → `"slice_1_of_4.jpg"`
/// - `slice_filename(3, 4)` → `"slice_4_of_4.jpg"`
pub fn slice_filename(index: u32, total: u32) -> String {
    format!("slice_{}_of_{}.jpg", index + 1, total)
}

/// Filename of an overlay export made at `unix_ms`.
pub fn overlay_export_filename(unix_ms: u128) -> String {
    format!("exif-overlay-{unix_ms}.jpg")
}

/// Filename of an overlay export made now.
pub fn overlay_export_filename_now() -> String {
    let unix_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    overlay_export_filename(unix_ms)
}
