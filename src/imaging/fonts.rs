//! Caption font resolution.
//!
//! A caption font comes from the first source that yields a usable face:
//!
//! 1. `overlay.font_path`, an explicit TrueType/OpenType file. A bad file is
//!    an error, not a fallback.
//! 2. `overlay.font_family`, a CSS-style list (`"Roboto, sans-serif"`)
//!    looked up among the installed system fonts with `fontdb`.
//! 3. The bundled DejaVu Sans, so a caption is always drawable.

use super::backend::BackendError;
use rusttype::Font;
use std::fmt;
use std::path::{Path, PathBuf};

/// DejaVu Sans, Bitstream Vera license (see `assets/DejaVuSans-LICENSE.txt`).
static BUNDLED_FONT: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

pub const BUNDLED_FONT_NAME: &str = "DejaVu Sans";

/// Where a caption font came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontOrigin {
    File(PathBuf),
    /// Installed face matching one of the requested families.
    System(String),
    Bundled,
}

impl fmt::Display for FontOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontOrigin::File(path) => write!(f, "{}", path.display()),
            FontOrigin::System(name) => write!(f, "{name} (system)"),
            FontOrigin::Bundled => write!(f, "{BUNDLED_FONT_NAME} (bundled)"),
        }
    }
}

/// A parsed caption face and its origin.
#[derive(Clone)]
pub struct LoadedFont {
    pub font: Font<'static>,
    pub origin: FontOrigin,
}

/// The bundled face.
pub fn bundled_font() -> Result<LoadedFont, BackendError> {
    let font = Font::try_from_bytes(BUNDLED_FONT)
        .ok_or_else(|| BackendError::Font("bundled font is unreadable".into()))?;
    Ok(LoadedFont {
        font,
        origin: FontOrigin::Bundled,
    })
}

/// Parse a font file.
pub fn font_from_file(path: &Path) -> Result<LoadedFont, BackendError> {
    let bytes = std::fs::read(path)?;
    let font = Font::try_from_vec(bytes).ok_or_else(|| {
        BackendError::Font(format!(
            "{}: not a usable TrueType/OpenType font",
            path.display()
        ))
    })?;
    Ok(LoadedFont {
        font,
        origin: FontOrigin::File(path.to_path_buf()),
    })
}

/// Split a CSS-style family list into names, dropping quotes and blanks.
///
/// `"'Helvetica Neue', Roboto, sans-serif"` → `["Helvetica Neue", "Roboto", "sans-serif"]`
pub fn parse_family_list(families: &str) -> Vec<String> {
    families
        .split(',')
        .map(|name| name.trim().trim_matches(|c| c == '"' || c == '\'').trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn to_family(name: &str) -> fontdb::Family<'_> {
    match name.to_ascii_lowercase().as_str() {
        "serif" => fontdb::Family::Serif,
        "sans-serif" => fontdb::Family::SansSerif,
        "monospace" => fontdb::Family::Monospace,
        "cursive" => fontdb::Family::Cursive,
        "fantasy" => fontdb::Family::Fantasy,
        _ => fontdb::Family::Name(name),
    }
}

/// Best regular-weight face for `families` in `db`.
pub fn query_family(db: &fontdb::Database, families: &str) -> Option<LoadedFont> {
    let names = parse_family_list(families);
    let families: Vec<fontdb::Family<'_>> = names.iter().map(|n| to_family(n)).collect();
    if families.is_empty() {
        return None;
    }
    let id = db.query(&fontdb::Query {
        families: &families,
        weight: fontdb::Weight::NORMAL,
        stretch: fontdb::Stretch::Normal,
        style: fontdb::Style::Normal,
    })?;
    let name = db
        .face(id)
        .map(|face| face.post_script_name.clone())
        .unwrap_or_default();
    let font = db
        .with_face_data(id, |data, index| {
            Font::try_from_vec_and_index(data.to_vec(), index)
        })
        .flatten()?;
    Some(LoadedFont {
        font,
        origin: FontOrigin::System(name),
    })
}

/// Resolve the caption font: explicit file, then system family, then bundled.
pub fn resolve_caption_font(
    families: &str,
    path: Option<&Path>,
) -> Result<LoadedFont, BackendError> {
    if let Some(path) = path {
        return font_from_file(path);
    }
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    match query_family(&db, families) {
        Some(font) => Ok(font),
        None => bundled_font(),
    }
}
