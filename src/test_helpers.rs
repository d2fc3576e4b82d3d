//! Shared test utilities for the exif-slicer test suite.
//!
//! Synthetic images are generated in memory so tests need no fixture files.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let source = gradient_source(300, 100);
//! let bytes = jpeg_bytes(300, 100);
//! let tagged = jpeg_with_exif(300, 100, &[exif_field(exif::Tag::Make, exif_ascii("Canon"))]);
//! ```

use crate::imaging::ImageSource;
use image::{ImageEncoder, Rgba, RgbaImage};
use std::path::{Path, PathBuf};

// =========================================================================
// Synthetic pixels
// =========================================================================

/// Left-to-right red gradient: red is 0 in the first column and 255 in the
/// last. Fully opaque.
pub fn gradient_image(width: u32, height: u32) -> RgbaImage {
    let span = width.saturating_sub(1).max(1);
    RgbaImage::from_fn(width, height, |x, _| {
        Rgba([(x * 255 / span) as u8, 0x40, 0x80, 0xff])
    })
}

pub fn gradient_source(width: u32, height: u32) -> ImageSource {
    ImageSource::from_rgba(gradient_image(width, height)).unwrap()
}

// =========================================================================
// Encoded files
// =========================================================================

/// JPEG encoding of [`gradient_image`]. Carries no EXIF block.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let rgb = image::DynamicImage::ImageRgba8(gradient_image(width, height)).to_rgb8();
    let mut out = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, 90)
        .write_image(rgb.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    out
}

/// [`jpeg_bytes`] with an EXIF APP1 segment carrying `fields`, placed
/// right after the SOI marker.
pub fn jpeg_with_exif(width: u32, height: u32, fields: &[exif::Field]) -> Vec<u8> {
    let mut writer = exif::experimental::Writer::new();
    for field in fields {
        writer.push_field(field);
    }
    let mut tiff = std::io::Cursor::new(Vec::new());
    writer.write(&mut tiff, false).unwrap();
    let tiff = tiff.into_inner();

    let jpeg = jpeg_bytes(width, height);
    let segment_len = u16::try_from(2 + 6 + tiff.len()).unwrap();
    let mut out = Vec::with_capacity(jpeg.len() + tiff.len() + 10);
    out.extend_from_slice(&jpeg[..2]);
    out.extend_from_slice(&[0xff, 0xe1]);
    out.extend_from_slice(&segment_len.to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(&tiff);
    out.extend_from_slice(&jpeg[2..]);
    out
}

/// An EXIF field in the primary image.
pub fn exif_field(tag: exif::Tag, value: exif::Value) -> exif::Field {
    exif::Field {
        tag,
        ifd_num: exif::In::PRIMARY,
        value,
    }
}

pub fn exif_ascii(s: &str) -> exif::Value {
    exif::Value::Ascii(vec![s.as_bytes().to_vec()])
}

pub fn exif_rationals(parts: &[(u32, u32)]) -> exif::Value {
    exif::Value::Rational(
        parts
            .iter()
            .map(|&(num, denom)| exif::Rational { num, denom })
            .collect(),
    )
}

/// Write a synthetic JPEG into `dir` and return its path.
pub fn write_test_jpeg(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, jpeg_bytes(width, height)).unwrap();
    path
}
