//! End-to-end tests through the public API with the pixel backend.

use exif_slicer::config::{AppConfig, OverlayConfig};
use exif_slicer::imaging::{
    AspectRatio, ImageSource, RustBackend, decode_image, paint_sample_preview,
    render_overlay_export,
};
use exif_slicer::metadata::{MetadataRecord, RawValue, read_metadata};
use exif_slicer::naming::{ARCHIVE_FILENAME, FULL_VIEW_FILENAME};
use exif_slicer::session::Session;
use exif_slicer::slices::{SliceEvent, SliceParams, generate_slices};
use image::codecs::jpeg::JpegEncoder;
use image::{ImageBuffer, Rgb};
use std::io::Cursor;
use std::sync::mpsc;
use tempfile::TempDir;

/// A horizontal gradient JPEG with no EXIF block.
fn panorama_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([(x * 255 / width) as u8, (y * 255 / height) as u8, 128])
    });
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, 90)
        .encode_image(&img)
        .unwrap();
    bytes
}

fn panorama(width: u32, height: u32) -> ImageSource {
    decode_image(&panorama_jpeg(width, height)).unwrap()
}

fn decoded_size(bytes: &[u8]) -> (u32, u32) {
    let img = image::load_from_memory(bytes).unwrap();
    (img.width(), img.height())
}

#[test]
fn high_res_panorama_slices_into_native_height_tiles() {
    let source = panorama(600, 200);
    let set = generate_slices(
        &RustBackend::new().unwrap(),
        &source,
        true,
        &SliceParams::default(),
        None,
    )
    .unwrap();

    // 200px tall → 160×200 tiles, ceil(600 / 160) = 4.
    assert_eq!(set.spec.num_slices, 4);
    assert_eq!(set.slices.len(), 4);
    assert_eq!(decoded_size(&set.full_view.encoded_image), (1080, 1350));
    for slice in &set.slices {
        assert_eq!(decoded_size(&slice.encoded_image), (160, 200));
    }
}

#[test]
fn standard_mode_upscales_small_image_into_two_tiles() {
    let source = panorama(500, 500);
    let set = generate_slices(
        &RustBackend::new().unwrap(),
        &source,
        false,
        &SliceParams::default(),
        None,
    )
    .unwrap();

    assert_eq!(set.spec.num_slices, 2);
    assert_eq!(set.spec.slice_source_width, 250.0);
    for slice in &set.slices {
        assert_eq!(decoded_size(&slice.encoded_image), (1080, 1350));
    }
}

#[test]
fn archive_lists_full_view_first_then_tiles_in_order() {
    let source = panorama(600, 200);
    let set = generate_slices(
        &RustBackend::new().unwrap(),
        &source,
        true,
        &SliceParams::default(),
        None,
    )
    .unwrap();

    let cursor = set.write_archive(Cursor::new(Vec::new())).unwrap();
    let mut archive = zip::ZipArchive::new(Cursor::new(cursor.into_inner())).unwrap();
    let names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();

    assert_eq!(
        names,
        vec![
            FULL_VIEW_FILENAME,
            "slice_1_of_4.jpg",
            "slice_2_of_4.jpg",
            "slice_3_of_4.jpg",
            "slice_4_of_4.jpg",
        ]
    );
}

#[test]
fn progress_events_arrive_in_render_order() {
    let source = panorama(400, 200);
    let (tx, rx) = mpsc::channel();
    generate_slices(
        &RustBackend::new().unwrap(),
        &source,
        true,
        &SliceParams::default(),
        Some(tx),
    )
    .unwrap();

    let events: Vec<SliceEvent> = rx.iter().collect();
    assert!(matches!(events[0], SliceEvent::Planned { num_slices: 3, .. }));
    assert!(matches!(events[1], SliceEvent::FullViewRendered { .. }));
    assert!(matches!(
        events.last(),
        Some(SliceEvent::SliceRendered {
            index: 2,
            total: 3,
            ..
        })
    ));
    assert_eq!(events.len(), 5);
}

#[test]
fn overlay_export_without_exif_has_border_but_no_caption() {
    let source = panorama(600, 200);
    let record = read_metadata(&panorama_jpeg(600, 200));
    assert!(record.is_empty());

    let overlay = render_overlay_export(
        &RustBackend::new().unwrap(),
        &source,
        Some(&record),
        &OverlayConfig::default(),
        800,
    )
    .unwrap();

    assert_eq!((overlay.width, overlay.height), (680, 280));
    assert_eq!(decoded_size(&overlay.encoded), (680, 280));
    assert!(overlay.caption.is_none());
}

#[test]
fn overlay_export_paints_caption_in_bottom_band() {
    let source = panorama(600, 200);
    let record: MetadataRecord = [("FNumber", RawValue::Number(2.8))].into_iter().collect();

    let overlay = render_overlay_export(
        &RustBackend::new().unwrap(),
        &source,
        Some(&record),
        &OverlayConfig::default(),
        800,
    )
    .unwrap();
    assert_eq!(overlay.caption.as_ref().unwrap().text, "ƒ/2.8");

    // Canvas 680×280: image rows 40..240, caption band 240..280.
    let decoded = image::load_from_memory(&overlay.encoded).unwrap().to_rgb8();
    let dark: Vec<u32> = decoded
        .enumerate_pixels()
        .filter(|(_, y, p)| *y >= 242 && *y < 278 && p.0.iter().all(|c| *c < 100))
        .map(|(x, _, _)| x)
        .collect();
    assert!(dark.len() > 10, "only {} dark pixels in caption band", dark.len());
    let min_x = *dark.iter().min().unwrap();
    let max_x = *dark.iter().max().unwrap();
    let mid_x = (min_x + max_x) as f64 / 2.0;
    assert!((mid_x - 340.0).abs() <= 5.0, "caption ink x {min_x}..{max_x}");
}

#[test]
fn overlay_export_pads_to_square() {
    let source = panorama(600, 200);
    let mut config = OverlayConfig::default();
    config.set_aspect_ratio(Some(AspectRatio::SQUARE));

    let overlay = render_overlay_export(
        &RustBackend::new().unwrap(),
        &source,
        Some(&MetadataRecord::new()),
        &config,
        800,
    )
    .unwrap();

    assert_eq!((overlay.width, overlay.height), (680, 680));
}

#[test]
fn sample_preview_uses_sample_caption() {
    let preview =
        paint_sample_preview(&RustBackend::new().unwrap(), &OverlayConfig::default(), 400).unwrap();

    assert_eq!((preview.width, preview.height), (480, 380));
    let caption = preview.caption.unwrap();
    assert_eq!(caption.text, "ƒ/2.8 • 1/125s • ISO 400 • 85mm");
    assert!(caption.font_size <= 16.0);
}

#[tokio::test]
async fn session_loads_file_and_writes_carousel() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("pano.jpg");
    std::fs::write(&path, panorama_jpeg(600, 200)).unwrap();

    let mut session = Session::new(RustBackend::new().unwrap(), AppConfig::default());
    let image = session.load_file(&path).await.unwrap();
    assert_eq!(image.name, "pano.jpg");
    assert_eq!(image.mime, "image/jpeg");

    let set = session.generate_slices(true, None).unwrap();
    let out = tmp.path().join("out");
    let written = set.write_to_dir(&out).unwrap();
    assert_eq!(written.len(), 5);
    assert!(out.join(FULL_VIEW_FILENAME).exists());
    assert!(out.join("slice_4_of_4.jpg").exists());

    let archive = std::fs::File::create(tmp.path().join(ARCHIVE_FILENAME)).unwrap();
    set.write_archive(archive).unwrap();
    assert!(tmp.path().join(ARCHIVE_FILENAME).exists());
}
