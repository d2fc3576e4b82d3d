//! Carousel slicing.
//!
//! Turns one wide image into an Instagram carousel: a full-view composite
//! showing the whole picture, followed by N tiles that each carry one
//! vertical band of the source.
//!
//! ## Output
//!
//! ```text
//! slice_00_full_view.jpg   # whole image centred on a 1080x1350 canvas
//! slice_1_of_4.jpg         # band 1, scaled to the tile size
//! slice_2_of_4.jpg
//! slice_3_of_4.jpg
//! slice_4_of_4.jpg
//! ```
//!
//! Every file is encoded before the [`SliceSet`] is returned. If any encode
//! fails the whole batch fails and nothing is returned, so a caller never
//! holds a partial carousel.
//!
//! ## Progress
//!
//! [`generate_slices`] optionally reports each rendered file over an
//! `mpsc` channel; the CLI prints them from a separate thread as they
//! arrive.

use crate::imaging::operations::{FullViewParams, paint_full_view, paint_slice};
use crate::imaging::{
    BackendError, DrawingSurface, FitParams, ImageSource, Quality, SliceSpec, SurfaceBackend,
    compute_slice_spec,
};
use crate::naming::{FULL_VIEW_FILENAME, slice_filename};
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use zip::write::{SimpleFileOptions, ZipWriter};

/// Everything that shapes a carousel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceParams {
    pub fit: FitParams,
    pub full_view: FullViewParams,
    pub slice_quality: Quality,
    pub full_view_quality: Quality,
}

impl Default for SliceParams {
    fn default() -> Self {
        Self {
            fit: FitParams::default(),
            full_view: FullViewParams::default(),
            slice_quality: Quality::new(90),
            full_view_quality: Quality::new(95),
        }
    }
}

/// One encoded carousel file.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSlice {
    pub encoded_image: Vec<u8>,
    pub filename: String,
    pub width: u32,
    pub height: u32,
}

/// A complete carousel: the full view (slot 0) followed by the tiles.
#[derive(Debug, Clone)]
pub struct SliceSet {
    pub spec: SliceSpec,
    pub full_view: RenderedSlice,
    pub slices: Vec<RenderedSlice>,
}

/// Progress reported while a carousel renders.
#[derive(Debug, Clone, PartialEq)]
pub enum SliceEvent {
    Planned {
        num_slices: u32,
        target_width: u32,
        target_height: u32,
        slice_source_width: f64,
    },
    FullViewRendered {
        filename: String,
        bytes: usize,
    },
    SliceRendered {
        index: u32,
        total: u32,
        filename: String,
        bytes: usize,
    },
}

fn send(events: &Option<Sender<SliceEvent>>, event: SliceEvent) {
    if let Some(tx) = events {
        // A dropped receiver only means nobody is watching.
        tx.send(event).ok();
    }
}

/// Render the full view and every tile.
pub fn generate_slices<B: SurfaceBackend>(
    backend: &B,
    image: &ImageSource,
    high_res: bool,
    params: &SliceParams,
    events: Option<Sender<SliceEvent>>,
) -> Result<SliceSet, BackendError> {
    let spec = compute_slice_spec(
        image.natural_width(),
        image.natural_height(),
        high_res,
        &params.fit,
    )?;
    send(
        &events,
        SliceEvent::Planned {
            num_slices: spec.num_slices,
            target_width: spec.target_width,
            target_height: spec.target_height,
            slice_source_width: spec.slice_source_width,
        },
    );

    let full_view = render_full_view(backend, image, params)?;
    send(
        &events,
        SliceEvent::FullViewRendered {
            filename: full_view.filename.clone(),
            bytes: full_view.encoded_image.len(),
        },
    );

    let mut slices = Vec::with_capacity(spec.num_slices as usize);
    for (index, source) in spec.source_rects().enumerate() {
        let index = index as u32;
        let mut surface = backend.create_surface(spec.target_width, spec.target_height)?;
        paint_slice(
            &mut surface,
            image,
            source,
            spec.target_width,
            spec.target_height,
        )?;
        let slice = RenderedSlice {
            encoded_image: surface.encode_jpeg(params.slice_quality)?,
            filename: slice_filename(index, spec.num_slices),
            width: spec.target_width,
            height: spec.target_height,
        };
        send(
            &events,
            SliceEvent::SliceRendered {
                index,
                total: spec.num_slices,
                filename: slice.filename.clone(),
                bytes: slice.encoded_image.len(),
            },
        );
        slices.push(slice);
    }

    Ok(SliceSet {
        spec,
        full_view,
        slices,
    })
}

fn render_full_view<B: SurfaceBackend>(
    backend: &B,
    image: &ImageSource,
    params: &SliceParams,
) -> Result<RenderedSlice, BackendError> {
    let FullViewParams { width, height, .. } = params.full_view;
    let mut surface = backend.create_surface(width, height)?;
    paint_full_view(&mut surface, image, &params.full_view)?;
    Ok(RenderedSlice {
        encoded_image: surface.encode_jpeg(params.full_view_quality)?,
        filename: FULL_VIEW_FILENAME.to_string(),
        width,
        height,
    })
}

impl SliceSet {
    /// Full view first, then the tiles in order.
    pub fn files(&self) -> impl Iterator<Item = &RenderedSlice> {
        std::iter::once(&self.full_view).chain(self.slices.iter())
    }

    /// Number of files including the full view.
    pub fn file_count(&self) -> usize {
        1 + self.slices.len()
    }

    pub fn total_bytes(&self) -> usize {
        self.files().map(|f| f.encoded_image.len()).sum()
    }

    /// Package every file into a ZIP archive, in carousel order.
    pub fn write_archive<W: Write + Seek>(&self, writer: W) -> Result<W, BackendError> {
        let mut zip = ZipWriter::new(writer);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        for file in self.files() {
            zip.start_file(file.filename.as_str(), options)?;
            zip.write_all(&file.encoded_image)?;
        }
        Ok(zip.finish()?)
    }

    /// Write every file into `dir`, creating it if needed.
    pub fn write_to_dir(&self, dir: &Path) -> Result<Vec<PathBuf>, BackendError> {
        std::fs::create_dir_all(dir)?;
        self.files()
            .map(|file| {
                let path = dir.join(&file.filename);
                std::fs::write(&path, &file.encoded_image)?;
                Ok(path)
            })
            .collect()
    }
}
