//! Session state.
//!
//! A [`Session`] owns everything derived from the file currently loaded: the
//! decoded pixels, its metadata, the overlay settings being edited and the
//! last rendered carousel. Loading a new file, regenerating or resetting
//! replaces those wholesale; nothing survives the session.
//!
//! Reading the file is the only asynchronous step. Decoding and rendering
//! run synchronously on the decoded [`ImageSource`].
//!
//! ## Render gate
//!
//! Only one export runs at a time. Exports take a [`RenderTicket`] from the
//! session's [`RenderGate`]; a second request while a ticket is live fails
//! with [`SessionError::Busy`]. The ticket re-opens the gate when dropped,
//! including when the render fails.

use crate::config::{AppConfig, OverlayConfig};
use crate::imaging::{
    BackendError, ImageSource, OverlayImage, SurfaceBackend, decode_image, paint_sample_preview,
    render_overlay_export, render_overlay_preview,
};
use crate::metadata::{MetadataRecord, mime_for_path, read_metadata};
use crate::slices::{SliceEvent, SliceSet, generate_slices};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Another export is still running")]
    Busy,
    #[error("No image loaded")]
    NoImage,
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Allows one render at a time.
#[derive(Debug, Clone, Default)]
pub struct RenderGate {
    busy: Arc<AtomicBool>,
}

/// Proof that a render is in flight. Re-opens the gate on drop.
#[derive(Debug)]
pub struct RenderTicket {
    busy: Arc<AtomicBool>,
}

impl RenderGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the gate, or `None` if a render is already running.
    pub fn try_begin(&self) -> Option<RenderTicket> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RenderTicket {
                busy: Arc::clone(&self.busy),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for RenderTicket {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// The file currently loaded.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub name: String,
    pub size_bytes: u64,
    pub mime: String,
    pub source: ImageSource,
    pub metadata: MetadataRecord,
}

pub struct Session<B: SurfaceBackend> {
    backend: B,
    config: AppConfig,
    overlay: OverlayConfig,
    image: Option<LoadedImage>,
    slices: Option<SliceSet>,
    gate: RenderGate,
}

impl<B: SurfaceBackend> Session<B> {
    pub fn new(backend: B, config: AppConfig) -> Self {
        Self {
            backend,
            overlay: config.overlay.clone(),
            config,
            image: None,
            slices: None,
            gate: RenderGate::new(),
        }
    }

    /// Read and decode a file.
    ///
    /// On failure the previous image (if any) stays loaded.
    pub async fn load_file(&mut self, path: &Path) -> Result<&LoadedImage, SessionError> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(self.load_bytes(&name, mime_for_path(path), &bytes)?)
    }

    /// Decode in-memory file contents.
    pub fn load_bytes(
        &mut self,
        name: &str,
        mime: &str,
        bytes: &[u8],
    ) -> Result<&LoadedImage, BackendError> {
        let source = decode_image(bytes)?;
        self.slices = None;
        let loaded: &LoadedImage = self.image.insert(LoadedImage {
            name: name.to_string(),
            size_bytes: bytes.len() as u64,
            mime: mime.to_string(),
            source,
            metadata: read_metadata(bytes),
        });
        Ok(loaded)
    }

    pub fn image(&self) -> Option<&LoadedImage> {
        self.image.as_ref()
    }

    pub fn metadata(&self) -> Option<&MetadataRecord> {
        self.image.as_ref().map(|i| &i.metadata)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn overlay(&self) -> &OverlayConfig {
        &self.overlay
    }

    pub fn overlay_mut(&mut self) -> &mut OverlayConfig {
        &mut self.overlay
    }

    /// The last successfully rendered carousel.
    pub fn slices(&self) -> Option<&SliceSet> {
        self.slices.as_ref()
    }

    pub fn gate(&self) -> &RenderGate {
        &self.gate
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Drop the image and carousel, and restore the configured overlay.
    pub fn reset(&mut self) {
        self.image = None;
        self.slices = None;
        self.overlay = self.config.overlay.clone();
    }

    /// Render the carousel for the loaded image.
    ///
    /// The previous carousel is replaced only if the whole batch succeeds.
    pub fn generate_slices(
        &mut self,
        high_res: bool,
        events: Option<Sender<SliceEvent>>,
    ) -> Result<&SliceSet, SessionError> {
        let _ticket = self.gate.try_begin().ok_or(SessionError::Busy)?;
        let image = self.image.as_ref().ok_or(SessionError::NoImage)?;
        let set = generate_slices(
            &self.backend,
            &image.source,
            high_res,
            &self.config.slice_params(),
            events,
        )?;
        let set: &SliceSet = self.slices.insert(set);
        Ok(set)
    }

    /// Full-resolution bordered overlay of the loaded image.
    pub fn export_overlay(&self) -> Result<OverlayImage, SessionError> {
        let _ticket = self.gate.try_begin().ok_or(SessionError::Busy)?;
        let image = self.image.as_ref().ok_or(SessionError::NoImage)?;
        Ok(render_overlay_export(
            &self.backend,
            &image.source,
            Some(&image.metadata),
            &self.overlay,
            self.config.preview.reference_size,
        )?)
    }

    /// Preview-size overlay; the sample preview when nothing is loaded.
    pub fn preview_overlay(&self) -> Result<OverlayImage, SessionError> {
        let max_size = self.config.preview.max_size;
        let preview = match &self.image {
            Some(image) => render_overlay_preview(
                &self.backend,
                &image.source,
                Some(&image.metadata),
                &self.overlay,
                max_size,
            )?,
            None => paint_sample_preview(&self.backend, &self.overlay, max_size)?,
        };
        Ok(preview)
    }
}
