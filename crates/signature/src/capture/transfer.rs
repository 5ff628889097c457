//! Raster export and import
//!
//! Import is split in three so the host can decode off the event path:
//! [`SignatureCapture::import_image`] hands out a [`PendingImport`],
//! [`PendingImport::decode`] does the slow work without touching the
//! component, and [`SignatureCapture::complete_import`] applies the result
//! unless a newer import or a clear has happened in between.

use image::RgbaImage;
use tracing::{debug, info, warn};

use crate::codec;
use crate::constants::DEFAULT_EXPORT_QUALITY;
use crate::error::SignatureError;
use crate::types::ExportFormat;

use super::SignatureCapture;

/// An import that has been requested but not yet decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingImport {
    generation: u64,
    data_url: String,
}

impl PendingImport {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    /// Decode the image. Does not touch the capture component.
    pub fn decode(self) -> DecodedImport {
        DecodedImport {
            generation: self.generation,
            image: codec::decode_data_url(&self.data_url),
        }
    }
}

/// A decoded (or failed) import waiting to be applied
#[derive(Debug)]
pub struct DecodedImport {
    generation: u64,
    image: Result<RgbaImage, SignatureError>,
}

impl DecodedImport {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_ok(&self) -> bool {
        self.image.is_ok()
    }
}

/// What [`SignatureCapture::complete_import`] did with a decoded image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The image replaced the signature
    Applied,
    /// A later import or clear made this one obsolete; nothing changed
    Superseded,
}

impl SignatureCapture {
    /// Encode the surface as a data URL.
    /// `quality` (0..1) applies to lossy formats only.
    pub fn export_image(&self, mime: &str, quality: Option<f32>) -> Result<String, SignatureError> {
        let format = ExportFormat::from_mime(mime)?;
        let bytes = self.encode(format, quality)?;
        Ok(codec::to_data_url(format, &bytes))
    }

    /// Encode the surface as raw image bytes
    pub fn export_blob(&self, mime: &str, quality: Option<f32>) -> Result<Vec<u8>, SignatureError> {
        self.encode(ExportFormat::from_mime(mime)?, quality)
    }

    /// PNG data URL of the surface
    pub fn export_data_url(&self) -> Result<String, SignatureError> {
        let bytes = self.encode(ExportFormat::Png, None)?;
        Ok(codec::to_data_url(ExportFormat::Png, &bytes))
    }

    /// PNG data URL with the `data:image/png;base64,` prefix removed
    pub fn export_base64(&self) -> Result<String, SignatureError> {
        let url = self.export_data_url()?;
        Ok(codec::data_url_payload(&url).to_string())
    }

    fn encode(&self, format: ExportFormat, quality: Option<f32>) -> Result<Vec<u8>, SignatureError> {
        let mounted = self.mounted.as_ref().ok_or(SignatureError::NotMounted)?;
        let image = mounted.surface.to_rgba_image();
        codec::encode_image(&image, format, quality.unwrap_or(DEFAULT_EXPORT_QUALITY))
    }

    /// Start importing an image from a data URL. Any earlier pending import
    /// is superseded.
    pub fn import_image(&mut self, data_url: impl Into<String>) -> PendingImport {
        self.import_generation += 1;
        debug!("import requested (generation {})", self.import_generation);
        PendingImport {
            generation: self.import_generation,
            data_url: data_url.into(),
        }
    }

    /// Start importing a bare PNG base64 payload
    pub fn import_base64(&mut self, base64: &str) -> PendingImport {
        self.import_image(codec::png_data_url_from_base64(base64))
    }

    /// Apply a decoded import.
    ///
    /// On success the stroke history is discarded, the surface shows the
    /// image at natural size from the top-left corner, and the signature is
    /// marked present. A decode failure is returned as an error and leaves
    /// the current signature untouched.
    pub fn complete_import(
        &mut self,
        decoded: DecodedImport,
    ) -> Result<ImportOutcome, SignatureError> {
        if self.mounted.is_none() {
            return Err(SignatureError::NotMounted);
        }
        if decoded.generation != self.import_generation {
            debug!(
                "Discarding import generation {} (current {})",
                decoded.generation, self.import_generation
            );
            return Ok(ImportOutcome::Superseded);
        }

        let image = decoded.image.inspect_err(|e| warn!("Import failed: {}", e))?;
        info!("Imported {}x{} signature image", image.width(), image.height());

        self.strokes.clear();
        self.current = None;
        self.backdrop = Some(image);
        self.redraw();
        self.has_signature = true;
        self.emit_change();
        Ok(ImportOutcome::Applied)
    }

    /// Import and apply a data URL synchronously
    pub fn import_now(&mut self, data_url: impl Into<String>) -> Result<ImportOutcome, SignatureError> {
        let decoded = self.import_image(data_url).decode();
        self.complete_import(decoded)
    }
}
