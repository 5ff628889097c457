//! Raster encoding and decoding
//!
//! Exports are produced the way `canvas.toDataURL` produces them:
//! `data:<mime>;base64,<payload>`. Imports accept any data URL whose
//! payload the `image` crate can decode.

use std::io::Cursor;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use data_url::DataUrl;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, ImageReader, Limits, RgbaImage};
use tracing::debug;

use crate::constants::{DEFAULT_EXPORT_QUALITY, MAX_SURFACE_SIZE, PNG_DATA_URL_PREFIX};
use crate::error::SignatureError;
use crate::types::ExportFormat;

/// Encode an image in the given format.
/// `quality` (0..1) only affects lossy formats.
pub fn encode_image(
    image: &RgbaImage,
    format: ExportFormat,
    quality: f32,
) -> Result<Vec<u8>, SignatureError> {
    let mut bytes = Vec::new();
    match format {
        ExportFormat::Png => {
            image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        }
        ExportFormat::Jpeg => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
            let mut encoder = JpegEncoder::new_with_quality(&mut bytes, jpeg_quality(quality));
            encoder.encode_image(&rgb)?;
        }
    }
    debug!(
        "encode_image: {}x{} as {} -> {} bytes",
        image.width(),
        image.height(),
        format.mime(),
        bytes.len()
    );
    Ok(bytes)
}

/// Map a 0..1 quality to the JPEG encoder's 1..=100 scale
fn jpeg_quality(quality: f32) -> u8 {
    let quality = if quality.is_finite() {
        quality.clamp(0.0, 1.0)
    } else {
        DEFAULT_EXPORT_QUALITY
    };
    ((quality * 100.0).round() as u8).max(1)
}

/// Wrap encoded bytes in a base64 data URL
pub fn to_data_url(format: ExportFormat, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", format.mime(), STANDARD.encode(bytes))
}

/// Base64 payload of a data URL (the part after the first comma)
pub fn data_url_payload(data_url: &str) -> &str {
    data_url.split_once(',').map(|(_, payload)| payload).unwrap_or("")
}

/// Turn a bare PNG base64 payload into a data URL
pub fn png_data_url_from_base64(base64: &str) -> String {
    format!("{}{}", PNG_DATA_URL_PREFIX, base64.trim())
}

/// Decode a data URL into an RGBA image
pub fn decode_data_url(data_url: &str) -> Result<RgbaImage, SignatureError> {
    let url = DataUrl::process(data_url.trim())
        .map_err(|e| SignatureError::ImportDecode(format!("invalid data URL: {e:?}")))?;
    let (bytes, _) = url
        .decode_to_vec()
        .map_err(|e| SignatureError::ImportDecode(format!("invalid base64 payload: {e:?}")))?;
    decode_bytes(&bytes)
}

/// Decode encoded image bytes (PNG, JPEG, ...) into an RGBA image.
///
/// The header is read first so images larger than the surface limit are
/// rejected before any pixel buffer is allocated.
pub fn decode_bytes(bytes: &[u8]) -> Result<RgbaImage, SignatureError> {
    let (width, height) = reader(bytes)?.into_dimensions().map_err(decode_error)?;
    if width > MAX_SURFACE_SIZE || height > MAX_SURFACE_SIZE {
        return Err(SignatureError::InvalidDimensions { width, height });
    }

    let mut limits = Limits::default();
    limits.max_image_width = Some(MAX_SURFACE_SIZE);
    limits.max_image_height = Some(MAX_SURFACE_SIZE);
    let mut reader = reader(bytes)?;
    reader.limits(limits);
    Ok(reader.decode().map_err(decode_error)?.to_rgba8())
}

fn reader(bytes: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>, SignatureError> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| SignatureError::ImportDecode(e.to_string()))
}

fn decode_error(e: image::ImageError) -> SignatureError {
    SignatureError::ImportDecode(e.to_string())
}
