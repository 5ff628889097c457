//! Error type for signature capture operations.

/// Errors surfaced by [`crate::SignatureCapture`] and its codecs.
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid color {value:?}: {reason}")]
    InvalidColor { value: String, reason: String },

    #[error("Failed to decode imported image: {0}")]
    ImportDecode(String),

    #[error("Failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Image dimensions {width}x{height} exceed the surface limit")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Drawing surface is not mounted")]
    NotMounted,

    #[error("There is no signature to save")]
    NothingToSave,
}
