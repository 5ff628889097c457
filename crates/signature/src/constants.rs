/// MIME type of the lossless export format.
pub const PNG_MIME: &str = "image/png";

/// MIME type of the lossy export format.
pub const JPEG_MIME: &str = "image/jpeg";

/// Prefix prepended to a bare base64 payload to form a PNG data URL.
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Default encoder quality (0..1), matching `canvas.toDataURL`.
pub const DEFAULT_EXPORT_QUALITY: f32 = 1.0;

/// Largest buffer edge accepted from a host or an imported image.
pub const MAX_SURFACE_SIZE: u32 = 8192;

/// Smallest pen radius in buffer pixels; thinner pens would miss pixel centers.
pub const MIN_PEN_RADIUS: f32 = 0.5;
