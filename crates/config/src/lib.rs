//! Shared configuration for the echocardiogram reporting front end
//!
//! This crate provides the single source of truth for signature pad
//! appearance, the signature acceptance policy, and the display metrics
//! used to size the raster buffer behind a drawing surface.

use serde::{Deserialize, Serialize};

/// Default pen color (CSS color string)
pub const DEFAULT_PEN_COLOR: &str = "#000000";

/// Default pen width in CSS pixels
pub const DEFAULT_PEN_WIDTH: f32 = 2.0;

/// Default background color (CSS color string)
pub const DEFAULT_BACKGROUND_COLOR: &str = "#ffffff";

/// Default minimum number of committed strokes for a valid signature
pub const DEFAULT_MIN_STROKES: usize = 1;

/// Default minimum number of points across all strokes for a valid signature
pub const DEFAULT_MIN_POINTS: usize = 10;

/// Default message shown to the user when a signature is rejected
pub const DEFAULT_REJECTION_MESSAGE: &str = "Please add a valid signature.";

/// Default device pixel ratio (1.0 = no scaling)
pub const DEFAULT_DEVICE_PIXEL_RATIO: f32 = 1.0;

/// Appearance options for a signature pad
///
/// Keys follow the page's option object (`penColor`, `penWidth`,
/// `backgroundColor`); missing keys fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignatureConfig {
    /// Pen color as a CSS color string
    pub pen_color: String,
    /// Pen width in CSS pixels
    pub pen_width: f32,
    /// Background color as a CSS color string
    pub background_color: String,
}

impl Default for SignatureConfig {
    fn default() -> Self {
        Self {
            pen_color: DEFAULT_PEN_COLOR.to_string(),
            pen_width: DEFAULT_PEN_WIDTH,
            background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
        }
    }
}

impl SignatureConfig {
    /// Parse options from the JSON object supplied by the host page
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Pen width to use, falling back to the default for zero,
    /// negative, or non-finite values
    pub fn effective_pen_width(&self) -> f32 {
        if self.pen_width.is_finite() && self.pen_width > 0.0 {
            self.pen_width
        } else {
            DEFAULT_PEN_WIDTH
        }
    }
}

/// Thresholds a signature must clear before it is accepted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationPolicy {
    /// Minimum committed strokes
    pub min_strokes: usize,
    /// Minimum total points across committed strokes
    pub min_points: usize,
    /// User-facing message when the signature is rejected
    pub message: String,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            min_strokes: DEFAULT_MIN_STROKES,
            min_points: DEFAULT_MIN_POINTS,
            message: DEFAULT_REJECTION_MESSAGE.to_string(),
        }
    }
}

/// On-screen size of a drawing surface and the display's pixel density
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceMetrics {
    /// Surface width in CSS pixels
    pub css_width: f32,
    /// Surface height in CSS pixels
    pub css_height: f32,
    /// Ratio of physical pixels to CSS pixels
    pub device_pixel_ratio: f32,
}

impl Default for SurfaceMetrics {
    fn default() -> Self {
        Self {
            css_width: 0.0,
            css_height: 0.0,
            device_pixel_ratio: DEFAULT_DEVICE_PIXEL_RATIO,
        }
    }
}

impl SurfaceMetrics {
    /// Create metrics, sanitizing the pixel ratio the way browsers
    /// report it (`devicePixelRatio || 1`)
    pub fn new(css_width: f32, css_height: f32, device_pixel_ratio: f32) -> Self {
        let device_pixel_ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            DEFAULT_DEVICE_PIXEL_RATIO
        };
        Self {
            css_width: css_width.max(0.0),
            css_height: css_height.max(0.0),
            device_pixel_ratio,
        }
    }

    /// Raster buffer width in physical pixels (at least 1)
    pub fn buffer_width(&self) -> u32 {
        ((self.css_width * self.device_pixel_ratio).round() as u32).max(1)
    }

    /// Raster buffer height in physical pixels (at least 1)
    pub fn buffer_height(&self) -> u32 {
        ((self.css_height * self.device_pixel_ratio).round() as u32).max(1)
    }
}
