use serde::{Deserialize, Serialize};

use crate::constants::{JPEG_MIME, PNG_MIME};
use crate::error::SignatureError;

/// A point in surface-buffer coordinates (device-pixel-ratio scaled)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// One continuous pointer-down to pointer-up motion.
///
/// Points are kept in drawing order. A committed stroke always holds at
/// least one point; a tap is kept as a one-point stroke.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stroke {
    points: Vec<Point>,
}

impl Stroke {
    /// Start a stroke at its first point
    pub fn starting_at(point: Point) -> Self {
        Self {
            points: vec![point],
        }
    }

    /// Build a stroke from an existing point list
    pub fn from_points(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Last point, the origin of the next incremental segment
    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }
}

/// Raster export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Jpeg,
}

impl ExportFormat {
    /// Resolve a MIME type such as `image/png`
    pub fn from_mime(mime: &str) -> Result<Self, SignatureError> {
        match mime.trim().to_ascii_lowercase().as_str() {
            PNG_MIME => Ok(Self::Png),
            JPEG_MIME => Ok(Self::Jpeg),
            _ => Err(SignatureError::UnsupportedFormat(mime.to_string())),
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Png => PNG_MIME,
            Self::Jpeg => JPEG_MIME,
        }
    }
}

/// Snapshot of a signature's state for the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureInfo {
    pub is_empty: bool,
    pub is_valid: bool,
    pub stroke_count: usize,
    pub total_points: usize,
    pub width: u32,
    pub height: u32,
}

/// Parse a CSS color string into straight-alpha RGBA in 0..1
pub fn parse_color(value: &str) -> Result<[f32; 4], SignatureError> {
    let color = csscolorparser::parse(value).map_err(|e| SignatureError::InvalidColor {
        value: value.to_string(),
        reason: e.to_string(),
    })?;
    Ok([color.r, color.g, color.b, color.a])
}
