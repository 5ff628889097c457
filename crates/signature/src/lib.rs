//! Signature capture for echocardiogram reports
//!
//! This crate provides the drawing core behind the report signature pad:
//! - [`types::Point`] / [`types::Stroke`] - Stroke history data model
//! - [`surface`] - CPU RGBA surface with dirty-region tracking
//! - [`raster`] - Pen rasterization (round caps and joins)
//! - [`codec`] - PNG/JPEG encoding, data URLs, and base64 payloads
//! - [`capture`] - The [`SignatureCapture`] state machine
//! - [`persist`] - Save/load helpers in the page's formats
//! - [`validation`] - Acceptance policy for a signature

pub mod capture;
pub mod codec;
pub mod constants;
pub mod error;
pub mod host;
pub mod persist;
pub mod raster;
pub mod surface;
pub mod types;
pub mod validation;

pub use capture::*;
pub use codec::*;
pub use constants::*;
pub use error::*;
pub use host::*;
pub use persist::*;
pub use surface::*;
pub use types::*;
pub use validation::*;
