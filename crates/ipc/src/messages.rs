//! Change notification published by the signature pad.

use serde::{Deserialize, Serialize};

use crate::error::IpcError;

/// Name of the DOM CustomEvent dispatched on the drawing surface.
pub const SIGNATURE_CHANGE_EVENT: &str = "signaturechange";

/// Payload of a `signaturechange` notification.
///
/// Emitted on every committed mutation: stroke end, clear, undo,
/// successful import, and stroke-list load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureChange {
    #[serde(rename = "isEmpty")]
    pub is_empty: bool,
    /// PNG data URL of the current raster, or `None` when empty
    #[serde(rename = "dataURL")]
    pub data_url: Option<String>,
}

impl SignatureChange {
    /// Serialize to the JSON shape listeners expect (`{isEmpty, dataURL}`)
    pub fn to_json(&self) -> Result<String, IpcError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a payload previously produced by [`SignatureChange::to_json`]
    pub fn from_json(json: &str) -> Result<Self, IpcError> {
        serde_json::from_str(json).map_err(|e| IpcError::InvalidPayload(e.to_string()))
    }
}
