//! Errors raised while encoding or decoding page messages.

/// Failure to move a message across the page boundary.
#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    #[error("Could not encode message as JSON: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Malformed payload: {0}")]
    InvalidPayload(String),
}
