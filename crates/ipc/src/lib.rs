//! Message protocol between the signature pad and its host page
//!
//! Defines the raw pointer input the page forwards to the pad and the
//! change notification the pad publishes back to the page.

mod error;
mod input;
mod messages;

pub use error::IpcError;
pub use input::{ClientRect, PointerInput, TouchPoint};
pub use messages::{SIGNATURE_CHANGE_EVENT, SignatureChange};
