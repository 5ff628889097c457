//! Acceptance check run before a signed report is submitted

use ecoreport_config::ValidationPolicy;
use tracing::debug;

use crate::capture::SignatureCapture;

/// A signature that does not meet the acceptance policy
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{message}")]
    Rejected {
        message: String,
        stroke_count: usize,
        total_points: usize,
    },
}

/// Check the signature against `policy`; the rejection carries the
/// policy's user-facing message
pub fn validate_signature(
    capture: &SignatureCapture,
    policy: &ValidationPolicy,
) -> Result<(), ValidationError> {
    if capture.is_valid(policy.min_strokes, policy.min_points) {
        return Ok(());
    }
    debug!(
        "Signature rejected: {} stroke(s), {} point(s), need {}/{}",
        capture.stroke_count(),
        capture.total_points(),
        policy.min_strokes,
        policy.min_points
    );
    Err(ValidationError::Rejected {
        message: policy.message.clone(),
        stroke_count: capture.stroke_count(),
        total_points: capture.total_points(),
    })
}
