//! Error types for report helpers.

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Template not found: {0}")]
    UnknownTemplate(String),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
