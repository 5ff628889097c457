//! Error types for the calculation engine.

use crate::field::Field;

/// Problems with the shape of a calculation graph
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("Field {field} is produced by both {first} and {second}")]
    DuplicateOutput {
        field: Field,
        first: &'static str,
        second: &'static str,
    },

    #[error("Calculations form a cycle: {}", .0.join(" -> "))]
    Cycle(Vec<&'static str>),
}

#[derive(Debug, thiserror::Error)]
pub enum CalculationError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("Invalid measurements JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown sex: {0}")]
    UnknownSex(String),
}
