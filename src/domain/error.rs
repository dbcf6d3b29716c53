//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violated invariants of the core types.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("invalid bounding box: {reason}")]
    InvalidBoundingBox { reason: String },

    #[error("invalid bounding box '{input}': expected 'south,west,north,east'")]
    InvalidBoundingBoxSyntax { input: String },
}
