//! Geometry error types.

use thiserror::Error;

/// Errors raised by vector and bounding box operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("Coordinate is not a number")]
    NotNumeric,

    #[error("Expected {expected} components, got {found}")]
    InvalidLength { expected: usize, found: usize },

    #[error("Vector of zero length cannot be normalized")]
    ZeroLength,

    #[error("Invalid index: {0}")]
    IndexOutOfRange(String),
}
