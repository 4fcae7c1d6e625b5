//! Spatial index error types.

use thiserror::Error;

/// Errors raised by the quadrant helper and the configuration layer.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("Unknown quadrant: {0}")]
    UnknownQuadrant(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}
