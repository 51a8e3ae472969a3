//! Error types for the iaa-eval library.

use thiserror::Error;

/// Result type for iaa-eval operations.
pub type Result<T> = std::result::Result<T, IaaError>;

/// Error types that can occur while loading annotations or configuring an evaluation.
///
/// The agreement computations themselves never fail: missing data is reported
/// as an undefined (`None`) score instead.
#[derive(Error, Debug)]
pub enum IaaError {
    /// Error during JSON parsing or serialization.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error during I/O operations.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Invalid annotation record.
    #[error("Invalid annotation: {0}")]
    InvalidAnnotation(String),

    /// Invalid rectangle coordinates.
    #[error("Invalid rectangle: {0}")]
    InvalidRectangle(String),

    /// Invalid IoU threshold.
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),

    /// Invalid configuration value.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}
