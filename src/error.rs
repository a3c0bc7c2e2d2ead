//! Error types for the crate.

use thiserror::Error;

/// Errors produced during configuration or transform application.
#[derive(Error, Debug)]
pub enum Error {
    /// A configuration value was rejected at construction time.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A volume has an unsupported shape or a degenerate affine.
    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// The volumes of a subject do not share the same spatial shape.
    #[error("Inconsistent shapes in subject: {0}")]
    InconsistentShape(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
