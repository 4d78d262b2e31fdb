//! Error types for the ship domain engine.

use thiserror::Error;

/// Errors raised by the geometry engine and the scenario driver.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A length, speed, sample count or coordinate is outside its valid range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A polygon has fewer than three distinct vertices or no area at all.
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// The clipper produced a result that cannot be classified.
    #[error("Unsupported intersection topology: {0}")]
    UnsupportedIntersectionTopology(String),

    /// No length is known for the vessel and no default was configured.
    #[error("Unknown vessel: {0}")]
    UnknownVessel(String),
}

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;
