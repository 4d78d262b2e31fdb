//! Error type for loading tracks, registries and scenario files.

use thiserror::Error;

/// Errors raised while reading inputs or writing reports.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no usable samples in {0}")]
    EmptyTrack(String),

    #[error(transparent)]
    Domain(#[from] ship_domain::Error),
}
