//! Error types for the WikiVaani pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ambient errors shared across the pipeline
///
/// Component boundaries carry their own typed outcomes
/// ([`ResolveError`](crate::article::ResolveError),
/// [`CaptureError`](crate::voice::CaptureError),
/// [`SynthesisError`](crate::voice::SynthesisError)); this enum covers the
/// layers underneath them.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Audio device error
    #[error("audio error: {0}")]
    Audio(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
