//! Error types for playback.
//!
//! None of these cross the public [`AudioEngine`](crate::AudioEngine) API;
//! the engine logs them and degrades.

use std::path::PathBuf;

use cadence_spec::BackendError;
use thiserror::Error;

/// Result type for sink operations.
pub type SinkResult<T> = Result<T, SinkError>;

/// Errors raised by output backends.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The platform has no usable output device.
    #[error("no audio output device available")]
    NoDevice,

    /// The device rejected every supported configuration.
    #[error("failed to configure output stream: {0}")]
    Config(String),

    /// The output stream could not be created.
    #[error("failed to build output stream: {0}")]
    Stream(String),

    /// The output could not be resumed.
    #[error("failed to resume output: {0}")]
    Resume(String),
}

impl BackendError for SinkError {
    fn code(&self) -> &'static str {
        match self {
            SinkError::NoDevice => "PLAYBACK_001",
            SinkError::Config(_) => "PLAYBACK_002",
            SinkError::Stream(_) => "PLAYBACK_003",
            SinkError::Resume(_) => "PLAYBACK_004",
        }
    }

    fn category(&self) -> &'static str {
        "playback"
    }
}

/// Result type for mute-store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised while persisting the mute flag.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store file could not be read or written.
    #[error("mute store I/O error at '{path}': {source}")]
    Io {
        /// Store file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The store file is not a JSON object.
    #[error("mute store is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl BackendError for StoreError {
    fn code(&self) -> &'static str {
        match self {
            StoreError::Io { .. } => "STORE_001",
            StoreError::Json(_) => "STORE_002",
        }
    }

    fn category(&self) -> &'static str {
        "store"
    }
}
