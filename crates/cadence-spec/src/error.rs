//! Error types for preset and sound-bank handling.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for spec operations.
pub type SpecResult<T> = Result<T, SpecError>;

/// Errors raised while loading or hashing presets and sound banks.
#[derive(Debug, Error)]
pub enum SpecError {
    /// JSON could not be parsed into the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A sound-bank file could not be read.
    #[error("failed to read '{path}': {source}")]
    Io {
        /// The path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A route references a preset the bank does not define.
    #[error("route '{route}' references unknown preset '{preset}'")]
    UnknownPreset {
        /// The route id.
        route: String,
        /// The missing preset name.
        preset: String,
    },
}

impl BackendError for SpecError {
    fn code(&self) -> &'static str {
        match self {
            SpecError::Json(_) => "SPEC_001",
            SpecError::Io { .. } => "SPEC_002",
            SpecError::UnknownPreset { .. } => "SPEC_003",
        }
    }

    fn category(&self) -> &'static str {
        "spec"
    }
}

/// Common trait for engine errors.
///
/// Each crate's error type implements this trait so failures can be logged
/// with a stable code and category, regardless of which layer raised them.
///
/// # Example
///
/// ```ignore
/// use cadence_spec::error::BackendError;
///
/// fn report<E: BackendError>(err: E) {
///     eprintln!("[{}] {}", err.code(), err.message());
/// }
/// ```
pub trait BackendError: std::error::Error {
    /// Get the error code for reporting.
    ///
    /// Returns a static string like "AUDIO_001" or "PLAYBACK_002".
    /// These codes are stable and can be used for programmatic handling.
    fn code(&self) -> &'static str;

    /// Get a human-readable message describing the error.
    fn message(&self) -> String {
        self.to_string()
    }

    /// Get the error category for grouping related errors.
    ///
    /// Returns a category like "spec", "audio", "playback", "store".
    fn category(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_preset_message() {
        let err = SpecError::UnknownPreset {
            route: "home".to_string(),
            preset: "lobby".to_string(),
        };
        assert!(err.message().contains("home"));
        assert!(err.message().contains("lobby"));
        assert_eq!(err.code(), "SPEC_003");
        assert_eq!(err.category(), "spec");
    }

    #[test]
    fn test_json_error_code() {
        let err: SpecError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.code(), "SPEC_001");
    }
}
