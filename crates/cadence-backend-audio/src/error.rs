//! Error types for the audio backend.
//!
//! Rendering itself is total; these errors only arise when a buffer is
//! assembled from externally supplied sample data.

use cadence_spec::BackendError;
use thiserror::Error;

/// Result type for audio operations.
pub type AudioResult<T> = Result<T, AudioError>;

/// Errors raised while assembling audio buffers.
#[derive(Debug, Error)]
pub enum AudioError {
    /// Left and right channels differ in length.
    #[error("channel length mismatch: left has {left} samples, right has {right}")]
    ChannelLengthMismatch {
        /// Left channel length.
        left: usize,
        /// Right channel length.
        right: usize,
    },

    /// Sample rate outside the supported range.
    #[error("invalid sample rate: {rate}")]
    InvalidSampleRate {
        /// The invalid sample rate.
        rate: u32,
    },
}

impl BackendError for AudioError {
    fn code(&self) -> &'static str {
        match self {
            AudioError::ChannelLengthMismatch { .. } => "AUDIO_001",
            AudioError::InvalidSampleRate { .. } => "AUDIO_002",
        }
    }

    fn category(&self) -> &'static str {
        "audio"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_and_messages() {
        let err = AudioError::ChannelLengthMismatch { left: 3, right: 4 };
        assert_eq!(err.code(), "AUDIO_001");
        assert_eq!(err.category(), "audio");
        assert!(err.message().contains("left has 3"));

        let err = AudioError::InvalidSampleRate { rate: 0 };
        assert_eq!(err.code(), "AUDIO_002");
    }
}
