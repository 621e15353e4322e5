//! Stereo sample buffers produced by the renderers.

use crate::error::{AudioError, AudioResult};

/// A rendered stereo buffer.
///
/// Both channels always have the same length. Buffers are built by the
/// renderers and then shared immutably (usually behind an `Arc`).
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedBuffer {
    left: Vec<f32>,
    right: Vec<f32>,
    sample_rate: u32,
}

impl RenderedBuffer {
    /// Creates a zero-filled buffer of `frames` samples per channel.
    pub fn silent(frames: usize, sample_rate: u32) -> Self {
        Self {
            left: vec![0.0; frames],
            right: vec![0.0; frames],
            sample_rate,
        }
    }

    /// Wraps existing channel data.
    pub fn from_channels(left: Vec<f32>, right: Vec<f32>, sample_rate: u32) -> AudioResult<Self> {
        if left.len() != right.len() {
            return Err(AudioError::ChannelLengthMismatch {
                left: left.len(),
                right: right.len(),
            });
        }
        if sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate { rate: sample_rate });
        }
        Ok(Self {
            left,
            right,
            sample_rate,
        })
    }

    /// Number of frames (samples per channel).
    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.len() as f64 / self.sample_rate as f64
    }

    pub fn left(&self) -> &[f32] {
        &self.left
    }

    pub fn right(&self) -> &[f32] {
        &self.right
    }

    /// Mutable access to both channels at once.
    pub fn channels_mut(&mut self) -> (&mut [f32], &mut [f32]) {
        (&mut self.left, &mut self.right)
    }

    /// Returns the stereo frame at `index`, or silence past the end.
    pub fn frame(&self, index: usize) -> (f32, f32) {
        match (self.left.get(index), self.right.get(index)) {
            (Some(&l), Some(&r)) => (l, r),
            _ => (0.0, 0.0),
        }
    }

    /// Largest absolute sample across both channels.
    pub fn peak(&self) -> f32 {
        self.left
            .iter()
            .chain(self.right.iter())
            .map(|s| s.abs())
            .fold(0.0_f32, f32::max)
    }

    /// Returns true if every sample is exactly zero.
    pub fn is_silent(&self) -> bool {
        self.left.iter().chain(self.right.iter()).all(|&s| s == 0.0)
    }

    /// Interleaves the channels as `[l0, r0, l1, r1, ...]`.
    pub fn interleaved(&self) -> Vec<f32> {
        self.left
            .iter()
            .zip(self.right.iter())
            .flat_map(|(&l, &r)| [l, r])
            .collect()
    }
}
