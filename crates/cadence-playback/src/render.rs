//! The renderer seam between synthesis and playback.

use cadence_backend_audio::sfx::render_sfx;
use cadence_backend_audio::RenderedBuffer;
use cadence_backend_music::render_preset;
use cadence_spec::{MusicPreset, SfxDescriptor};

/// Turns presets and descriptors into buffers.
///
/// Implementations must be deterministic: the same input always yields the
/// same buffer, since results are cached by content signature.
pub trait Renderer: Send + Sync {
    /// Renders a looping music track.
    fn render_music(&self, preset: &MusicPreset) -> RenderedBuffer;

    /// Renders a one-shot effect.
    fn render_sfx(&self, descriptor: &SfxDescriptor) -> RenderedBuffer;

    /// Sample rate of rendered buffers.
    fn sample_rate(&self) -> u32;
}

/// The built-in synthesizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynthRenderer {
    sample_rate: u32,
}

impl SynthRenderer {
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }
}

impl Renderer for SynthRenderer {
    fn render_music(&self, preset: &MusicPreset) -> RenderedBuffer {
        render_preset(preset, self.sample_rate)
    }

    fn render_sfx(&self, descriptor: &SfxDescriptor) -> RenderedBuffer {
        render_sfx(descriptor, self.sample_rate)
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}
