//! Layered track composition.
//!
//! A [`Composer`] owns everything one render needs: the sanitized preset,
//! the scale, a tone writer at the preset tempo, the generator and the
//! destination buffer. Each layer is a method that schedules notes into that
//! buffer.

use cadence_backend_audio::post::{finalize, MUSIC_CEILING};
use cadence_backend_audio::{Note, ParkMiller, RenderedBuffer, Scale, ToneOptions, ToneWriter};
use cadence_spec::MusicPreset;

mod harmony;
mod layers;
mod percussion;


/// Longest track that will be allocated; longer presets are truncated.
pub const MAX_TRACK_SECONDS: f64 = 600.0;

/// Texture layers of a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Drone,
    Pad,
    Arpeggio,
    Melody,
    Percussion,
    Pulse,
    Bass,
    Riser,
    Atmosphere,
    Sparkle,
}

impl Layer {
    /// Render order. Changing it changes generator consumption and therefore
    /// the output of every preset.
    pub const ORDER: [Layer; 10] = [
        Layer::Drone,
        Layer::Pad,
        Layer::Arpeggio,
        Layer::Melody,
        Layer::Percussion,
        Layer::Pulse,
        Layer::Bass,
        Layer::Riser,
        Layer::Atmosphere,
        Layer::Sparkle,
    ];
}

/// Number of frames a preset renders to at `sample_rate`.
///
/// `bars * beats_per_bar * (60 / tempo) * sample_rate`, rounded, using the
/// sanitized preset and capped at [`MAX_TRACK_SECONDS`].
pub fn track_frames(preset: &MusicPreset, sample_rate: u32) -> usize {
    let preset = preset.sanitized();
    let seconds = preset.duration_seconds().min(MAX_TRACK_SECONDS);
    (seconds * sample_rate as f64).round() as usize
}

/// Renders a preset to a finished, normalized buffer.
pub fn render_preset(preset: &MusicPreset, sample_rate: u32) -> RenderedBuffer {
    let mut composer = Composer::new(preset, sample_rate);
    for layer in Layer::ORDER {
        composer.render_layer(layer);
    }
    composer.finish()
}

/// Render context for one track.
#[derive(Debug)]
pub struct Composer {
    preset: MusicPreset,
    scale: Scale,
    tone: ToneWriter,
    rng: ParkMiller,
    buffer: RenderedBuffer,
}

impl Composer {
    pub fn new(preset: &MusicPreset, sample_rate: u32) -> Self {
        let preset = preset.sanitized();
        if preset.duration_seconds() > MAX_TRACK_SECONDS {
            tracing::warn!(
                seconds = preset.duration_seconds(),
                max = MAX_TRACK_SECONDS,
                "track longer than the render limit, truncating"
            );
        }
        let frames = track_frames(&preset, sample_rate);
        Self {
            scale: Scale::new(preset.scale, preset.root),
            tone: ToneWriter::new(sample_rate, preset.tempo),
            rng: ParkMiller::new(preset.seed),
            buffer: RenderedBuffer::silent(frames, sample_rate),
            preset,
        }
    }

    /// Renders one layer if the preset enables it.
    pub fn render_layer(&mut self, layer: Layer) {
        match layer {
            Layer::Drone => self.drone(),
            Layer::Pad => self.pad(),
            Layer::Arpeggio => self.arpeggio(),
            Layer::Melody => self.melody(),
            Layer::Percussion => self.percussion(),
            Layer::Pulse => self.pulse(),
            Layer::Bass => self.bass(),
            Layer::Riser => self.riser(),
            Layer::Atmosphere => self.atmosphere(),
            Layer::Sparkle => self.sparkle(),
        }
    }

    /// Values drawn from the generator so far.
    pub fn draws(&self) -> u64 {
        self.rng.draws()
    }

    /// The buffer as rendered so far, before post-processing.
    pub fn buffer(&self) -> &RenderedBuffer {
        &self.buffer
    }

    /// Post-processes and returns the buffer.
    pub fn finish(mut self) -> RenderedBuffer {
        finalize(&mut self.buffer, MUSIC_CEILING);
        self.buffer
    }

    fn write(&mut self, note: Note, options: &ToneOptions) {
        self.tone
            .write(&mut self.buffer, &mut self.rng, &note, options);
    }

    fn beats_per_bar(&self) -> f64 {
        self.preset.beats_per_bar as f64
    }

    fn bars(&self) -> usize {
        self.preset.bars as usize
    }
}

/// True for amplitudes that produce sound.
fn audible(amplitude: f64) -> bool {
    amplitude.is_finite() && amplitude > 0.0
}
