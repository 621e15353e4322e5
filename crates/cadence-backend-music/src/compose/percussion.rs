//! Step-sequenced drum kit.
//!
//! Drum voices are written directly in seconds rather than through the tone
//! writer: the kick needs an exponential pitch envelope and the hat a
//! stateful filter.

use cadence_backend_audio::oscillator::{self, PhaseAccumulator};
use cadence_backend_audio::tone::pan_gains;
use cadence_backend_audio::{ParkMiller, RenderedBuffer};
use cadence_spec::PercussionLayer;

use super::{audible, Composer};

/// Level below which a decaying voice is cut (`exp(-5)` is about -43 dB).
const DECAY_SPAN: f64 = 5.0;
/// Longest drum hit in seconds.
const MAX_HIT_SECONDS: f64 = 2.0;
/// Pitch-envelope speed of the kick, relative to its amplitude decay.
const KICK_PITCH_RATE: f64 = 3.0;

/// Velocity of `step` in a cycled pattern.
fn velocity(pattern: &[f64], step: usize) -> f64 {
    if pattern.is_empty() {
        return 0.0;
    }
    let v = pattern[step % pattern.len()];
    if v.is_finite() {
        v.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Sample count of a hit decaying at `rate` per second.
fn hit_frames(rate: f64, sample_rate: f64) -> usize {
    let rate = if rate.is_finite() && rate > 0.0 { rate } else { 1.0 };
    ((DECAY_SPAN / rate).min(MAX_HIT_SECONDS) * sample_rate).round() as usize
}

/// Writes `value(t)` for each frame of a hit starting at `start` seconds.
fn write_hit<F>(buffer: &mut RenderedBuffer, start: f64, frames: usize, pan: f64, mut value: F)
where
    F: FnMut(f64) -> f64,
{
    let sample_rate = buffer.sample_rate() as f64;
    if !start.is_finite() || start < 0.0 {
        return;
    }
    let first = (start * sample_rate).round() as usize;
    let total = buffer.len();
    let (left_gain, right_gain) = pan_gains(pan, 1.0);
    let (left, right) = buffer.channels_mut();

    for i in 0..frames {
        let index = first + i;
        if index >= total {
            break;
        }
        let sample = value(i as f64 / sample_rate);
        left[index] += (sample * left_gain) as f32;
        right[index] += (sample * right_gain) as f32;
    }
}

/// Pitch-enveloped sine.
pub(super) fn kick(buffer: &mut RenderedBuffer, layer: &PercussionLayer, start: f64, level: f64) {
    let sample_rate = buffer.sample_rate() as f64;
    let frames = hit_frames(layer.kick_decay, sample_rate);
    let mut phase = PhaseAccumulator::new(sample_rate);
    let (from, to, decay) = (layer.kick_start, layer.kick_end, layer.kick_decay);

    write_hit(buffer, start, frames, 0.0, |t| {
        let freq = to + (from - to) * (-t * decay * KICK_PITCH_RATE).exp();
        oscillator::sine(phase.advance(freq)) * (-t * decay).exp() * level
    });
}

/// Triangle tone blended with noise.
pub(super) fn snare(
    buffer: &mut RenderedBuffer,
    rng: &mut ParkMiller,
    layer: &PercussionLayer,
    start: f64,
    level: f64,
) {
    let sample_rate = buffer.sample_rate() as f64;
    let frames = hit_frames(layer.snare_decay, sample_rate);
    let mut phase = PhaseAccumulator::new(sample_rate);
    let noise = if layer.snare_noise.is_finite() {
        layer.snare_noise.clamp(0.0, 1.0)
    } else {
        0.0
    };

    write_hit(buffer, start, frames, 0.0, |t| {
        let tone = oscillator::triangle(phase.advance(layer.snare_tone));
        let body = tone * (1.0 - noise) + rng.bipolar() * noise;
        body * (-t * layer.snare_decay).exp() * level
    });
}

/// Low-pass filtered noise burst.
pub(super) fn hat(
    buffer: &mut RenderedBuffer,
    rng: &mut ParkMiller,
    layer: &PercussionLayer,
    start: f64,
    level: f64,
) {
    let sample_rate = buffer.sample_rate() as f64;
    let frames = hit_frames(layer.hat_decay, sample_rate);
    let cutoff = if layer.hat_cutoff.is_finite() {
        layer.hat_cutoff.clamp(0.0, 0.999)
    } else {
        0.0
    };
    let mut filter = 0.0;

    write_hit(buffer, start, frames, layer.hat_pan, |t| {
        let raw = rng.bipolar();
        filter = filter * cutoff + raw * (1.0 - cutoff);
        filter * (-t * layer.hat_decay).exp() * level
    });
}

impl Composer {
    pub(super) fn percussion(&mut self) {
        let Some(layer) = self.preset.percussion.clone() else {
            return;
        };
        if !audible(layer.amplitude) {
            return;
        }

        let steps = layer.steps_per_bar.clamp(1, 64) as usize;
        let bar_beats = self.beats_per_bar();
        let step_beats = bar_beats / steps as f64;
        let swing = if layer.swing.is_finite() {
            layer.swing.clamp(0.0, 1.0) * step_beats
        } else {
            0.0
        };
        let jitter = if layer.jitter.is_finite() {
            layer.jitter.abs()
        } else {
            0.0
        };
        let seconds_per_beat = self.tone.seconds_per_beat();

        for bar in 0..self.bars() {
            for step in 0..steps {
                let mut beat = bar as f64 * bar_beats + step as f64 * step_beats;
                if step % 2 == 1 {
                    beat += swing;
                }
                let at = beat * seconds_per_beat;

                let v = velocity(&layer.kick, step);
                if v > 0.0 {
                    kick(&mut self.buffer, &layer, at, v * layer.amplitude);
                }
                let v = velocity(&layer.snare, step);
                if v > 0.0 {
                    snare(&mut self.buffer, &mut self.rng, &layer, at, v * layer.amplitude);
                }
                let v = velocity(&layer.hat, step);
                if v > 0.0 {
                    let offset = self.rng.bipolar() * jitter;
                    let at = (beat + offset).max(0.0) * seconds_per_beat;
                    hat(&mut self.buffer, &mut self.rng, &layer, at, v * layer.amplitude);
                }
            }
        }
    }
}
