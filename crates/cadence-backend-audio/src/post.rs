//! Post-processing applied once to every finished buffer.
//!
//! Each channel is DC-blocked and lightly smoothed, then both channels are
//! scaled together so the loudest sample sits exactly at the ceiling.

use crate::buffer::RenderedBuffer;

/// Peak ceiling for music tracks.
pub const MUSIC_CEILING: f32 = 0.85;

/// Peak ceiling for sound effects.
pub const SFX_CEILING: f32 = 0.92;

/// Pole of the DC blocker.
pub const DC_BLOCK_COEFFICIENT: f64 = 0.995;

/// One-pole DC blocker: `out[i] = r * (out[i-1] + in[i] - in[i-1])`.
pub fn dc_block(samples: &mut [f32], coefficient: f64) {
    let mut prev_in = 0.0_f64;
    let mut prev_out = 0.0_f64;
    for sample in samples.iter_mut() {
        let input = *sample as f64;
        let output = coefficient * (prev_out + input - prev_in);
        prev_in = input;
        prev_out = output;
        *sample = output as f32;
    }
}

/// Two-tap smoothing: `out[i] = 0.8 * in[i] + 0.2 * in[i-1]`.
pub fn smooth(samples: &mut [f32]) {
    let mut previous = 0.0_f32;
    for sample in samples.iter_mut() {
        let input = *sample;
        *sample = 0.8 * input + 0.2 * previous;
        previous = input;
    }
}

/// Replaces NaN and infinite samples with silence.
pub fn sanitize(samples: &mut [f32]) {
    for sample in samples.iter_mut() {
        if !sample.is_finite() {
            *sample = 0.0;
        }
    }
}

/// Scales both channels so the peak equals `ceiling`.
///
/// A silent buffer is left untouched.
pub fn normalize_stereo(buffer: &mut RenderedBuffer, ceiling: f32) {
    let peak = buffer.peak();
    if peak > 0.0 {
        let gain = ceiling / peak;
        let (left, right) = buffer.channels_mut();
        for sample in left.iter_mut().chain(right.iter_mut()) {
            *sample = (*sample * gain).clamp(-ceiling, ceiling);
        }
    }
}

/// Runs the full chain: sanitize, DC block, smooth, normalize.
pub fn finalize(buffer: &mut RenderedBuffer, ceiling: f32) {
    let (left, right) = buffer.channels_mut();
    for channel in [left, right] {
        sanitize(channel);
        dc_block(channel, DC_BLOCK_COEFFICIENT);
        smooth(channel);
    }
    normalize_stereo(buffer, ceiling);
}
