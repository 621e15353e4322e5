//! Renders sound-effect descriptors to stereo buffers.

use cadence_spec::{SfxDescriptor, Step};

use crate::buffer::RenderedBuffer;
use crate::envelope::attack_decay;
use crate::oscillator::{self, PhaseAccumulator};
use crate::post::{finalize, SFX_CEILING};
use crate::rng::ParkMiller;
use crate::tone::pan_gains;

/// Longest effect that will be rendered; longer descriptors are truncated.
pub const MAX_SFX_SECONDS: f64 = 10.0;

/// Largest random pan given to steps without an explicit pan.
const RANDOM_PAN: f64 = 0.3;

/// Renders a descriptor at `sample_rate`.
///
/// The buffer spans the descriptor's duration; steps are summed in order and
/// the result is finalized at the effect ceiling.
pub fn render_sfx(descriptor: &SfxDescriptor, sample_rate: u32) -> RenderedBuffer {
    let duration = if descriptor.duration.is_finite() && descriptor.duration > 0.0 {
        descriptor.duration.min(MAX_SFX_SECONDS)
    } else {
        super::TAIL_SECONDS
    };
    let frames = (duration * sample_rate as f64).ceil() as usize;
    let mut buffer = RenderedBuffer::silent(frames, sample_rate);
    let mut rng = ParkMiller::new(descriptor.seed);

    for step in &descriptor.steps {
        render_step(&mut buffer, step, &mut rng);
    }

    finalize(&mut buffer, SFX_CEILING);
    buffer
}

fn render_step(buffer: &mut RenderedBuffer, step: &Step, rng: &mut ParkMiller) {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if !valid(step.amplitude) || !valid(step.length) || !valid(step.freq_start) {
        return;
    }
    if !(step.offset.is_finite() && step.offset >= 0.0) {
        return;
    }

    let pan = match step.pan {
        Some(p) if p.is_finite() => p,
        _ => rng.range(-RANDOM_PAN, RANDOM_PAN),
    };
    let (left_gain, right_gain) = pan_gains(pan, 1.0);

    let sample_rate = buffer.sample_rate() as f64;
    let start = (step.offset * sample_rate).round() as usize;
    let length = (step.length * sample_rate).round() as usize;
    let freq_end = if valid(step.freq_end) {
        step.freq_end
    } else {
        step.freq_start
    };
    let noise = if step.noise_blend.is_finite() {
        step.noise_blend.clamp(0.0, 1.0)
    } else {
        0.0
    };

    let total = buffer.len();
    let (left, right) = buffer.channels_mut();
    let mut phase = PhaseAccumulator::new(sample_rate);

    for i in 0..length {
        let index = start + i;
        if index >= total {
            break;
        }
        let progress = i as f64 / length as f64;
        let freq = step.freq_start + (freq_end - step.freq_start) * progress;

        let mut value = oscillator::sample(step.wave, phase.advance(freq));
        if noise > 0.0 {
            value = value * (1.0 - noise) + rng.bipolar() * noise;
        }

        let level = attack_decay(progress, step.attack_exponent, step.decay_exponent);
        let sample = value * level * step.amplitude;
        left[index] += (sample * left_gain) as f32;
        right[index] += (sample * right_gain) as f32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sfx::build_descriptor;
    use cadence_spec::{SfxEvent, SfxOptions, Waveform};

    #[test]
    fn test_buffer_sized_to_duration() {
        let descriptor = build_descriptor("ui-tap", &SfxOptions::default());
        let buffer = render_sfx(&descriptor, 44_100);
        let expected = (descriptor.duration * 44_100.0).ceil() as usize;
        assert_eq!(buffer.len(), expected);
        assert_eq!(buffer.left().len(), buffer.right().len());
    }

    #[test]
    fn test_every_event_renders_within_ceiling() {
        for event in SfxEvent::ALL {
            let descriptor = build_descriptor(event.as_str(), &SfxOptions::default());
            let buffer = render_sfx(&descriptor, 22_050);
            assert!(!buffer.is_silent(), "{} rendered silence", event.as_str());
            assert!(buffer.peak() <= SFX_CEILING + 1e-6);
        }
    }

    #[test]
    fn test_unknown_event_renders_silence() {
        let descriptor = build_descriptor("explosion", &SfxOptions::default());
        let buffer = render_sfx(&descriptor, 44_100);
        assert!(!buffer.is_empty());
        assert!(buffer.is_silent());
    }

    #[test]
    fn test_render_is_deterministic() {
        let descriptor = build_descriptor("gacha-reveal", &SfxOptions::default().rarity(5));
        assert_eq!(render_sfx(&descriptor, 44_100), render_sfx(&descriptor, 44_100));
    }

    #[test]
    fn test_malformed_steps_are_skipped() {
        let descriptor = SfxDescriptor {
            event: "custom".to_string(),
            duration: 0.25,
            seed: 3,
            steps: vec![
                Step::tone(0.0, 0.1, Waveform::Sine, -5.0, 100.0, 0.5),
                Step::tone(f64::NAN, 0.1, Waveform::Sine, 440.0, 440.0, 0.5),
                Step::tone(0.0, 0.0, Waveform::Sine, 440.0, 440.0, 0.5),
                Step::tone(0.15, 5.0, Waveform::Saw, 440.0, f64::NAN, 0.5).pan(-1.0),
            ],
        };
        let buffer = render_sfx(&descriptor, 8_000);
        assert_eq!(buffer.len(), 2_000);
        assert!(buffer.right().iter().all(|&s| s == 0.0));
        assert!(buffer.left().iter().any(|&s| s != 0.0));
    }

    #[test]
    fn test_degenerate_duration() {
        let descriptor = SfxDescriptor {
            duration: f64::INFINITY,
            ..SfxDescriptor::default()
        };
        let expected = (crate::sfx::TAIL_SECONDS * 1_000.0).ceil() as usize;
        assert_eq!(render_sfx(&descriptor, 1_000).len(), expected);
    }
}
