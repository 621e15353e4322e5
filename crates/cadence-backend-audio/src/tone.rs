//! The tone writer: one enveloped, panned oscillator note added into a
//! stereo buffer.
//!
//! Notes are placed in beats and converted to samples with the writer's
//! tempo. Writes accumulate (`+=`) so overlapping notes sum; indices outside
//! the destination are dropped. Invalid input is a no-op, never a panic.

use cadence_spec::{EnvelopeShape, Waveform};

use crate::buffer::RenderedBuffer;
use crate::envelope::ToneEnvelope;
use crate::oscillator::{self, PhaseAccumulator};
use crate::rng::ParkMiller;

/// Per-note synthesis options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneOptions {
    /// Oscillator waveform.
    pub waveform: Waveform,
    /// Envelope family.
    pub shape: EnvelopeShape,
    /// Attack portion of the note (0-1).
    pub attack: f64,
    /// Attack curve exponent.
    pub attack_curve: f64,
    /// Plateau portion after the attack (0-1).
    pub sustain: f64,
    /// Release curve exponent.
    pub release_curve: f64,
    /// Noise blend (0-1).
    pub noise: f64,
    /// Vibrato rate in Hz.
    pub vibrato_rate: f64,
    /// Vibrato depth as a fraction of the frequency.
    pub vibrato_depth: f64,
    /// Static detune in semitones.
    pub detune: f64,
    /// Scale applied to the pan position.
    pub spread: f64,
    /// Sweep target; the frequency glides linearly to it over the note.
    pub end_frequency: Option<f64>,
}

impl Default for ToneOptions {
    fn default() -> Self {
        Self {
            waveform: Waveform::Sine,
            shape: EnvelopeShape::Power,
            attack: 0.02,
            attack_curve: 1.0,
            sustain: 0.0,
            release_curve: 1.5,
            noise: 0.0,
            vibrato_rate: 0.0,
            vibrato_depth: 0.0,
            detune: 0.0,
            spread: 1.0,
            end_frequency: None,
        }
    }
}

impl ToneOptions {
    pub fn wave(waveform: Waveform) -> Self {
        Self {
            waveform,
            ..Self::default()
        }
    }

    pub fn shape(mut self, shape: EnvelopeShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn attack(mut self, portion: f64, curve: f64) -> Self {
        self.attack = portion;
        self.attack_curve = curve;
        self
    }

    pub fn sustain(mut self, portion: f64) -> Self {
        self.sustain = portion;
        self
    }

    pub fn release(mut self, curve: f64) -> Self {
        self.release_curve = curve;
        self
    }

    pub fn noise(mut self, blend: f64) -> Self {
        self.noise = blend;
        self
    }

    pub fn vibrato(mut self, rate: f64, depth: f64) -> Self {
        self.vibrato_rate = rate;
        self.vibrato_depth = depth;
        self
    }

    pub fn detune(mut self, semitones: f64) -> Self {
        self.detune = semitones;
        self
    }

    pub fn spread(mut self, spread: f64) -> Self {
        self.spread = spread;
        self
    }

    pub fn sweep_to(mut self, frequency: f64) -> Self {
        self.end_frequency = Some(frequency);
        self
    }

    fn envelope(&self) -> ToneEnvelope {
        ToneEnvelope {
            shape: self.shape,
            attack: self.attack,
            attack_curve: self.attack_curve,
            sustain: self.sustain,
            release_curve: self.release_curve,
        }
    }
}

/// Placement and level of one note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    /// Start position in beats.
    pub start_beat: f64,
    /// Length in beats.
    pub beats: f64,
    /// Frequency in Hz.
    pub frequency: f64,
    /// Peak amplitude.
    pub amplitude: f64,
    /// Pan position (-1 left, +1 right).
    pub pan: f64,
}

impl Note {
    pub fn new(start_beat: f64, beats: f64, frequency: f64, amplitude: f64) -> Self {
        Self {
            start_beat,
            beats,
            frequency,
            amplitude,
            pan: 0.0,
        }
    }

    pub fn pan(mut self, pan: f64) -> Self {
        self.pan = pan;
        self
    }
}

/// Linear pan law: returns `(left_gain, right_gain)`.
#[inline]
pub fn pan_gains(pan: f64, spread: f64) -> (f64, f64) {
    let p = (pan * spread).clamp(-1.0, 1.0);
    if !p.is_finite() {
        return (1.0, 1.0);
    }
    (1.0 - p.max(0.0), 1.0 + p.min(0.0))
}

/// Writes notes into stereo buffers at a fixed tempo and sample rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneWriter {
    sample_rate: f64,
    seconds_per_beat: f64,
}

impl ToneWriter {
    pub fn new(sample_rate: u32, tempo: f64) -> Self {
        Self {
            sample_rate: sample_rate as f64,
            seconds_per_beat: 60.0 / tempo,
        }
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn seconds_per_beat(&self) -> f64 {
        self.seconds_per_beat
    }

    /// Converts a beat position to a sample index (rounded).
    pub fn beat_to_sample(&self, beat: f64) -> i64 {
        (beat * self.seconds_per_beat * self.sample_rate).round() as i64
    }

    /// Adds one note into `dest`.
    ///
    /// `rng` is drawn from only when the note blends noise.
    pub fn write(
        &self,
        dest: &mut RenderedBuffer,
        rng: &mut ParkMiller,
        note: &Note,
        options: &ToneOptions,
    ) {
        if !(note.frequency.is_finite() && note.frequency > 0.0) {
            return;
        }
        if !(note.amplitude.is_finite() && note.amplitude > 0.0) {
            return;
        }
        if !(note.start_beat.is_finite() && note.beats.is_finite() && note.beats > 0.0) {
            return;
        }

        let start = self.beat_to_sample(note.start_beat);
        let length = self.beat_to_sample(note.beats);
        let total = dest.len() as i64;
        if length <= 0 || start >= total || start + length <= 0 {
            return;
        }

        let (left_gain, right_gain) = pan_gains(note.pan, options.spread);
        let detune = if options.detune.is_finite() {
            2.0_f64.powf(options.detune / 12.0)
        } else {
            1.0
        };
        let base = note.frequency * detune;
        let target = options
            .end_frequency
            .filter(|f| f.is_finite() && *f > 0.0)
            .map(|f| f * detune)
            .unwrap_or(base);
        let noise = if options.noise.is_finite() {
            options.noise.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let vibrato = options.vibrato_rate.is_finite()
            && options.vibrato_depth.is_finite()
            && options.vibrato_rate > 0.0
            && options.vibrato_depth > 0.0;

        let envelope = options.envelope();
        let mut phase = PhaseAccumulator::new(self.sample_rate);
        let mut lfo = PhaseAccumulator::new(self.sample_rate);
        let (left, right) = dest.channels_mut();

        for i in 0..length {
            let index = start + i;
            if index >= total {
                break;
            }
            let progress = i as f64 / length as f64;

            let mut freq = base + (target - base) * progress;
            if vibrato {
                freq *= 1.0 + options.vibrato_depth * oscillator::sine(lfo.advance(options.vibrato_rate));
            }

            let mut value = oscillator::sample(options.waveform, phase.advance(freq));
            if noise > 0.0 {
                value = value * (1.0 - noise) + rng.bipolar() * noise;
            }
            if index < 0 {
                continue;
            }

            let sample = value * envelope.level(progress) * note.amplitude;
            let slot = index as usize;
            left[slot] += (sample * left_gain) as f32;
            right[slot] += (sample * right_gain) as f32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn writer() -> ToneWriter {
        // 60 BPM at 1000 Hz: one beat is 1000 samples.
        ToneWriter::new(1000, 60.0)
    }

    #[test]
    fn test_invalid_notes_are_noops() {
        let w = writer();
        let mut rng = ParkMiller::new(1);
        let mut buffer = RenderedBuffer::silent(2000, 1000);
        let opts = ToneOptions::default();

        for note in [
            Note::new(0.0, 1.0, 0.0, 0.5),
            Note::new(0.0, 1.0, -440.0, 0.5),
            Note::new(0.0, 1.0, 440.0, 0.0),
            Note::new(0.0, 0.0, 440.0, 0.5),
            Note::new(5.0, 1.0, 440.0, 0.5),
            Note::new(f64::NAN, 1.0, 440.0, 0.5),
            Note::new(-3.0, 1.0, 440.0, 0.5),
        ] {
            w.write(&mut buffer, &mut rng, &note, &opts);
        }
        assert!(buffer.is_silent());
    }

    #[test]
    fn test_note_lands_in_its_window() {
        let w = writer();
        let mut rng = ParkMiller::new(1);
        let mut buffer = RenderedBuffer::silent(3000, 1000);
        w.write(
            &mut buffer,
            &mut rng,
            &Note::new(1.0, 1.0, 50.0, 0.5),
            &ToneOptions::default().attack(0.1, 1.0),
        );

        assert!(buffer.left()[..1000].iter().all(|&s| s == 0.0));
        assert!(buffer.left()[2000..].iter().all(|&s| s == 0.0));
        assert!(buffer.left()[1000..2000].iter().any(|&s| s != 0.0));
        assert!(buffer.peak() <= 0.5 + 1e-6);
    }

    #[test]
    fn test_writes_accumulate() {
        let w = writer();
        let mut rng = ParkMiller::new(1);
        let note = Note::new(0.0, 1.0, 10.0, 0.3);
        let opts = ToneOptions::default();

        let mut once = RenderedBuffer::silent(1000, 1000);
        w.write(&mut once, &mut rng, &note, &opts);
        let mut twice = RenderedBuffer::silent(1000, 1000);
        w.write(&mut twice, &mut rng, &note, &opts);
        w.write(&mut twice, &mut rng, &note, &opts);

        for (a, b) in once.left().iter().zip(twice.left()) {
            assert!((a * 2.0 - b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_overhanging_note_is_clipped_to_buffer() {
        let w = writer();
        let mut rng = ParkMiller::new(1);
        let mut buffer = RenderedBuffer::silent(500, 1000);
        w.write(
            &mut buffer,
            &mut rng,
            &Note::new(-0.25, 1.0, 20.0, 0.5),
            &ToneOptions::default(),
        );
        assert_eq!(buffer.len(), 500);
        assert!(!buffer.is_silent());
    }

    #[test]
    fn test_pan_law() {
        assert_eq!(pan_gains(0.0, 1.0), (1.0, 1.0));
        assert_eq!(pan_gains(1.0, 1.0), (0.0, 1.0));
        assert_eq!(pan_gains(-1.0, 1.0), (1.0, 0.0));
        assert_eq!(pan_gains(-4.0, 0.5), (1.0, 0.0));
        assert_eq!(pan_gains(0.5, 0.5), (0.75, 1.0));

        let w = writer();
        let mut rng = ParkMiller::new(1);
        let mut buffer = RenderedBuffer::silent(1000, 1000);
        w.write(
            &mut buffer,
            &mut rng,
            &Note::new(0.0, 1.0, 20.0, 0.5).pan(1.0),
            &ToneOptions::default(),
        );
        assert!(buffer.left().iter().all(|&s| s == 0.0));
        assert!(buffer.right().iter().any(|&s| s != 0.0));
    }

    #[test]
    fn test_noise_draws_from_rng_only_when_blended() {
        let w = writer();
        let mut buffer = RenderedBuffer::silent(1000, 1000);

        let mut rng = ParkMiller::new(5);
        w.write(&mut buffer, &mut rng, &Note::new(0.0, 0.5, 30.0, 0.2), &ToneOptions::default());
        assert_eq!(rng.draws(), 0);

        w.write(
            &mut buffer,
            &mut rng,
            &Note::new(0.0, 0.5, 30.0, 0.2),
            &ToneOptions::default().noise(0.5),
        );
        assert_eq!(rng.draws(), 500);
    }

    #[test]
    fn test_sweep_and_vibrato_are_deterministic() {
        let w = writer();
        let opts = ToneOptions::wave(Waveform::Saw)
            .sweep_to(80.0)
            .vibrato(5.0, 0.02)
            .detune(0.3)
            .noise(0.2);
        let render = || {
            let mut rng = ParkMiller::new(11);
            let mut buffer = RenderedBuffer::silent(2000, 1000);
            w.write(&mut buffer, &mut rng, &Note::new(0.0, 2.0, 40.0, 0.4), &opts);
            buffer
        };
        assert_eq!(render(), render());
    }
}
