//! Tonal layers: drone, pad, arpeggio, melody and the texture layers.
//!
//! Every layer returns early, before touching the generator, when it is not
//! configured or its amplitude is not audible.

use cadence_backend_audio::{Note, ToneOptions};

use super::harmony::{chord_degrees, extend_pool};
use super::{audible, Composer};

/// Longest motif the melody will generate.
const MAX_MOTIF: u32 = 64;
/// Widest free-degree range of a motif.
const MAX_RANGE: i32 = 24;
/// Most notes per beat any stepped layer schedules.
const MAX_SUBDIVISION: u32 = 16;
/// Shortest pulse interval in beats.
const MIN_PULSE_INTERVAL: f64 = 1.0 / 16.0;
/// Widest pan given to melody echoes.
const ECHO_PAN: f64 = 0.5;
/// Widest pan given to sparkles.
const SPARKLE_PAN: f64 = 0.7;
/// Segment overlap of the atmosphere, as a fraction of the segment.
const ATMOSPHERE_OVERLAP: f64 = 1.1;

/// Clamps a fraction to `[0, 1]`, mapping NaN to zero.
fn unit(v: f64) -> f64 {
    if v.is_finite() {
        v.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Returns `v` if finite, else zero.
fn finite(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

impl Composer {
    pub(super) fn drone(&mut self) {
        let Some(layer) = self.preset.drone.clone() else {
            return;
        };
        if !audible(layer.amplitude) {
            return;
        }

        let total = self.preset.total_beats();
        let attack = unit(layer.attack);
        let tonic = self.scale.degree_freq(0, layer.octave);
        let options = ToneOptions::wave(layer.waveform)
            .attack(attack, 1.0)
            .sustain((1.0 - 2.0 * attack).max(0.0))
            .release(layer.release_curve)
            .vibrato(layer.vibrato_rate, layer.vibrato_depth);

        self.write(Note::new(0.0, total, tonic, layer.amplitude), &options);

        if layer.fifth {
            let fifth = self.scale.to_freq(layer.octave as f64 * 12.0 + 7.0);
            let amplitude = layer.amplitude * unit(layer.fifth_amplitude);
            self.write(Note::new(0.0, total, fifth, amplitude), &options);
        }

        if layer.shimmer && audible(layer.shimmer_amplitude) {
            let bar_beats = self.beats_per_bar();
            let octave_up = self.scale.degree_freq(0, layer.octave.saturating_add(1));
            let shimmer = ToneOptions::wave(layer.waveform)
                .attack(0.3, 1.5)
                .release(1.5);
            for bar in (1..self.bars()).step_by(2) {
                let note = Note::new(
                    bar as f64 * bar_beats,
                    bar_beats,
                    octave_up,
                    layer.shimmer_amplitude,
                );
                self.write(note, &shimmer);
            }
        }
    }

    pub(super) fn pad(&mut self) {
        let Some(layer) = self.preset.pad.clone() else {
            return;
        };
        if !audible(layer.amplitude) {
            return;
        }

        let bar_beats = self.beats_per_bar();
        let length = bar_beats * finite(layer.length);
        let detune = finite(layer.detune);
        let options = ToneOptions::wave(layer.waveform)
            .attack(layer.attack, layer.attack_curve)
            .release(layer.release_curve)
            .vibrato(layer.vibrato_rate, layer.vibrato_depth)
            .spread(finite(layer.spread));

        for bar in 0..self.bars() {
            let chord = chord_degrees(&self.preset, bar);
            let voices = chord.len();
            for (voice, degree) in chord.into_iter().enumerate() {
                let pan = if voices > 1 {
                    2.0 * voice as f64 / (voices - 1) as f64 - 1.0
                } else {
                    0.0
                };
                let sign = if voice % 2 == 0 { 1.0 } else { -1.0 };
                let freq = self.scale.degree_freq(degree, layer.octave);
                let note = Note::new(bar as f64 * bar_beats, length, freq, layer.amplitude).pan(pan);
                self.write(note, &options.detune(sign * detune));
            }
        }
    }

    pub(super) fn arpeggio(&mut self) {
        let Some(layer) = self.preset.arpeggio.clone() else {
            return;
        };
        if !audible(layer.amplitude) {
            return;
        }

        let subdivision = layer.subdivision.clamp(1, MAX_SUBDIVISION);
        let step_beats = 1.0 / subdivision as f64;
        let steps_per_bar = self.preset.beats_per_bar * subdivision;
        let span = layer.span.clamp(1, 64) as usize;
        let swing = unit(layer.swing) * step_beats;
        let gate = unit(layer.gate);
        let bar_beats = self.beats_per_bar();

        for bar in 0..self.bars() {
            let pool = extend_pool(&chord_degrees(&self.preset, bar), span, self.scale.len());
            if pool.is_empty() {
                continue;
            }
            for step in 0..steps_per_bar as usize {
                let degree = pool[step % pool.len()];
                let mut start = bar as f64 * bar_beats + step as f64 * step_beats;
                if step % 2 == 1 {
                    start += swing;
                }

                let pan = self.rng.bipolar() * finite(layer.pan_jitter);
                let amplitude = layer.amplitude * (1.0 - self.rng.next_f64() * unit(layer.amp_jitter));
                let detune = self.rng.bipolar() * finite(layer.detune_jitter);

                let freq = self.scale.degree_freq(degree, layer.octave);
                let options = ToneOptions::wave(layer.waveform)
                    .attack(0.02, 1.0)
                    .release(layer.decay_curve)
                    .detune(detune);
                self.write(
                    Note::new(start, step_beats * gate, freq, amplitude).pan(pan),
                    &options,
                );
            }
        }
    }

    pub(super) fn melody(&mut self) {
        let Some(layer) = self.preset.melody.clone() else {
            return;
        };
        if !audible(layer.amplitude) {
            return;
        }

        let chord_steps = self.preset.chord_style.steps();
        let range = layer.range.clamp(0, MAX_RANGE);
        let motif: Vec<i32> = (0..layer.motif_length.clamp(1, MAX_MOTIF))
            .map(|_| {
                if self.rng.chance(layer.chord_tone_bias) {
                    chord_steps[self.rng.index(chord_steps.len())]
                } else {
                    self.rng.index((2 * range + 1) as usize) as i32 - range
                }
            })
            .collect();

        let subdivision = layer.subdivision.clamp(1, MAX_SUBDIVISION) as usize;
        let steps_per_bar = self.preset.beats_per_bar as usize * subdivision;
        let total_steps = self.bars() * steps_per_bar;
        let step_beats = 1.0 / subdivision as f64;
        let length = step_beats * unit(layer.gate);
        let leap = layer.leap_size.clamp(-MAX_RANGE, MAX_RANGE);
        let options = ToneOptions::wave(layer.waveform)
            .attack(0.05, 1.2)
            .release(1.8)
            .vibrato(layer.vibrato_rate, layer.vibrato_depth);

        let mut last: Option<i32> = None;
        for step in 0..total_steps {
            let bar = step / steps_per_bar;
            let boost = if step % steps_per_bar == 0 {
                layer.downbeat_boost
            } else {
                0.0
            };
            if self.rng.next_f64() > layer.density + boost {
                continue;
            }

            let mut degree = motif[step % motif.len()].saturating_add(self.preset.chord_degree(bar));
            let roll = self.rng.next_f64();
            if roll < layer.leap_chance {
                degree = degree.saturating_add(leap * self.rng.sign() as i32);
            } else if roll < layer.leap_chance + layer.step_chance {
                degree = degree.saturating_add(self.rng.sign() as i32);
            }

            if last == Some(degree) && self.rng.chance(layer.repeat_avoid) {
                continue;
            }
            last = Some(degree);

            let start = step as f64 * step_beats;
            let freq = self.scale.degree_freq(degree, layer.octave);
            self.write(Note::new(start, length, freq, layer.amplitude), &options);

            if self.rng.chance(layer.echo_chance) {
                let pan = self.rng.bipolar() * ECHO_PAN;
                let echo = Note::new(
                    start + finite(layer.echo_delay).max(0.0),
                    length,
                    self.scale.degree_freq(degree, layer.octave.saturating_add(1)),
                    layer.amplitude * unit(layer.echo_amplitude),
                )
                .pan(pan);
                self.write(echo, &options);
            }
        }
    }

    pub(super) fn pulse(&mut self) {
        let Some(layer) = self.preset.pulse.clone() else {
            return;
        };
        if !audible(layer.amplitude) || !layer.interval.is_finite() {
            return;
        }

        let interval = layer.interval.max(MIN_PULSE_INTERVAL);
        let count = (self.preset.total_beats() / interval).floor() as usize;
        let bar_beats = self.beats_per_bar();
        let options = ToneOptions::wave(layer.waveform).shape(layer.shape);

        for k in 0..count {
            let beat = k as f64 * interval;
            let bar = (beat / bar_beats).floor() as usize;
            let freq = self
                .scale
                .degree_freq(self.preset.chord_degree(bar), layer.octave);
            let note = Note::new(beat, interval * unit(layer.length), freq, layer.amplitude);
            self.write(note, &options);
        }
    }

    pub(super) fn bass(&mut self) {
        let Some(layer) = self.preset.bass.clone() else {
            return;
        };
        if !audible(layer.amplitude) {
            return;
        }

        let bar_beats = self.beats_per_bar();
        let options = ToneOptions::wave(layer.waveform).shape(layer.shape);

        for bar in 0..self.bars() {
            let freq = self
                .scale
                .degree_freq(self.preset.chord_degree(bar), layer.octave);
            for &offset in &layer.pattern {
                if !(offset.is_finite() && (0.0..bar_beats).contains(&offset)) {
                    continue;
                }
                let note = Note::new(
                    bar as f64 * bar_beats + offset,
                    finite(layer.length),
                    freq,
                    layer.amplitude,
                );
                self.write(note, &options);
            }
        }
    }

    pub(super) fn riser(&mut self) {
        let Some(layer) = self.preset.riser.clone() else {
            return;
        };
        if !audible(layer.amplitude) {
            return;
        }

        let tail = (layer.bars.max(1) as usize).min(self.bars());
        let bar_beats = self.beats_per_bar();
        let start = (self.bars() - tail) as f64 * bar_beats;
        let from = self.scale.degree_freq(0, layer.start_octave);
        let to = self.scale.degree_freq(0, layer.end_octave);
        let options = ToneOptions::wave(layer.waveform)
            .shape(layer.shape)
            .attack(0.85, 2.0)
            .release(1.0)
            .noise(layer.noise)
            .sweep_to(to);

        self.write(
            Note::new(start, tail as f64 * bar_beats, from, layer.amplitude),
            &options,
        );
    }

    pub(super) fn atmosphere(&mut self) {
        let Some(layer) = self.preset.atmosphere.clone() else {
            return;
        };
        if !audible(layer.amplitude) {
            return;
        }

        let segment = layer.segment_bars.max(1) as usize;
        let bar_beats = self.beats_per_bar();
        let options = ToneOptions::wave(layer.waveform)
            .attack(0.4, 1.5)
            .release(1.5)
            .noise(layer.noise)
            .vibrato(layer.vibrato_rate, layer.vibrato_depth);

        for first_bar in (0..self.bars()).step_by(segment) {
            let bars = segment.min(self.bars() - first_bar);
            let pan = self.rng.bipolar() * finite(layer.pan_drift);
            let freq = self
                .scale
                .degree_freq(self.preset.chord_degree(first_bar), layer.octave);
            let note = Note::new(
                first_bar as f64 * bar_beats,
                bars as f64 * bar_beats * ATMOSPHERE_OVERLAP,
                freq,
                layer.amplitude,
            )
            .pan(pan);
            self.write(note, &options);
        }
    }

    pub(super) fn sparkle(&mut self) {
        let Some(layer) = self.preset.sparkle.clone() else {
            return;
        };
        if !audible(layer.amplitude) {
            return;
        }

        let bar_beats = self.beats_per_bar();
        let total = self.preset.total_beats() as usize;
        let options = ToneOptions::wave(layer.waveform).shape(layer.shape);

        for beat in 0..total {
            if !self.rng.chance(layer.density) {
                continue;
            }
            let offset = self.rng.next_f64();
            let bar = (beat as f64 / bar_beats).floor() as usize;
            let chord = chord_degrees(&self.preset, bar);
            let degree = chord[self.rng.index(chord.len())];
            let pan = self.rng.bipolar() * SPARKLE_PAN;

            let note = Note::new(
                beat as f64 + offset,
                finite(layer.length),
                self.scale.degree_freq(degree, layer.octave),
                layer.amplitude,
            )
            .pan(pan);
            self.write(note, &options);
        }
    }
}
