//! Waveform evaluation and phase accumulation.
//!
//! Phases are normalized to `[0, 1)`; oscillators map a phase to a sample in
//! `[-1, 1]`.

use std::f64::consts::PI;

use cadence_spec::Waveform;

/// Two times pi.
pub const TWO_PI: f64 = 2.0 * PI;

/// Sine wave.
#[inline]
pub fn sine(phase: f64) -> f64 {
    (TWO_PI * phase).sin()
}

/// Triangle wave, -1 at phase 0 and +1 at phase 0.5.
#[inline]
pub fn triangle(phase: f64) -> f64 {
    1.0 - 4.0 * (phase - 0.5).abs()
}

/// Square wave with 50% duty cycle.
#[inline]
pub fn square(phase: f64) -> f64 {
    if phase < 0.5 {
        1.0
    } else {
        -1.0
    }
}

/// Rising sawtooth.
#[inline]
pub fn saw(phase: f64) -> f64 {
    2.0 * phase - 1.0
}

/// Evaluates `waveform` at `phase`.
#[inline]
pub fn sample(waveform: Waveform, phase: f64) -> f64 {
    match waveform {
        Waveform::Sine => sine(phase),
        Waveform::Triangle => triangle(phase),
        Waveform::Square => square(phase),
        Waveform::Saw => saw(phase),
    }
}

/// Running oscillator phase.
#[derive(Debug, Clone)]
pub struct PhaseAccumulator {
    phase: f64,
    sample_rate: f64,
}

impl PhaseAccumulator {
    pub fn new(sample_rate: f64) -> Self {
        Self {
            phase: 0.0,
            sample_rate,
        }
    }

    /// Returns the current phase and advances by one sample at `frequency`.
    #[inline]
    pub fn advance(&mut self, frequency: f64) -> f64 {
        let current = self.phase;
        let step = frequency / self.sample_rate;
        if step.is_finite() {
            self.phase = (self.phase + step).rem_euclid(1.0);
        }
        current
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }
}
