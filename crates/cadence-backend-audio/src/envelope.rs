//! Amplitude envelopes evaluated over normalized note progress.
//!
//! All envelopes take `progress` in `[0, 1]` (position within the note) and
//! return a level in `[0, 1]`.

use std::f64::consts::PI;

use cadence_spec::EnvelopeShape;

/// Attack portion used by the pluck shape.
const PLUCK_ATTACK: f64 = 0.01;
/// Minimum release exponent of the pluck shape.
const PLUCK_MIN_CURVE: f64 = 2.5;
/// Ramp portion at the start of the gate shape.
const GATE_RAMP_IN: f64 = 0.04;
/// Ramp portion at the end of the gate shape.
const GATE_RAMP_OUT: f64 = 0.08;
/// Relative level of the second heartbeat bump.
const HEARTBEAT_SECOND: f64 = 0.6;

/// Envelope of one tone-writer note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneEnvelope {
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
}

impl Default for ToneEnvelope {
    fn default() -> Self {
        Self {
            shape: EnvelopeShape::Power,
            attack: 0.02,
            attack_curve: 1.0,
            sustain: 0.0,
            release_curve: 1.5,
        }
    }
}

impl ToneEnvelope {
    /// Level at `progress` through the note.
    pub fn level(&self, progress: f64) -> f64 {
        let p = progress.clamp(0.0, 1.0);
        let level = match self.shape {
            EnvelopeShape::Power => self.power(p),
            EnvelopeShape::Pluck => {
                if p < PLUCK_ATTACK {
                    p / PLUCK_ATTACK
                } else {
                    let n = (p - PLUCK_ATTACK) / (1.0 - PLUCK_ATTACK);
                    (1.0 - n).powf(positive(self.release_curve, 1.0).max(PLUCK_MIN_CURVE))
                }
            }
            EnvelopeShape::Gate => (p / GATE_RAMP_IN)
                .min((1.0 - p) / GATE_RAMP_OUT)
                .min(1.0),
            EnvelopeShape::Heartbeat => {
                bump(p / 0.3) + HEARTBEAT_SECOND * bump((p - 0.35) / 0.3)
            }
        };
        if level.is_finite() {
            level.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    fn power(&self, p: f64) -> f64 {
        let attack = unit(self.attack);
        let sustain = unit(self.sustain).min(1.0 - attack);
        if attack > 0.0 && p < attack {
            return (p / attack).powf(positive(self.attack_curve, 1.0));
        }
        if p < attack + sustain {
            return 1.0;
        }
        let release = 1.0 - attack - sustain;
        if release <= 0.0 {
            return 1.0;
        }
        let n = ((p - attack - sustain) / release).clamp(0.0, 1.0);
        (1.0 - n).powf(positive(self.release_curve, 1.0))
    }
}

/// Single multiplicative attack/decay shape used by sound-effect steps.
///
/// `level = p^attack_exponent * (1 - p)^decay_exponent`.
#[inline]
pub fn attack_decay(progress: f64, attack_exponent: f64, decay_exponent: f64) -> f64 {
    let p = progress.clamp(0.0, 1.0);
    let level = p.powf(attack_exponent.max(0.0)) * (1.0 - p).powf(decay_exponent.max(0.0));
    if level.is_finite() {
        level
    } else {
        0.0
    }
}

/// Raised sine bump over `x` in `[0, 1]`, zero elsewhere.
#[inline]
fn bump(x: f64) -> f64 {
    if (0.0..=1.0).contains(&x) {
        (PI * x).sin().powi(2)
    } else {
        0.0
    }
}

#[inline]
fn unit(v: f64) -> f64 {
    if v.is_finite() {
        v.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[inline]
fn positive(v: f64, fallback: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        fallback
    }
}
