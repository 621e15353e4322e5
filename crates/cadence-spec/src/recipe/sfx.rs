//! Sound-effect descriptors: short effects as ordered synthesis steps.

use serde::{Deserialize, Serialize};

use super::common::Waveform;
use crate::hash::{Signature, SignatureKind};

/// One scheduled synthesis event within a descriptor.
///
/// Times are in seconds relative to the start of the effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Step {
    /// Start time in seconds.
    pub offset: f64,
    /// Duration in seconds.
    pub length: f64,
    /// Oscillator waveform.
    pub wave: Waveform,
    /// Frequency at the start of the step in Hz.
    pub freq_start: f64,
    /// Frequency at the end of the step in Hz (linear sweep).
    pub freq_end: f64,
    /// Peak amplitude.
    pub amplitude: f64,
    /// Exponent applied to the rising ramp.
    pub attack_exponent: f64,
    /// Exponent applied to the falling ramp.
    pub decay_exponent: f64,
    /// Explicit pan; `None` draws a small random pan from the descriptor seed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pan: Option<f64>,
    /// Noise blend (0-1).
    pub noise_blend: f64,
}

impl Default for Step {
    fn default() -> Self {
        Self {
            offset: 0.0,
            length: 0.1,
            wave: Waveform::Sine,
            freq_start: 440.0,
            freq_end: 440.0,
            amplitude: 0.5,
            attack_exponent: 0.2,
            decay_exponent: 2.0,
            pan: None,
            noise_blend: 0.0,
        }
    }
}

impl Step {
    /// Creates a step sweeping linearly from `freq_start` to `freq_end`.
    pub fn tone(
        offset: f64,
        length: f64,
        wave: Waveform,
        freq_start: f64,
        freq_end: f64,
        amplitude: f64,
    ) -> Self {
        Self {
            offset,
            length,
            wave,
            freq_start,
            freq_end,
            amplitude,
            ..Self::default()
        }
    }

    /// Sets the attack and decay exponents.
    pub fn envelope(mut self, attack_exponent: f64, decay_exponent: f64) -> Self {
        self.attack_exponent = attack_exponent;
        self.decay_exponent = decay_exponent;
        self
    }

    /// Pins the step to an explicit pan position.
    pub fn pan(mut self, pan: f64) -> Self {
        self.pan = Some(pan);
        self
    }

    /// Sets the noise blend.
    pub fn noise(mut self, blend: f64) -> Self {
        self.noise_blend = blend;
        self
    }

    /// End time of the step in seconds.
    pub fn end(&self) -> f64 {
        self.offset + self.length
    }
}

/// A complete one-shot effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SfxDescriptor {
    /// Event name the descriptor was built for.
    pub event: String,
    /// Total duration in seconds.
    pub duration: f64,
    /// RNG seed for noise and random pans.
    pub seed: u32,
    /// Ordered synthesis steps.
    pub steps: Vec<Step>,
}

impl Default for SfxDescriptor {
    fn default() -> Self {
        Self {
            event: String::new(),
            duration: 0.05,
            seed: 1,
            steps: Vec::new(),
        }
    }
}

impl SfxDescriptor {
    /// Content signature of this descriptor.
    pub fn signature(&self) -> Signature {
        let value = serde_json::to_value(self).unwrap_or_default();
        Signature::of_value(SignatureKind::Sfx, &value)
    }

    /// Returns true if the descriptor renders silence.
    pub fn is_silent(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Known sound-effect events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SfxEvent {
    UiTap,
    UiHover,
    UiConfirm,
    UiBack,
    UiError,
    UiToggle,
    Coin,
    Purchase,
    GachaRoll,
    GachaReveal,
    LevelUp,
    TrialStart,
    TrialResult,
    Notify,
}

impl SfxEvent {
    /// All known events.
    pub const ALL: [SfxEvent; 14] = [
        SfxEvent::UiTap,
        SfxEvent::UiHover,
        SfxEvent::UiConfirm,
        SfxEvent::UiBack,
        SfxEvent::UiError,
        SfxEvent::UiToggle,
        SfxEvent::Coin,
        SfxEvent::Purchase,
        SfxEvent::GachaRoll,
        SfxEvent::GachaReveal,
        SfxEvent::LevelUp,
        SfxEvent::TrialStart,
        SfxEvent::TrialResult,
        SfxEvent::Notify,
    ];

    /// Looks up an event by its kebab-case name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|event| event.as_str() == name)
    }

    /// Returns the kebab-case event name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SfxEvent::UiTap => "ui-tap",
            SfxEvent::UiHover => "ui-hover",
            SfxEvent::UiConfirm => "ui-confirm",
            SfxEvent::UiBack => "ui-back",
            SfxEvent::UiError => "ui-error",
            SfxEvent::UiToggle => "ui-toggle",
            SfxEvent::Coin => "coin",
            SfxEvent::Purchase => "purchase",
            SfxEvent::GachaRoll => "gacha-roll",
            SfxEvent::GachaReveal => "gacha-reveal",
            SfxEvent::LevelUp => "level-up",
            SfxEvent::TrialStart => "trial-start",
            SfxEvent::TrialResult => "trial-result",
            SfxEvent::Notify => "notify",
        }
    }
}

/// Context options that vary an effect.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SfxOptions {
    /// Rarity tier; shifts the base frequency upward.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rarity: Option<u8>,
    /// Outcome flag for result-style events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    /// Repeat count for counter-style events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    /// Playback gain multiplier; does not affect the rendered buffer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl SfxOptions {
    pub fn rarity(mut self, tier: u8) -> Self {
        self.rarity = Some(tier);
        self
    }

    pub fn success(mut self, success: bool) -> Self {
        self.success = Some(success);
        self
    }

    pub fn count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    pub fn volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    /// The numeric option folded into the descriptor seed.
    pub fn numeric(&self) -> u32 {
        self.rarity
            .map(u32::from)
            .or(self.count)
            .unwrap_or(0)
    }

    /// Playback gain multiplier, clamped to `0..=2`; defaults to 1.
    pub fn volume_multiplier(&self) -> f64 {
        match self.volume {
            Some(v) if v.is_finite() => v.clamp(0.0, 2.0),
            _ => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_roundtrip() {
        for event in SfxEvent::ALL {
            assert_eq!(SfxEvent::from_name(event.as_str()), Some(event));
            let json = serde_json::to_string(&event).unwrap();
            assert_eq!(json, format!("\"{}\"", event.as_str()));
        }
        assert_eq!(SfxEvent::from_name("explosion"), None);
    }

    #[test]
    fn test_options_numeric() {
        assert_eq!(SfxOptions::default().numeric(), 0);
        assert_eq!(SfxOptions::default().rarity(4).numeric(), 4);
        assert_eq!(SfxOptions::default().count(3).numeric(), 3);
    }

    #[test]
    fn test_volume_multiplier() {
        assert_eq!(SfxOptions::default().volume_multiplier(), 1.0);
        assert_eq!(SfxOptions::default().volume(5.0).volume_multiplier(), 2.0);
        assert_eq!(
            SfxOptions::default().volume(f64::NAN).volume_multiplier(),
            1.0
        );
    }

    #[test]
    fn test_step_builder() {
        let step = Step::tone(0.1, 0.2, Waveform::Square, 440.0, 880.0, 0.4)
            .envelope(0.1, 3.0)
            .pan(-0.5)
            .noise(0.2);
        assert!((step.end() - 0.3).abs() < 1e-12);
        assert_eq!(step.pan, Some(-0.5));
        assert_eq!(step.noise_blend, 0.2);
        assert_eq!(step.decay_exponent, 3.0);
    }

    #[test]
    fn test_descriptor_signature_depends_on_steps() {
        let empty = SfxDescriptor::default();
        let mut one = SfxDescriptor::default();
        one.steps.push(Step::default());
        assert!(empty.is_silent());
        assert_ne!(empty.signature(), one.signature());
    }
}
