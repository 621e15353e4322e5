//! Shared recipe types: waveforms and envelope shapes.

use serde::Serialize;

/// Implements `Deserialize` for a name enum by way of its `from_name`
/// constructor, so unknown names fall back instead of failing.
macro_rules! lenient_deserialize {
    ($ty:ty) => {
        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let name = <String as serde::Deserialize>::deserialize(deserializer)?;
                Ok(<$ty>::from_name(&name))
            }
        }
    };
}

pub(crate) use lenient_deserialize;

/// Basic oscillator waveforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Waveform {
    /// Sine wave.
    #[default]
    Sine,
    /// Triangle wave.
    Triangle,
    /// Square wave.
    Square,
    /// Sawtooth wave.
    Saw,
}

impl Waveform {
    /// Parses a waveform name. Unknown names fall back to sine.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "triangle" | "tri" => Waveform::Triangle,
            "square" => Waveform::Square,
            "saw" | "sawtooth" => Waveform::Saw,
            _ => Waveform::Sine,
        }
    }

    /// Returns the canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Triangle => "triangle",
            Waveform::Square => "square",
            Waveform::Saw => "saw",
        }
    }
}

lenient_deserialize!(Waveform);

/// Named amplitude envelope shapes used by the texture layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeShape {
    /// Attack power curve, optional plateau, release power curve.
    #[default]
    Power,
    /// Near-instant attack followed by a steep decay.
    Pluck,
    /// Flat level with short ramps at both ends.
    Gate,
    /// Two bumps per note ("lub-dub").
    Heartbeat,
}

impl EnvelopeShape {
    /// Parses a shape name. Unknown names fall back to the power curve.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "pluck" => EnvelopeShape::Pluck,
            "gate" => EnvelopeShape::Gate,
            "heartbeat" => EnvelopeShape::Heartbeat,
            _ => EnvelopeShape::Power,
        }
    }
}

lenient_deserialize!(EnvelopeShape);
