//! Music presets: one looping track as tempo, harmony and texture layers.
//!
//! Every struct here is `#[serde(default)]`, so a partial JSON object is
//! merged over the documented defaults. Unknown enum names deserialize to a
//! fallback rather than failing.

use serde::{Deserialize, Serialize};

use super::common::{lenient_deserialize, EnvelopeShape, Waveform};
use crate::hash::{Signature, SignatureKind};

/// Scale tables available to the harmony resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleName {
    /// Ionian major.
    #[default]
    Major,
    /// Natural minor.
    Minor,
    /// Major pentatonic.
    Pentatonic,
    /// Minor pentatonic.
    MinorPentatonic,
    /// Dorian mode.
    Dorian,
    /// Lydian mode.
    Lydian,
    /// Mixolydian mode.
    Mixolydian,
    /// Harmonic minor.
    HarmonicMinor,
}

impl ScaleName {
    /// Parses a scale name. Unknown names fall back to major.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "minor" | "aeolian" => ScaleName::Minor,
            "pentatonic" | "major_pentatonic" => ScaleName::Pentatonic,
            "minor_pentatonic" => ScaleName::MinorPentatonic,
            "dorian" => ScaleName::Dorian,
            "lydian" => ScaleName::Lydian,
            "mixolydian" => ScaleName::Mixolydian,
            "harmonic_minor" => ScaleName::HarmonicMinor,
            _ => ScaleName::Major,
        }
    }

    /// All supported scales.
    pub const ALL: [ScaleName; 8] = [
        ScaleName::Major,
        ScaleName::Minor,
        ScaleName::Pentatonic,
        ScaleName::MinorPentatonic,
        ScaleName::Dorian,
        ScaleName::Lydian,
        ScaleName::Mixolydian,
        ScaleName::HarmonicMinor,
    ];
}

lenient_deserialize!(ScaleName);

/// Which scale steps, counted from the bar's chord degree, form a chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChordStyle {
    /// Root, third, fifth and octave.
    #[default]
    Sustain,
    /// Open voicing built from fifths and ninths.
    Airy,
    /// Triad plus a high colour tone.
    Stabs,
    /// Plain triad.
    Triad,
}

impl ChordStyle {
    /// Parses a chord-style name. Unknown names fall back to sustain.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "airy" => ChordStyle::Airy,
            "stabs" => ChordStyle::Stabs,
            "triad" => ChordStyle::Triad,
            _ => ChordStyle::Sustain,
        }
    }

    /// Scale-step offsets forming the chord.
    pub fn steps(&self) -> &'static [i32] {
        match self {
            ChordStyle::Sustain => &[0, 2, 4, 7],
            ChordStyle::Airy => &[0, 4, 8, 11],
            ChordStyle::Stabs => &[0, 2, 4, 9],
            ChordStyle::Triad => &[0, 2, 4],
        }
    }
}

lenient_deserialize!(ChordStyle);

/// Long sustained tonic tone with optional fifth and alternating-bar shimmer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DroneLayer {
    /// Peak amplitude of the tonic voice.
    pub amplitude: f64,
    /// Octave shift relative to the preset root.
    pub octave: i32,
    /// Oscillator waveform.
    pub waveform: Waveform,
    /// Adds a perfect fifth above the tonic.
    pub fifth: bool,
    /// Amplitude of the fifth relative to the tonic.
    pub fifth_amplitude: f64,
    /// Adds an octave doubling on every other bar.
    pub shimmer: bool,
    /// Absolute amplitude of the shimmer voice.
    pub shimmer_amplitude: f64,
    /// Attack portion of the note (0-1).
    pub attack: f64,
    /// Release curve exponent.
    pub release_curve: f64,
    /// Vibrato rate in Hz.
    pub vibrato_rate: f64,
    /// Vibrato depth as a fraction of the frequency.
    pub vibrato_depth: f64,
}

impl Default for DroneLayer {
    fn default() -> Self {
        Self {
            amplitude: 0.16,
            octave: -2,
            waveform: Waveform::Sine,
            fifth: true,
            fifth_amplitude: 0.5,
            shimmer: false,
            shimmer_amplitude: 0.04,
            attack: 0.15,
            release_curve: 1.2,
            vibrato_rate: 0.2,
            vibrato_depth: 0.002,
        }
    }
}

/// One chord per bar, voices spread across the stereo field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PadLayer {
    /// Peak amplitude per voice.
    pub amplitude: f64,
    /// Octave shift relative to the preset root.
    pub octave: i32,
    /// Oscillator waveform.
    pub waveform: Waveform,
    /// Stereo spread of the voices (0 = mono, 1 = hard left to hard right).
    pub spread: f64,
    /// Note length in bars (slightly above 1 overlaps bar boundaries).
    pub length: f64,
    /// Attack portion of the note (0-1).
    pub attack: f64,
    /// Attack curve exponent.
    pub attack_curve: f64,
    /// Release curve exponent.
    pub release_curve: f64,
    /// Static detune in semitones, alternating sign per voice.
    pub detune: f64,
    /// Vibrato rate in Hz.
    pub vibrato_rate: f64,
    /// Vibrato depth as a fraction of the frequency.
    pub vibrato_depth: f64,
}

impl Default for PadLayer {
    fn default() -> Self {
        Self {
            amplitude: 0.1,
            octave: 0,
            waveform: Waveform::Triangle,
            spread: 0.8,
            length: 1.05,
            attack: 0.35,
            attack_curve: 1.6,
            release_curve: 1.4,
            detune: 0.05,
            vibrato_rate: 4.0,
            vibrato_depth: 0.003,
        }
    }
}

/// Chord tones stepped at a fixed subdivision, with swing and jitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArpeggioLayer {
    /// Peak amplitude per note.
    pub amplitude: f64,
    /// Octave shift relative to the preset root.
    pub octave: i32,
    /// Oscillator waveform.
    pub waveform: Waveform,
    /// Notes per beat.
    pub subdivision: u32,
    /// Number of pool tones cycled through; extended by octaves when larger
    /// than the chord.
    pub span: u32,
    /// Delay of every other step, as a fraction of the step.
    pub swing: f64,
    /// Sounding fraction of each step.
    pub gate: f64,
    /// Maximum random pan offset.
    pub pan_jitter: f64,
    /// Maximum random amplitude reduction (fraction).
    pub amp_jitter: f64,
    /// Maximum random detune in semitones.
    pub detune_jitter: f64,
    /// Release curve exponent.
    pub decay_curve: f64,
}

impl Default for ArpeggioLayer {
    fn default() -> Self {
        Self {
            amplitude: 0.07,
            octave: 1,
            waveform: Waveform::Square,
            subdivision: 4,
            span: 6,
            swing: 0.1,
            gate: 0.8,
            pan_jitter: 0.35,
            amp_jitter: 0.25,
            detune_jitter: 0.03,
            decay_curve: 2.4,
        }
    }
}

/// Motif-driven lead line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MelodyLayer {
    /// Peak amplitude per note.
    pub amplitude: f64,
    /// Octave shift relative to the preset root.
    pub octave: i32,
    /// Oscillator waveform.
    pub waveform: Waveform,
    /// Notes per beat.
    pub subdivision: u32,
    /// Probability that a step sounds.
    pub density: f64,
    /// Extra probability added on the first step of each bar.
    pub downbeat_boost: f64,
    /// Number of degrees in the generated motif.
    pub motif_length: u32,
    /// Probability a motif slot is a chord tone rather than a free degree.
    pub chord_tone_bias: f64,
    /// Free degrees are drawn from `-range..=range`.
    pub range: i32,
    /// Probability of a leap.
    pub leap_chance: f64,
    /// Leap size in scale steps.
    pub leap_size: i32,
    /// Probability of a one-step move.
    pub step_chance: f64,
    /// Probability that an immediate repeat is suppressed.
    pub repeat_avoid: f64,
    /// Probability of an octave-up echo.
    pub echo_chance: f64,
    /// Echo delay in beats.
    pub echo_delay: f64,
    /// Echo amplitude relative to the note.
    pub echo_amplitude: f64,
    /// Sounding fraction of each step.
    pub gate: f64,
    /// Vibrato rate in Hz.
    pub vibrato_rate: f64,
    /// Vibrato depth as a fraction of the frequency.
    pub vibrato_depth: f64,
}

impl Default for MelodyLayer {
    fn default() -> Self {
        Self {
            amplitude: 0.09,
            octave: 1,
            waveform: Waveform::Triangle,
            subdivision: 2,
            density: 0.5,
            downbeat_boost: 0.25,
            motif_length: 8,
            chord_tone_bias: 0.6,
            range: 5,
            leap_chance: 0.1,
            leap_size: 4,
            step_chance: 0.2,
            repeat_avoid: 0.6,
            echo_chance: 0.2,
            echo_delay: 0.5,
            echo_amplitude: 0.35,
            gate: 0.9,
            vibrato_rate: 5.0,
            vibrato_depth: 0.004,
        }
    }
}

/// Step-sequenced kick, snare and hat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PercussionLayer {
    /// Overall amplitude of the kit.
    pub amplitude: f64,
    /// Sequencer steps per bar.
    pub steps_per_bar: u32,
    /// Kick velocities (0..1), cycled across steps.
    pub kick: Vec<f64>,
    /// Snare velocities (0..1), cycled across steps.
    pub snare: Vec<f64>,
    /// Hat velocities (0..1), cycled across steps.
    pub hat: Vec<f64>,
    /// Kick start frequency in Hz.
    pub kick_start: f64,
    /// Kick end frequency in Hz.
    pub kick_end: f64,
    /// Kick amplitude decay rate (1/s).
    pub kick_decay: f64,
    /// Snare tone frequency in Hz.
    pub snare_tone: f64,
    /// Snare noise blend (0-1).
    pub snare_noise: f64,
    /// Snare decay rate (1/s).
    pub snare_decay: f64,
    /// Hat low-pass coefficient (0-1, higher is darker).
    pub hat_cutoff: f64,
    /// Hat decay rate (1/s).
    pub hat_decay: f64,
    /// Hat pan position.
    pub hat_pan: f64,
    /// Delay of off-beat steps, as a fraction of the step.
    pub swing: f64,
    /// Maximum random hat timing offset in beats.
    pub jitter: f64,
}

impl Default for PercussionLayer {
    fn default() -> Self {
        Self {
            amplitude: 0.25,
            steps_per_bar: 16,
            kick: vec![
                1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.8, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
            ],
            snare: vec![
                0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.3,
            ],
            hat: vec![0.6, 0.0, 0.4, 0.0],
            kick_start: 120.0,
            kick_end: 45.0,
            kick_decay: 9.0,
            snare_tone: 190.0,
            snare_noise: 0.7,
            snare_decay: 14.0,
            hat_cutoff: 0.35,
            hat_decay: 40.0,
            hat_pan: 0.25,
            swing: 0.08,
            jitter: 0.01,
        }
    }
}

/// Fixed-interval pulse on the chord root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseLayer {
    /// Peak amplitude per pulse.
    pub amplitude: f64,
    /// Octave shift relative to the preset root.
    pub octave: i32,
    /// Oscillator waveform.
    pub waveform: Waveform,
    /// Interval between pulses in beats.
    pub interval: f64,
    /// Sounding fraction of the interval.
    pub length: f64,
    /// Envelope shape.
    pub shape: EnvelopeShape,
}

impl Default for PulseLayer {
    fn default() -> Self {
        Self {
            amplitude: 0.1,
            octave: -1,
            waveform: Waveform::Sine,
            interval: 1.0,
            length: 0.6,
            shape: EnvelopeShape::Heartbeat,
        }
    }
}

/// Per-bar bass pattern on the chord root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BassLayer {
    /// Peak amplitude per note.
    pub amplitude: f64,
    /// Octave shift relative to the preset root.
    pub octave: i32,
    /// Oscillator waveform.
    pub waveform: Waveform,
    /// Beat offsets within each bar.
    pub pattern: Vec<f64>,
    /// Note length in beats.
    pub length: f64,
    /// Envelope shape.
    pub shape: EnvelopeShape,
}

impl Default for BassLayer {
    fn default() -> Self {
        Self {
            amplitude: 0.14,
            octave: -2,
            waveform: Waveform::Saw,
            pattern: vec![0.0, 1.5, 2.5],
            length: 0.75,
            shape: EnvelopeShape::Pluck,
        }
    }
}

/// Upward sweep over the last bars of the track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiserLayer {
    /// Peak amplitude.
    pub amplitude: f64,
    /// Length of the tail in bars.
    pub bars: u32,
    /// Octave of the sweep start.
    pub start_octave: i32,
    /// Octave of the sweep end.
    pub end_octave: i32,
    /// Noise blend (0-1).
    pub noise: f64,
    /// Oscillator waveform.
    pub waveform: Waveform,
    /// Envelope shape.
    pub shape: EnvelopeShape,
}

impl Default for RiserLayer {
    fn default() -> Self {
        Self {
            amplitude: 0.08,
            bars: 2,
            start_octave: -1,
            end_octave: 1,
            noise: 0.35,
            waveform: Waveform::Saw,
            shape: EnvelopeShape::Power,
        }
    }
}

/// Continuous noisy bed following the progression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtmosphereLayer {
    /// Peak amplitude.
    pub amplitude: f64,
    /// Octave shift relative to the preset root.
    pub octave: i32,
    /// Oscillator waveform.
    pub waveform: Waveform,
    /// Noise blend (0-1).
    pub noise: f64,
    /// Bars covered by each segment.
    pub segment_bars: u32,
    /// Maximum random pan per segment.
    pub pan_drift: f64,
    /// Vibrato rate in Hz.
    pub vibrato_rate: f64,
    /// Vibrato depth as a fraction of the frequency.
    pub vibrato_depth: f64,
}

impl Default for AtmosphereLayer {
    fn default() -> Self {
        Self {
            amplitude: 0.06,
            octave: 0,
            waveform: Waveform::Sine,
            noise: 0.6,
            segment_bars: 4,
            pan_drift: 0.4,
            vibrato_rate: 0.3,
            vibrato_depth: 0.01,
        }
    }
}

/// Sparse, randomly timed high chord tones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SparkleLayer {
    /// Peak amplitude per note.
    pub amplitude: f64,
    /// Octave shift relative to the preset root.
    pub octave: i32,
    /// Oscillator waveform.
    pub waveform: Waveform,
    /// Probability of a sparkle per beat.
    pub density: f64,
    /// Note length in beats.
    pub length: f64,
    /// Envelope shape.
    pub shape: EnvelopeShape,
}

impl Default for SparkleLayer {
    fn default() -> Self {
        Self {
            amplitude: 0.05,
            octave: 2,
            waveform: Waveform::Triangle,
            density: 0.2,
            length: 0.3,
            shape: EnvelopeShape::Pluck,
        }
    }
}

/// A complete music track arrangement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MusicPreset {
    /// Tempo in beats per minute.
    pub tempo: f64,
    /// Beats in one bar.
    pub beats_per_bar: u32,
    /// Number of bars in the loop.
    pub bars: u32,
    /// Scale used to resolve degrees.
    pub scale: ScaleName,
    /// Root frequency in Hz (degree 0, octave 0).
    pub root: f64,
    /// RNG seed for humanization and motif generation.
    pub seed: u32,
    /// Playback gain of the finished track.
    pub volume: f64,
    /// Chord degree per bar, cycled.
    pub progression: Vec<i32>,
    /// Chord voicing.
    pub chord_style: ChordStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drone: Option<DroneLayer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pad: Option<PadLayer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arpeggio: Option<ArpeggioLayer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub melody: Option<MelodyLayer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percussion: Option<PercussionLayer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pulse: Option<PulseLayer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bass: Option<BassLayer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub riser: Option<RiserLayer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atmosphere: Option<AtmosphereLayer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sparkle: Option<SparkleLayer>,
}

impl Default for MusicPreset {
    fn default() -> Self {
        Self {
            tempo: 96.0,
            beats_per_bar: 4,
            bars: 8,
            scale: ScaleName::Major,
            root: 220.0,
            seed: 1,
            volume: 0.6,
            progression: vec![0, 5, 3, 4],
            chord_style: ChordStyle::Sustain,
            drone: None,
            pad: None,
            arpeggio: None,
            melody: None,
            percussion: None,
            pulse: None,
            bass: None,
            riser: None,
            atmosphere: None,
            sparkle: None,
        }
    }
}

impl MusicPreset {
    /// Starts a builder over the default preset.
    pub fn builder() -> MusicPresetBuilder {
        MusicPresetBuilder::default()
    }

    /// Parses a preset from JSON, merging missing fields over the defaults.
    pub fn from_json(json: &str) -> crate::SpecResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Content signature of this preset.
    pub fn signature(&self) -> Signature {
        let value = serde_json::to_value(self).unwrap_or_default();
        Signature::of_value(SignatureKind::Music, &value)
    }

    /// Returns a copy with top-level numeric fields forced into working ranges.
    ///
    /// Non-finite or non-positive tempo and root fall back to the defaults;
    /// counts are clamped to at least one.
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let mut preset = self.clone();
        preset.tempo = if preset.tempo.is_finite() && preset.tempo > 0.0 {
            preset.tempo.clamp(20.0, 400.0)
        } else {
            defaults.tempo
        };
        preset.root = if preset.root.is_finite() && preset.root > 0.0 {
            preset.root
        } else {
            defaults.root
        };
        preset.volume = if preset.volume.is_finite() {
            preset.volume.clamp(0.0, 1.0)
        } else {
            defaults.volume
        };
        preset.beats_per_bar = preset.beats_per_bar.clamp(1, 32);
        preset.bars = preset.bars.clamp(1, 256);
        preset
    }

    /// Seconds per beat at this preset's tempo.
    pub fn seconds_per_beat(&self) -> f64 {
        60.0 / self.tempo
    }

    /// Total number of beats in the loop.
    pub fn total_beats(&self) -> f64 {
        self.bars as f64 * self.beats_per_bar as f64
    }

    /// Loop duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.total_beats() * self.seconds_per_beat()
    }

    /// Chord degree for the given bar (progression cycles; empty means 0).
    pub fn chord_degree(&self, bar: usize) -> i32 {
        if self.progression.is_empty() {
            0
        } else {
            self.progression[bar % self.progression.len()]
        }
    }
}

/// Chainable builder for [`MusicPreset`].
#[derive(Debug, Clone, Default)]
pub struct MusicPresetBuilder {
    preset: MusicPreset,
}

impl MusicPresetBuilder {
    pub fn tempo(mut self, tempo: f64) -> Self {
        self.preset.tempo = tempo;
        self
    }

    pub fn beats_per_bar(mut self, beats: u32) -> Self {
        self.preset.beats_per_bar = beats;
        self
    }

    pub fn bars(mut self, bars: u32) -> Self {
        self.preset.bars = bars;
        self
    }

    pub fn scale(mut self, scale: ScaleName) -> Self {
        self.preset.scale = scale;
        self
    }

    pub fn root(mut self, root: f64) -> Self {
        self.preset.root = root;
        self
    }

    pub fn seed(mut self, seed: u32) -> Self {
        self.preset.seed = seed;
        self
    }

    pub fn volume(mut self, volume: f64) -> Self {
        self.preset.volume = volume;
        self
    }

    pub fn progression(mut self, degrees: impl Into<Vec<i32>>) -> Self {
        self.preset.progression = degrees.into();
        self
    }

    pub fn chord_style(mut self, style: ChordStyle) -> Self {
        self.preset.chord_style = style;
        self
    }

    pub fn drone(mut self, layer: DroneLayer) -> Self {
        self.preset.drone = Some(layer);
        self
    }

    pub fn pad(mut self, layer: PadLayer) -> Self {
        self.preset.pad = Some(layer);
        self
    }

    pub fn arpeggio(mut self, layer: ArpeggioLayer) -> Self {
        self.preset.arpeggio = Some(layer);
        self
    }

    pub fn melody(mut self, layer: MelodyLayer) -> Self {
        self.preset.melody = Some(layer);
        self
    }

    pub fn percussion(mut self, layer: PercussionLayer) -> Self {
        self.preset.percussion = Some(layer);
        self
    }

    pub fn pulse(mut self, layer: PulseLayer) -> Self {
        self.preset.pulse = Some(layer);
        self
    }

    pub fn bass(mut self, layer: BassLayer) -> Self {
        self.preset.bass = Some(layer);
        self
    }

    pub fn riser(mut self, layer: RiserLayer) -> Self {
        self.preset.riser = Some(layer);
        self
    }

    pub fn atmosphere(mut self, layer: AtmosphereLayer) -> Self {
        self.preset.atmosphere = Some(layer);
        self
    }

    pub fn sparkle(mut self, layer: SparkleLayer) -> Self {
        self.preset.sparkle = Some(layer);
        self
    }

    /// Finishes the builder.
    pub fn build(self) -> MusicPreset {
        self.preset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_json_merges_defaults() {
        let preset = MusicPreset::from_json(
            r#"{"tempo": 120, "scale": "dorian", "pad": {"amplitude": 0.2}}"#,
        )
        .unwrap();

        assert_eq!(preset.tempo, 120.0);
        assert_eq!(preset.scale, ScaleName::Dorian);
        assert_eq!(preset.bars, 8);
        let pad = preset.pad.unwrap();
        assert_eq!(pad.amplitude, 0.2);
        assert_eq!(pad.spread, PadLayer::default().spread);
        assert!(preset.drone.is_none());
    }

    #[test]
    fn test_unknown_names_fall_back() {
        let preset =
            MusicPreset::from_json(r#"{"scale": "klingon", "chord_style": "cluster"}"#).unwrap();
        assert_eq!(preset.scale, ScaleName::Major);
        assert_eq!(preset.chord_style, ChordStyle::Sustain);
    }

    #[test]
    fn test_signature_tracks_content() {
        let a = MusicPreset::builder().seed(1).build();
        let b = MusicPreset::builder().seed(1).build();
        let c = MusicPreset::builder().seed(2).build();
        assert_eq!(a.signature(), b.signature());
        assert_ne!(a.signature(), c.signature());
    }

    #[test]
    fn test_signature_ignores_json_key_order() {
        let a = MusicPreset::from_json(r#"{"tempo": 100, "bars": 4}"#).unwrap();
        let b = MusicPreset::from_json(r#"{"bars": 4, "tempo": 100}"#).unwrap();
        assert_eq!(a.signature(), b.signature());
    }

    #[test]
    fn test_sanitized_clamps_degenerate_values() {
        let preset = MusicPreset::builder()
            .tempo(f64::NAN)
            .root(-5.0)
            .bars(0)
            .beats_per_bar(0)
            .volume(3.0)
            .build()
            .sanitized();

        assert_eq!(preset.tempo, 96.0);
        assert_eq!(preset.root, 220.0);
        assert_eq!(preset.bars, 1);
        assert_eq!(preset.beats_per_bar, 1);
        assert_eq!(preset.volume, 1.0);
    }

    #[test]
    fn test_chord_degree_cycles() {
        let preset = MusicPreset::builder().progression(vec![0, 3]).build();
        assert_eq!(preset.chord_degree(0), 0);
        assert_eq!(preset.chord_degree(1), 3);
        assert_eq!(preset.chord_degree(4), 0);

        let empty = MusicPreset::builder().progression(Vec::new()).build();
        assert_eq!(empty.chord_degree(7), 0);
    }

    #[test]
    fn test_timing_helpers() {
        let preset = MusicPreset::builder()
            .tempo(96.0)
            .beats_per_bar(4)
            .bars(8)
            .build();
        assert_eq!(preset.total_beats(), 32.0);
        assert!((preset.duration_seconds() - 20.0).abs() < 1e-9);
    }
}
