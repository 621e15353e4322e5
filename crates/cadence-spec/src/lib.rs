//! Cadence Preset Library
//!
//! This crate provides the declarative inputs of the Cadence generative audio
//! engine: music presets, sound-effect descriptors, and the sound bank that
//! binds presets to routes.
//!
//! # Overview
//!
//! Nothing in Cadence is recorded audio. Every track and every effect is
//! synthesized from numeric parameters:
//!
//! - **Music presets** describe a looping track as a tempo, a scale, a chord
//!   progression, and up to ten optional texture layers
//! - **SFX descriptors** describe a short effect as an ordered list of steps
//! - **Signatures** identify a preset or descriptor by content, so identical
//!   inputs always map to the same cached buffer
//!
//! # Example
//!
//! ```
//! use cadence_spec::{MusicPreset, ScaleName, ChordStyle};
//! use cadence_spec::recipe::music::PadLayer;
//!
//! let preset = MusicPreset::builder()
//!     .tempo(96.0)
//!     .bars(8)
//!     .scale(ScaleName::Pentatonic)
//!     .chord_style(ChordStyle::Airy)
//!     .pad(PadLayer::default())
//!     .seed(7)
//!     .build();
//!
//! let signature = preset.signature();
//! assert!(signature.as_str().starts_with("music:"));
//! assert_eq!(signature, preset.clone().signature());
//! ```
//!
//! # Modules
//!
//! - [`error`]: Error types and the shared `BackendError` trait
//! - [`hash`]: Canonical JSON hashing, signatures and seed derivation
//! - [`recipe`]: Music presets and SFX descriptors
//! - [`bank`]: Sound-bank configuration (routes, presets, volumes)

pub mod bank;
pub mod error;
pub mod hash;
pub mod recipe;

// Re-export commonly used types at the crate root
pub use bank::SoundBank;
pub use error::{BackendError, SpecError, SpecResult};
pub use hash::{canonical_value_hash, canonicalize_json, derive_event_seed, Signature, SignatureKind};
pub use recipe::common::{EnvelopeShape, Waveform};
pub use recipe::music::{
    ArpeggioLayer, AtmosphereLayer, BassLayer, ChordStyle, DroneLayer, MelodyLayer, MusicPreset,
    MusicPresetBuilder, PadLayer, PercussionLayer, PulseLayer, RiserLayer, ScaleName, SparkleLayer,
};
pub use recipe::sfx::{SfxDescriptor, SfxEvent, SfxOptions, Step};
