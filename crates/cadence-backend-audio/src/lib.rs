//! Cadence Audio Backend
//!
//! This crate implements the synthesis primitives shared by music and sound
//! effects:
//!
//! - [`rng`] - Park-Miller generator used for all humanization and noise
//! - [`scale`] - Scale-degree to semitone to frequency resolution
//! - [`oscillator`] - Phase-driven waveform evaluation
//! - [`envelope`] - Named amplitude envelope shapes
//! - [`tone`] - The tone writer: one enveloped, panned note added into a buffer
//! - [`post`] - DC blocking, smoothing and peak normalization
//! - [`sfx`] - Descriptor builder and renderer for one-shot effects
//!
//! # Determinism
//!
//! All synthesis is deterministic. Given the same descriptor (or preset) and
//! seed, the output is bit-identical across runs on the same platform. There
//! is no global state: every render owns its generator.
//!
//! # Example
//!
//! ```
//! use cadence_backend_audio::sfx::{build_descriptor, render_sfx};
//! use cadence_spec::SfxOptions;
//!
//! let descriptor = build_descriptor("ui-tap", &SfxOptions::default());
//! let buffer = render_sfx(&descriptor, 44_100);
//!
//! assert!(!buffer.is_empty());
//! assert!(buffer.peak() <= 0.95);
//! ```

pub mod buffer;
pub mod envelope;
pub mod error;
pub mod oscillator;
pub mod post;
pub mod rng;
pub mod scale;
pub mod sfx;
pub mod tone;

// Re-export main types at crate root
pub use buffer::RenderedBuffer;
pub use error::{AudioError, AudioResult};
pub use rng::ParkMiller;
pub use scale::Scale;
pub use tone::{Note, ToneOptions, ToneWriter};
