//! Cadence Music Backend - Deterministic Layered Track Composition
//!
//! This crate turns a [`MusicPreset`](cadence_spec::MusicPreset) into one
//! finished, loopable stereo buffer. Up to ten optional layers are written
//! additively into a shared buffer by the tone writer, then the buffer is
//! post-processed once.
//!
//! # Determinism
//!
//! A single Park-Miller generator seeded from the preset drives every random
//! decision. Layers always render in [`Layer::ORDER`]; since they share the
//! generator, that order is part of the output contract.
//!
//! # Example
//!
//! ```
//! use cadence_backend_music::{render_preset, track_frames};
//! use cadence_spec::MusicPreset;
//!
//! let preset = MusicPreset::builder()
//!     .tempo(120.0)
//!     .bars(1)
//!     .pad(Default::default())
//!     .build();
//!
//! let buffer = render_preset(&preset, 8_000);
//! assert_eq!(buffer.len(), track_frames(&preset, 8_000));
//! ```
//!
//! # Module Structure
//!
//! - [`compose`]: the composer context and layer scheduling

pub mod compose;

// Re-export main types
pub use compose::{render_preset, track_frames, Composer, Layer, MAX_TRACK_SECONDS};

/// Crate version for backend identification.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
