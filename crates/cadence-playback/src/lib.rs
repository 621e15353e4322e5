//! Cadence Playback - Route-Driven Music and Effects
//!
//! This crate plays what the synthesis backends render. An [`AudioEngine`]
//! binds logical routes (scenes, screens) to music presets, plays one-shot
//! effects, and owns the global mute flag.
//!
//! # Architecture
//!
//! ```text
//! AudioEngine ──render──> Renderer ──> BufferCache (by signature)
//!      │
//!      └──play/stop/gain──> Sink  (opened lazily by a Backend)
//! ```
//!
//! Rendering sits behind the [`Renderer`] trait and output behind the
//! [`Sink`] trait, so the engine runs unchanged against a real device
//! (`cpal` feature) or the headless [`OfflineBackend`].
//!
//! # Example
//!
//! ```
//! use cadence_playback::{AudioEngine, MemoryStore, OfflineBackend};
//! use cadence_spec::{MusicPreset, SfxOptions, SoundBank};
//!
//! let bank = SoundBank {
//!     sample_rate: 8_000,
//!     ..SoundBank::default()
//! }
//! .with_preset("calm", MusicPreset::builder().bars(1).pad(Default::default()).build())
//! .with_route("home", "calm");
//!
//! let backend = OfflineBackend::new(8_000);
//! let handle = backend.handle();
//! let mut engine = AudioEngine::new(bank, backend, MemoryStore::new());
//!
//! engine.set_route("home");
//! engine.set_route("home");
//! engine.play_sfx("ui-tap", &SfxOptions::default());
//!
//! assert_eq!(engine.active_channels(), 1);
//! assert_eq!(handle.active_voices().len(), 2);
//! ```
//!
//! # Module Structure
//!
//! - [`engine`]: the playback manager
//! - [`channel`]: per-route music channel state machine
//! - [`cache`]: signature-keyed buffer cache
//! - [`render`]: the renderer seam
//! - [`sink`]: output sinks, the shared mixer, offline and device backends
//! - [`store`]: mute-flag persistence
//! - [`gesture`]: resume-on-interaction gate
//! - [`error`]: sink and store errors

pub mod cache;
pub mod channel;
pub mod engine;
pub mod error;
pub mod gesture;
pub mod render;
pub mod sink;
pub mod store;

// Re-export main types
pub use cache::BufferCache;
pub use channel::{Channel, ChannelPhase};
pub use engine::{AudioEngine, MUTED_GAIN};
pub use error::{SinkError, SinkResult, StoreError, StoreResult};
pub use gesture::GestureGate;
pub use render::{Renderer, SynthRenderer};
#[cfg(feature = "cpal")]
pub use sink::device::{CpalBackend, CpalSink};
pub use sink::offline::{OfflineBackend, OfflineHandle, OfflineSink, SinkEvent};
pub use sink::{Backend, Bus, GainRamp, GainTarget, PlayMode, Sink, SinkState, VoiceId};
pub use store::{JsonFileStore, MemoryStore, MuteStore};
