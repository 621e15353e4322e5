//! One-shot sound effects.
//!
//! [`build_descriptor`] maps an event name and options to a
//! [`SfxDescriptor`](cadence_spec::SfxDescriptor); [`render_sfx`] turns the
//! descriptor into a short normalized stereo buffer.

mod builder;
mod render;

pub use builder::{build_descriptor, build_event, MAX_RARITY, TAIL_SECONDS};
pub use render::{render_sfx, MAX_SFX_SECONDS};
