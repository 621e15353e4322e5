//! Declarative inputs for the synthesis backends.
//!
//! A recipe is immutable input data: callers build or deserialize it, and the
//! backends turn it into a rendered buffer.

pub mod common;
pub mod music;
pub mod sfx;

pub use common::*;
pub use music::*;
pub use sfx::*;
