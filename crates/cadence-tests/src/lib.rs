//! Cadence End-to-End Test Infrastructure
//!
//! This crate holds the cross-crate tests:
//!
//! - **Determinism**: every preset and effect renders bit-identically
//! - **Render properties**: lengths, normalization ceilings, silence rules
//! - **Playback**: a bank loaded from disk, driven through the engine over
//!   the offline sink
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p cadence-tests
//! ```

pub mod audio_analysis;
pub mod determinism;
pub mod fixtures;

// Re-export commonly used items
pub use determinism::{
    buffer_bytes, buffer_hash, compute_hash, verify_buffer_determinism, verify_determinism,
    verify_hash_determinism, DeterminismResult, DiffInfo,
};
pub use fixtures::{BankFixture, FIXTURE_RATE};
