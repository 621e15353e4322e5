//! Deterministic RNG using the Park-Miller minimal standard generator.
//!
//! All randomness in the synthesis backends flows through this module:
//! timing and pitch humanization, noise, and motif generation. It is not
//! suitable for anything that needs cryptographic quality.
//!
//! ```text
//! state' = (state * 16807) mod 2147483647
//! output = (state' - 1) / 2147483646        in [0, 1)
//! ```

/// Modulus of the generator (2^31 - 1).
pub const MODULUS: u64 = 2_147_483_647;

/// Multiplier of the generator (7^5).
pub const MULTIPLIER: u64 = 16_807;

/// Seeded linear-congruential stream of uniform floats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParkMiller {
    state: u64,
    draws: u64,
}

impl ParkMiller {
    /// Creates a generator from a seed.
    ///
    /// The seed is reduced modulo 2^31 - 1; a zero residue would lock the
    /// generator at zero, so it is replaced by 1.
    pub fn new(seed: u32) -> Self {
        let state = seed as u64 % MODULUS;
        Self {
            state: if state == 0 { 1 } else { state },
            draws: 0,
        }
    }

    /// Returns the next uniform value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.state = self.state * MULTIPLIER % MODULUS;
        self.draws += 1;
        (self.state - 1) as f64 / (MODULUS - 1) as f64
    }

    /// Returns a uniform value in `[low, high)`.
    pub fn range(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_f64()
    }

    /// Returns a uniform value in `[-1, 1)`.
    pub fn bipolar(&mut self) -> f64 {
        self.next_f64() * 2.0 - 1.0
    }

    /// Returns true with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Returns -1.0 or 1.0 with equal probability.
    pub fn sign(&mut self) -> f64 {
        if self.next_f64() < 0.5 {
            -1.0
        } else {
            1.0
        }
    }

    /// Returns an index in `0..len`; `0` when `len` is zero.
    pub fn index(&mut self, len: usize) -> usize {
        let value = self.next_f64();
        if len == 0 {
            return 0;
        }
        ((value * len as f64) as usize).min(len - 1)
    }

    /// Number of values drawn since construction.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Current internal state.
    pub fn state(&self) -> u64 {
        self.state
    }
}
