//! Determinism testing framework for Cadence.
//!
//! Every buffer Cadence produces must be bit-identical across runs for the
//! same preset or descriptor. This module runs a render function several
//! times and compares the outputs as bytes, reporting the first difference.
//!
//! # Example
//!
//! ```
//! use cadence_backend_music::render_preset;
//! use cadence_spec::MusicPreset;
//! use cadence_tests::determinism::verify_buffer_determinism;
//!
//! let preset = MusicPreset::builder().bars(1).pad(Default::default()).build();
//! let result = verify_buffer_determinism(|| render_preset(&preset, 8_000), 2);
//! result.assert_deterministic();
//! ```

use std::fmt;

use cadence_backend_audio::RenderedBuffer;

/// Result of a determinism verification.
#[derive(Debug, Clone)]
pub struct DeterminismResult {
    /// Whether all runs produced identical output.
    pub is_deterministic: bool,
    /// Number of runs performed.
    pub runs: usize,
    /// Size of the output in bytes.
    pub output_size: usize,
    /// BLAKE3 hash of the first run.
    pub hash: String,
    /// The first difference found, if any.
    pub diff_info: Option<DiffInfo>,
}

/// Location of the first byte difference between runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffInfo {
    /// Byte offset of the difference.
    pub offset: usize,
    /// Byte from the first run (`None` past its end).
    pub expected: Option<u8>,
    /// Byte from the differing run (`None` past its end).
    pub actual: Option<u8>,
    /// Which run (0-indexed) differed.
    pub run_index: usize,
}

impl fmt::Display for DiffInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |b: Option<u8>| b.map_or_else(|| "EOF".to_string(), |b| format!("0x{:02X}", b));
        write!(
            f,
            "Difference at byte {} (sample {}): expected {}, got {} (run {})",
            self.offset,
            self.offset / 4,
            show(self.expected),
            show(self.actual),
            self.run_index
        )
    }
}

impl DeterminismResult {
    /// Panic with a detailed message if not deterministic.
    pub fn assert_deterministic(&self) {
        if let Some(diff) = &self.diff_info {
            panic!(
                "Non-deterministic output detected!\n\
                 Runs: {}\n\
                 Output size: {} bytes\n\
                 Hash: {}\n\
                 {}",
                self.runs, self.output_size, self.hash, diff
            );
        }
    }
}

/// Runs `generate_fn` `runs` times and compares the outputs byte by byte.
pub fn verify_determinism<F, O>(generate_fn: F, runs: usize) -> DeterminismResult
where
    F: Fn() -> O,
    O: AsRef<[u8]>,
{
    assert!(runs >= 2, "Must run at least 2 times to verify determinism");

    let reference = generate_fn();
    let reference = reference.as_ref();
    let hash = compute_hash(reference);

    for run_index in 1..runs {
        let output = generate_fn();
        if let Some(diff) = first_difference(reference, output.as_ref(), run_index) {
            return DeterminismResult {
                is_deterministic: false,
                runs,
                output_size: reference.len(),
                hash,
                diff_info: Some(diff),
            };
        }
    }

    DeterminismResult {
        is_deterministic: true,
        runs,
        output_size: reference.len(),
        hash,
        diff_info: None,
    }
}

/// Runs a buffer-producing function and compares the raw sample bytes.
pub fn verify_buffer_determinism<F>(render_fn: F, runs: usize) -> DeterminismResult
where
    F: Fn() -> RenderedBuffer,
{
    verify_determinism(|| buffer_bytes(&render_fn()), runs)
}

fn first_difference(expected: &[u8], actual: &[u8], run_index: usize) -> Option<DiffInfo> {
    let len = expected.len().max(actual.len());
    (0..len)
        .find(|&i| expected.get(i) != actual.get(i))
        .map(|offset| DiffInfo {
            offset,
            expected: expected.get(offset).copied(),
            actual: actual.get(offset).copied(),
            run_index,
        })
}

/// Interleaved little-endian `f32` bytes of a buffer.
pub fn buffer_bytes(buffer: &RenderedBuffer) -> Vec<u8> {
    buffer
        .interleaved()
        .iter()
        .flat_map(|s| s.to_le_bytes())
        .collect()
}

/// BLAKE3 hex digest of `data`.
pub fn compute_hash(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// BLAKE3 hex digest of a buffer's samples.
pub fn buffer_hash(buffer: &RenderedBuffer) -> String {
    compute_hash(&buffer_bytes(buffer))
}

/// True if every hash equals the first.
pub fn verify_hash_determinism(hashes: &[String]) -> bool {
    hashes.windows(2).all(|w| w[0] == w[1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_identical_runs() {
        let result = verify_determinism(|| vec![1u8, 2, 3], 3);
        assert!(result.is_deterministic);
        assert_eq!(result.output_size, 3);
        assert_eq!(result.hash, compute_hash(&[1, 2, 3]));
    }

    #[test]
    fn test_detects_changed_byte() {
        let counter = Cell::new(0u8);
        let result = verify_determinism(
            || {
                counter.set(counter.get() + 1);
                vec![0u8, counter.get()]
            },
            2,
        );
        assert!(!result.is_deterministic);
        let diff = result.diff_info.unwrap();
        assert_eq!(diff.offset, 1);
        assert_eq!(diff.expected, Some(1));
        assert_eq!(diff.actual, Some(2));
    }

    #[test]
    fn test_detects_length_change() {
        let counter = Cell::new(0usize);
        let result = verify_determinism(
            || {
                counter.set(counter.get() + 1);
                vec![7u8; counter.get()]
            },
            2,
        );
        let diff = result.diff_info.unwrap();
        assert_eq!(diff.offset, 1);
        assert_eq!(diff.expected, None);
        assert_eq!(diff.actual, Some(7));
    }

    #[test]
    #[should_panic(expected = "Non-deterministic")]
    fn test_assert_panics_on_difference() {
        let counter = Cell::new(0u8);
        verify_determinism(
            || {
                counter.set(counter.get() + 1);
                [counter.get()]
            },
            2,
        )
        .assert_deterministic();
    }

    #[test]
    fn test_buffer_bytes_interleave() {
        let buffer = RenderedBuffer::from_channels(vec![1.0], vec![-1.0], 1_000).unwrap();
        let bytes = buffer_bytes(&buffer);
        assert_eq!(&bytes[..4], &1.0f32.to_le_bytes());
        assert_eq!(&bytes[4..], &(-1.0f32).to_le_bytes());
    }

    #[test]
    fn test_hash_list() {
        assert!(verify_hash_determinism(&[]));
        assert!(verify_hash_determinism(&["a".into(), "a".into()]));
        assert!(!verify_hash_determinism(&["a".into(), "b".into()]));
    }
}
