//! Canonical hashing, signatures and seed derivation.
//!
//! This module implements the determinism policy for Cadence:
//! - Preset canonicalization using RFC 8785 (JCS)
//! - BLAKE3 hashing for signatures
//! - Seed derivation for sound-effect events

use std::fmt;

use serde::Serialize;

use crate::error::SpecResult;

/// Multiplier applied to the event-name hash when deriving an SFX seed.
pub const EVENT_SEED_MULTIPLIER: u32 = 7919;

/// Which family of rendered buffer a signature identifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureKind {
    /// A looping music track rendered from a `MusicPreset`.
    Music,
    /// A one-shot effect rendered from an `SfxDescriptor`.
    Sfx,
}

impl SignatureKind {
    /// Returns the prefix used in signature strings.
    pub fn prefix(&self) -> &'static str {
        match self {
            SignatureKind::Music => "music",
            SignatureKind::Sfx => "sfx",
        }
    }
}

/// Content identity of a preset or descriptor, used as a cache key.
///
/// Formatted as `<kind>:<64 hex chars>`. Identical content always produces
/// the same signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Signature(String);

impl Signature {
    /// Computes the signature of any serializable value.
    pub fn of<T: Serialize>(kind: SignatureKind, value: &T) -> SpecResult<Self> {
        let value = serde_json::to_value(value)?;
        Ok(Self::of_value(kind, &value))
    }

    /// Computes the signature of an already-serialized JSON value.
    pub fn of_value(kind: SignatureKind, value: &serde_json::Value) -> Self {
        Signature(format!("{}:{}", kind.prefix(), canonical_value_hash(value)))
    }

    /// Returns the signature as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the signature kind encoded in the prefix.
    pub fn kind(&self) -> SignatureKind {
        if self.0.starts_with("sfx:") {
            SignatureKind::Sfx
        } else {
            SignatureKind::Music
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Computes the canonical BLAKE3 hash of a JSON value.
///
/// ```text
/// hash = hex(BLAKE3(JCS(value)))
/// ```
///
/// # Returns
/// * A 64-character lowercase hexadecimal string
pub fn canonical_value_hash(value: &serde_json::Value) -> String {
    let canonical = canonicalize_json(value);
    blake3::hash(canonical.as_bytes()).to_hex().to_string()
}

/// Canonicalizes a JSON value according to RFC 8785 (JCS).
///
/// This produces a deterministic JSON string where:
/// - Object keys are sorted lexicographically
/// - No whitespace between tokens
/// - Numbers are formatted per IEEE 754
/// - Strings use minimal escaping
pub fn canonicalize_json(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => format_jcs_number(n),
        serde_json::Value::String(s) => format_jcs_string(s),
        serde_json::Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(canonicalize_json).collect();
            format!("[{}]", items.join(","))
        }
        serde_json::Value::Object(obj) => {
            let mut entries: Vec<(&String, &serde_json::Value)> = obj.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            let pairs: Vec<String> = entries
                .into_iter()
                .map(|(k, v)| format!("{}:{}", format_jcs_string(k), canonicalize_json(v)))
                .collect();
            format!("{{{}}}", pairs.join(","))
        }
    }
}

/// Formats a number according to JCS rules.
fn format_jcs_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() => {
            if f == 0.0 {
                return "0".to_string();
            }
            if f.fract() == 0.0 && f.abs() < 1e15 {
                return format!("{}", f as i64);
            }
            let s = format!("{}", f);
            if s.contains('.') && !s.contains('e') && !s.contains('E') {
                return s.trim_end_matches('0').trim_end_matches('.').to_string();
            }
            s
        }
        _ => "null".to_string(),
    }
}

/// Formats a string according to JCS rules.
fn format_jcs_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    result.push('"');
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c if c < '\x20' => {
                result.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => result.push(c),
        }
    }
    result.push('"');
    result
}

/// Hashes a string with BLAKE3 and truncates to u32 (first 4 bytes, little-endian).
pub fn blake3_u32(s: &str) -> u32 {
    let hash = blake3::hash(s.as_bytes());
    let bytes = hash.as_bytes();
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Derives the seed of a sound-effect descriptor.
///
/// ```text
/// seed = truncate_u32(BLAKE3(event_name)) * 7919 + numeric_option   (wrapping)
/// ```
///
/// # Example
/// ```
/// use cadence_spec::hash::derive_event_seed;
///
/// assert_eq!(derive_event_seed("ui-tap", 0), derive_event_seed("ui-tap", 0));
/// assert_ne!(derive_event_seed("ui-tap", 0), derive_event_seed("ui-tap", 3));
/// ```
pub fn derive_event_seed(event_name: &str, numeric_option: u32) -> u32 {
    blake3_u32(event_name)
        .wrapping_mul(EVENT_SEED_MULTIPLIER)
        .wrapping_add(numeric_option)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_canonicalize_json_object_ordering() {
        let json1: serde_json::Value = serde_json::from_str(r#"{"b": 1, "a": 2}"#).unwrap();
        let json2: serde_json::Value = serde_json::from_str(r#"{"a": 2, "b": 1}"#).unwrap();

        assert_eq!(canonicalize_json(&json1), canonicalize_json(&json2));
        assert_eq!(canonicalize_json(&json1), r#"{"a":2,"b":1}"#);
    }

    #[test]
    fn test_canonicalize_json_nested() {
        let json = json!({"z": [1, 2, 3], "a": {"c": true, "b": false}});
        assert_eq!(
            canonicalize_json(&json),
            r#"{"a":{"b":false,"c":true},"z":[1,2,3]}"#
        );
    }

    #[test]
    fn test_canonicalize_floats() {
        let json = json!({"tempo": 96.0, "root": 220.5, "zero": 0.0});
        assert_eq!(
            canonicalize_json(&json),
            r#"{"root":220.5,"tempo":96,"zero":0}"#
        );
    }

    #[test]
    fn test_signature_stable_and_prefixed() {
        let value = json!({"tempo": 96, "bars": 8});
        let a = Signature::of_value(SignatureKind::Music, &value);
        let b = Signature::of_value(SignatureKind::Music, &value);
        assert_eq!(a, b);
        assert!(a.as_str().starts_with("music:"));
        assert_eq!(a.as_str().len(), "music:".len() + 64);
        assert_eq!(a.kind(), SignatureKind::Music);
    }

    #[test]
    fn test_signature_kinds_do_not_collide() {
        let value = json!({"seed": 1});
        let music = Signature::of_value(SignatureKind::Music, &value);
        let sfx = Signature::of_value(SignatureKind::Sfx, &value);
        assert_ne!(music, sfx);
        assert_eq!(sfx.kind(), SignatureKind::Sfx);
    }

    #[test]
    fn test_derive_event_seed() {
        let tap = derive_event_seed("ui-tap", 0);
        let reveal = derive_event_seed("gacha-reveal", 0);
        assert_ne!(tap, reveal);
        assert_eq!(
            derive_event_seed("gacha-reveal", 4),
            reveal.wrapping_add(4)
        );
    }
}
