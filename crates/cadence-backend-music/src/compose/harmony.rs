//! Chord degrees and tone pools.

use cadence_spec::MusicPreset;

/// Scale degrees of the chord sounding in `bar`.
pub(super) fn chord_degrees(preset: &MusicPreset, bar: usize) -> Vec<i32> {
    let root = preset.chord_degree(bar);
    preset
        .chord_style
        .steps()
        .iter()
        .map(|step| root.saturating_add(*step))
        .collect()
}

/// Cycles `chord` out to `span` tones, lifting each pass by one octave
/// (`scale_len` degrees).
pub(super) fn extend_pool(chord: &[i32], span: usize, scale_len: i32) -> Vec<i32> {
    if chord.is_empty() {
        return Vec::new();
    }
    (0..span)
        .map(|i| {
            let octave = (i / chord.len()) as i32;
            chord[i % chord.len()].saturating_add(scale_len.saturating_mul(octave))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_spec::ChordStyle;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_chord_follows_progression() {
        let preset = MusicPreset::builder()
            .progression(vec![0, 3])
            .chord_style(ChordStyle::Triad)
            .build();
        assert_eq!(chord_degrees(&preset, 0), vec![0, 2, 4]);
        assert_eq!(chord_degrees(&preset, 1), vec![3, 5, 7]);
        assert_eq!(chord_degrees(&preset, 2), vec![0, 2, 4]);
    }

    #[test]
    fn test_empty_progression_uses_tonic() {
        let preset = MusicPreset::builder().progression(Vec::<i32>::new()).build();
        assert_eq!(chord_degrees(&preset, 5)[0], 0);
    }

    #[test]
    fn test_extend_pool_by_octaves() {
        assert_eq!(extend_pool(&[0, 2, 4], 2, 7), vec![0, 2]);
        assert_eq!(extend_pool(&[0, 2, 4], 7, 7), vec![0, 2, 4, 7, 9, 11, 14]);
        assert!(extend_pool(&[], 4, 7).is_empty());
    }
}
