//! Scale-degree and frequency resolution.
//!
//! Degrees index a scale table; they wrap into the next or previous octave
//! outside `0..len`, so every integer degree resolves.

use cadence_spec::ScaleName;

/// Semitone offsets within one octave for a scale.
pub fn intervals(scale: ScaleName) -> &'static [i32] {
    match scale {
        ScaleName::Major => &[0, 2, 4, 5, 7, 9, 11],
        ScaleName::Minor => &[0, 2, 3, 5, 7, 8, 10],
        ScaleName::Pentatonic => &[0, 2, 4, 7, 9],
        ScaleName::MinorPentatonic => &[0, 3, 5, 7, 10],
        ScaleName::Dorian => &[0, 2, 3, 5, 7, 9, 10],
        ScaleName::Lydian => &[0, 2, 4, 6, 7, 9, 11],
        ScaleName::Mixolydian => &[0, 2, 4, 5, 7, 9, 10],
        ScaleName::HarmonicMinor => &[0, 2, 3, 5, 7, 8, 11],
    }
}

/// Converts a semitone offset from `root` to a frequency in Hz.
#[inline]
pub fn semitone_to_freq(root: f64, semitone: f64) -> f64 {
    root * 2.0_f64.powf(semitone / 12.0)
}

/// A scale anchored at a root frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    root: f64,
    intervals: &'static [i32],
}

impl Scale {
    pub fn new(name: ScaleName, root: f64) -> Self {
        Self {
            root,
            intervals: intervals(name),
        }
    }

    /// Root frequency in Hz.
    pub fn root(&self) -> f64 {
        self.root
    }

    /// Number of degrees per octave.
    pub fn len(&self) -> i32 {
        self.intervals.len() as i32
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Resolves a degree to a semitone offset from the root.
    pub fn resolve_degree(&self, degree: i32, octave_shift: i32) -> i32 {
        let len = self.len();
        let index = degree.rem_euclid(len) as usize;
        let octave = degree.div_euclid(len).saturating_add(octave_shift);
        self.intervals[index].saturating_add(octave.saturating_mul(12))
    }

    /// Frequency of a semitone offset from the root.
    pub fn to_freq(&self, semitone: f64) -> f64 {
        semitone_to_freq(self.root, semitone)
    }

    /// Frequency of a scale degree.
    pub fn degree_freq(&self, degree: i32, octave_shift: i32) -> f64 {
        self.to_freq(self.resolve_degree(degree, octave_shift) as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_law() {
        let scale = Scale::new(ScaleName::Major, 220.0);
        assert_eq!(scale.to_freq(0.0), 220.0);
        assert!((scale.to_freq(12.0) - 440.0).abs() < 1e-9);
        assert!((scale.to_freq(-12.0) - 110.0).abs() < 1e-9);
    }

    #[test]
    fn test_resolve_wraps_octaves() {
        let scale = Scale::new(ScaleName::Pentatonic, 100.0);
        assert_eq!(scale.resolve_degree(0, 0), 0);
        assert_eq!(scale.resolve_degree(3, 0), 7);
        assert_eq!(scale.resolve_degree(5, 0), 12);
        assert_eq!(scale.resolve_degree(-1, 0), -3);
        assert_eq!(scale.resolve_degree(-5, 0), -12);
        assert_eq!(scale.resolve_degree(2, 1), 16);
    }

    #[test]
    fn test_resolve_total_and_monotonic() {
        for name in ScaleName::ALL {
            let scale = Scale::new(name, 261.63);
            let len = scale.len();
            let mut previous = scale.resolve_degree(-50, 0);
            for degree in -49..50 {
                let semitone = scale.resolve_degree(degree, 0);
                assert!(semitone > previous, "{:?} not monotonic at {}", name, degree);
                assert_eq!(
                    semitone - scale.resolve_degree(degree - len, 0),
                    12,
                    "{:?} does not wrap at {}",
                    name,
                    degree
                );
                previous = semitone;
            }
        }
    }

    #[test]
    fn test_resolve_extreme_degrees_do_not_panic() {
        let scale = Scale::new(ScaleName::Minor, 220.0);
        scale.resolve_degree(i32::MAX, i32::MAX);
        scale.resolve_degree(i32::MIN, i32::MIN);
    }

    #[test]
    fn test_degree_freq() {
        let scale = Scale::new(ScaleName::Major, 220.0);
        assert!((scale.degree_freq(7, 0) - 440.0).abs() < 1e-9);
        assert!((scale.degree_freq(0, -1) - 110.0).abs() < 1e-9);
    }
}
