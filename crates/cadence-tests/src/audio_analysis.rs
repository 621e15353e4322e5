//! Signal measurements for audio assertions.

/// Root-mean-square level. Returns 0.0 for empty input.
///
/// ```rust
/// use cadence_tests::audio_analysis::calculate_rms;
///
/// assert_eq!(calculate_rms(&[0.0; 100]), 0.0);
/// assert_eq!(calculate_rms(&[1.0; 100]), 1.0);
/// ```
pub fn calculate_rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_of_squares: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    ((sum_of_squares / samples.len() as f64).sqrt()) as f32
}

/// Maximum absolute sample value.
pub fn peak_amplitude(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0_f32, |peak, s| peak.max(s.abs()))
}

/// Mean sample value.
pub fn dc_offset(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    (samples.iter().map(|&s| s as f64).sum::<f64>() / samples.len() as f64) as f32
}

/// True if every sample is within `threshold` of zero.
pub fn is_silent(samples: &[f32], threshold: f32) -> bool {
    samples.iter().all(|&s| s.abs() <= threshold)
}

/// RMS of one window out of `windows` equal slices; used to check that a
/// track has sound throughout rather than in one burst.
pub fn window_rms(samples: &[f32], windows: usize, index: usize) -> f32 {
    let windows = windows.max(1);
    let size = samples.len() / windows;
    let start = (index * size).min(samples.len());
    let end = (start + size).min(samples.len());
    calculate_rms(&samples[start..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measurements() {
        let samples = [0.5, -0.5, 0.5, -0.5];
        assert_eq!(peak_amplitude(&samples), 0.5);
        assert_eq!(calculate_rms(&samples), 0.5);
        assert_eq!(dc_offset(&samples), 0.0);
        assert!(is_silent(&samples, 0.5));
        assert!(!is_silent(&samples, 0.4));
        assert_eq!(dc_offset(&[]), 0.0);
    }

    #[test]
    fn test_window_rms() {
        let mut samples = vec![0.0_f32; 100];
        samples[75..].fill(1.0);
        assert_eq!(window_rms(&samples, 4, 0), 0.0);
        assert_eq!(window_rms(&samples, 4, 3), 1.0);
        assert_eq!(window_rms(&samples, 4, 9), 0.0);
    }
}
