//! Properties every rendered buffer must satisfy.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p cadence-tests --test render_properties
//! ```

use cadence_backend_audio::post::{MUSIC_CEILING, SFX_CEILING};
use cadence_backend_audio::sfx::{build_descriptor, build_event, render_sfx};
use cadence_backend_audio::{ParkMiller, Scale};
use cadence_backend_music::{render_preset, track_frames};
use cadence_spec::{MusicPreset, ScaleName, SfxOptions};
use cadence_tests::audio_analysis::{dc_offset, peak_amplitude, window_rms};
use cadence_tests::fixtures::{battle_preset, calm_preset, full_preset, sfx_cases};
use cadence_tests::FIXTURE_RATE;

const EPSILON: f32 = 1e-6;

#[test]
fn test_reference_track_length() {
    let preset = MusicPreset::builder()
        .tempo(96.0)
        .beats_per_bar(4)
        .bars(8)
        .build();
    let buffer = render_preset(&preset, 44_100);
    assert_eq!(buffer.len(), 882_000);
}

#[test]
fn test_music_respects_ceiling() {
    for preset in [calm_preset(), battle_preset(), full_preset(1), full_preset(2)] {
        let buffer = render_preset(&preset, FIXTURE_RATE);
        assert_eq!(buffer.len(), track_frames(&preset, FIXTURE_RATE));
        assert!(buffer.peak() <= MUSIC_CEILING + EPSILON);
        assert!(buffer.peak() > 0.5 * MUSIC_CEILING);
    }
}

#[test]
fn test_music_is_centered_and_sustained() {
    let buffer = render_preset(&full_preset(4), FIXTURE_RATE);
    let left = buffer.left();
    assert!(dc_offset(left).abs() < 0.02, "dc offset {}", dc_offset(left));
    for window in 0..4 {
        assert!(window_rms(left, 4, window) > 0.0, "window {} is silent", window);
    }
}

#[test]
fn test_effects_respect_ceiling_and_length() {
    for (event, options) in sfx_cases() {
        let descriptor = build_event(event, &options);
        let buffer = render_sfx(&descriptor, FIXTURE_RATE);
        let expected = (descriptor.duration * FIXTURE_RATE as f64).ceil() as usize;

        assert_eq!(buffer.len(), expected, "{}", event.as_str());
        assert!(!buffer.is_silent(), "{} rendered silence", event.as_str());
        assert!(
            peak_amplitude(&buffer.interleaved()) <= SFX_CEILING + EPSILON,
            "{} exceeds ceiling",
            event.as_str()
        );
    }
}

#[test]
fn test_silent_inputs_stay_silent() {
    let empty = render_preset(&MusicPreset::builder().bars(1).build(), FIXTURE_RATE);
    assert!(empty.is_silent());
    assert!(empty.left().iter().all(|s| s.is_finite()));

    let unknown = render_sfx(&build_descriptor("no-such-event", &SfxOptions::default()), FIXTURE_RATE);
    assert!(unknown.is_silent());
    assert!(!unknown.is_empty());
}

#[test]
fn test_rarity_raises_pitch_and_changes_audio() {
    let common = build_descriptor("gacha-reveal", &SfxOptions::default().rarity(0));
    let rare = build_descriptor("gacha-reveal", &SfxOptions::default().rarity(4));
    assert!(rare.steps[0].freq_start > common.steps[0].freq_start);
    assert!(rare.steps.len() > common.steps.len());
    assert_ne!(common.signature(), rare.signature());
}

#[test]
fn test_scale_totality_and_frequency_law() {
    for name in ScaleName::ALL {
        let scale = Scale::new(name, 220.0);
        let len = scale.len();
        for degree in -40_i32..40 {
            let wrapped = scale.resolve_degree(degree.rem_euclid(len), degree.div_euclid(len));
            assert_eq!(scale.resolve_degree(degree, 0), wrapped, "{:?} {}", name, degree);
            assert_eq!(
                scale.resolve_degree(degree + len, 0),
                scale.resolve_degree(degree, 0) + 12
            );
        }
        assert_eq!(scale.to_freq(0.0), 220.0);
        assert!((scale.to_freq(12.0) - 440.0).abs() < 1e-9);
    }
}

#[test]
fn test_rng_stays_in_unit_interval() {
    let mut rng = ParkMiller::new(0);
    for _ in 0..10_000 {
        let v = rng.next_f64();
        assert!((0.0..=1.0).contains(&v));
    }
    assert_eq!(rng.draws(), 10_000);
}
