//! Determinism of every render path.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p cadence-tests --test e2e_determinism
//! ```

use std::sync::Arc;
use std::thread;

use cadence_backend_audio::sfx::{build_event, render_sfx};
use cadence_backend_music::render_preset;
use cadence_playback::{AudioEngine, MemoryStore, OfflineBackend, Renderer, SynthRenderer};
use cadence_tests::fixtures::{battle_preset, calm_preset, full_preset, game_bank, sfx_cases};
use cadence_tests::{buffer_hash, verify_buffer_determinism, verify_hash_determinism, FIXTURE_RATE};

#[test]
fn test_fixture_presets_are_deterministic() {
    for preset in [calm_preset(), battle_preset(), full_preset(5)] {
        verify_buffer_determinism(|| render_preset(&preset, FIXTURE_RATE), 3)
            .assert_deterministic();
    }
}

#[test]
fn test_every_effect_is_deterministic() {
    for (event, options) in sfx_cases() {
        let descriptor = build_event(event, &options);
        let result = verify_buffer_determinism(|| render_sfx(&descriptor, FIXTURE_RATE), 3);
        assert!(
            result.is_deterministic,
            "{} with {:?} is not deterministic",
            event.as_str(),
            options
        );
    }
}

#[test]
fn test_seed_is_the_only_source_of_variation() {
    let hashes: Vec<String> = (0..3)
        .map(|_| buffer_hash(&render_preset(&full_preset(8), FIXTURE_RATE)))
        .collect();
    assert!(verify_hash_determinism(&hashes));

    let other = buffer_hash(&render_preset(&full_preset(9), FIXTURE_RATE));
    assert_ne!(hashes[0], other);
}

#[test]
fn test_renders_agree_across_threads() {
    let preset = Arc::new(full_preset(17));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let preset = Arc::clone(&preset);
            thread::spawn(move || buffer_hash(&render_preset(&preset, FIXTURE_RATE)))
        })
        .collect();

    let hashes: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(verify_hash_determinism(&hashes));
}

#[test]
fn test_engine_cache_holds_the_direct_render() {
    let backend = OfflineBackend::new(FIXTURE_RATE);
    let mut engine = AudioEngine::new(game_bank(), backend, MemoryStore::new());
    engine.set_route("arena");

    let preset = battle_preset();
    let cached = engine
        .cache()
        .get(&preset.signature())
        .expect("route music should be cached");
    let direct = SynthRenderer::new(FIXTURE_RATE).render_music(&preset);
    assert_eq!(buffer_hash(&cached), buffer_hash(&direct));
}

#[test]
fn test_identical_json_gives_identical_signature_and_audio() {
    let a = cadence_spec::MusicPreset::from_json(
        r#"{ "tempo": 100, "bars": 1, "seed": 4, "pad": { "amplitude": 0.2 } }"#,
    )
    .unwrap();
    let b = cadence_spec::MusicPreset::from_json(
        r#"{ "pad": { "amplitude": 0.2 }, "seed": 4, "bars": 1, "tempo": 100.0 }"#,
    )
    .unwrap();

    assert_eq!(a.signature(), b.signature());
    assert_eq!(
        buffer_hash(&render_preset(&a, FIXTURE_RATE)),
        buffer_hash(&render_preset(&b, FIXTURE_RATE))
    );
}
