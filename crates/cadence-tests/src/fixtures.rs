//! Representative presets, banks and effect cases.
//!
//! Fixtures render at [`FIXTURE_RATE`] and keep tracks short so the suite
//! stays fast; the algorithms do not depend on the rate.

use std::path::PathBuf;

use cadence_spec::{
    ArpeggioLayer, AtmosphereLayer, BassLayer, ChordStyle, DroneLayer, MelodyLayer, MusicPreset,
    PadLayer, PercussionLayer, PulseLayer, RiserLayer, ScaleName, SfxEvent, SfxOptions,
    SoundBank, SparkleLayer,
};
use tempfile::TempDir;

/// Sample rate used by fixtures.
pub const FIXTURE_RATE: u32 = 8_000;

/// A quiet menu loop: drone and pad only, no randomness consumed.
pub fn calm_preset() -> MusicPreset {
    MusicPreset::builder()
        .tempo(84.0)
        .bars(2)
        .scale(ScaleName::Pentatonic)
        .chord_style(ChordStyle::Airy)
        .drone(DroneLayer::default())
        .pad(PadLayer::default())
        .seed(3)
        .build()
}

/// A driving loop with rhythm, bass and an arpeggio.
pub fn battle_preset() -> MusicPreset {
    MusicPreset::builder()
        .tempo(140.0)
        .bars(2)
        .scale(ScaleName::HarmonicMinor)
        .chord_style(ChordStyle::Stabs)
        .percussion(PercussionLayer::default())
        .bass(BassLayer::default())
        .arpeggio(ArpeggioLayer::default())
        .pulse(PulseLayer::default())
        .volume(0.5)
        .seed(21)
        .build()
}

/// Every layer enabled.
pub fn full_preset(seed: u32) -> MusicPreset {
    MusicPreset::builder()
        .tempo(110.0)
        .bars(2)
        .drone(DroneLayer::default())
        .pad(PadLayer::default())
        .arpeggio(ArpeggioLayer::default())
        .melody(MelodyLayer::default())
        .percussion(PercussionLayer::default())
        .pulse(PulseLayer::default())
        .bass(BassLayer::default())
        .riser(RiserLayer::default())
        .atmosphere(AtmosphereLayer::default())
        .sparkle(SparkleLayer::default())
        .seed(seed)
        .build()
}

/// A bank with three presets and five routes.
///
/// `home` and `shop` share a preset; `settings` has no music.
pub fn game_bank() -> SoundBank {
    SoundBank {
        sample_rate: FIXTURE_RATE,
        ..SoundBank::default()
    }
    .with_preset("calm", calm_preset())
    .with_preset("battle", battle_preset())
    .with_preset("finale", full_preset(99))
    .with_route("home", "calm")
    .with_route("shop", "calm")
    .with_route("arena", "battle")
    .with_route("ending", "finale")
}

/// Every event with a representative set of options.
pub fn sfx_cases() -> Vec<(SfxEvent, SfxOptions)> {
    let mut cases: Vec<(SfxEvent, SfxOptions)> = SfxEvent::ALL
        .into_iter()
        .map(|event| (event, SfxOptions::default()))
        .collect();
    cases.extend([
        (SfxEvent::Coin, SfxOptions::default().count(5)),
        (SfxEvent::GachaReveal, SfxOptions::default().rarity(1)),
        (SfxEvent::GachaReveal, SfxOptions::default().rarity(5)),
        (SfxEvent::TrialResult, SfxOptions::default().success(true)),
        (SfxEvent::TrialResult, SfxOptions::default().success(false)),
    ]);
    cases
}

/// A temporary directory holding a bank file.
pub struct BankFixture {
    pub root: TempDir,
    pub bank_path: PathBuf,
    pub prefs_path: PathBuf,
}

impl BankFixture {
    /// Writes `bank` as JSON into a fresh temporary directory.
    pub fn new(bank: &SoundBank) -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        let bank_path = root.path().join("bank.json");
        let prefs_path = root.path().join("prefs.json");
        let json = serde_json::to_string_pretty(bank).expect("Failed to serialize bank");
        std::fs::write(&bank_path, json).expect("Failed to write bank file");
        Self {
            root,
            bank_path,
            prefs_path,
        }
    }
}
