//! Sound-bank configuration: presets, route bindings and mix levels.
//!
//! A bank is the single configuration document of the engine. It is plain
//! JSON with every field defaulted:
//!
//! ```json
//! {
//!   "sample_rate": 44100,
//!   "master_volume": 0.8,
//!   "presets": { "lobby": { "tempo": 92, "pad": {} } },
//!   "routes": { "home": "lobby", "shop": "lobby" }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SpecError, SpecResult};
use crate::recipe::music::MusicPreset;

/// Storage key under which the mute flag is persisted.
pub const DEFAULT_STORAGE_KEY: &str = "cadence.audio.muted";

/// Engine configuration and preset library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundBank {
    /// Render and playback sample rate in Hz.
    pub sample_rate: u32,
    /// Master gain when unmuted.
    pub master_volume: f64,
    /// Music bus gain.
    pub music_volume: f64,
    /// SFX bus gain.
    pub sfx_volume: f64,
    /// Duration of a music fade-out in seconds.
    pub fade_out_seconds: f64,
    /// Duration of the master-gain ramp when (un)muting.
    pub mute_ramp_seconds: f64,
    /// Namespaced key for the persisted mute flag.
    pub storage_key: String,
    /// Named presets.
    pub presets: BTreeMap<String, MusicPreset>,
    /// Route id to preset name.
    pub routes: BTreeMap<String, String>,
}

impl Default for SoundBank {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            master_volume: 0.8,
            music_volume: 1.0,
            sfx_volume: 0.9,
            fade_out_seconds: 0.9,
            mute_ramp_seconds: 0.03,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            presets: BTreeMap::new(),
            routes: BTreeMap::new(),
        }
    }
}

impl SoundBank {
    /// Parses a bank from JSON.
    pub fn from_json(json: &str) -> SpecResult<Self> {
        Ok(serde_json::from_str::<Self>(json)?.sanitized())
    }

    /// Reads and parses a bank file.
    pub fn from_path(path: impl AsRef<Path>) -> SpecResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SpecError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Adds a named preset.
    pub fn with_preset(mut self, name: impl Into<String>, preset: MusicPreset) -> Self {
        self.presets.insert(name.into(), preset);
        self
    }

    /// Binds a route to a preset name.
    pub fn with_route(mut self, route: impl Into<String>, preset: impl Into<String>) -> Self {
        self.routes.insert(route.into(), preset.into());
        self
    }

    /// Looks up the preset bound to a route.
    ///
    /// Returns `None` for unbound routes and for routes naming a missing
    /// preset; both mean "no music".
    pub fn preset_for_route(&self, route: &str) -> Option<&MusicPreset> {
        self.routes
            .get(route)
            .and_then(|name| self.presets.get(name))
    }

    /// Checks that every route names a defined preset.
    pub fn validate(&self) -> SpecResult<()> {
        for (route, preset) in &self.routes {
            if !self.presets.contains_key(preset) {
                return Err(SpecError::UnknownPreset {
                    route: route.clone(),
                    preset: preset.clone(),
                });
            }
        }
        Ok(())
    }

    /// Returns a copy with levels and durations forced into working ranges.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        let unit = |v: f64, d: f64| if v.is_finite() { v.clamp(0.0, 1.0) } else { d };
        let seconds = |v: f64, d: f64| if v.is_finite() && v >= 0.0 { v } else { d };

        if !(8_000..=192_000).contains(&self.sample_rate) {
            self.sample_rate = defaults.sample_rate;
        }
        self.master_volume = unit(self.master_volume, defaults.master_volume);
        self.music_volume = unit(self.music_volume, defaults.music_volume);
        self.sfx_volume = unit(self.sfx_volume, defaults.sfx_volume);
        self.fade_out_seconds = seconds(self.fade_out_seconds, defaults.fade_out_seconds);
        self.mute_ramp_seconds = seconds(self.mute_ramp_seconds, defaults.mute_ramp_seconds);
        if self.storage_key.trim().is_empty() {
            self.storage_key = defaults.storage_key;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const BANK_JSON: &str = r#"{
        "master_volume": 0.5,
        "presets": {
            "lobby": { "tempo": 92, "pad": {} },
            "battle": { "tempo": 140, "percussion": {} }
        },
        "routes": { "home": "lobby", "shop": "lobby", "arena": "battle", "broken": "nope" }
    }"#;

    #[test]
    fn test_from_json_defaults() {
        let bank = SoundBank::from_json(BANK_JSON).unwrap();
        assert_eq!(bank.master_volume, 0.5);
        assert_eq!(bank.sample_rate, 44_100);
        assert_eq!(bank.fade_out_seconds, 0.9);
        assert_eq!(bank.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(bank.presets.len(), 2);
    }

    #[test]
    fn test_preset_for_route() {
        let bank = SoundBank::from_json(BANK_JSON).unwrap();
        assert_eq!(bank.preset_for_route("home").unwrap().tempo, 92.0);
        assert_eq!(
            bank.preset_for_route("home"),
            bank.preset_for_route("shop")
        );
        assert!(bank.preset_for_route("broken").is_none());
        assert!(bank.preset_for_route("settings").is_none());
    }

    #[test]
    fn test_validate_reports_missing_preset() {
        let bank = SoundBank::from_json(BANK_JSON).unwrap();
        match bank.validate() {
            Err(SpecError::UnknownPreset { route, preset }) => {
                assert_eq!(route, "broken");
                assert_eq!(preset, "nope");
            }
            other => panic!("expected UnknownPreset, got {:?}", other),
        }
    }

    #[test]
    fn test_sanitized_levels() {
        let bank = SoundBank {
            sample_rate: 3,
            master_volume: 4.0,
            sfx_volume: f64::NAN,
            fade_out_seconds: -1.0,
            storage_key: "  ".to_string(),
            ..SoundBank::default()
        }
        .sanitized();

        assert_eq!(bank.sample_rate, 44_100);
        assert_eq!(bank.master_volume, 1.0);
        assert_eq!(bank.sfx_volume, 0.9);
        assert_eq!(bank.fade_out_seconds, 0.9);
        assert_eq!(bank.storage_key, DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(BANK_JSON.as_bytes()).unwrap();
        let bank = SoundBank::from_path(file.path()).unwrap();
        assert_eq!(bank.routes.len(), 4);

        let missing = SoundBank::from_path("/definitely/not/here.json");
        assert!(matches!(missing, Err(SpecError::Io { .. })));
    }

    #[test]
    fn test_builder_helpers() {
        let bank = SoundBank::default()
            .with_preset("calm", MusicPreset::default())
            .with_route("home", "calm");
        assert!(bank.validate().is_ok());
        assert!(bank.preset_for_route("home").is_some());
    }
}
