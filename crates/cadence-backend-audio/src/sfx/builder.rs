//! Event table: which steps make up each sound effect.

use cadence_spec::{derive_event_seed, SfxDescriptor, SfxEvent, SfxOptions, Step, Waveform};

use crate::scale::semitone_to_freq;

/// Silence appended after the last step.
pub const TAIL_SECONDS: f64 = 0.05;

/// Highest rarity tier that still shifts pitch.
pub const MAX_RARITY: u8 = 5;

/// Rarity tier from which reveals gain a shimmer step.
const SHIMMER_TIER: u8 = 4;

/// Semitones added per rarity tier.
const SEMITONES_PER_TIER: f64 = 2.0;

/// Most ticks a coin effect will schedule.
const MAX_COIN_TICKS: u32 = 8;

/// Builds the descriptor for a named event.
///
/// Unknown names yield a silent descriptor of [`TAIL_SECONDS`].
pub fn build_descriptor(event: &str, options: &SfxOptions) -> SfxDescriptor {
    let steps = match SfxEvent::from_name(event) {
        Some(kind) => steps_for(kind, options),
        None => {
            tracing::debug!(event, "unknown sfx event, using silent descriptor");
            Vec::new()
        }
    };
    descriptor(event, options, steps)
}

/// Builds the descriptor for a known event.
pub fn build_event(event: SfxEvent, options: &SfxOptions) -> SfxDescriptor {
    descriptor(event.as_str(), options, steps_for(event, options))
}

fn descriptor(event: &str, options: &SfxOptions, steps: Vec<Step>) -> SfxDescriptor {
    let duration = steps.iter().map(Step::end).fold(0.0_f64, f64::max) + TAIL_SECONDS;
    SfxDescriptor {
        event: event.to_string(),
        duration,
        seed: derive_event_seed(event, options.numeric()),
        steps,
    }
}

fn rarity(options: &SfxOptions) -> u8 {
    options.rarity.unwrap_or(0).min(MAX_RARITY)
}

/// Shifts `freq` up by the rarity tier.
fn lift(freq: f64, options: &SfxOptions) -> f64 {
    semitone_to_freq(freq, rarity(options) as f64 * SEMITONES_PER_TIER)
}

fn steps_for(event: SfxEvent, options: &SfxOptions) -> Vec<Step> {
    use Waveform::{Saw, Sine, Square, Triangle};

    match event {
        SfxEvent::UiTap => vec![Step::tone(0.0, 0.06, Sine, 880.0, 660.0, 0.6)
            .envelope(0.05, 3.0)
            .pan(0.0)],
        SfxEvent::UiHover => vec![Step::tone(0.0, 0.04, Triangle, 1320.0, 1320.0, 0.25)
            .envelope(0.1, 2.0)
            .pan(0.0)],
        SfxEvent::UiConfirm => vec![
            Step::tone(0.0, 0.08, Triangle, 660.0, 660.0, 0.5).pan(-0.1),
            Step::tone(0.07, 0.12, Triangle, 990.0, 990.0, 0.5).pan(0.1),
        ],
        SfxEvent::UiBack => vec![
            Step::tone(0.0, 0.08, Triangle, 880.0, 660.0, 0.45).pan(0.1),
            Step::tone(0.07, 0.1, Triangle, 660.0, 440.0, 0.4).pan(-0.1),
        ],
        SfxEvent::UiError => vec![
            Step::tone(0.0, 0.12, Square, 220.0, 180.0, 0.35).envelope(0.05, 1.5),
            Step::tone(0.13, 0.16, Square, 196.0, 150.0, 0.35).envelope(0.05, 1.5),
        ],
        SfxEvent::UiToggle => vec![Step::tone(0.0, 0.05, Square, 1200.0, 900.0, 0.3)
            .envelope(0.02, 4.0)
            .noise(0.1)
            .pan(0.0)],
        SfxEvent::Coin => {
            let ticks = options.count.unwrap_or(1).clamp(1, MAX_COIN_TICKS);
            (0..ticks)
                .flat_map(|i| {
                    let at = i as f64 * 0.07;
                    [
                        Step::tone(at, 0.05, Square, 988.0, 988.0, 0.35),
                        Step::tone(at + 0.045, 0.18, Square, 1319.0, 1319.0, 0.35),
                    ]
                })
                .collect()
        }
        SfxEvent::Purchase => vec![
            Step::tone(0.0, 0.05, Saw, 200.0, 120.0, 0.3).noise(0.8).pan(0.0),
            Step::tone(0.05, 0.1, Triangle, 1047.0, 1047.0, 0.45),
            Step::tone(0.13, 0.25, Triangle, 1568.0, 1568.0, 0.45).envelope(0.1, 2.5),
        ],
        SfxEvent::GachaRoll => {
            let base = lift(440.0, options);
            (0..6)
                .map(|i| {
                    let freq = base * (1.0 + i as f64 * 0.08);
                    Step::tone(i as f64 * 0.09, 0.06, Triangle, freq, freq * 1.02, 0.3)
                        .envelope(0.05, 2.5)
                })
                .collect()
        }
        SfxEvent::GachaReveal => {
            let base = lift(523.25, options);
            let mut steps = vec![
                Step::tone(0.0, 0.5, Saw, base / 2.0, base, 0.3)
                    .noise(0.3)
                    .envelope(1.5, 1.0)
                    .pan(0.0),
                Step::tone(0.45, 0.6, Triangle, base, base, 0.55).envelope(0.05, 2.0),
                Step::tone(0.45, 0.6, Sine, base * 1.5, base * 1.5, 0.35).envelope(0.05, 2.0),
            ];
            if rarity(options) >= SHIMMER_TIER {
                steps.push(
                    Step::tone(0.6, 0.8, Sine, base * 4.0, base * 4.2, 0.2).envelope(0.3, 1.5),
                );
            }
            steps
        }
        SfxEvent::LevelUp => {
            let mut steps: Vec<Step> = [523.25, 659.25, 783.99, 1046.5]
                .iter()
                .enumerate()
                .map(|(i, &freq)| {
                    Step::tone(i as f64 * 0.08, 0.2, Square, freq, freq, 0.35).envelope(0.05, 2.0)
                })
                .collect();
            steps.push(
                Step::tone(0.32, 0.5, Triangle, 1046.5, 1046.5, 0.4)
                    .envelope(0.1, 1.5)
                    .pan(0.0),
            );
            steps
        }
        SfxEvent::TrialStart => vec![
            Step::tone(0.0, 0.3, Saw, 110.0, 220.0, 0.35)
                .noise(0.2)
                .envelope(1.0, 1.0)
                .pan(0.0),
            Step::tone(0.28, 0.2, Square, 440.0, 440.0, 0.3).pan(0.0),
        ],
        SfxEvent::TrialResult => {
            if options.success.unwrap_or(false) {
                vec![
                    Step::tone(0.0, 0.12, Triangle, 523.25, 523.25, 0.45),
                    Step::tone(0.1, 0.12, Triangle, 659.25, 659.25, 0.45),
                    Step::tone(0.2, 0.12, Triangle, 783.99, 783.99, 0.45),
                    Step::tone(0.3, 0.45, Sine, 1046.5, 1046.5, 0.5)
                        .envelope(0.1, 1.5)
                        .pan(0.0),
                ]
            } else {
                vec![
                    Step::tone(0.0, 0.15, Square, 392.0, 370.0, 0.35),
                    Step::tone(0.14, 0.15, Square, 329.63, 311.0, 0.35),
                    Step::tone(0.28, 0.3, Square, 261.63, 220.0, 0.35).envelope(0.05, 1.2),
                ]
            }
        }
        SfxEvent::Notify => vec![
            Step::tone(0.0, 0.1, Sine, 1174.66, 1174.66, 0.4),
            Step::tone(0.12, 0.2, Sine, 1567.98, 1567.98, 0.4),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_every_event_has_steps() {
        for event in SfxEvent::ALL {
            let descriptor = build_event(event, &SfxOptions::default());
            assert!(!descriptor.steps.is_empty(), "{} has no steps", event.as_str());
            assert!(descriptor.duration > TAIL_SECONDS);
            assert_eq!(descriptor.event, event.as_str());
        }
    }

    #[test]
    fn test_duration_covers_steps() {
        let descriptor = build_descriptor("level-up", &SfxOptions::default());
        let last_end = descriptor.steps.iter().map(Step::end).fold(0.0, f64::max);
        assert!((descriptor.duration - (last_end + TAIL_SECONDS)).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_event_is_silent_minimal() {
        let descriptor = build_descriptor("explosion", &SfxOptions::default());
        assert!(descriptor.is_silent());
        assert_eq!(descriptor.duration, TAIL_SECONDS);
        assert_eq!(descriptor.event, "explosion");
    }

    #[test]
    fn test_rarity_shifts_pitch_and_seed() {
        let common = build_descriptor("gacha-reveal", &SfxOptions::default());
        let rare = build_descriptor("gacha-reveal", &SfxOptions::default().rarity(2));
        let ratio = rare.steps[1].freq_start / common.steps[1].freq_start;
        assert!((ratio - 2.0_f64.powf(4.0 / 12.0)).abs() < 1e-9);
        assert_ne!(common.seed, rare.seed);
        assert_ne!(common.signature(), rare.signature());
    }

    #[test]
    fn test_high_rarity_adds_shimmer() {
        let low = build_descriptor("gacha-reveal", &SfxOptions::default().rarity(3));
        let high = build_descriptor("gacha-reveal", &SfxOptions::default().rarity(4));
        assert_eq!(high.steps.len(), low.steps.len() + 1);

        let capped = build_descriptor("gacha-reveal", &SfxOptions::default().rarity(200));
        let max = build_descriptor("gacha-reveal", &SfxOptions::default().rarity(MAX_RARITY));
        assert_eq!(capped.steps, max.steps);
    }

    #[test]
    fn test_success_adds_final_step() {
        let fail = build_descriptor("trial-result", &SfxOptions::default().success(false));
        let win = build_descriptor("trial-result", &SfxOptions::default().success(true));
        assert_eq!(win.steps.len(), fail.steps.len() + 1);
        assert!(win.steps[2].freq_start > win.steps[0].freq_start);
        assert!(fail.steps[2].freq_start < fail.steps[0].freq_start);
    }

    #[test]
    fn test_coin_count() {
        let three = build_descriptor("coin", &SfxOptions::default().count(3));
        assert_eq!(three.steps.len(), 6);
        let many = build_descriptor("coin", &SfxOptions::default().count(1000));
        assert_eq!(many.steps.len(), (MAX_COIN_TICKS * 2) as usize);
        let none = build_descriptor("coin", &SfxOptions::default().count(0));
        assert_eq!(none.steps.len(), 2);
    }

    #[test]
    fn test_volume_does_not_change_descriptor() {
        let plain = build_descriptor("ui-tap", &SfxOptions::default());
        let loud = build_descriptor("ui-tap", &SfxOptions::default().volume(1.8));
        assert_eq!(plain, loud);
    }

    #[test]
    fn test_builder_is_pure() {
        let options = SfxOptions::default().rarity(1);
        assert_eq!(
            build_descriptor("gacha-roll", &options),
            build_descriptor("gacha-roll", &options)
        );
    }
}
