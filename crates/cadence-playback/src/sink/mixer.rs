//! Voice mixer shared by the sinks.
//!
//! The mixer keeps its clock as a frame counter, so time only advances when
//! output is produced (or explicitly skipped). Buffers at a different sample
//! rate than the output are resampled by linear interpolation.

use std::sync::Arc;

use cadence_backend_audio::RenderedBuffer;

use super::{Bus, GainRamp, GainTarget, PlayMode, VoiceId};

/// A change to the mixer state.
#[derive(Debug, Clone)]
pub enum Command {
    Play {
        voice: VoiceId,
        bus: Bus,
        buffer: Arc<RenderedBuffer>,
        mode: PlayMode,
        gain: f32,
    },
    Stop(VoiceId),
    Gain {
        target: GainTarget,
        level: f32,
        ramp_seconds: f64,
    },
}

#[derive(Debug)]
struct MixVoice {
    id: VoiceId,
    bus: Bus,
    buffer: Arc<RenderedBuffer>,
    mode: PlayMode,
    position: f64,
    step: f64,
    gain: GainRamp,
}

impl MixVoice {
    fn finished(&self, now: f64) -> bool {
        (self.mode == PlayMode::Once && self.position >= self.buffer.len() as f64)
            || self.gain.faded_out(now)
    }

    /// Interpolated frame at the current position.
    fn frame(&self) -> (f32, f32) {
        let index = self.position.floor();
        let frac = (self.position - index) as f32;
        let i = index as usize;
        let next = match self.mode {
            PlayMode::Loop if i + 1 >= self.buffer.len() => 0,
            _ => i + 1,
        };
        let (l0, r0) = self.buffer.frame(i);
        let (l1, r1) = self.buffer.frame(next);
        (l0 + (l1 - l0) * frac, r0 + (r1 - r0) * frac)
    }

    fn advance(&mut self, frames: f64) {
        self.position += self.step * frames;
        let len = self.buffer.len() as f64;
        if self.mode == PlayMode::Loop && len > 0.0 && self.position >= len {
            self.position %= len;
        }
    }
}

/// Sums active voices through bus and master gains.
#[derive(Debug)]
pub struct Mixer {
    sample_rate: u32,
    frame: u64,
    voices: Vec<MixVoice>,
    master: GainRamp,
    music: GainRamp,
    sfx: GainRamp,
}

impl Mixer {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate: sample_rate.max(1),
            frame: 0,
            voices: Vec::new(),
            master: GainRamp::fixed(1.0),
            music: GainRamp::fixed(1.0),
            sfx: GainRamp::fixed(1.0),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Clock in seconds.
    pub fn now(&self) -> f64 {
        self.frame as f64 / self.sample_rate as f64
    }

    /// Clock in frames.
    pub fn frames(&self) -> u64 {
        self.frame
    }

    pub fn apply(&mut self, command: Command) {
        let now = self.now();
        match command {
            Command::Play {
                voice,
                bus,
                buffer,
                mode,
                gain,
            } => {
                let step = buffer.sample_rate() as f64 / self.sample_rate as f64;
                self.voices.push(MixVoice {
                    id: voice,
                    bus,
                    buffer,
                    mode,
                    position: 0.0,
                    step,
                    gain: GainRamp::fixed(gain),
                });
            }
            Command::Stop(voice) => self.voices.retain(|v| v.id != voice),
            Command::Gain {
                target,
                level,
                ramp_seconds,
            } => match target {
                GainTarget::Master => self.master.retarget(now, level, ramp_seconds),
                GainTarget::Bus(Bus::Music) => self.music.retarget(now, level, ramp_seconds),
                GainTarget::Bus(Bus::Sfx) => self.sfx.retarget(now, level, ramp_seconds),
                GainTarget::Voice(id) => {
                    if let Some(voice) = self.voices.iter_mut().find(|v| v.id == id) {
                        voice.gain.retarget(now, level, ramp_seconds);
                    }
                }
            },
        }
    }

    /// Mixes into interleaved `out` with `channels` channels per frame.
    ///
    /// Channels beyond the second are silent; a mono output gets the average.
    pub fn mix(&mut self, out: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        for frame in out.chunks_mut(channels) {
            let now = self.now();
            let master = self.master.at(now);
            let (mut left, mut right) = (0.0_f32, 0.0_f32);

            for voice in &mut self.voices {
                if voice.finished(now) {
                    continue;
                }
                let bus = match voice.bus {
                    Bus::Music => self.music.at(now),
                    Bus::Sfx => self.sfx.at(now),
                };
                let gain = voice.gain.at(now) * bus * master;
                let (l, r) = voice.frame();
                left += l * gain;
                right += r * gain;
                voice.advance(1.0);
            }

            match frame {
                [mono] => *mono = 0.5 * (left + right),
                [l, r, rest @ ..] => {
                    *l = left;
                    *r = right;
                    rest.fill(0.0);
                }
                [] => {}
            }
            self.frame += 1;
        }
        let now = self.now();
        self.voices.retain(|v| !v.finished(now));
    }

    /// Advances the clock by `frames` without producing output.
    pub fn skip(&mut self, frames: u64) {
        for voice in &mut self.voices {
            voice.advance(frames as f64);
        }
        self.frame += frames;
        let now = self.now();
        self.voices.retain(|v| !v.finished(now));
    }

    /// Ids of voices still sounding.
    pub fn voices(&self) -> Vec<VoiceId> {
        self.voices.iter().map(|v| v.id).collect()
    }

    /// Current gain of a node, if it exists.
    pub fn gain(&self, target: GainTarget) -> Option<f32> {
        let now = self.now();
        match target {
            GainTarget::Master => Some(self.master.at(now)),
            GainTarget::Bus(Bus::Music) => Some(self.music.at(now)),
            GainTarget::Bus(Bus::Sfx) => Some(self.sfx.at(now)),
            GainTarget::Voice(id) => self
                .voices
                .iter()
                .find(|v| v.id == id)
                .map(|v| v.gain.at(now)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(value: f32, frames: usize, rate: u32) -> Arc<RenderedBuffer> {
        Arc::new(
            RenderedBuffer::from_channels(vec![value; frames], vec![-value; frames], rate).unwrap(),
        )
    }

    fn play(mixer: &mut Mixer, id: u64, buffer: Arc<RenderedBuffer>, mode: PlayMode) {
        mixer.apply(Command::Play {
            voice: VoiceId(id),
            bus: Bus::Music,
            buffer,
            mode,
            gain: 1.0,
        });
    }

    #[test]
    fn test_once_voice_finishes() {
        let mut mixer = Mixer::new(100);
        play(&mut mixer, 1, constant(0.5, 10, 100), PlayMode::Once);

        let mut out = vec![0.0; 40];
        mixer.mix(&mut out, 2);
        assert_eq!(&out[..2], &[0.5, -0.5]);
        assert_eq!(&out[20..22], &[0.0, 0.0]);
        assert!(mixer.voices().is_empty());
        assert_eq!(mixer.frames(), 20);
    }

    #[test]
    fn test_loop_voice_wraps() {
        let mut mixer = Mixer::new(100);
        play(&mut mixer, 1, constant(0.25, 10, 100), PlayMode::Loop);
        mixer.skip(1_000);
        assert_eq!(mixer.voices(), vec![VoiceId(1)]);

        let mut out = vec![0.0; 2];
        mixer.mix(&mut out, 2);
        assert_eq!(out, vec![0.25, -0.25]);
    }

    #[test]
    fn test_gain_chain_multiplies() {
        let mut mixer = Mixer::new(100);
        play(&mut mixer, 1, constant(1.0, 100, 100), PlayMode::Loop);
        mixer.apply(Command::Gain {
            target: GainTarget::Master,
            level: 0.5,
            ramp_seconds: 0.0,
        });
        mixer.apply(Command::Gain {
            target: GainTarget::Bus(Bus::Music),
            level: 0.5,
            ramp_seconds: 0.0,
        });
        let mut out = vec![0.0; 2];
        mixer.mix(&mut out, 2);
        assert_eq!(out[0], 0.25);
    }

    #[test]
    fn test_voice_fade() {
        let mut mixer = Mixer::new(100);
        play(&mut mixer, 7, constant(1.0, 100, 100), PlayMode::Loop);
        mixer.apply(Command::Gain {
            target: GainTarget::Voice(VoiceId(7)),
            level: 0.0,
            ramp_seconds: 1.0,
        });
        mixer.skip(50);
        assert_eq!(mixer.gain(GainTarget::Voice(VoiceId(7))), Some(0.5));
        mixer.apply(Command::Stop(VoiceId(7)));
        assert_eq!(mixer.gain(GainTarget::Voice(VoiceId(7))), None);
    }

    #[test]
    fn test_voice_faded_to_zero_is_retired() {
        let mut mixer = Mixer::new(100);
        play(&mut mixer, 3, constant(1.0, 100, 100), PlayMode::Loop);
        play(&mut mixer, 4, constant(1.0, 100, 100), PlayMode::Loop);
        mixer.apply(Command::Gain {
            target: GainTarget::Voice(VoiceId(3)),
            level: 0.0,
            ramp_seconds: 0.5,
        });
        mixer.skip(49);
        assert_eq!(mixer.voices(), vec![VoiceId(3), VoiceId(4)]);

        let mut out = vec![0.0; 2];
        mixer.mix(&mut out, 2);
        assert_eq!(mixer.voices(), vec![VoiceId(4)]);

        // An immediate drop to zero keeps the voice.
        mixer.apply(Command::Gain {
            target: GainTarget::Voice(VoiceId(4)),
            level: 0.0,
            ramp_seconds: 0.0,
        });
        mixer.skip(100);
        assert_eq!(mixer.voices(), vec![VoiceId(4)]);
    }

    #[test]
    fn test_resamples_slower_buffers() {
        let mut mixer = Mixer::new(200);
        play(&mut mixer, 1, constant(0.5, 10, 100), PlayMode::Once);
        mixer.skip(19);
        assert_eq!(mixer.voices().len(), 1);
        mixer.skip(1);
        assert!(mixer.voices().is_empty());
    }

    #[test]
    fn test_mono_and_surround_layouts() {
        let mut mixer = Mixer::new(100);
        play(&mut mixer, 1, constant(0.5, 10, 100), PlayMode::Loop);

        let mut mono = vec![1.0; 1];
        mixer.mix(&mut mono, 1);
        assert_eq!(mono[0], 0.0);

        let mut quad = vec![1.0; 4];
        mixer.mix(&mut quad, 4);
        assert_eq!(quad, vec![0.5, -0.5, 0.0, 0.0]);
    }
}
