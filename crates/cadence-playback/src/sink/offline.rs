//! Headless sink with a manually advanced clock.
//!
//! The offline sink mixes exactly like a device sink but only moves its
//! clock when told to, and records every call it receives. Tests drive it
//! through an [`OfflineHandle`]; hosts without an output device can use it
//! to keep the engine running silently.

use std::sync::{Arc, Mutex, MutexGuard};

use cadence_backend_audio::RenderedBuffer;

use super::mixer::{Command, Mixer};
use super::{Backend, Bus, GainTarget, PlayMode, Sink, SinkState, VoiceId};
use crate::error::{SinkError, SinkResult};

/// A call observed by an offline sink.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    Opened,
    Play {
        voice: VoiceId,
        bus: Bus,
        mode: PlayMode,
        frames: usize,
        gain: f32,
    },
    Stop {
        voice: VoiceId,
    },
    Gain {
        target: GainTarget,
        level: f32,
        ramp_seconds: f64,
    },
    Resume {
        ok: bool,
    },
}

#[derive(Debug)]
struct OfflineState {
    mixer: Mixer,
    state: SinkState,
    next_voice: u64,
    failing_resumes: u32,
    events: Vec<SinkEvent>,
}

/// Shared view of an offline sink, kept by tests after the sink is handed
/// to the engine.
#[derive(Debug, Clone)]
pub struct OfflineHandle {
    inner: Arc<Mutex<OfflineState>>,
}

impl OfflineHandle {
    fn new(sample_rate: u32) -> Self {
        Self {
            inner: Arc::new(Mutex::new(OfflineState {
                mixer: Mixer::new(sample_rate),
                state: SinkState::Running,
                next_voice: 1,
                failing_resumes: 0,
                events: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, OfflineState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Moves the clock forward without producing output.
    pub fn advance(&self, seconds: f64) {
        let mut inner = self.lock();
        let frames = (seconds.max(0.0) * inner.mixer.sample_rate() as f64).round() as u64;
        inner.mixer.skip(frames);
    }

    /// Mixes `frames` frames of interleaved stereo output.
    pub fn render(&self, frames: usize) -> Vec<f32> {
        let mut out = vec![0.0; frames * 2];
        self.lock().mixer.mix(&mut out, 2);
        out
    }

    pub fn now(&self) -> f64 {
        self.lock().mixer.now()
    }

    pub fn state(&self) -> SinkState {
        self.lock().state
    }

    /// Puts the output into the suspended state.
    pub fn suspend(&self) {
        self.lock().state = SinkState::Suspended;
    }

    /// Makes the next `count` resume attempts fail.
    pub fn fail_resumes(&self, count: u32) {
        self.lock().failing_resumes = count;
    }

    /// Every call received so far.
    pub fn events(&self) -> Vec<SinkEvent> {
        self.lock().events.clone()
    }

    /// Number of voices started on `bus`.
    pub fn plays(&self, bus: Bus) -> usize {
        self.lock()
            .events
            .iter()
            .filter(|e| matches!(e, SinkEvent::Play { bus: b, .. } if *b == bus))
            .count()
    }

    /// Voices still sounding.
    pub fn active_voices(&self) -> Vec<VoiceId> {
        self.lock().mixer.voices()
    }

    /// Current level of a gain node; `None` for voices that are gone.
    pub fn gain(&self, target: GainTarget) -> Option<f32> {
        self.lock().mixer.gain(target)
    }
}

/// Opens [`OfflineSink`]s sharing one handle.
#[derive(Debug, Clone)]
pub struct OfflineBackend {
    handle: OfflineHandle,
    available: bool,
}

impl OfflineBackend {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            handle: OfflineHandle::new(sample_rate),
            available: true,
        }
    }

    /// A backend that starts suspended until resumed.
    pub fn suspended(sample_rate: u32) -> Self {
        let backend = Self::new(sample_rate);
        backend.handle.suspend();
        backend
    }

    /// A backend with no output device; `open` always fails.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new(44_100)
        }
    }

    pub fn handle(&self) -> OfflineHandle {
        self.handle.clone()
    }
}

impl Backend for OfflineBackend {
    fn open(&mut self) -> SinkResult<Box<dyn Sink>> {
        if !self.available {
            return Err(SinkError::NoDevice);
        }
        self.handle.lock().events.push(SinkEvent::Opened);
        Ok(Box::new(OfflineSink {
            handle: self.handle.clone(),
        }))
    }
}

/// Sink backed by an in-memory mixer.
#[derive(Debug)]
pub struct OfflineSink {
    handle: OfflineHandle,
}

impl Sink for OfflineSink {
    fn sample_rate(&self) -> u32 {
        self.handle.lock().mixer.sample_rate()
    }

    fn now(&self) -> f64 {
        self.handle.now()
    }

    fn state(&self) -> SinkState {
        self.handle.state()
    }

    fn resume(&mut self) -> SinkResult<()> {
        let mut inner = self.handle.lock();
        if inner.failing_resumes > 0 {
            inner.failing_resumes -= 1;
            inner.events.push(SinkEvent::Resume { ok: false });
            return Err(SinkError::Resume("resume rejected".to_string()));
        }
        inner.state = SinkState::Running;
        inner.events.push(SinkEvent::Resume { ok: true });
        Ok(())
    }

    fn play(&mut self, bus: Bus, buffer: Arc<RenderedBuffer>, mode: PlayMode, gain: f32) -> VoiceId {
        let mut inner = self.handle.lock();
        let voice = VoiceId(inner.next_voice);
        inner.next_voice += 1;
        inner.events.push(SinkEvent::Play {
            voice,
            bus,
            mode,
            frames: buffer.len(),
            gain,
        });
        inner.mixer.apply(Command::Play {
            voice,
            bus,
            buffer,
            mode,
            gain,
        });
        voice
    }

    fn stop(&mut self, voice: VoiceId) {
        let mut inner = self.handle.lock();
        inner.events.push(SinkEvent::Stop { voice });
        inner.mixer.apply(Command::Stop(voice));
    }

    fn set_gain(&mut self, target: GainTarget, level: f32, ramp_seconds: f64) {
        let mut inner = self.handle.lock();
        inner.events.push(SinkEvent::Gain {
            target,
            level,
            ramp_seconds,
        });
        inner.mixer.apply(Command::Gain {
            target,
            level,
            ramp_seconds,
        });
    }
}
