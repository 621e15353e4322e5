//! Music channels: one looping track bound to a route.

use cadence_spec::Signature;

use crate::sink::VoiceId;

/// Lifecycle of a channel.
///
/// ```text
/// Idle -> Playing -> FadingOut -> Stopped
///            \______________________/
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelPhase {
    Idle,
    Playing,
    FadingOut,
    Stopped,
}

/// A route's music voice.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    route: String,
    signature: Signature,
    gain: f32,
    voice: Option<VoiceId>,
    phase: ChannelPhase,
    fade_ends_at: Option<f64>,
}

impl Channel {
    pub fn new(route: impl Into<String>, signature: Signature, gain: f32) -> Self {
        Self {
            route: route.into(),
            signature,
            gain,
            voice: None,
            phase: ChannelPhase::Idle,
            fade_ends_at: None,
        }
    }

    /// Idle -> Playing. Ignored in any other phase.
    pub fn start(&mut self, voice: VoiceId) {
        if self.phase == ChannelPhase::Idle {
            self.voice = Some(voice);
            self.phase = ChannelPhase::Playing;
        }
    }

    /// Playing -> FadingOut. Returns the voice to ramp down, or `None` if
    /// the channel was not playing.
    pub fn begin_fade(&mut self, ends_at: f64) -> Option<VoiceId> {
        if self.phase != ChannelPhase::Playing {
            return None;
        }
        self.phase = ChannelPhase::FadingOut;
        self.fade_ends_at = Some(ends_at);
        self.voice
    }

    /// True once a fade has run its course at `now`.
    pub fn fade_complete(&self, now: f64) -> bool {
        self.phase == ChannelPhase::FadingOut && self.fade_ends_at.is_some_and(|end| now >= end)
    }

    /// Any phase -> Stopped. Returns the voice to stop, once.
    pub fn stop(&mut self) -> Option<VoiceId> {
        self.phase = ChannelPhase::Stopped;
        self.fade_ends_at = None;
        self.voice.take()
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn voice(&self) -> Option<VoiceId> {
        self.voice
    }

    pub fn phase(&self) -> ChannelPhase {
        self.phase
    }

    pub fn fade_ends_at(&self) -> Option<f64> {
        self.fade_ends_at
    }

    pub fn is_playing(&self) -> bool {
        self.phase == ChannelPhase::Playing
    }
}
