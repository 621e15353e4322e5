//! Output sinks: where rendered buffers are actually played.
//!
//! A [`Backend`] opens a [`Sink`]. The sink owns a small gain graph:
//!
//! ```text
//! voice gain -> bus gain (music | sfx) -> master gain -> output
//! ```
//!
//! Gains ramp linearly over a caller-supplied duration, measured on the
//! sink's own clock.

use std::sync::Arc;

use cadence_backend_audio::RenderedBuffer;

use crate::error::SinkResult;

#[cfg(feature = "cpal")]
pub mod device;
pub mod mixer;
pub mod offline;

/// Mix bus a voice is routed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bus {
    Music,
    Sfx,
}

/// Whether a voice loops or plays once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayMode {
    Loop,
    Once,
}

/// Handle to a playing voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoiceId(pub u64);

/// A gain node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GainTarget {
    Master,
    Bus(Bus),
    Voice(VoiceId),
}

/// Whether the output is producing sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkState {
    Running,
    /// Waiting for a user gesture before output may start.
    Suspended,
}

/// An open audio output.
pub trait Sink {
    /// Output sample rate in Hz.
    fn sample_rate(&self) -> u32;

    /// Output clock in seconds.
    fn now(&self) -> f64;

    fn state(&self) -> SinkState;

    /// Attempts to leave the suspended state.
    fn resume(&mut self) -> SinkResult<()>;

    /// Starts a voice at `gain` on `bus`.
    fn play(&mut self, bus: Bus, buffer: Arc<RenderedBuffer>, mode: PlayMode, gain: f32) -> VoiceId;

    /// Stops a voice. Unknown or finished voices are ignored.
    fn stop(&mut self, voice: VoiceId);

    /// Ramps a gain node to `level` over `ramp_seconds`.
    ///
    /// A voice ramped down to zero is stopped by the sink when the ramp ends.
    fn set_gain(&mut self, target: GainTarget, level: f32, ramp_seconds: f64);
}

/// Opens sinks.
pub trait Backend {
    fn open(&mut self) -> SinkResult<Box<dyn Sink>>;
}

/// A linear gain ramp evaluated against a clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainRamp {
    from: f32,
    to: f32,
    start: f64,
    end: f64,
}

impl GainRamp {
    /// A constant gain.
    pub fn fixed(level: f32) -> Self {
        Self {
            from: level,
            to: level,
            start: 0.0,
            end: 0.0,
        }
    }

    /// Ramps from the current level at `now` to `level` over `seconds`.
    pub fn retarget(&mut self, now: f64, level: f32, seconds: f64) {
        let current = self.at(now);
        let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
        *self = Self {
            from: current,
            to: level,
            start: now,
            end: now + seconds,
        };
    }

    /// Gain at time `now`.
    pub fn at(&self, now: f64) -> f32 {
        if now >= self.end || self.end <= self.start {
            return self.to;
        }
        if now <= self.start {
            return self.from;
        }
        let t = ((now - self.start) / (self.end - self.start)) as f32;
        self.from + (self.to - self.from) * t
    }

    /// Final level of the ramp.
    pub fn target(&self) -> f32 {
        self.to
    }

    /// True once a ramp down to zero has run its course.
    pub fn faded_out(&self, now: f64) -> bool {
        self.to == 0.0 && self.end > self.start && now >= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gain_ramp_is_linear() {
        let mut ramp = GainRamp::fixed(1.0);
        assert_eq!(ramp.at(5.0), 1.0);

        ramp.retarget(1.0, 0.0, 2.0);
        assert_eq!(ramp.at(1.0), 1.0);
        assert_eq!(ramp.at(2.0), 0.5);
        assert_eq!(ramp.at(3.0), 0.0);
        assert_eq!(ramp.at(10.0), 0.0);
        assert_eq!(ramp.target(), 0.0);
    }

    #[test]
    fn test_retarget_mid_ramp_starts_from_current() {
        let mut ramp = GainRamp::fixed(0.0);
        ramp.retarget(0.0, 1.0, 1.0);
        ramp.retarget(0.5, 0.0, 1.0);
        assert_eq!(ramp.at(0.5), 0.5);
        assert_eq!(ramp.at(1.0), 0.25);
    }

    #[test]
    fn test_zero_length_ramp_jumps() {
        let mut ramp = GainRamp::fixed(0.2);
        ramp.retarget(3.0, 0.9, 0.0);
        assert_eq!(ramp.at(3.0), 0.9);
        ramp.retarget(3.0, 0.1, f64::NAN);
        assert_eq!(ramp.at(3.0), 0.1);
    }
}
