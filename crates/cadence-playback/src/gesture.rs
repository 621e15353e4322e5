//! One-shot resume on the first user interaction.
//!
//! Some hosts keep audio output suspended until the user interacts. The
//! gate arms itself when it sees a suspended sink and tries to resume on
//! each gesture until one attempt succeeds.

use cadence_spec::BackendError;
use tracing::debug;

use crate::sink::{Sink, SinkState};

/// Tracks whether a gesture should attempt a resume.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GestureGate {
    armed: bool,
}

impl GestureGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the gate if `sink` is suspended.
    pub fn observe(&mut self, sink: &dyn Sink) {
        if sink.state() == SinkState::Suspended {
            self.armed = true;
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Attempts a resume if armed. Returns true when the sink is running
    /// afterwards.
    pub fn try_resume(&mut self, sink: &mut dyn Sink) -> bool {
        self.observe(sink);
        if !self.armed {
            return true;
        }
        match sink.resume() {
            Ok(()) if sink.state() == SinkState::Running => {
                self.armed = false;
                true
            }
            Ok(()) => false,
            Err(e) => {
                debug!(code = e.code(), "resume failed: {}", e);
                false
            }
        }
    }
}
