//! The route-driven playback manager.

use std::collections::BTreeMap;
use std::sync::Arc;

use cadence_backend_audio::sfx::build_descriptor;
use cadence_spec::{BackendError, SfxOptions, SoundBank};
use tracing::{debug, info, warn};

use crate::cache::BufferCache;
use crate::channel::Channel;
use crate::gesture::GestureGate;
use crate::render::{Renderer, SynthRenderer};
use crate::sink::{Backend, Bus, GainTarget, PlayMode, Sink, SinkState};
use crate::store::MuteStore;

/// Master gain while muted. Never exactly zero.
pub const MUTED_GAIN: f32 = 0.0001;

/// Plays route music and one-shot effects through a [`Sink`].
///
/// Every public method is infallible: failures are logged and the engine
/// degrades. If the backend cannot open an output, the engine disables
/// itself for its lifetime and every call becomes a no-op.
///
/// Faded voices are stopped by the sink on its own clock. Channels whose
/// fade has ended are dropped from the engine on the next call into it, or
/// by [`AudioEngine::update`].
pub struct AudioEngine {
    bank: SoundBank,
    renderer: Arc<dyn Renderer>,
    cache: Arc<BufferCache>,
    backend: Box<dyn Backend>,
    sink: Option<Box<dyn Sink>>,
    disabled: bool,
    channels: BTreeMap<String, Channel>,
    pending_route: Option<String>,
    pending_sfx: Option<(String, SfxOptions)>,
    gesture: GestureGate,
    store: Box<dyn MuteStore>,
    muted: bool,
}

impl AudioEngine {
    /// Creates an engine rendering with the built-in synthesizer.
    pub fn new(
        bank: SoundBank,
        backend: impl Backend + 'static,
        store: impl MuteStore + 'static,
    ) -> Self {
        let bank = bank.sanitized();
        let renderer = Arc::new(SynthRenderer::new(bank.sample_rate));
        Self::with_renderer(bank, backend, store, renderer)
    }

    /// Creates an engine with a custom renderer.
    pub fn with_renderer(
        bank: SoundBank,
        backend: impl Backend + 'static,
        store: impl MuteStore + 'static,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        let bank = bank.sanitized();
        let muted = match store.load(&bank.storage_key) {
            Ok(flag) => flag.unwrap_or(false),
            Err(e) => {
                warn!(code = e.code(), "failed to load mute flag: {}", e);
                false
            }
        };

        Self {
            bank,
            renderer,
            cache: Arc::new(BufferCache::new()),
            backend: Box::new(backend),
            sink: None,
            disabled: false,
            channels: BTreeMap::new(),
            pending_route: None,
            pending_sfx: None,
            gesture: GestureGate::new(),
            store: Box::new(store),
            muted,
        }
    }

    /// Opens the output on first use. Returns false if the engine is
    /// disabled.
    pub fn ensure(&mut self) -> bool {
        if self.disabled {
            return false;
        }
        if self.sink.is_some() {
            return true;
        }

        match self.backend.open() {
            Ok(mut sink) => {
                sink.set_gain(GainTarget::Master, self.master_level(), 0.0);
                sink.set_gain(GainTarget::Bus(Bus::Music), self.bank.music_volume as f32, 0.0);
                sink.set_gain(GainTarget::Bus(Bus::Sfx), self.bank.sfx_volume as f32, 0.0);
                self.gesture.observe(&*sink);
                info!(
                    sample_rate = sink.sample_rate(),
                    suspended = sink.state() == SinkState::Suspended,
                    muted = self.muted,
                    "audio engine ready"
                );
                self.sink = Some(sink);
                true
            }
            Err(e) => {
                warn!(code = e.code(), "audio output unavailable, disabling engine: {}", e);
                self.disabled = true;
                false
            }
        }
    }

    /// Switches background music to the preset bound to `route`.
    ///
    /// Re-entering the current route with an unchanged preset does nothing.
    /// While the output is suspended the request is held and applied on
    /// the next successful resume.
    pub fn set_route(&mut self, route: &str) {
        if !self.ensure() {
            return;
        }
        if self.is_suspended() {
            debug!(route, "output suspended, deferring route");
            self.pending_route = Some(route.to_string());
            return;
        }
        self.pending_route = None;
        self.apply_route(route);
    }

    fn apply_route(&mut self, route: &str) {
        self.update();
        let Some(sink) = self.sink.as_deref_mut() else {
            return;
        };

        let preset = self.bank.preset_for_route(route).cloned();
        let signature = preset.as_ref().map(|p| p.signature());

        if let (Some(channel), Some(signature)) = (self.channels.get(route), &signature) {
            if channel.is_playing() && channel.signature() == signature {
                return;
            }
        }

        let now = sink.now();
        let fade = self.bank.fade_out_seconds;
        for channel in self.channels.values_mut() {
            if channel.route() == route {
                continue;
            }
            if let Some(voice) = channel.begin_fade(now + fade) {
                sink.set_gain(GainTarget::Voice(voice), 0.0, fade);
                debug!(route = channel.route(), "fading out");
            }
        }

        if let Some(mut previous) = self.channels.remove(route) {
            if let Some(voice) = previous.stop() {
                sink.stop(voice);
                debug!(route, "replaced channel");
            }
        }

        let (Some(preset), Some(signature)) = (preset, signature) else {
            debug!(route, "no music for route");
            return;
        };

        let renderer = &self.renderer;
        let buffer = self
            .cache
            .get_or_render(&signature, || renderer.render_music(&preset));
        let gain = preset.sanitized().volume as f32;

        let mut channel = Channel::new(route, signature, gain);
        channel.start(sink.play(Bus::Music, buffer, PlayMode::Loop, gain));
        info!(route, signature = %channel.signature(), "music started");
        self.channels.insert(route.to_string(), channel);
    }

    /// Fades out the music for `route`. Unknown or already fading routes are
    /// left alone.
    pub fn fade_out(&mut self, route: &str) {
        self.update();
        let Some(sink) = self.sink.as_deref_mut() else {
            return;
        };
        let fade = self.bank.fade_out_seconds;
        if let Some(channel) = self.channels.get_mut(route) {
            if let Some(voice) = channel.begin_fade(sink.now() + fade) {
                sink.set_gain(GainTarget::Voice(voice), 0.0, fade);
                debug!(route, "fading out");
            }
        }
    }

    /// Stops and removes the music for `route` immediately.
    pub fn stop(&mut self, route: &str) {
        let Some(mut channel) = self.channels.remove(route) else {
            return;
        };
        if let (Some(voice), Some(sink)) = (channel.stop(), self.sink.as_deref_mut()) {
            sink.stop(voice);
            debug!(route, "stopped");
        }
    }

    /// Removes channels whose fade has finished.
    pub fn update(&mut self) {
        let Some(sink) = self.sink.as_deref_mut() else {
            return;
        };
        let now = sink.now();
        let finished: Vec<String> = self
            .channels
            .values()
            .filter(|c| c.fade_complete(now))
            .map(|c| c.route().to_string())
            .collect();

        for route in finished {
            if let Some(mut channel) = self.channels.remove(&route) {
                if let Some(voice) = channel.stop() {
                    sink.stop(voice);
                }
                debug!(route = %route, "fade complete");
            }
        }
    }

    /// Plays a one-shot effect on the SFX bus.
    ///
    /// While the output is suspended only the latest request is held; it
    /// plays on the next successful resume.
    pub fn play_sfx(&mut self, event: &str, options: &SfxOptions) {
        if !self.ensure() {
            return;
        }
        if self.is_suspended() {
            debug!(event, "output suspended, deferring effect");
            self.pending_sfx = Some((event.to_string(), options.clone()));
            return;
        }
        self.update();
        self.start_sfx(event, options);
    }

    fn start_sfx(&mut self, event: &str, options: &SfxOptions) {
        let descriptor = build_descriptor(event, options);
        if descriptor.is_silent() {
            return;
        }
        let signature = descriptor.signature();
        let renderer = &self.renderer;
        let buffer = self
            .cache
            .get_or_render(&signature, || renderer.render_sfx(&descriptor));

        if let Some(sink) = self.sink.as_deref_mut() {
            sink.play(Bus::Sfx, buffer, PlayMode::Once, options.volume_multiplier() as f32);
        }
    }

    /// Mutes or unmutes everything and persists the choice.
    pub fn set_muted(&mut self, muted: bool) {
        if self.disabled {
            return;
        }
        self.update();
        self.muted = muted;
        if let Err(e) = self.store.save(&self.bank.storage_key, muted) {
            warn!(code = e.code(), "failed to persist mute flag: {}", e);
        }
        let level = self.master_level();
        if let Some(sink) = self.sink.as_deref_mut() {
            sink.set_gain(GainTarget::Master, level, self.bank.mute_ramp_seconds);
        }
    }

    /// Flips the mute flag and returns the new value.
    pub fn toggle_mute(&mut self) -> bool {
        self.set_muted(!self.muted);
        self.muted
    }

    /// Handles a user interaction: resumes a suspended output, then applies
    /// the route and plays the effect deferred while it was suspended.
    pub fn on_user_gesture(&mut self) {
        if !self.ensure() {
            return;
        }
        let Some(sink) = self.sink.as_deref_mut() else {
            return;
        };
        if self.gesture.try_resume(sink) {
            if let Some(route) = self.pending_route.take() {
                debug!(route = %route, "applying deferred route");
                self.apply_route(&route);
            }
            if let Some((event, options)) = self.pending_sfx.take() {
                debug!(event = %event, "playing deferred effect");
                self.start_sfx(&event, &options);
            }
        } else {
            self.update();
        }
    }

    fn master_level(&self) -> f32 {
        if self.muted {
            MUTED_GAIN
        } else {
            (self.bank.master_volume as f32).max(MUTED_GAIN)
        }
    }

    fn is_suspended(&self) -> bool {
        self.sink
            .as_ref()
            .is_some_and(|sink| sink.state() == SinkState::Suspended)
    }

    pub fn channel(&self, route: &str) -> Option<&Channel> {
        self.channels.get(route)
    }

    /// All live channels, including ones fading out.
    pub fn channels(&self) -> impl Iterator<Item = &Channel> {
        self.channels.values()
    }

    /// Number of channels currently playing (not fading).
    pub fn active_channels(&self) -> usize {
        self.channels.values().filter(|c| c.is_playing()).count()
    }

    pub fn pending_route(&self) -> Option<&str> {
        self.pending_route.as_deref()
    }

    /// Name of the effect waiting for the output to resume.
    pub fn pending_sfx(&self) -> Option<&str> {
        self.pending_sfx.as_ref().map(|(event, _)| event.as_str())
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Output clock, once the sink is open.
    pub fn now(&self) -> Option<f64> {
        self.sink.as_ref().map(|sink| sink.now())
    }

    pub fn bank(&self) -> &SoundBank {
        &self.bank
    }

    /// The buffer cache, shareable with threads that pre-render.
    pub fn cache(&self) -> &Arc<BufferCache> {
        &self.cache
    }

    pub fn renderer(&self) -> &Arc<dyn Renderer> {
        &self.renderer
    }
}
