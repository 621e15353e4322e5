//! Output through the default system device (cpal).
//!
//! The engine thread never touches the mixer directly. It pushes
//! [`Command`]s into an `rtrb` queue; the stream callback drains the queue,
//! mixes, and publishes its frame counter so the engine can read the clock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use cadence_backend_audio::RenderedBuffer;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use tracing::{debug, error, info, warn};

use super::mixer::{Command, Mixer};
use super::{Backend, Bus, GainTarget, PlayMode, Sink, SinkState, VoiceId};
use crate::error::{SinkError, SinkResult};

/// Capacity of the engine-to-callback command queue.
const COMMAND_QUEUE_CAPACITY: usize = 256;

/// Opens the host's default output device.
#[derive(Debug, Default, Clone, Copy)]
pub struct CpalBackend;

impl CpalBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Backend for CpalBackend {
    fn open(&mut self) -> SinkResult<Box<dyn Sink>> {
        Ok(Box::new(CpalSink::open()?))
    }
}

/// A running cpal output stream.
pub struct CpalSink {
    stream: cpal::Stream,
    commands: rtrb::Producer<Command>,
    clock: Arc<AtomicU64>,
    sample_rate: u32,
    state: SinkState,
    next_voice: u64,
}

impl CpalSink {
    /// Opens the default device with its default configuration.
    pub fn open() -> SinkResult<Self> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(SinkError::NoDevice)?;

        let supported = device
            .default_output_config()
            .map_err(|e| SinkError::Config(e.to_string()))?;
        let sample_rate = supported.sample_rate().0;
        let format = supported.sample_format();
        let config: cpal::StreamConfig = supported.into();

        let (commands, queue) = rtrb::RingBuffer::new(COMMAND_QUEUE_CAPACITY);
        let clock = Arc::new(AtomicU64::new(0));

        let stream = match format {
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config, queue, clock.clone())?,
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config, queue, clock.clone())?,
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config, queue, clock.clone())?,
            other => {
                return Err(SinkError::Config(format!(
                    "unsupported sample format: {:?}",
                    other
                )))
            }
        };

        // Some hosts refuse to start until the user interacts; stay
        // suspended and let resume() try again.
        let state = match stream.play() {
            Ok(()) => SinkState::Running,
            Err(e) => {
                debug!("audio stream did not start: {}", e);
                SinkState::Suspended
            }
        };

        info!(
            sample_rate,
            channels = config.channels,
            "opened audio output"
        );

        Ok(Self {
            stream,
            commands,
            clock,
            sample_rate,
            state,
            next_voice: 1,
        })
    }

    fn send(&mut self, command: Command) {
        if self.commands.push(command).is_err() {
            warn!("audio command queue full; dropping command");
        }
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut queue: rtrb::Consumer<Command>,
    clock: Arc<AtomicU64>,
) -> SinkResult<cpal::Stream>
where
    T: SizedSample + FromSample<f32> + Send + 'static,
{
    let channels = config.channels as usize;
    let mut mixer = Mixer::new(config.sample_rate.0);
    let mut scratch = vec![0.0_f32; 4096];

    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                while let Ok(command) = queue.pop() {
                    mixer.apply(command);
                }
                if scratch.len() < data.len() {
                    scratch.resize(data.len(), 0.0);
                }
                let mixed = &mut scratch[..data.len()];
                mixer.mix(mixed, channels);
                for (out, &sample) in data.iter_mut().zip(mixed.iter()) {
                    *out = T::from_sample(sample);
                }
                clock.store(mixer.frames(), Ordering::Release);
            },
            |err| error!("audio stream error: {}", err),
            None,
        )
        .map_err(|e| SinkError::Stream(e.to_string()))
}

impl Sink for CpalSink {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn now(&self) -> f64 {
        self.clock.load(Ordering::Acquire) as f64 / self.sample_rate.max(1) as f64
    }

    fn state(&self) -> SinkState {
        self.state
    }

    fn resume(&mut self) -> SinkResult<()> {
        self.stream
            .play()
            .map_err(|e| SinkError::Resume(e.to_string()))?;
        self.state = SinkState::Running;
        Ok(())
    }

    fn play(&mut self, bus: Bus, buffer: Arc<RenderedBuffer>, mode: PlayMode, gain: f32) -> VoiceId {
        let voice = VoiceId(self.next_voice);
        self.next_voice += 1;
        self.send(Command::Play {
            voice,
            bus,
            buffer,
            mode,
            gain,
        });
        voice
    }

    fn stop(&mut self, voice: VoiceId) {
        self.send(Command::Stop(voice));
    }

    fn set_gain(&mut self, target: GainTarget, level: f32, ramp_seconds: f64) {
        self.send(Command::Gain {
            target,
            level,
            ramp_seconds,
        });
    }
}
