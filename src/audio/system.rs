//! Device transport: plays the clip through cpal and analyses what it outputs.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::{Analyser, AudioSource, Clip, ClipAsset, PlaybackState};
use crate::error::{AudioError, ConfigError};
use crate::params::AnalyserConfig;

/// Audio transport backed by the default output device
pub struct DeviceSource {
    asset: ClipAsset,

    /// Shared analyser (fed by the audio callback, read by the tick thread)
    analyser: Arc<Mutex<Analyser>>,

    /// Set by the callback once the clip has been fully played
    finished: Arc<AtomicBool>,

    state: PlaybackState,

    /// Audio output stream (kept alive)
    _stream: Option<cpal::Stream>,
}

impl DeviceSource {
    /// Create the transport; nothing is decoded or opened until `play`
    pub fn new(asset: ClipAsset, analyser_config: AnalyserConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            asset,
            analyser: Arc::new(Mutex::new(Analyser::new(analyser_config)?)),
            finished: Arc::new(AtomicBool::new(false)),
            state: PlaybackState::Idle,
            _stream: None,
        })
    }

    fn start(&mut self) -> Result<cpal::Stream, AudioError> {
        let clip = self.asset.load()?;

        // Setup audio output device
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| AudioError::Device("No audio output device found".to_string()))?;

        let config = device
            .default_output_config()
            .map_err(|e| AudioError::Device(format!("Failed to get audio config: {}", e)))?;

        log::info!(
            "Audio: {} @ {}Hz, {} channel(s)",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            config.sample_rate().0,
            config.channels()
        );

        let mut callback = PlaybackCallback::new(
            &clip,
            config.sample_rate().0,
            config.channels() as usize,
            Arc::clone(&self.analyser),
            Arc::clone(&self.finished),
        );

        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| callback.fill(data),
                |err| log::error!("Audio stream error: {}", err),
                None,
            )
            .map_err(|e| AudioError::Stream(format!("Failed to build audio stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| AudioError::Stream(format!("Failed to start audio stream: {}", e)))?;

        Ok(stream)
    }
}

impl AudioSource for DeviceSource {
    fn state(&self) -> PlaybackState {
        match &self.state {
            PlaybackState::Playing if self.finished.load(Ordering::Relaxed) => {
                PlaybackState::Finished
            }
            other => other.clone(),
        }
    }

    fn play(&mut self) -> Result<(), AudioError> {
        if self.state != PlaybackState::Idle {
            return Ok(());
        }

        match self.start() {
            Ok(stream) => {
                self._stream = Some(stream);
                self.state = PlaybackState::Playing;
                Ok(())
            }
            Err(e) => {
                self.state = PlaybackState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    fn read_waveform(&mut self, out: &mut [u8]) -> Result<(), AudioError> {
        self.analyser.lock().byte_time_domain(out);
        Ok(())
    }

    fn read_spectrum(&mut self, out: &mut [u8]) -> Result<(), AudioError> {
        self.analyser.lock().byte_frequency(out);
        Ok(())
    }
}

/// State owned by the output callback
struct PlaybackCallback {
    samples: Arc<[f32]>,
    /// Fractional read position in clip samples
    position: f64,
    /// Clip samples consumed per device frame (nearest-neighbour resampling)
    step: f64,
    channels: usize,
    /// Mono copy of the block handed to the analyser
    mono: Vec<f32>,
    analyser: Arc<Mutex<Analyser>>,
    finished: Arc<AtomicBool>,
}

impl PlaybackCallback {
    fn new(
        clip: &Clip,
        device_rate: u32,
        channels: usize,
        analyser: Arc<Mutex<Analyser>>,
        finished: Arc<AtomicBool>,
    ) -> Self {
        Self {
            samples: clip.shared_samples(),
            position: 0.0,
            step: clip.sample_rate() as f64 / device_rate.max(1) as f64,
            channels: channels.max(1),
            mono: Vec::with_capacity(4096),
            analyser,
            finished,
        }
    }

    fn fill(&mut self, data: &mut [f32]) {
        self.mono.clear();

        for frame in data.chunks_mut(self.channels) {
            let index = self.position as usize;
            let sample = self.samples.get(index).copied().unwrap_or(0.0);
            // Safety limiter: hard clip to prevent ear damage
            let sample = sample.clamp(-1.0, 1.0);

            frame.fill(sample);
            self.mono.push(sample);
            self.position += self.step;
        }

        if self.position as usize >= self.samples.len() {
            self.finished.store(true, Ordering::Relaxed);
        }

        self.analyser.lock().push_samples(&self.mono);
    }
}
