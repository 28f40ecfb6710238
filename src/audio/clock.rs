//! Clock-driven transport: advances the clip by elapsed time, no output device.

use std::time::{Duration, Instant};

use super::{Analyser, AudioSource, Clip, ClipAsset, PlaybackState};
use crate::error::{AudioError, ConfigError};
use crate::params::AnalyserConfig;

/// Plays a clip silently against the monotonic clock
///
/// Every read first feeds the analyser with the clip samples that "played"
/// since the previous read, so snapshots match what a device would output.
pub struct ClockSource {
    asset: ClipAsset,
    analyser: Analyser,
    state: PlaybackState,
    clip: Option<Clip>,
    /// Next clip sample to feed
    cursor: usize,
    started_at: Option<Instant>,
}

impl ClockSource {
    pub fn new(asset: ClipAsset, analyser_config: AnalyserConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            asset,
            analyser: Analyser::new(analyser_config)?,
            state: PlaybackState::Idle,
            clip: None,
            cursor: 0,
            started_at: None,
        })
    }

    /// Feed everything up to `elapsed` playback time into the analyser
    pub fn advance_to(&mut self, elapsed: Duration) {
        let Some(clip) = &self.clip else {
            return;
        };

        let target = (elapsed.as_secs_f64() * clip.sample_rate() as f64) as usize;
        if target <= self.cursor {
            return;
        }

        let end = target.min(clip.len());
        if self.cursor < end {
            self.analyser.push_samples(&clip.samples()[self.cursor..end]);
        }
        if target > clip.len() {
            self.analyser
                .push_silence(target - self.cursor.max(clip.len()));
            if self.state == PlaybackState::Playing {
                log::info!("Playback finished after {:.1}s", clip.duration_secs());
                self.state = PlaybackState::Finished;
            }
        }
        self.cursor = target;
    }

    fn catch_up(&mut self) {
        if let Some(started_at) = self.started_at {
            self.advance_to(started_at.elapsed());
        }
    }
}

impl AudioSource for ClockSource {
    fn state(&self) -> PlaybackState {
        self.state.clone()
    }

    fn play(&mut self) -> Result<(), AudioError> {
        if self.state != PlaybackState::Idle {
            return Ok(());
        }

        match self.asset.load() {
            Ok(clip) => {
                log::info!(
                    "Clock transport: {:.1}s @ {}Hz",
                    clip.duration_secs(),
                    clip.sample_rate()
                );
                self.clip = Some(clip);
                self.cursor = 0;
                self.started_at = Some(Instant::now());
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
        self.catch_up();
        self.analyser.byte_time_domain(out);
        Ok(())
    }

    fn read_spectrum(&mut self, out: &mut [u8]) -> Result<(), AudioError> {
        self.catch_up();
        self.analyser.byte_frequency(out);
        Ok(())
    }
}
