//! Audio decoding, playback and FFT analysis.
//!
//! Transports play a decoded clip and feed an [`Analyser`] that serves
//! byte snapshots to the pipeline through the [`AudioSource`] trait.

mod analyser;
mod clock;
mod decode;
mod system;

pub use analyser::{blackman_window, Analyser};
pub use clock::ClockSource;
pub use decode::{decode_wav, decode_wav_reader, Clip, ClipAsset};
pub use system::DeviceSource;

use crate::error::AudioError;

/// Transport lifecycle as seen by the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackState {
    /// Not triggered yet; reads are silence
    Idle,
    Playing,
    /// Clip ran out; the analyser drains to silence
    Finished,
    /// Decode or device failure; reads are silence
    Failed(String),
}

impl PlaybackState {
    /// Whether snapshot reads carry real analyser data
    pub fn is_audible(&self) -> bool {
        matches!(self, Self::Playing | Self::Finished)
    }
}

/// Snapshot provider consumed by the spectral sampler
pub trait AudioSource {
    /// Current transport state
    fn state(&self) -> PlaybackState;

    /// Decode the asset and start playback (single trigger; later calls are no-ops)
    fn play(&mut self) -> Result<(), AudioError>;

    /// Fill `out` with the most recent time-domain bytes
    fn read_waveform(&mut self, out: &mut [u8]) -> Result<(), AudioError>;

    /// Fill `out` with the lowest frequency-bin bytes
    fn read_spectrum(&mut self, out: &mut [u8]) -> Result<(), AudioError>;
}

/// Source with no asset: never leaves `Idle`, always silent
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSource;

impl AudioSource for SilentSource {
    fn state(&self) -> PlaybackState {
        PlaybackState::Idle
    }

    fn play(&mut self) -> Result<(), AudioError> {
        log::info!("No audio asset configured; rendering silence");
        Ok(())
    }

    fn read_waveform(&mut self, out: &mut [u8]) -> Result<(), AudioError> {
        out.fill(128);
        Ok(())
    }

    fn read_spectrum(&mut self, out: &mut [u8]) -> Result<(), AudioError> {
        out.fill(0);
        Ok(())
    }
}
