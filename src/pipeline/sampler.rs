//! Per-tick snapshot capture from the audio source.

use crate::audio::AudioSource;
use crate::error::ConfigError;
use crate::params::SamplerConfig;

/// Mid-scale byte: zero amplitude in unsigned 8-bit time-domain data
pub const SILENT_SAMPLE: u8 = 128;

/// Zero magnitude in a byte spectrum
pub const SILENT_BIN: u8 = 0;

/// Time-domain bytes for one tick (128 = zero)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveformSnapshot<'a>(&'a [u8]);

impl<'a> WaveformSnapshot<'a> {
    pub fn new(samples: &'a [u8]) -> Self {
        Self(samples)
    }

    pub fn samples(&self) -> &'a [u8] {
        self.0
    }
}

/// Frequency-bin bytes for one tick, lowest bin first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpectrumSnapshot<'a>(&'a [u8]);

impl<'a> SpectrumSnapshot<'a> {
    pub fn new(bins: &'a [u8]) -> Self {
        Self(bins)
    }

    pub fn bins(&self) -> &'a [u8] {
        self.0
    }
}

/// Owns the fixed-size snapshot buffers and refills them once per tick
#[derive(Debug, Clone)]
pub struct SpectralSampler {
    waveform: Vec<u8>,
    spectrum: Vec<u8>,
}

impl SpectralSampler {
    pub fn new(config: &SamplerConfig) -> Result<Self, ConfigError> {
        if config.waveform_len == 0 {
            return Err(ConfigError::EmptyBuffer { name: "waveform" });
        }
        if config.spectrum_len == 0 {
            return Err(ConfigError::EmptyBuffer { name: "spectrum" });
        }
        Ok(Self {
            waveform: vec![SILENT_SAMPLE; config.waveform_len],
            spectrum: vec![SILENT_BIN; config.spectrum_len],
        })
    }

    /// Pull the latest snapshots; anything unavailable reads as silence
    pub fn sample<S: AudioSource + ?Sized>(
        &mut self,
        source: &mut S,
    ) -> (WaveformSnapshot<'_>, SpectrumSnapshot<'_>) {
        if source.state().is_audible() {
            if let Err(e) = source.read_waveform(&mut self.waveform) {
                log::debug!("Waveform read gap, using silence: {}", e);
                self.waveform.fill(SILENT_SAMPLE);
            }
            if let Err(e) = source.read_spectrum(&mut self.spectrum) {
                log::debug!("Spectrum read gap, using silence: {}", e);
                self.spectrum.fill(SILENT_BIN);
            }
        } else {
            self.waveform.fill(SILENT_SAMPLE);
            self.spectrum.fill(SILENT_BIN);
        }

        (
            WaveformSnapshot(&self.waveform),
            SpectrumSnapshot(&self.spectrum),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{PlaybackState, SilentSource};
    use crate::error::AudioError;

    /// Source that reports `Playing` but fails every read
    struct BrokenSource;

    impl AudioSource for BrokenSource {
        fn state(&self) -> PlaybackState {
            PlaybackState::Playing
        }

        fn play(&mut self) -> Result<(), AudioError> {
            Ok(())
        }

        fn read_waveform(&mut self, out: &mut [u8]) -> Result<(), AudioError> {
            out.fill(7);
            Err(AudioError::Read("device unplugged".to_string()))
        }

        fn read_spectrum(&mut self, out: &mut [u8]) -> Result<(), AudioError> {
            out.fill(7);
            Err(AudioError::Read("device unplugged".to_string()))
        }
    }

    fn config() -> SamplerConfig {
        SamplerConfig {
            waveform_len: 16,
            spectrum_len: 8,
        }
    }

    #[test]
    fn test_idle_source_samples_silence() {
        let mut sampler = SpectralSampler::new(&config()).unwrap();
        let (waveform, spectrum) = sampler.sample(&mut SilentSource);

        assert_eq!(waveform.samples().len(), 16);
        assert_eq!(spectrum.bins().len(), 8);
        assert!(waveform.samples().iter().all(|&b| b == SILENT_SAMPLE));
        assert!(spectrum.bins().iter().all(|&b| b == SILENT_BIN));
    }

    #[test]
    fn test_failed_read_degrades_to_silence() {
        let mut sampler = SpectralSampler::new(&config()).unwrap();
        let (waveform, spectrum) = sampler.sample(&mut BrokenSource);

        assert!(waveform.samples().iter().all(|&b| b == SILENT_SAMPLE));
        assert!(spectrum.bins().iter().all(|&b| b == SILENT_BIN));
    }

    #[test]
    fn test_zero_length_rejected() {
        let config = SamplerConfig {
            waveform_len: 16,
            spectrum_len: 0,
        };
        assert!(matches!(
            SpectralSampler::new(&config),
            Err(ConfigError::EmptyBuffer { name: "spectrum" })
        ));
    }
}
