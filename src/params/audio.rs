//! Audio analysis configuration and constants.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Smallest transform window the analyser accepts (samples)
pub const MIN_FFT_SIZE: usize = 32;

/// Largest transform window the analyser accepts (samples)
pub const MAX_FFT_SIZE: usize = 32768;

/// Windowed-transform configuration behind the byte snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyserConfig {
    /// Transform window size (samples, must be power of 2)
    /// Default: 2048 (1024 frequency bins)
    pub fft_size: usize,

    /// Temporal averaging of bin magnitudes between reads (0 = none, 1 = frozen)
    /// Default: 0.8
    pub smoothing_time_constant: f32,

    /// Magnitude mapped to spectrum byte 0 (dBFS)
    /// Default: -100
    pub min_decibels: f32,

    /// Magnitude mapped to spectrum byte 255 (dBFS)
    /// Default: -30
    pub max_decibels: f32,
}

impl Default for AnalyserConfig {
    fn default() -> Self {
        Self {
            fft_size: 2048,
            smoothing_time_constant: 0.8,
            min_decibels: -100.0,
            max_decibels: -30.0,
        }
    }
}

impl AnalyserConfig {
    /// Number of usable frequency bins (half the transform size)
    pub fn frequency_bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Validate configuration (FFT size must be power of 2, etc.)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.fft_size.is_power_of_two()
            || !(MIN_FFT_SIZE..=MAX_FFT_SIZE).contains(&self.fft_size)
        {
            return Err(ConfigError::FftSize {
                got: self.fft_size,
                min: MIN_FFT_SIZE,
                max: MAX_FFT_SIZE,
            });
        }
        if !(0.0..=1.0).contains(&self.smoothing_time_constant) {
            return Err(ConfigError::invalid(
                "analyser.smoothing_time_constant",
                format!("must be in [0, 1], got {}", self.smoothing_time_constant),
            ));
        }
        if !self.min_decibels.is_finite()
            || !self.max_decibels.is_finite()
            || self.min_decibels >= self.max_decibels
        {
            return Err(ConfigError::invalid(
                "analyser decibel range",
                format!(
                    "min_decibels ({}) must be below max_decibels ({})",
                    self.min_decibels, self.max_decibels
                ),
            ));
        }
        Ok(())
    }
}

/// Snapshot sizes pulled from the audio source each tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Time-domain snapshot length (samples, must be power of 2)
    /// Default: 1024
    pub waveform_len: usize,

    /// Frequency snapshot length (bins, lowest first)
    /// Default: 1024
    pub spectrum_len: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            waveform_len: 1024,
            spectrum_len: 1024,
        }
    }
}

impl SamplerConfig {
    /// Validate snapshot sizes against the analyser that fills them
    pub fn validate(&self, analyser: &AnalyserConfig) -> Result<(), ConfigError> {
        if self.waveform_len == 0 {
            return Err(ConfigError::EmptyBuffer { name: "waveform" });
        }
        if self.spectrum_len == 0 {
            return Err(ConfigError::EmptyBuffer { name: "spectrum" });
        }
        if !self.waveform_len.is_power_of_two() {
            return Err(ConfigError::invalid(
                "sampler.waveform_len",
                format!("must be a power of 2, got {}", self.waveform_len),
            ));
        }
        if self.waveform_len > analyser.fft_size {
            return Err(ConfigError::BufferTooLong {
                name: "waveform",
                len: self.waveform_len,
                capacity: analyser.fft_size,
            });
        }
        if self.spectrum_len > analyser.frequency_bin_count() {
            return Err(ConfigError::BufferTooLong {
                name: "spectrum",
                len: self.spectrum_len,
                capacity: analyser.frequency_bin_count(),
            });
        }
        Ok(())
    }
}
